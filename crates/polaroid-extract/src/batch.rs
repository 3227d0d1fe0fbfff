// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Batch driver — discovers inputs and runs every image through the extractor
// one at a time, writing crops as they are produced.

use std::path::PathBuf;

use chrono::Local;
use polaroid_core::config::AppConfig;
use polaroid_core::error::{PolaroidError, Result};
use serde::Serialize;
use tracing::{info, instrument, warn};

use crate::discover::{InputFile, discover_inputs};
use crate::output::{OutputSink, timestamp};
use crate::pipeline::{PipelineObserver, PolaroidExtractor};

/// Outcome of one batch run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BatchSummary {
    /// Image files found in the input directory.
    pub discovered: usize,
    /// Files decoded and searched.
    pub processed: usize,
    /// Files that could not be decoded.
    pub skipped: usize,
    /// Every crop written, in write order.
    pub written: Vec<PathBuf>,
}

impl BatchSummary {
    pub fn crops_written(&self) -> usize {
        self.written.len()
    }
}

/// Runs the extractor over an input directory.
#[derive(Debug, Clone)]
pub struct BatchRunner {
    extractor: PolaroidExtractor,
    input_dir: PathBuf,
    output: OutputSink,
    first_file_only: bool,
}

impl BatchRunner {
    /// Validate the extractor settings and prepare the output directory.
    ///
    /// Fails if the configuration is invalid or the output directory cannot
    /// be created; no input is touched in either case.
    pub fn new(config: AppConfig) -> Result<Self> {
        let extractor = PolaroidExtractor::new(config.extractor)?;
        let output = OutputSink::prepare(&config.output_dir)?;
        Ok(Self {
            extractor,
            input_dir: config.input_dir,
            output,
            first_file_only: config.first_file_only,
        })
    }

    pub fn extractor(&self) -> &PolaroidExtractor {
        &self.extractor
    }

    /// Process every discovered input (or just the first, when so
    /// configured).
    ///
    /// Undecodable files are logged and skipped. Any failure to write a crop
    /// ends the run with that error.
    #[instrument(skip_all, fields(input = %self.input_dir.display(), output = %self.output.dir().display()))]
    pub fn run(&self, observer: &mut dyn PipelineObserver) -> Result<BatchSummary> {
        let inputs = discover_inputs(&self.input_dir)?;
        let mut summary = BatchSummary {
            discovered: inputs.len(),
            ..BatchSummary::default()
        };
        info!(count = inputs.len(), "Starting batch");

        let limit = if self.first_file_only { 1 } else { inputs.len() };
        for input in inputs.iter().take(limit) {
            match self.process(input, observer, &mut summary.written) {
                Ok(crops) => {
                    summary.processed += 1;
                    info!(file = %input.label(), crops, "Image done");
                }
                Err(err) if err.is_per_image() => {
                    summary.skipped += 1;
                    warn!(file = %input.label(), error = %err, "Skipping image");
                }
                Err(err) => return Err(err),
            }
        }

        info!(
            processed = summary.processed,
            skipped = summary.skipped,
            crops = summary.crops_written(),
            "Batch complete"
        );
        Ok(summary)
    }

    /// Decode one input and write all of its crops.
    fn process(
        &self,
        input: &InputFile,
        observer: &mut dyn PipelineObserver,
        written: &mut Vec<PathBuf>,
    ) -> Result<usize> {
        let image = image::open(&input.path).map_err(|err| PolaroidError::ImageDecode {
            path: input.path.clone(),
            message: err.to_string(),
        })?;

        let stamp = timestamp(Local::now());
        let label = input.label();
        self.extractor
            .extract_each(&image, &label, observer, |index, crop| {
                written.push(self.output.write_crop(&stamp, index, crop)?);
                Ok(())
            })
    }
}
