// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Crop output — timestamped file naming and collision-safe PNG writes.

use std::fs::OpenOptions;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use image::RgbaImage;
use polaroid_core::error::{PolaroidError, Result};
use tracing::{debug, info, instrument, warn};

use crate::image::CropProcessor;

/// `strftime` pattern of the timestamp embedded in crop file names.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d-%H:%M:%S";

/// Second-precision local timestamp as used in crop file names.
pub fn timestamp(now: DateTime<Local>) -> String {
    now.format(TIMESTAMP_FORMAT).to_string()
}

/// `polaroid_<stamp>_<index>.png`, with `_<attempt>` before the extension
/// for every attempt after the first.
pub fn crop_file_name(stamp: &str, index: usize, attempt: u32) -> String {
    if attempt == 0 {
        format!("polaroid_{stamp}_{index}.png")
    } else {
        format!("polaroid_{stamp}_{index}_{attempt}.png")
    }
}

/// Destination directory for finished crops.
#[derive(Debug, Clone)]
pub struct OutputSink {
    dir: PathBuf,
}

impl OutputSink {
    /// Ensure `dir` exists, creating it and any missing parents.
    pub fn prepare(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&dir).map_err(|source| PolaroidError::OutputDir {
            path: dir.clone(),
            source,
        })?;
        debug!(dir = %dir.display(), "Output directory ready");
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Encode `crop` as PNG and write it under a fresh name.
    ///
    /// Existing files are never replaced: if the name for `stamp`/`index` is
    /// taken, a numeric suffix is added until a free name is found.
    #[instrument(skip(self, crop), fields(dir = %self.dir.display()))]
    pub fn write_crop(&self, stamp: &str, index: usize, crop: RgbaImage) -> Result<PathBuf> {
        let bytes = CropProcessor::new(crop).to_png_bytes()?;

        let mut attempt = 0u32;
        loop {
            let path = self.dir.join(crop_file_name(stamp, index, attempt));
            match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(file) => {
                    fill_new_file(file, &path, &bytes)?;
                    info!(path = %path.display(), bytes = bytes.len(), "Crop written");
                    return Ok(path);
                }
                Err(err) if err.kind() == ErrorKind::AlreadyExists => {
                    debug!(path = %path.display(), "Name taken; trying next suffix");
                    attempt += 1;
                }
                Err(err) => return Err(PolaroidError::Io(err)),
            }
        }
    }
}

/// Write `bytes` into a freshly created `file` at `path`. On failure the
/// partial file is removed so no truncated crop is left behind.
fn fill_new_file(mut file: impl Write, path: &Path, bytes: &[u8]) -> Result<()> {
    let written = file.write_all(bytes).and_then(|()| file.flush());
    drop(file);
    if let Err(err) = written {
        if let Err(remove_err) = std::fs::remove_file(path) {
            warn!(path = %path.display(), error = %remove_err, "Could not remove partial crop");
        }
        return Err(PolaroidError::Io(err));
    }
    Ok(())
}
