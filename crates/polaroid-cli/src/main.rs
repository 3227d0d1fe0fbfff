// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Polaroid extractor — batch command-line front end.
//
// Entry point. Initialises logging, resolves the run configuration from the
// chosen profile or a JSON file plus command-line overrides, and runs the
// batch over the input directory.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use polaroid_core::config::{AppConfig, Profile};
use polaroid_core::error::Result;
use polaroid_extract::{BatchRunner, DebugDumpObserver, NoopObserver, PipelineObserver};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum CliProfile {
    /// Flatbed scans: adaptive threshold, first input file only.
    DeskScan,
    /// Photographed grids of prints: fixed cutoff, all input files.
    Browser,
}

impl From<CliProfile> for Profile {
    fn from(profile: CliProfile) -> Self {
        match profile {
            CliProfile::DeskScan => Profile::DeskScan,
            CliProfile::Browser => Profile::Browser,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "polaroid-extract")]
#[command(about = "Find instant-photo prints in scans, straighten, sharpen and save each one")]
#[command(version)]
struct Cli {
    /// Directory to read .jpg, .png and .tiff scans from.
    #[arg(long)]
    input: Option<PathBuf>,

    /// Directory to write crops into (created if missing).
    #[arg(long)]
    output: Option<PathBuf>,

    /// Parameter preset.
    #[arg(long, value_enum, default_value = "desk-scan", conflicts_with = "config")]
    profile: CliProfile,

    /// JSON configuration file; fields it omits keep the desk-scan defaults.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Process every input file, not just the first.
    #[arg(long, conflicts_with = "first_only")]
    all_files: bool,

    /// Stop after the first input file.
    #[arg(long)]
    first_only: bool,

    /// Write each image's mask and candidate overlay into this directory.
    #[arg(long)]
    debug_dir: Option<PathBuf>,
}

impl Cli {
    fn resolve_config(&self) -> Result<AppConfig> {
        let mut config = match &self.config {
            Some(path) => AppConfig::load(path)?,
            None => AppConfig::for_profile(self.profile.into()),
        };
        if let Some(input) = &self.input {
            config.input_dir = input.clone();
        }
        if let Some(output) = &self.output {
            config.output_dir = output.clone();
        }
        if self.all_files {
            config.first_file_only = false;
        }
        if self.first_only {
            config.first_file_only = true;
        }
        Ok(config)
    }
}

fn run(cli: &Cli) -> Result<()> {
    let config = cli.resolve_config()?;
    tracing::debug!(?config, "Resolved configuration");

    let runner = BatchRunner::new(config)?;
    let mut observer: Box<dyn PipelineObserver> = match &cli.debug_dir {
        Some(dir) => Box::new(DebugDumpObserver::new(dir)?),
        None => Box::new(NoopObserver),
    };

    let summary = runner.run(observer.as_mut())?;
    tracing::info!(
        discovered = summary.discovered,
        processed = summary.processed,
        skipped = summary.skipped,
        crops = summary.crops_written(),
        "Done"
    );
    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    tracing::info!("Polaroid extractor starting");

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(error = %err, "Run failed");
            ExitCode::FAILURE
        }
    }
}
