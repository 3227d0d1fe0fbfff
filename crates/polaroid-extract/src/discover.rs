// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Input discovery — lists the images in the input directory.

use std::path::{Path, PathBuf};

use polaroid_core::InputFormat;
use polaroid_core::error::{PolaroidError, Result};
use tracing::{debug, instrument};

/// An input image found on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputFile {
    pub path: PathBuf,
    pub format: InputFormat,
}

impl InputFile {
    /// File name used to label log lines and debug dumps.
    pub fn label(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }
}

/// List the `jpg`, `png` and `tiff` files directly inside `dir`.
///
/// Subdirectories are not searched, extensions are matched case-sensitively,
/// and the result is sorted by file name so runs are reproducible.
#[instrument(skip_all, fields(dir = %dir.as_ref().display()))]
pub fn discover_inputs(dir: impl AsRef<Path>) -> Result<Vec<InputFile>> {
    let dir = dir.as_ref();
    let input_dir_error = |source| PolaroidError::InputDir {
        path: dir.to_path_buf(),
        source,
    };

    let mut inputs = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(input_dir_error)? {
        let entry = entry.map_err(input_dir_error)?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let Some(format) = path
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(InputFormat::from_extension)
        else {
            debug!(path = %path.display(), "Not an input image; ignored");
            continue;
        };
        inputs.push(InputFile { path, format });
    }

    inputs.sort_by(|a, b| a.path.file_name().cmp(&b.path.file_name()));
    debug!(count = inputs.len(), "Inputs discovered");
    Ok(inputs)
}
