// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for the polaroid extractor.

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type for all extractor operations.
#[derive(Debug, Error)]
pub enum PolaroidError {
    // -- Input --
    #[error("input directory {path} is not readable: {source}")]
    InputDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to decode {path}: {message}")]
    ImageDecode { path: PathBuf, message: String },

    // -- Output --
    #[error("output directory {path} could not be prepared: {source}")]
    OutputDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("image encoding failed: {0}")]
    ImageEncode(String),

    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    // -- Configuration --
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("configuration parse error: {0}")]
    Config(#[from] serde_json::Error),
}

impl PolaroidError {
    /// Whether the batch driver may skip the offending file and carry on.
    pub fn is_per_image(&self) -> bool {
        matches!(self, Self::ImageDecode { .. })
    }
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, PolaroidError>;
