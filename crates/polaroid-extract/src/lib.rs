// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// polaroid-extract — locates instant-photo prints in a scanned scene and turns
// each into an upright, sharpened crop.
//
// Detection stages (binarization, contour search, rectification) live under
// `scan`, crop post-processing under `image`, and the file-level driver in
// `discover`, `output` and `batch`.

pub mod batch;
pub mod debug;
pub mod discover;
pub mod image;
pub mod output;
pub mod pipeline;
pub mod scan;

#[cfg(test)]
pub(crate) mod test_utils;

// Re-export the primary structs so callers can use `polaroid_extract::BatchRunner` etc.
pub use batch::{BatchRunner, BatchSummary};
pub use debug::DebugDumpObserver;
pub use discover::{InputFile, discover_inputs};
pub use self::image::processor::CropProcessor;
pub use output::OutputSink;
pub use pipeline::{NoopObserver, PipelineObserver, PolaroidExtractor};
pub use scan::Candidate;
