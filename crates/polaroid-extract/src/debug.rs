// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Debug dumps — writes each image's mask and an outline overlay of the
// accepted candidates to a directory for offline inspection.

use std::path::{Path, PathBuf};

use image::{GrayImage, Rgba, RgbaImage};
use imageproc::drawing::draw_line_segment_mut;
use polaroid_core::error::{PolaroidError, Result};
use tracing::warn;

use crate::pipeline::PipelineObserver;
use crate::scan::Candidate;

/// Traced contour outline colour.
const CONTOUR_COLOUR: Rgba<u8> = Rgba([0, 255, 0, 255]);
/// Fitted rectangle outline colour.
const RECT_COLOUR: Rgba<u8> = Rgba([255, 0, 0, 255]);

/// Observer that saves `<label>.mask.png` and `<label>.candidates.png` for
/// every processed image. Write failures are logged and otherwise ignored so
/// a debug run behaves like a normal one.
#[derive(Debug, Clone)]
pub struct DebugDumpObserver {
    dir: PathBuf,
}

impl DebugDumpObserver {
    pub fn new(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&dir).map_err(|source| PolaroidError::OutputDir {
            path: dir.clone(),
            source,
        })?;
        Ok(Self { dir })
    }

    fn save(&self, name: String, save: impl FnOnce(&Path) -> image::ImageResult<()>) {
        let path = self.dir.join(name);
        if let Err(err) = save(&path) {
            warn!(path = %path.display(), error = %err, "Debug dump failed");
        }
    }
}

impl PipelineObserver for DebugDumpObserver {
    fn on_mask(&mut self, label: &str, mask: &GrayImage) {
        self.save(format!("{label}.mask.png"), |path| mask.save(path));
    }

    fn on_candidates(&mut self, label: &str, source: &RgbaImage, candidates: &[Candidate]) {
        let overlay = annotate(source, candidates);
        self.save(format!("{label}.candidates.png"), |path| overlay.save(path));
    }
}

/// Copy of `source` with each candidate's contour and fitted rectangle drawn
/// on top.
pub fn annotate(source: &RgbaImage, candidates: &[Candidate]) -> RgbaImage {
    let mut overlay = source.clone();
    for candidate in candidates {
        let contour: Vec<(f32, f32)> = candidate
            .contour
            .iter()
            .map(|p| (p.x as f32, p.y as f32))
            .collect();
        draw_closed(&mut overlay, &contour, CONTOUR_COLOUR);

        let corners: Vec<(f32, f32)> = candidate
            .rect
            .corners()
            .iter()
            .map(|&(x, y)| (x as f32, y as f32))
            .collect();
        draw_closed(&mut overlay, &corners, RECT_COLOUR);
    }
    overlay
}

fn draw_closed(canvas: &mut RgbaImage, points: &[(f32, f32)], colour: Rgba<u8>) {
    let n = points.len();
    for i in 0..n {
        draw_line_segment_mut(canvas, points[i], points[(i + 1) % n], colour);
    }
}
