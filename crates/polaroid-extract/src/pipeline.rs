// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Extraction pipeline — ties thresholding, the quadrilateral search,
// rectification and crop post-processing together for one source image.

use image::imageops::{self, FilterType};
use image::{DynamicImage, GrayImage, RgbaImage};
use polaroid_core::config::ExtractorConfig;
use polaroid_core::error::Result;
use tracing::{debug, info, instrument};

use crate::image::CropProcessor;
use crate::scan::{Candidate, binarize, find_candidates, rectify};

/// Hooks for inspecting intermediate results.
///
/// All methods default to doing nothing, and none may block: the pipeline runs
/// headless unless an observer chooses to record something.
pub trait PipelineObserver {
    /// Called once per image with the binary mask the contour search used.
    fn on_mask(&mut self, _label: &str, _mask: &GrayImage) {}

    /// Called once per image with the source pixels and every accepted
    /// candidate, before any crop is produced.
    fn on_candidates(&mut self, _label: &str, _source: &RgbaImage, _candidates: &[Candidate]) {}
}

/// Observer that ignores everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl PipelineObserver for NoopObserver {}

/// Finds prints in a source image and turns each into a finished crop.
#[derive(Debug, Clone)]
pub struct PolaroidExtractor {
    config: ExtractorConfig,
}

impl PolaroidExtractor {
    /// Build an extractor, rejecting invalid configurations up front.
    pub fn new(config: ExtractorConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    /// Stage (b): grayscale and binarize.
    pub fn mask(&self, image: &DynamicImage) -> GrayImage {
        binarize(image, &self.config)
    }

    /// Stages (c)-(e): trace, filter and fit rectangles.
    pub fn candidates(&self, mask: &GrayImage) -> Vec<Candidate> {
        find_candidates(mask, &self.config)
    }

    /// Copy of `image` resized to the configured detection width, with the
    /// factor that maps detection coordinates back to `image`.
    ///
    /// `None` when detection runs on `image` itself.
    fn detection_view(&self, image: &DynamicImage) -> Option<(DynamicImage, f64)> {
        let target = self.config.detection_width?;
        let (width, height) = (image.width(), image.height());
        if width == 0 || target == width {
            return None;
        }
        let scale = f64::from(target) / f64::from(width);
        let target_height = ((f64::from(height) * scale).round() as u32).max(1);
        debug!(width, height, target, target_height, "Resizing for detection");
        let resized = imageops::resize(image, target, target_height, FilterType::Triangle);
        Some((DynamicImage::ImageRgba8(resized), 1.0 / scale))
    }

    /// Stages (f)-(h) for one candidate: warp, portrait-normalise, sharpen.
    ///
    /// Returns `None` when the candidate's geometry is degenerate.
    pub fn finish_candidate(&self, source: &RgbaImage, candidate: &Candidate) -> Option<RgbaImage> {
        let crop = rectify(source, &candidate.rect, self.config.padding, self.config.edge_trim)?;
        let finished = CropProcessor::new(crop)
            .to_portrait()
            .sharpen(&self.config.sharpen_kernel)
            .into_rgba();
        Some(finished)
    }

    /// Run the whole pipeline on `image`, handing each crop to `emit` as soon
    /// as it is ready together with its per-image index (0, 1, ...).
    ///
    /// Crops are not retained once `emit` returns. An error from `emit`
    /// aborts the remaining candidates and is returned. Returns the number of
    /// crops emitted.
    #[instrument(skip_all, fields(label = label))]
    pub fn extract_each<F>(
        &self,
        image: &DynamicImage,
        label: &str,
        observer: &mut dyn PipelineObserver,
        mut emit: F,
    ) -> Result<usize>
    where
        F: FnMut(usize, RgbaImage) -> Result<()>,
    {
        let view = self.detection_view(image);
        let detect_on = view.as_ref().map_or(image, |(resized, _)| resized);

        let mask = self.mask(detect_on);
        observer.on_mask(label, &mask);

        let mut candidates = self.candidates(&mask);
        drop(mask);
        if let Some((_, factor)) = view {
            candidates = candidates.iter().map(|c| c.scaled(factor)).collect();
        }

        let source = image.to_rgba8();
        observer.on_candidates(label, &source, &candidates);
        info!(candidates = candidates.len(), "Prints located");

        let mut index = 0;
        for candidate in &candidates {
            let Some(crop) = self.finish_candidate(&source, candidate) else {
                continue;
            };
            debug!(index, width = crop.width(), height = crop.height(), "Crop ready");
            emit(index, crop)?;
            index += 1;
        }
        Ok(index)
    }

    /// Convenience wrapper collecting every crop of `image` in memory.
    pub fn extract(&self, image: &DynamicImage) -> Result<Vec<RgbaImage>> {
        let mut crops = Vec::new();
        self.extract_each(image, "in-memory", &mut NoopObserver, |_, crop| {
            crops.push(crop);
            Ok(())
        })?;
        Ok(crops)
    }
}
