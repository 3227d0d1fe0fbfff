// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Thresholding stage — dark-pixel suppression, optional pre-blur, fixed or
// adaptive binarization, and optional opening of the resulting mask.

use image::{DynamicImage, GrayImage, Luma};
use imageproc::definitions::Image;
use imageproc::distance_transform::Norm;
use imageproc::filter::{gaussian_blur_f32, median_filter};
use imageproc::integral_image::{integral_image, sum_image_pixels};
use imageproc::morphology::open;
use polaroid_core::config::{AdaptiveMethod, ExtractorConfig, ThresholdMode};
use tracing::{debug, instrument};

/// Mask value for foreground pixels.
pub const FOREGROUND: u8 = 255;

/// Produce the binary mask the contour search runs on.
///
/// Every output pixel is either 0 or [`FOREGROUND`], and the mask has the
/// same dimensions as `image`.
#[instrument(skip_all, fields(width = image.width(), height = image.height()))]
pub fn binarize(image: &DynamicImage, config: &ExtractorConfig) -> GrayImage {
    let mut gray = image.to_luma8();

    if let Some(floor) = config.dark_floor {
        suppress_dark_pixels(&mut gray, floor);
    }

    if let Some(radius) = config.median_radius.filter(|r| *r > 0) {
        gray = median_filter(&gray, radius, radius);
        debug!(radius, "Median pre-blur applied");
    }

    let mut mask = match config.threshold {
        ThresholdMode::Fixed { cutoff } => fixed_threshold(&gray, cutoff),
        ThresholdMode::Adaptive {
            method,
            block_size,
            offset,
        } => adaptive_threshold(&gray, method, block_size, offset),
    };

    if let Some(radius) = config.opening_radius.filter(|r| *r > 0) {
        mask = open(&mask, Norm::LInf, radius);
        debug!(radius, "Mask opened");
    }

    debug!(
        foreground = mask.pixels().filter(|p| p.0[0] == FOREGROUND).count(),
        "Binarization complete"
    );
    mask
}

/// Force every pixel at or below `floor` to full white.
pub fn suppress_dark_pixels(gray: &mut GrayImage, floor: u8) {
    for pixel in gray.pixels_mut() {
        if pixel.0[0] <= floor {
            pixel.0[0] = 255;
        }
    }
}

/// Pixels strictly brighter than `cutoff` become foreground.
pub fn fixed_threshold(gray: &GrayImage, cutoff: u8) -> GrayImage {
    GrayImage::from_fn(gray.width(), gray.height(), |x, y| {
        let val = gray.get_pixel(x, y).0[0];
        Luma([if val > cutoff { FOREGROUND } else { 0 }])
    })
}

/// Pixels strictly brighter than their local level minus `offset` become
/// foreground.
pub fn adaptive_threshold(
    gray: &GrayImage,
    method: AdaptiveMethod,
    block_size: u32,
    offset: i32,
) -> GrayImage {
    let (width, height) = gray.dimensions();
    let radius = block_size / 2;

    let local: Box<dyn Fn(u32, u32) -> f64> = match method {
        AdaptiveMethod::Mean => {
            let integral = integral_image::<_, u64>(gray);
            Box::new(move |x, y| region_mean(&integral, x, y, radius))
        }
        AdaptiveMethod::Gaussian => {
            let blurred = gaussian_blur_f32(gray, gaussian_sigma(block_size));
            Box::new(move |x, y| blurred.get_pixel(x, y).0[0] as f64)
        }
    };

    GrayImage::from_fn(width, height, |x, y| {
        let threshold = local(x, y) - offset as f64;
        let val = gray.get_pixel(x, y).0[0] as f64;
        Luma([if val > threshold { FOREGROUND } else { 0 }])
    })
}

/// Sigma matching a Gaussian kernel of `block_size` taps.
fn gaussian_sigma(block_size: u32) -> f32 {
    0.3 * ((block_size as f32 - 1.0) * 0.5 - 1.0) + 0.8
}

/// Mean of the square window of `radius` around (cx, cy), clamped to the
/// image bounds. `integral` is the summed-area table of the source.
fn region_mean(integral: &Image<Luma<u64>>, cx: u32, cy: u32, radius: u32) -> f64 {
    let (width, height) = (integral.width() - 1, integral.height() - 1);
    let left = cx.saturating_sub(radius);
    let top = cy.saturating_sub(radius);
    let right = cx.saturating_add(radius).min(width - 1);
    let bottom = cy.saturating_add(radius).min(height - 1);

    let count = ((right - left + 1) * (bottom - top + 1)) as f64;
    sum_image_pixels(integral, left, top, right, bottom)[0] as f64 / count
}
