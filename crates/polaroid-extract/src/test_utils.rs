// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Synthetic scenes and configurations shared by the unit tests.

use image::{DynamicImage, Rgba, RgbaImage};
use polaroid_core::config::{ContourHierarchy, ExtractorConfig, Profile, ThresholdMode};

/// Colour of a synthetic print.
pub(crate) const PRINT: Rgba<u8> = Rgba([230, 225, 210, 255]);

/// Colour of the synthetic scanner bed.
pub(crate) const BED: Rgba<u8> = Rgba([40, 40, 40, 255]);

/// Fixed-cutoff configuration with no pre- or post-filtering and no padding,
/// so crop sizes follow the traced border exactly.
pub(crate) fn test_config(min_area: f64) -> ExtractorConfig {
    ExtractorConfig {
        threshold: ThresholdMode::Fixed { cutoff: 100 },
        dark_floor: None,
        median_radius: None,
        opening_radius: None,
        hierarchy: ContourHierarchy::TwoLevel,
        min_area,
        max_area: None,
        padding: 0.0,
        ..ExtractorConfig::for_profile(Profile::DeskScan)
    }
}

/// Bed-coloured scene of `size` with one print covering `w` x `h` pixels
/// whose top-left pixel is (x0, y0).
pub(crate) fn scene(size: (u32, u32), x0: u32, y0: u32, w: u32, h: u32) -> DynamicImage {
    let img = RgbaImage::from_fn(size.0, size.1, |x, y| {
        if (x0..x0 + w).contains(&x) && (y0..y0 + h).contains(&y) {
            PRINT
        } else {
            BED
        }
    });
    DynamicImage::ImageRgba8(img)
}
