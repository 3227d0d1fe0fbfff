// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Criterion benchmarks for the polaroid-extract pipeline on a synthetic scan
// holding two prints.

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use image::{DynamicImage, Rgba, RgbaImage};

use polaroid_core::config::{ExtractorConfig, Profile, ThresholdMode};
use polaroid_extract::PolaroidExtractor;

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// 800x600 dark bed with a portrait and a landscape print.
fn two_print_scan() -> DynamicImage {
    let img = RgbaImage::from_fn(800, 600, |x, y| {
        let left = (60..300).contains(&x) && (80..480).contains(&y);
        let right = (380..740).contains(&x) && (150..400).contains(&y);
        if left || right {
            Rgba([235, 230, 220, 255])
        } else {
            Rgba([30, 30, 30, 255])
        }
    });
    DynamicImage::ImageRgba8(img)
}

fn bench_config(profile: Profile) -> ExtractorConfig {
    ExtractorConfig {
        min_area: 20_000.0,
        max_area: None,
        ..ExtractorConfig::for_profile(profile)
    }
}

// ---------------------------------------------------------------------------
// Benchmarks
// ---------------------------------------------------------------------------

/// Full pipeline with a fixed cutoff: mask, contours, two warps, sharpening.
fn bench_extract_fixed(c: &mut Criterion) {
    let scan = two_print_scan();
    let config = ExtractorConfig {
        detection_width: None,
        threshold: ThresholdMode::Fixed { cutoff: 100 },
        median_radius: None,
        opening_radius: None,
        ..bench_config(Profile::Browser)
    };
    let extractor = PolaroidExtractor::new(config).expect("valid bench config");

    c.bench_function("extract fixed (800x600, 2 prints)", |b| {
        b.iter(|| black_box(extractor.extract(black_box(&scan)).expect("extract")));
    });
}

/// Mask only, desk-scan profile: dark floor plus Gaussian adaptive threshold.
fn bench_adaptive_mask(c: &mut Criterion) {
    let scan = two_print_scan();
    let extractor =
        PolaroidExtractor::new(bench_config(Profile::DeskScan)).expect("valid bench config");

    c.bench_function("adaptive mask (800x600)", |b| {
        b.iter(|| black_box(extractor.mask(black_box(&scan))));
    });
}

criterion_group!(benches, bench_extract_fixed, bench_adaptive_mask);
criterion_main!(benches);
