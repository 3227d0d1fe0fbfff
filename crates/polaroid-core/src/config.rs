// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Extractor configuration and the two named parameter profiles.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{PolaroidError, Result};

/// Laplacian-based 3x3 sharpen kernel, row-major.
pub const SHARPEN_KERNEL: [f32; 9] = [0.0, -1.0, 0.0, -1.0, 5.0, -1.0, 0.0, -1.0, 0.0];

/// Named parameter presets, one per observed deployment of the extractor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Profile {
    /// Flatbed scans of a handful of prints on a dark lid, full resolution.
    /// Adaptive thresholding, a single large-area lower bound, and only the
    /// first input file is processed.
    #[default]
    DeskScan,
    /// Photos of a grid of prints, as tuned for the in-browser tool. Fixed
    /// cutoff with median pre-blur and opening, area bounded on both sides
    /// around the expected print size.
    Browser,
}

/// How the per-pixel local level is computed for adaptive thresholding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AdaptiveMethod {
    /// Plain mean of the block.
    Mean,
    /// Gaussian-weighted mean of the block.
    Gaussian,
}

/// Binarization policy.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "kebab-case")]
pub enum ThresholdMode {
    /// Pixels brighter than `cutoff` are foreground.
    Fixed { cutoff: u8 },
    /// Pixels brighter than `local level - offset` are foreground, where the
    /// local level is taken over a `block_size` x `block_size` window.
    Adaptive {
        method: AdaptiveMethod,
        block_size: u32,
        offset: i32,
    },
}

/// How traced borders are arranged. Every border is searched either way;
/// only the depth reported for it differs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ContourHierarchy {
    /// Outer borders at level 0, hole borders at level 1.
    TwoLevel,
    /// Full nesting depth.
    Tree,
}

/// Every tunable of the detection and rectification pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    /// Detect on a copy resized to this width, then map the fitted
    /// rectangles back onto the full-resolution source. Area bounds are in
    /// detection pixels when set.
    pub detection_width: Option<u32>,
    pub threshold: ThresholdMode,
    /// Pixels at or below this intensity are forced to white before
    /// thresholding, hiding scanner-bed noise.
    pub dark_floor: Option<u8>,
    /// Median pre-blur radius applied to the grayscale image.
    pub median_radius: Option<u32>,
    /// L-infinity radius of the morphological opening applied to the mask.
    pub opening_radius: Option<u8>,
    pub hierarchy: ContourHierarchy,
    /// Polygon approximation tolerance as a fraction of contour perimeter.
    pub approx_tolerance: f64,
    /// Contours must enclose strictly more than this many square pixels.
    pub min_area: f64,
    /// Contours must enclose strictly less than this, when set.
    pub max_area: Option<f64>,
    /// Offset of the destination corners from the crop frame. Negative
    /// values push them outside the frame and trim into the print.
    pub padding: f32,
    /// Further trim on each side as a fraction of the crop's own width and
    /// height.
    pub edge_trim: f32,
    /// Row-major 3x3 sharpen kernel.
    pub sharpen_kernel: [f32; 9],
    /// Drop candidates whose center lies inside an already accepted one.
    pub suppress_overlaps: bool,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self::for_profile(Profile::default())
    }
}

impl ExtractorConfig {
    pub fn for_profile(profile: Profile) -> Self {
        match profile {
            Profile::DeskScan => Self {
                detection_width: None,
                threshold: ThresholdMode::Adaptive {
                    method: AdaptiveMethod::Gaussian,
                    block_size: 43,
                    offset: 2,
                },
                dark_floor: Some(10),
                median_radius: None,
                opening_radius: None,
                hierarchy: ContourHierarchy::TwoLevel,
                approx_tolerance: 0.01,
                min_area: 300_000.0,
                max_area: None,
                padding: -10.0,
                edge_trim: 0.0,
                sharpen_kernel: SHARPEN_KERNEL,
                suppress_overlaps: true,
            },
            Profile::Browser => {
                // Detection runs two prints wide at 500 px each, where a
                // print covers roughly 500 x 440 px, +/- 20%.
                let expected_area = 500.0 * 440.0;
                Self {
                    detection_width: Some(1000),
                    threshold: ThresholdMode::Fixed { cutoff: 100 },
                    dark_floor: None,
                    median_radius: Some(3),
                    opening_radius: Some(5),
                    hierarchy: ContourHierarchy::Tree,
                    approx_tolerance: 0.01,
                    min_area: expected_area * 0.8,
                    max_area: Some(expected_area * 1.2),
                    padding: 0.0,
                    edge_trim: 0.01,
                    sharpen_kernel: SHARPEN_KERNEL,
                    suppress_overlaps: true,
                }
            }
        }
    }

    /// Reject parameter combinations the pipeline cannot honour.
    pub fn validate(&self) -> Result<()> {
        if self.detection_width == Some(0) {
            return Err(PolaroidError::InvalidConfig(
                "detection width must be positive".into(),
            ));
        }
        if let ThresholdMode::Adaptive { block_size, .. } = self.threshold {
            if block_size < 3 || block_size % 2 == 0 {
                return Err(PolaroidError::InvalidConfig(format!(
                    "adaptive block size must be odd and at least 3, got {block_size}"
                )));
            }
        }
        if !(self.approx_tolerance > 0.0 && self.approx_tolerance < 1.0) {
            return Err(PolaroidError::InvalidConfig(format!(
                "approximation tolerance must lie in (0, 1), got {}",
                self.approx_tolerance
            )));
        }
        if !self.min_area.is_finite() || self.min_area < 0.0 {
            return Err(PolaroidError::InvalidConfig(format!(
                "minimum area must be a non-negative number, got {}",
                self.min_area
            )));
        }
        if let Some(max_area) = self.max_area {
            if !(max_area > self.min_area) {
                return Err(PolaroidError::InvalidConfig(format!(
                    "maximum area {max_area} must exceed minimum area {}",
                    self.min_area
                )));
            }
        }
        if !self.padding.is_finite() {
            return Err(PolaroidError::InvalidConfig("padding must be finite".into()));
        }
        if !(0.0..0.5).contains(&self.edge_trim) {
            return Err(PolaroidError::InvalidConfig(format!(
                "edge trim must lie in [0, 0.5), got {}",
                self.edge_trim
            )));
        }
        if self.sharpen_kernel.iter().any(|k| !k.is_finite()) {
            return Err(PolaroidError::InvalidConfig(
                "sharpen kernel weights must be finite".into(),
            ));
        }
        Ok(())
    }
}

/// Settings for one batch run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Directory scanned (non-recursively) for input images.
    pub input_dir: PathBuf,
    /// Directory crops are written into. Created when missing.
    pub output_dir: PathBuf,
    /// Stop after the first discovered input file.
    pub first_file_only: bool,
    pub extractor: ExtractorConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::for_profile(Profile::default())
    }
}

impl AppConfig {
    pub fn for_profile(profile: Profile) -> Self {
        Self {
            input_dir: PathBuf::from("./in"),
            output_dir: PathBuf::from("./out"),
            first_file_only: matches!(profile, Profile::DeskScan),
            extractor: ExtractorConfig::for_profile(profile),
        }
    }

    /// Load a JSON configuration file. Fields missing from the file keep the
    /// default profile's values.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        let config: Self = serde_json::from_str(&text)?;
        config.extractor.validate()?;
        Ok(config)
    }
}
