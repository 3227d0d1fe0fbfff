// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for the polaroid extractor.

use serde::{Deserialize, Serialize};

/// Image formats picked up from the input directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InputFormat {
    Jpeg,
    Png,
    Tiff,
}

impl InputFormat {
    /// Infer the format from a file extension.
    ///
    /// Matching is case-sensitive and only the three spellings the scanner
    /// software produces are recognised: `jpg`, `png` and `tiff`.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext {
            "jpg" => Some(Self::Jpeg),
            "png" => Some(Self::Png),
            "tiff" => Some(Self::Tiff),
            _ => None,
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            Self::Jpeg => "jpg",
            Self::Png => "png",
            Self::Tiff => "tiff",
        }
    }
}

/// Orientation of a straightened crop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Orientation {
    /// Height >= width. Saved as-is.
    Portrait,
    /// Width > height. Rotated a quarter turn before saving.
    Landscape,
}

impl Orientation {
    pub fn of(width: u32, height: u32) -> Self {
        if width > height {
            Self::Landscape
        } else {
            Self::Portrait
        }
    }
}

/// Minimum-area rotated rectangle fitted around a candidate contour.
///
/// `width` is measured along the rectangle axis closest to the image x axis
/// and `height` along its perpendicular, so `angle_deg` always lies in
/// `(-45, 45]`. Coordinates are in source pixels, y pointing down.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OrientedRect {
    pub center: (f64, f64),
    pub width: f64,
    pub height: f64,
    pub angle_deg: f64,
}

impl OrientedRect {
    /// Unit vectors of the width and height axes.
    pub fn axes(&self) -> ((f64, f64), (f64, f64)) {
        let (sin, cos) = self.angle_deg.to_radians().sin_cos();
        ((cos, sin), (-sin, cos))
    }

    /// Corners in the order top-left, top-right, bottom-right, bottom-left.
    pub fn corners(&self) -> [(f64, f64); 4] {
        let ((ux, uy), (vx, vy)) = self.axes();
        let (cx, cy) = self.center;
        let hw = self.width / 2.0;
        let hh = self.height / 2.0;
        let at = |su: f64, sv: f64| (cx + su * hw * ux + sv * hh * vx, cy + su * hw * uy + sv * hh * vy);
        [at(-1.0, -1.0), at(1.0, -1.0), at(1.0, 1.0), at(-1.0, 1.0)]
    }

    /// Integer output size, truncating like the rest of the pipeline.
    pub fn pixel_size(&self) -> (u32, u32) {
        (self.width.max(0.0) as u32, self.height.max(0.0) as u32)
    }

    /// A rectangle that truncates to a zero-sized crop has no valid transform.
    pub fn is_degenerate(&self) -> bool {
        let (w, h) = self.pixel_size();
        w == 0 || h == 0
    }

    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    /// The same rectangle in an image resized by `factor`.
    pub fn scaled(&self, factor: f64) -> Self {
        Self {
            center: (self.center.0 * factor, self.center.1 * factor),
            width: self.width * factor,
            height: self.height * factor,
            angle_deg: self.angle_deg,
        }
    }

    /// Whether `point` falls inside the rectangle (boundary inclusive).
    pub fn contains(&self, point: (f64, f64)) -> bool {
        let ((ux, uy), (vx, vy)) = self.axes();
        let dx = point.0 - self.center.0;
        let dy = point.1 - self.center.1;
        let along_width = dx * ux + dy * uy;
        let along_height = dx * vx + dy * vy;
        along_width.abs() <= self.width / 2.0 && along_height.abs() <= self.height / 2.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_matching_is_case_sensitive() {
        assert_eq!(InputFormat::from_extension("jpg"), Some(InputFormat::Jpeg));
        assert_eq!(InputFormat::from_extension("tiff"), Some(InputFormat::Tiff));
        assert_eq!(InputFormat::from_extension("JPG"), None);
        assert_eq!(InputFormat::from_extension("jpeg"), None);
        assert_eq!(InputFormat::from_extension("tif"), None);
    }

    #[test]
    fn orientation_prefers_portrait_for_squares() {
        assert_eq!(Orientation::of(10, 10), Orientation::Portrait);
        assert_eq!(Orientation::of(10, 20), Orientation::Portrait);
        assert_eq!(Orientation::of(21, 20), Orientation::Landscape);
    }

    #[test]
    fn axis_aligned_corners() {
        let rect = OrientedRect {
            center: (50.0, 30.0),
            width: 20.0,
            height: 10.0,
            angle_deg: 0.0,
        };
        let corners = rect.corners();
        let expected = [(40.0, 25.0), (60.0, 25.0), (60.0, 35.0), (40.0, 35.0)];
        for (got, want) in corners.iter().zip(expected.iter()) {
            assert!((got.0 - want.0).abs() < 1e-9 && (got.1 - want.1).abs() < 1e-9, "{got:?} != {want:?}");
        }
    }

    #[test]
    fn scaling_keeps_the_angle() {
        let rect = OrientedRect {
            center: (30.0, 20.0),
            width: 12.0,
            height: 8.0,
            angle_deg: -25.0,
        };
        let up = rect.scaled(1.5);
        assert_eq!(up.center, (45.0, 30.0));
        assert_eq!((up.width, up.height), (18.0, 12.0));
        assert_eq!(up.angle_deg, -25.0);
        assert!((up.area() - rect.area() * 2.25).abs() < 1e-9);
    }

    #[test]
    fn rotated_rect_contains_its_center_but_not_far_points() {
        let rect = OrientedRect {
            center: (100.0, 100.0),
            width: 40.0,
            height: 20.0,
            angle_deg: 30.0,
        };
        assert!(rect.contains((100.0, 100.0)));
        assert!(!rect.contains((100.0, 125.0)));
        assert!(!rect.contains((130.0, 100.0)));
    }

    #[test]
    fn truncation_to_zero_is_degenerate() {
        let rect = OrientedRect {
            center: (0.0, 0.0),
            width: 0.7,
            height: 40.0,
            angle_deg: 0.0,
        };
        assert!(rect.is_degenerate());
        assert_eq!(rect.pixel_size(), (0, 40));
    }
}
