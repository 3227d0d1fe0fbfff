// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Rectification — minimum-area rectangle fitting and the projective warp that
// straightens a candidate into an axis-aligned crop.

use image::{Rgba, RgbaImage};
use imageproc::geometric_transformations::{Interpolation, Projection, warp_into};
use imageproc::geometry;
use imageproc::point::Point;
use polaroid_core::OrientedRect;
use tracing::{debug, warn};

/// Colour for crop pixels that map outside the source image.
pub const FILL: Rgba<u8> = Rgba([0, 0, 0, 255]);

/// Fit the minimum-area rotated rectangle around `points`.
///
/// The width axis is the rectangle side nearest the image x axis. Returns
/// `None` for fewer than three points or when the points are collinear.
pub fn min_area_rect(points: &[Point<i32>]) -> Option<OrientedRect> {
    if points.len() < 3 {
        return None;
    }
    let corners = geometry::min_area_rect(points).map(|p| (p.x as f64, p.y as f64));
    from_corners(corners)
}

/// Build an `OrientedRect` from four rectangle corners given in any order.
fn from_corners(corners: [(f64, f64); 4]) -> Option<OrientedRect> {
    let origin = corners[0];
    let offset = |p: (f64, f64)| (p.0 - origin.0, p.1 - origin.1);
    let length = |v: (f64, f64)| v.0.hypot(v.1);

    // The corner farthest from the first is its diagonal partner; the other
    // two lie along its sides.
    let mut rest: Vec<(f64, f64)> = corners[1..].iter().map(|&p| offset(p)).collect();
    rest.sort_by(|a, b| length(*a).total_cmp(&length(*b)));
    let (side_a, side_b) = (rest[0], rest[1]);
    let (width, height) = (length(side_a), length(side_b));
    if width < 1e-9 || height < 1e-9 {
        return None;
    }

    let center = (
        corners.iter().map(|p| p.0).sum::<f64>() / 4.0,
        corners.iter().map(|p| p.1).sum::<f64>() / 4.0,
    );
    let angle = side_a.1.atan2(side_a.0).to_degrees();
    Some(normalise_axes(center, width, height, angle))
}

/// Turn the width axis in quarter steps until its angle lies in (-45, 45],
/// swapping the side lengths at every step.
fn normalise_axes(center: (f64, f64), width: f64, height: f64, angle_deg: f64) -> OrientedRect {
    let (mut width, mut height, mut angle) = (width, height, angle_deg);
    while angle > 45.0 {
        angle -= 90.0;
        std::mem::swap(&mut width, &mut height);
    }
    while angle <= -45.0 {
        angle += 90.0;
        std::mem::swap(&mut width, &mut height);
    }
    OrientedRect {
        center,
        width,
        height,
        angle_deg: angle,
    }
}

/// Destination corners (TL, TR, BR, BL) for a `width` x `height` crop, each
/// moved `pad_x` pixels horizontally and `pad_y` vertically towards the
/// inside of the frame.
pub fn destination_corners(width: u32, height: u32, (pad_x, pad_y): (f32, f32)) -> [(f32, f32); 4] {
    let (w, h) = (width as f32, height as f32);
    [
        (pad_x, pad_y),
        (w - pad_x, pad_y),
        (w - pad_x, h - pad_y),
        (pad_x, h - pad_y),
    ]
}

/// Warp the region under `rect` into an upright crop of the rectangle's
/// truncated size.
///
/// The destination corners sit `padding` pixels inside the frame, less
/// `edge_trim` times the crop width (horizontally) or height (vertically).
/// Returns `None` when the rectangle truncates to zero width or height, or
/// when the corner correspondences admit no projective transform.
pub fn rectify(
    source: &RgbaImage,
    rect: &OrientedRect,
    padding: f32,
    edge_trim: f32,
) -> Option<RgbaImage> {
    if rect.is_degenerate() {
        warn!(
            width = rect.width,
            height = rect.height,
            "Degenerate rectangle; candidate skipped"
        );
        return None;
    }
    let (width, height) = rect.pixel_size();

    let src = rect.corners().map(|(x, y)| (x as f32, y as f32));
    let pad = (
        padding - edge_trim * width as f32,
        padding - edge_trim * height as f32,
    );
    let dst = destination_corners(width, height, pad);

    let Some(projection) = Projection::from_control_points(src, dst) else {
        warn!(corners = ?src, "No projective transform for candidate; skipped");
        return None;
    };

    let mut crop = RgbaImage::new(width, height);
    warp_into(source, &projection, Interpolation::Bilinear, FILL, &mut crop);
    debug!(width, height, pad_x = pad.0, pad_y = pad.1, "Candidate rectified");
    Some(crop)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, Luma};
    use imageproc::drawing::draw_polygon_mut;

    use polaroid_core::config::ContourHierarchy;

    use crate::scan::contours::trace_contours;

    fn corners_of(w: i32, h: i32) -> Vec<Point<i32>> {
        vec![
            Point::new(0, 0),
            Point::new(w, 0),
            Point::new(w, h),
            Point::new(0, h),
        ]
    }

    #[test]
    fn axis_aligned_rect_keeps_width_horizontal() {
        let rect = min_area_rect(&corners_of(80, 30)).unwrap();
        assert!((rect.width - 80.0).abs() <= 1.0, "{rect:?}");
        assert!((rect.height - 30.0).abs() <= 1.0, "{rect:?}");
        assert!(rect.angle_deg.abs() < 1.0);
        assert!((rect.center.0 - 40.0).abs() <= 1.0 && (rect.center.1 - 15.0).abs() <= 1.0);

        let tall = min_area_rect(&corners_of(30, 80)).unwrap();
        assert!((tall.width - 30.0).abs() <= 1.0, "{tall:?}");
        assert!((tall.height - 80.0).abs() <= 1.0, "{tall:?}");
    }

    #[test]
    fn interior_points_do_not_change_the_fit() {
        let mut points = corners_of(50, 20);
        points.push(Point::new(25, 10));
        points.push(Point::new(3, 17));
        let rect = min_area_rect(&points).unwrap();
        assert!((rect.width - 50.0).abs() <= 1.0 && (rect.height - 20.0).abs() <= 1.0, "{rect:?}");
    }

    #[test]
    fn too_few_or_collinear_points_have_no_rectangle() {
        assert!(min_area_rect(&[Point::new(0, 0), Point::new(5, 5)]).is_none());
        let line = [Point::new(0, 0), Point::new(5, 5), Point::new(10, 10)];
        assert!(min_area_rect(&line).is_none());
    }

    #[test]
    fn corner_order_does_not_matter() {
        let corners = [(10.0, 20.0), (110.0, 20.0), (110.0, 60.0), (10.0, 60.0)];
        let shuffled = [corners[2], corners[0], corners[3], corners[1]];
        for input in [corners, shuffled] {
            let rect = from_corners(input).unwrap();
            assert!((rect.width - 100.0).abs() < 1e-9, "{rect:?}");
            assert!((rect.height - 40.0).abs() < 1e-9, "{rect:?}");
            assert!(rect.angle_deg.abs() < 1e-9);
            assert_eq!(rect.center, (60.0, 40.0));
        }
    }

    #[test]
    fn rotated_print_is_measured_along_its_own_sides() {
        // 120 x 70 rectangle rotated by 20 degrees about (150, 150).
        let (sin, cos) = 20f64.to_radians().sin_cos();
        let poly: Vec<Point<i32>> = [(-60.0, -35.0), (60.0, -35.0), (60.0, 35.0), (-60.0, 35.0)]
            .iter()
            .map(|&(x, y)| {
                Point::new(
                    (150.0 + x * cos - y * sin).round() as i32,
                    (150.0 + x * sin + y * cos).round() as i32,
                )
            })
            .collect();
        let mut mask = GrayImage::new(300, 300);
        draw_polygon_mut(&mut mask, &poly, Luma([255u8]));

        let traced = trace_contours(&mask, ContourHierarchy::Tree);
        assert_eq!(traced.len(), 1);
        let rect = min_area_rect(&traced[0].points).unwrap();

        assert!((rect.angle_deg - 20.0).abs() < 2.0, "angle {}", rect.angle_deg);
        assert!((rect.width - 120.0).abs() < 3.0, "width {}", rect.width);
        assert!((rect.height - 70.0).abs() < 3.0, "height {}", rect.height);
        assert!((rect.center.0 - 150.0).abs() < 2.0 && (rect.center.1 - 150.0).abs() < 2.0);
    }

    #[test]
    fn destination_corners_move_inward_with_padding() {
        assert_eq!(
            destination_corners(100, 50, (5.0, 5.0)),
            [(5.0, 5.0), (95.0, 5.0), (95.0, 45.0), (5.0, 45.0)]
        );
        assert_eq!(destination_corners(100, 50, (-10.0, -10.0))[0], (-10.0, -10.0));
        assert_eq!(destination_corners(100, 50, (-1.0, -0.5))[2], (101.0, 50.5));
    }

    #[test]
    fn rectify_produces_truncated_size_and_samples_the_print() {
        let mut source = RgbaImage::from_pixel(200, 200, Rgba([20, 20, 20, 255]));
        for y in 50..110 {
            for x in 40..140 {
                source.put_pixel(x, y, Rgba([200, 120, 40, 255]));
            }
        }
        let rect = OrientedRect {
            center: (89.5, 79.5),
            width: 99.0,
            height: 59.0,
            angle_deg: 0.0,
        };

        let crop = rectify(&source, &rect, -10.0, 0.0).unwrap();
        assert_eq!(crop.dimensions(), (99, 59));
        // Negative padding trims inward: the whole crop lies on the print.
        for (x, y) in [(0, 0), (98, 0), (49, 29), (0, 58), (98, 58)] {
            assert_eq!(*crop.get_pixel(x, y), Rgba([200, 120, 40, 255]), "pixel ({x}, {y})");
        }
    }

    #[test]
    fn relative_edge_trim_scales_with_crop_size() {
        // Red channel equals the source column.
        let source = RgbaImage::from_fn(200, 100, |x, _| Rgba([x as u8, 0, 0, 255]));
        let rect = OrientedRect {
            center: (60.0, 50.0),
            width: 100.0,
            height: 60.0,
            angle_deg: 0.0,
        };
        let plain = rectify(&source, &rect, 0.0, 0.0).unwrap();
        let trimmed = rectify(&source, &rect, 0.0, 0.1).unwrap();
        assert_eq!(trimmed.dimensions(), plain.dimensions());

        // Columns 10..=110 span the rectangle. A 10% trim stretches the
        // destination by 10 px per side, so crop column c samples source
        // column 10 + (c + 10) * 100 / 120.
        let start = plain.get_pixel(0, 30).0[0];
        assert!((9..=10).contains(&start), "start {start}");
        let left = trimmed.get_pixel(0, 30).0[0];
        let right = trimmed.get_pixel(99, 30).0[0];
        assert!((17..=19).contains(&left), "left {left}");
        assert!((99..=102).contains(&right), "right {right}");
    }

    #[test]
    fn rectify_fills_outside_source_with_fill_colour() {
        let source = RgbaImage::from_pixel(50, 50, Rgba([255, 255, 255, 255]));
        // Rectangle hanging off the right edge of the image.
        let rect = OrientedRect {
            center: (60.0, 25.0),
            width: 40.0,
            height: 20.0,
            angle_deg: 0.0,
        };
        let crop = rectify(&source, &rect, 0.0, 0.0).unwrap();
        assert_eq!(*crop.get_pixel(0, 10), Rgba([255, 255, 255, 255]));
        assert_eq!(*crop.get_pixel(39, 10), FILL);
    }

    #[test]
    fn degenerate_rect_is_skipped() {
        let source = RgbaImage::new(10, 10);
        let rect = OrientedRect {
            center: (5.0, 5.0),
            width: 0.5,
            height: 8.0,
            angle_deg: 0.0,
        };
        assert!(rectify(&source, &rect, 0.0, 0.0).is_none());
    }
}
