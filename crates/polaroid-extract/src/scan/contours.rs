// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Contour extraction and quadrilateral filtering.

use image::GrayImage;
use imageproc::contours::{BorderType, find_contours};
use imageproc::geometry::{approximate_polygon_dp, arc_length, contour_area};
use imageproc::point::Point;
use polaroid_core::OrientedRect;
use polaroid_core::config::{ContourHierarchy, ExtractorConfig};
use tracing::{debug, instrument, trace};

use super::rectify::min_area_rect;

/// A traced border together with its level in the reported hierarchy.
#[derive(Debug, Clone)]
pub struct TracedContour {
    pub points: Vec<Point<i32>>,
    pub border_type: BorderType,
    /// `TwoLevel`: 0 for outer borders, 1 for holes. `Tree`: number of
    /// enclosing borders.
    pub depth: usize,
}

/// A contour accepted as a print outline.
#[derive(Debug, Clone)]
pub struct Candidate {
    pub contour: Vec<Point<i32>>,
    /// The four-vertex simplification of `contour`.
    pub polygon: Vec<Point<i32>>,
    pub area: f64,
    pub rect: OrientedRect,
}

impl Candidate {
    /// Map a candidate found on a resized copy back by `factor`.
    pub fn scaled(&self, factor: f64) -> Self {
        let scale = |points: &[Point<i32>]| -> Vec<Point<i32>> {
            points
                .iter()
                .map(|p| Point::new((p.x as f64 * factor).round() as i32, (p.y as f64 * factor).round() as i32))
                .collect()
        };
        Self {
            contour: scale(&self.contour),
            polygon: scale(&self.polygon),
            area: self.area * factor * factor,
            rect: self.rect.scaled(factor),
        }
    }
}

/// Trace every border in `mask` and record its level under `hierarchy`.
///
/// The hierarchy only changes the reported depth; every border is returned.
pub fn trace_contours(mask: &GrayImage, hierarchy: ContourHierarchy) -> Vec<TracedContour> {
    let contours = find_contours::<i32>(mask);

    let depths: Vec<usize> = contours
        .iter()
        .map(|contour| match hierarchy {
            ContourHierarchy::TwoLevel => match contour.border_type {
                BorderType::Outer => 0,
                BorderType::Hole => 1,
            },
            ContourHierarchy::Tree => {
                let mut depth = 0;
                let mut parent = contour.parent;
                while let Some(p) = parent {
                    depth += 1;
                    parent = contours[p].parent;
                }
                depth
            }
        })
        .collect();

    contours
        .into_iter()
        .zip(depths)
        .map(|(contour, depth)| TracedContour {
            points: contour.points,
            border_type: contour.border_type,
            depth,
        })
        .collect()
}

/// Search `mask` for print-shaped quadrilaterals.
///
/// Every traced border is tested. Candidates are returned in tracing order,
/// which is raster order of the first pixel of each border.
#[instrument(skip_all, fields(width = mask.width(), height = mask.height()))]
pub fn find_candidates(mask: &GrayImage, config: &ExtractorConfig) -> Vec<Candidate> {
    let traced = trace_contours(mask, config.hierarchy);
    debug!(contours = traced.len(), "Contours traced");

    let mut candidates: Vec<Candidate> = Vec::new();
    for contour in traced {
        let depth = contour.depth;
        let Some(candidate) = evaluate_contour(contour.points, config) else {
            continue;
        };
        if config.suppress_overlaps
            && candidates
                .iter()
                .any(|accepted| accepted.rect.contains(candidate.rect.center))
        {
            debug!(center = ?candidate.rect.center, "Candidate overlaps an accepted print; dropped");
            continue;
        }
        debug!(
            depth,
            area = candidate.area,
            width = candidate.rect.width,
            height = candidate.rect.height,
            angle = candidate.rect.angle_deg,
            "Candidate accepted"
        );
        candidates.push(candidate);
    }

    debug!(candidates = candidates.len(), "Quadrilateral search complete");
    candidates
}

/// Apply the four-vertex and area tests to one contour.
fn evaluate_contour(points: Vec<Point<i32>>, config: &ExtractorConfig) -> Option<Candidate> {
    let polygon = approximate_outline(&points, config.approx_tolerance)?;
    if polygon.len() != 4 {
        return None;
    }

    let area = contour_area(&points);
    if !area_accepted(area, config) {
        trace!(area, "Quadrilateral outside accepted area range");
        return None;
    }

    let rect = min_area_rect(&points)?;
    Some(Candidate {
        contour: points,
        polygon,
        area,
        rect,
    })
}

/// Douglas-Peucker simplification of the closed curve through `points`, with
/// a tolerance of `tolerance` times its perimeter.
///
/// `None` for curves with fewer than three points or no length.
pub fn approximate_outline(points: &[Point<i32>], tolerance: f64) -> Option<Vec<Point<i32>>> {
    if points.len() < 3 {
        return None;
    }
    let epsilon = tolerance * arc_length(points, true);
    if epsilon <= 0.0 {
        return None;
    }
    Some(approximate_polygon_dp(points, epsilon, true))
}

/// Strict bounds on both sides.
pub fn area_accepted(area: f64, config: &ExtractorConfig) -> bool {
    area > config.min_area && config.max_area.is_none_or(|max| area < max)
}
