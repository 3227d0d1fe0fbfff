// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Detection stages — binarization, contour search and rectification.

pub mod contours;
pub mod rectify;
pub mod threshold;

pub use contours::{Candidate, find_candidates};
pub use rectify::{min_area_rect, rectify};
pub use threshold::binarize;
