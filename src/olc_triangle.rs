// Copyright (c) 2025 Ken Barker

// Permission is hereby granted, free of charge, to any person obtaining a copy
// of this software and associated documentation files (the "Software"),
// to deal in the Software without restriction, including without limitation the
// rights to use, copy, modify, merge, publish, distribute, sublicense, and/or
// sell copies of the Software, and to permit persons to whom the Software is
// furnished to do so, subject to the following conditions:

// The above copyright notice and this permission notice shall be included in
// all copies or substantial portions of the Software.

// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
// IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
// FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
// AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
// LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
// OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN
// THE SOFTWARE.

//! The `olc_triangle` module contains the relaxed FAI triangle validator
//! used by OLC/DMSt triangle searches.
//!
//! A triangle search enumerates candidate turn point ranges over a flight
//! trace in flat-projected integer coordinates, inside a tight branch and
//! bound loop. Exact geodesic measurement of every candidate would be far
//! too slow, so validation is two-tier:
//!
//! - [`OlcTriangleValidator::is_feasible`] is a cheap necessary-but-not-
//!   sufficient filter on the candidate's flat distance bounds. Its
//!   cutoffs are deliberately relaxed small-integer fractions (9/37 ≈
//!   24.3%, 11/40 = 27.5%, 9/19 ≈ 47.4%) so that flat-projection and
//!   integer-rounding error cannot reject a true positive near a rule
//!   boundary.
//! - [`OlcTriangleValidator::is_integral`] decides a fully-refined
//!   candidate. Clear cases are settled on the flat distances; marginal
//!   ones re-derive the exact geographic leg lengths and apply the precise
//!   rule predicates.
//!
//! The flat projection itself belongs to the caller; [`make_validator`]
//! takes it as a closure.

use crate::fai_triangle::{
    check_large_triangle_flat, check_small_triangle_flat, FaiTriangleSettings,
};
use crate::{geodesic, GeoPoint, Metres, WGS84_ELLIPSOID};

/// A validator for OLC/DMSt triangle candidates in flat-projected
/// coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OlcTriangleValidator {
    /// The large/small cutover in flat units, biased low by 1%.
    large_threshold_flat: u32,
    /// The exact large/small cutover distance.
    threshold: Metres,
}

/// Construct an [`OlcTriangleValidator`] for the given settings.
/// * `settings` - selects the large/small triangle cutover.
/// * `project_distance` - the caller's flat projection, converting a
///   distance in metres to flat units around the search area.
///
/// The projected threshold is multiplied by exactly 0.99: the cheap filter
/// must never sit above the true cutover, or flat-projection and rounding
/// error near the boundary could reject candidates the exact check would
/// accept. The factor lets a few false positives through to
/// [`OlcTriangleValidator::is_integral`] instead.
#[allow(clippy::cast_possible_truncation)]
#[allow(clippy::cast_sign_loss)]
#[must_use]
pub fn make_validator(
    settings: &FaiTriangleSettings,
    project_distance: impl FnOnce(Metres) -> u32,
) -> OlcTriangleValidator {
    let threshold = settings.threshold_distance();
    let large_threshold_flat = (f64::from(project_distance(threshold)) * 0.99) as u32;
    OlcTriangleValidator {
        large_threshold_flat,
        threshold,
    }
}

impl OlcTriangleValidator {
    /// Test whether a candidate set of turn point ranges might contain a
    /// valid FAI triangle, from its flat distance bounds.
    /// * `df_min`, `df_max` - bounds on the total flat distance.
    /// * `shortest_max` - upper bound on the shortest leg.
    /// * `longest_min` - lower bound on the longest leg.
    ///
    /// returns `false` only when no triangle in the candidate set can be
    /// valid; `true` is not sufficient for validity.
    #[must_use]
    pub fn is_feasible(
        &self,
        df_min: u32,
        df_max: u32,
        shortest_max: u32,
        longest_min: u32,
    ) -> bool {
        // shortest leg min 28% (here: 27.5%) for a small triangle,
        // min 25% (here: 24.3%) for a large triangle
        if (df_max > self.large_threshold_flat && shortest_max * 37 < df_min * 9)
            || (df_max <= self.large_threshold_flat && shortest_max * 40 < df_min * 11)
        {
            return false;
        }

        // longest leg max 45% (here: 47%)
        if longest_min * 19 > df_max * 9 {
            return false;
        }

        true
    }

    /// Test whether a fully-refined candidate is a valid FAI triangle.
    /// * `df_total` - the total flat distance.
    /// * `shortest_max`, `longest_max` - the shortest and longest flat
    ///   legs.
    /// * `tp1`, `tp2`, `tp3` - the candidate turn points.
    ///
    /// Clear candidates are settled on the flat distances; marginal ones
    /// re-derive the exact geographic leg lengths and apply the precise
    /// rule predicates. A leg whose inverse solution does not converge
    /// marks the candidate invalid.
    #[allow(clippy::cast_possible_truncation)]
    #[allow(clippy::cast_sign_loss)]
    #[must_use]
    pub fn is_integral(
        &self,
        df_total: u32,
        shortest_max: u32,
        longest_max: u32,
        tp1: &GeoPoint,
        tp2: &GeoPoint,
        tp3: &GeoPoint,
    ) -> bool {
        // fast checks, as in is_feasible

        // shortest >= 28.2% of the total
        if shortest_max * 39 >= df_total * 11 {
            return true;
        }

        // longest > 45.8% of the total
        if longest_max * 24 > df_total * 11 {
            return false;
        }

        // a small triangle with shortest < 27.5% of the total
        if df_total < self.large_threshold_flat && shortest_max * 40 < df_total * 11 {
            return false;
        }

        // detailed checks on the exact geographic distances
        let Ok(d_12) = geodesic::distance(tp1, tp2, &WGS84_ELLIPSOID) else {
            return false;
        };
        let Ok(d_23) = geodesic::distance(tp2, tp3, &WGS84_ELLIPSOID) else {
            return false;
        };
        let Ok(d_31) = geodesic::distance(tp3, tp1, &WGS84_ELLIPSOID) else {
            return false;
        };

        let d_12 = d_12.0 as u32;
        let d_23 = d_23.0 as u32;
        let d_31 = d_31.0 as u32;
        let d_total = d_12 + d_23 + d_31;

        if f64::from(d_total) >= self.threshold.0 {
            check_large_triangle_flat(d_12, d_23, d_31)
        } else {
            check_small_triangle_flat(d_12, d_23, d_31)
        }
    }
}
