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

//! The `fai_triangle` module contains the FAI triangle leg-ratio rules.
//!
//! A closed triangular task is a *small* FAI triangle when every leg is at
//! least 28% of the total distance. Above a threshold distance (750 km, or
//! a relaxed 500 km for some contests) the *large* triangle rules apply
//! instead: every leg between 25% and 45% of the total.
//!
//! Each predicate exists in two deliberately distinct forms:
//!
//! - a floating point form taking distances in `Metres`, for exact
//!   geographic leg lengths;
//! - a `_flat` form taking unsigned integers, for legs measured on
//!   flat-projected, already-rounded coordinates. These compare
//!   cross-multiplied small-integer fractions (e.g. `shortest * 25 >=
//!   total * 7` for the 28% rule) so that accumulated floating point
//!   rounding cannot flip a verdict between runs.
//!
//! The forms are not interchangeable; callers pick based on whether their
//! leg lengths are exact or projected.

pub mod area;

use crate::{GeoPoint, GeodesicError, Metres};

/// The minimum leg fraction of a small FAI triangle, 28%.
pub const SMALL_MIN_LEG: f64 = 0.28;

/// The maximum leg fraction of a small FAI triangle, implied by the other
/// two legs being at their minimum.
pub const SMALL_MAX_LEG: f64 = 1.0 - 2.0 * SMALL_MIN_LEG;

/// The minimum leg fraction of a large FAI triangle, 25%.
pub const LARGE_MIN_LEG: f64 = 0.25;

/// The maximum leg fraction of a large FAI triangle, 45%.
pub const LARGE_MAX_LEG: f64 = 0.45;

/// The FAI Sporting Code large triangle threshold distance.
pub const LARGE_THRESHOLD_FAI: Metres = Metres(750_000.0);

/// The relaxed large triangle threshold distance used by some contests.
pub const LARGE_THRESHOLD_500: Metres = Metres(500_000.0);

/// The minimum leg length of a large triangle with the given total
/// distance.
pub(crate) fn large_min_leg(total_distance: f64) -> f64 {
    total_distance * LARGE_MIN_LEG
}

/// The large/small triangle cutover distance to apply.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum Threshold {
    /// The FAI Sporting Code threshold, 750 km.
    #[default]
    Fai,
    /// The relaxed 500 km threshold, e.g. for the DMSt.
    Km500,
    /// A sentinel for range-checking persisted profile values; not a real
    /// threshold. Passing it to
    /// [`FaiTriangleSettings::threshold_distance`] is a contract
    /// violation.
    Max,
}

/// Settings for the FAI triangle rules.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct FaiTriangleSettings {
    threshold: Threshold,
}

impl FaiTriangleSettings {
    /// Constructor.
    /// * `threshold` - the large/small triangle cutover to apply.
    #[must_use]
    pub const fn new(threshold: Threshold) -> Self {
        Self { threshold }
    }

    /// The configured threshold.
    #[must_use]
    pub const fn threshold(&self) -> Threshold {
        self.threshold
    }

    /// The large/small triangle cutover distance.
    ///
    /// # Panics
    ///
    /// Panics if the threshold is the [`Threshold::Max`] sentinel: that is
    /// a programmer error, not a runtime condition, and silently
    /// defaulting would hide it.
    #[must_use]
    pub fn threshold_distance(&self) -> Metres {
        match self.threshold {
            Threshold::Fai => LARGE_THRESHOLD_FAI,
            Threshold::Km500 => LARGE_THRESHOLD_500,
            Threshold::Max => panic!("Threshold::Max is a range-checking sentinel"),
        }
    }
}

/// Test whether the legs form a small FAI triangle: every leg at least
/// 28% of the total distance.
#[must_use]
pub fn check_small_triangle(d1: Metres, d2: Metres, d3: Metres) -> bool {
    let total = d1.0 + d2.0 + d3.0;
    let min_leg = SMALL_MIN_LEG * total;
    d1.0 >= min_leg && d2.0 >= min_leg && d3.0 >= min_leg
}

/// Test whether flat-projected legs form a small FAI triangle, comparing
/// the integer-exact fraction `shortest * 25 >= total * 7`.
#[must_use]
pub fn check_small_triangle_flat(d1: u32, d2: u32, d3: u32) -> bool {
    let total = d1 + d2 + d3;
    let shortest = d1.min(d2).min(d3);
    shortest * 25 >= total * 7
}

/// Test whether the legs form a large FAI triangle: every leg between 25%
/// and 45% of the total distance.
#[must_use]
pub fn check_large_triangle(d1: Metres, d2: Metres, d3: Metres) -> bool {
    let total = d1.0 + d2.0 + d3.0;
    let min_leg = LARGE_MIN_LEG * total;
    let max_leg = LARGE_MAX_LEG * total;
    d1.0 >= min_leg
        && d1.0 <= max_leg
        && d2.0 >= min_leg
        && d2.0 <= max_leg
        && d3.0 >= min_leg
        && d3.0 <= max_leg
}

/// Test whether flat-projected legs form a large FAI triangle, comparing
/// the integer-exact fractions `shortest * 4 >= total` (25%) and
/// `longest * 20 <= total * 9` (45%).
#[must_use]
pub fn check_large_triangle_flat(d1: u32, d2: u32, d3: u32) -> bool {
    let total = d1 + d2 + d3;
    let shortest = d1.min(d2).min(d3);
    let longest = d1.max(d2).max(d3);
    shortest * 4 >= total && longest * 20 <= total * 9
}

/// Test whether the legs form a valid FAI triangle, dispatching to the
/// small or large triangle rules on whether the total distance reaches
/// the configured threshold.
#[must_use]
pub fn test_distances(d1: Metres, d2: Metres, d3: Metres, settings: &FaiTriangleSettings) -> bool {
    let total = d1.0 + d2.0 + d3.0;
    if total >= settings.threshold_distance().0 {
        check_large_triangle(d1, d2, d3)
    } else {
        check_small_triangle(d1, d2, d3)
    }
}

/// Test whether three turn points form a valid FAI triangle, measuring
/// the legs on the WGS-84 ellipsoid first.
///
/// # Errors
///
/// Returns [`GeodesicError::NotConverged`] if a leg measurement fails to
/// converge.
pub fn test_distances_points(
    a: &GeoPoint,
    b: &GeoPoint,
    c: &GeoPoint,
    settings: &FaiTriangleSettings,
) -> Result<bool, GeodesicError> {
    let d1 = a.distance_to(b)?;
    let d2 = b.distance_to(c)?;
    let d3 = c.distance_to(a)?;
    Ok(test_distances(d1, d2, d3, settings))
}
