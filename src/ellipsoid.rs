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

//! The ellipsoid module contains functions for deriving the parameters of
//! an ellipsoid of revolution from its Semimajor axis and flattening ratio.
//!
//! Vincenty's formulae operate on the Semiminor axis, the square of the
//! second Eccentricity and the `parametric` (reduced) latitudes of
//! positions, all derived here.

use crate::Metres;
use angle_sc::Angle;

/// The WGS 84 geoid primary parameters from the ICAO
/// [WGS 84 Implementation Manual Version 2.4](https://www.icao.int/safety/pbn/Documentation/EUROCONTROL/Eurocontrol%20WGS%2084%20Implementation%20Manual.pdf)
/// Chapter 3, page 14.
pub mod wgs84 {
    use icao_units::si::Metres;

    /// The WGS 84 Semimajor axis measured in metres.
    /// This is the radius at the equator.
    pub const A: Metres = Metres(6_378_137.0);

    /// The WGS 84 flattening, a ratio.
    /// This is the flattening of the ellipsoid at the poles.
    pub const F: f64 = 1.0 / 298.257_223_563;
}

/// Calculate the Semiminor axis of an ellipsoid.
/// * `a` - the Semimajor axis of an ellipsoid.
/// * `f` - the flattening ratio.
/// # Examples
/// ```
/// use fai_wgs84::Metres;
/// use fai_wgs84::ellipsoid::{calculate_minor_axis, wgs84};
///
/// // The WGS 84 Semiminor axis measured in metres.
/// let b : Metres = Metres(6_356_752.314_245_179);
/// assert_eq!(b, calculate_minor_axis(wgs84::A, wgs84::F));
/// ```
#[must_use]
pub fn calculate_minor_axis(a: Metres, f: f64) -> Metres {
    Metres(a.0 * (1.0 - f))
}

/// Calculate the square of the Eccentricity of an ellipsoid.
/// * `f` - the flattening ratio.
/// # Examples
/// ```
/// use fai_wgs84::ellipsoid::{calculate_sq_eccentricity, wgs84};
///
/// // The WGS 84 sq_eccentricity.
/// assert_eq!(0.0066943799901413165, calculate_sq_eccentricity(wgs84::F));
/// ```
#[must_use]
pub fn calculate_sq_eccentricity(f: f64) -> f64 {
    f * (2.0 - f)
}

/// Calculate the square of the second Eccentricity of an ellipsoid.
///
/// Vincenty's `u²` is this value scaled by the squared cosine of the
/// azimuth at the Equator.
/// * `f` - the flattening ratio.
/// # Examples
/// ```
/// use fai_wgs84::ellipsoid::{calculate_sq_2nd_eccentricity, wgs84};
///
/// // The WGS 84 sq 2nd eccentricity.
/// assert_eq!(0.006739496742276434, calculate_sq_2nd_eccentricity(wgs84::F));
/// ```
#[must_use]
pub fn calculate_sq_2nd_eccentricity(f: f64) -> f64 {
    let one_minus_f = 1.0 - f;
    calculate_sq_eccentricity(f) / (one_minus_f * one_minus_f)
}

/// Function to convert a `geodetic` Latitude to a `parametric` (reduced)
/// Latitude on the auxiliary sphere, i.e. `atan((1-f) * tan(lat))`.
/// * `lat` - the `geodetic` Latitude
/// * `one_minus_f` - one minus the flattening ratio.
#[must_use]
pub fn calculate_parametric_latitude(lat: Angle, one_minus_f: f64) -> Angle {
    Angle::from_y_x(one_minus_f * lat.sin().0, lat.cos().0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use angle_sc::{is_within_tolerance, Degrees, Radians};

    #[test]
    fn test_derived_parameters() {
        // semiminor axis is slightly shorter than the semimajor axis
        let b = calculate_minor_axis(wgs84::A, wgs84::F);
        assert!(b.0 < wgs84::A.0);
        assert_eq!(6_356_752.314_245_179, b.0);

        // the second eccentricity is larger than the first
        let e_2 = calculate_sq_eccentricity(wgs84::F);
        let ep_2 = calculate_sq_2nd_eccentricity(wgs84::F);
        assert!(e_2 < ep_2);

        // a sphere has zero eccentricity
        assert_eq!(0.0, calculate_sq_eccentricity(0.0));
        assert_eq!(0.0, calculate_sq_2nd_eccentricity(0.0));
    }

    #[test]
    fn test_calculate_parametric_latitude() {
        let one_minus_f = 1.0 - wgs84::F;

        // the Equator and the poles are fixed points
        assert_eq!(
            0.0,
            Radians::from(calculate_parametric_latitude(
                Angle::from(Degrees(0.0)),
                one_minus_f
            ))
            .0
        );
        assert!(is_within_tolerance(
            core::f64::consts::FRAC_PI_2,
            Radians::from(calculate_parametric_latitude(
                Angle::from(Degrees(90.0)),
                one_minus_f
            ))
            .0,
            f64::EPSILON
        ));

        // elsewhere the parametric latitude lies closer to the Equator
        for i in 1..90 {
            let latitude = f64::from(i);
            let lat = Angle::from(Degrees(latitude));
            let parametric_lat = calculate_parametric_latitude(lat, one_minus_f);
            let result = Degrees::from(parametric_lat);
            assert!(result.0 < latitude);
            assert!(is_within_tolerance(latitude, result.0, 0.2));
        }
    }
}
