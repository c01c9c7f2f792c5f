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

//! fai-wgs84
//!
//! A library for calculating
//! [FAI triangle](https://en.wikipedia.org/wiki/FAI_Gliding_Commission)
//! geometry and geodesics on the
//! [WGS-84](https://www.icao.int/NACC/Documents/Meetings/2014/ECARAIM/REF08-Doc9674.pdf)
//! ellipsoid.
//!
//! Glide-computer software scores closed triangular tasks against the FAI
//! leg-ratio rules: every leg of a *small* triangle must be at least 28% of
//! the total distance flown, while triangles above a threshold distance
//! (750 km, or a relaxed 500 km for some contests) may instead satisfy the
//! *large* triangle rules with every leg between 25% and 45% of the total.
//!
//! The library provides:
//!
//! - the leg-ratio rule predicates, in both floating point and the
//!   integer-exact fractions used on flat-projected coordinates, see the
//!   [`fai_triangle`] module;
//! - a boundary generator which, given the two fixed turn points of a task,
//!   traces the region of all third turn points that would complete a valid
//!   FAI triangle, for display as a map overlay, see [`fai_triangle::area`];
//! - a cheap-filter/exact-check validator for incremental OLC/DMSt triangle
//!   searches over flat-projected flight traces, see the [`olc_triangle`]
//!   module;
//! - the underlying geodesic solutions: Vincenty's direct and inverse
//!   formulae on the WGS-84 ellipsoid in the [`geodesic`] module, and fast
//!   closed-form spherical approximations on the FAI sphere in the
//!   [`spherical`] module.
//!
//! ## Design
//!
//! The library depends upon the following crates:
//!
//! - [angle-sc](https://crates.io/crates/angle-sc) - to define `Angle`,
//!   `Degrees` and `Radians` and perform trigonometric calculations;
//! - [unit-sphere](https://crates.io/crates/unit-sphere) - to perform
//!   great-circle calculations for the spherical approximations;
//! - [icao_units](https://crates.io/crates/icao-units) - to define `Metres`
//!   and `NauticalMiles` and perform conversions between them.
//!
//! Every operation is a pure function of its inputs: there is no global
//! mutable state, no I/O and no heap allocation, so the library may be
//! called concurrently from multiple threads without locking.
//!
//! The library is declared [no_std](https://docs.rust-embedded.org/book/intro/no-std.html)
//! so it can be used in embedded applications.

#![cfg_attr(not(test), no_std)]

extern crate angle_sc;
extern crate icao_units;
extern crate unit_sphere;

pub mod ellipsoid;
pub mod fai_triangle;
pub mod geodesic;
pub mod olc_triangle;
pub mod spherical;

pub use angle_sc::{Angle, Degrees, Radians, Validate};
pub use geodesic::GeodesicError;
pub use icao_units::non_si::NauticalMiles;
pub use icao_units::si::Metres;
pub use unit_sphere::LatLong;

use lazy_static::lazy_static;

/// The parameters of an `Ellipsoid`.
#[derive(Clone, Debug, PartialEq)]
pub struct Ellipsoid {
    /// The Semimajor axis of the ellipsoid.
    a: Metres,
    /// The flattening of the ellipsoid, a ratio.
    f: f64,

    /// The Semiminor axis of the ellipsoid.
    b: Metres,
    /// One minus the flattening ratio.
    one_minus_f: f64,
    /// The square of the Eccentricity of the ellipsoid.
    e_2: f64,
    /// The square of the second Eccentricity of the ellipsoid.
    ep_2: f64,
}

impl Ellipsoid {
    /// Constructor.
    /// * `a` - the Semimajor axis of the `Ellipsoid`.
    /// * `f` - the flattening of the `Ellipsoid`, a ratio.
    #[must_use]
    pub fn new(a: Metres, f: f64) -> Self {
        Self {
            a,
            f,
            b: ellipsoid::calculate_minor_axis(a, f),
            one_minus_f: 1.0 - f,
            e_2: ellipsoid::calculate_sq_eccentricity(f),
            ep_2: ellipsoid::calculate_sq_2nd_eccentricity(f),
        }
    }

    /// Construct an `Ellipsoid` with the WGS-84 parameters.
    #[must_use]
    pub fn wgs84() -> Self {
        Self::new(ellipsoid::wgs84::A, ellipsoid::wgs84::F)
    }

    /// The Semimajor axis of the ellipsoid.
    #[must_use]
    pub const fn a(&self) -> Metres {
        self.a
    }

    /// The flattening of the ellipsoid, a ratio.
    #[must_use]
    pub const fn f(&self) -> f64 {
        self.f
    }

    /// The Semiminor axis of the ellipsoid.
    #[must_use]
    pub const fn b(&self) -> Metres {
        self.b
    }

    /// One minus the flattening ratio.
    #[must_use]
    pub const fn one_minus_f(&self) -> f64 {
        self.one_minus_f
    }

    /// The square of the Eccentricity of the ellipsoid.
    #[must_use]
    pub const fn e_2(&self) -> f64 {
        self.e_2
    }

    /// The square of the second Eccentricity of the ellipsoid.
    #[must_use]
    pub const fn ep_2(&self) -> f64 {
        self.ep_2
    }

    /// Convert a geodetic Latitude to a parametric Latitude on the
    /// auxiliary sphere.
    /// * `lat` - the geodetic Latitude
    #[must_use]
    pub fn calculate_parametric_latitude(&self, lat: Angle) -> Angle {
        ellipsoid::calculate_parametric_latitude(lat, self.one_minus_f)
    }
}

lazy_static! {
    /// A static instance of the WGS-84 `Ellipsoid`.
    pub static ref WGS84_ELLIPSOID: Ellipsoid = Ellipsoid::wgs84();
}

/// A position in geodetic coordinates: latitude and longitude in `Degrees`.
///
/// `GeoPoint` is a trivially copyable value type; computations create and
/// discard them freely on the stack.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GeoPoint {
    /// The latitude.
    pub latitude: Degrees,
    /// The longitude.
    pub longitude: Degrees,
}

impl GeoPoint {
    /// Constructor.
    /// * `latitude` - the latitude.
    /// * `longitude` - the longitude.
    #[must_use]
    pub const fn new(latitude: Degrees, longitude: Degrees) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Construct the reserved "no location" sentinel.
    ///
    /// The sentinel sets the latitude to the full-circle value, deliberately
    /// outside the physical range, so that "no location" can be represented
    /// without a separate tag. This is a reserved-value encoding kept for
    /// cheap default construction of fixed-size point buffers; it is not a
    /// generally safe encoding and operations on an invalid point are
    /// undefined. Check [`Validate::is_valid`] before use.
    #[must_use]
    pub const fn invalid() -> Self {
        Self::new(Degrees(360.0), Degrees(0.0))
    }

    /// Test whether both coordinates are finite and within the physical
    /// ranges: longitude in [-180°, 180°], latitude in [-90°, 90°].
    #[must_use]
    pub fn check(&self) -> bool {
        self.latitude.0.is_finite()
            && (-90.0..=90.0).contains(&self.latitude.0)
            && self.longitude.0.is_finite()
            && (-180.0..=180.0).contains(&self.longitude.0)
    }

    /// Normalize the position in place: wrap the longitude into
    /// (-180°, 180°] and clamp the latitude into [-90°, 90°].
    pub fn normalize(&mut self) {
        let mut lon = self.longitude.0 % 360.0;
        if lon > 180.0 {
            lon -= 360.0;
        } else if lon <= -180.0 {
            lon += 360.0;
        }
        self.longitude = Degrees(lon);
        self.latitude = Degrees(self.latitude.0.clamp(-90.0, 90.0));
    }

    /// Calculate the geodesic distance and initial bearing to `other` on
    /// the WGS-84 ellipsoid.
    ///
    /// # Errors
    ///
    /// Returns [`GeodesicError::NotConverged`] for nearly antipodal points.
    pub fn distance_bearing_to(&self, other: &Self) -> Result<GeoVector, GeodesicError> {
        geodesic::distance_bearing(self, other, &WGS84_ELLIPSOID)
    }

    /// Calculate the geodesic distance to `other` on the WGS-84 ellipsoid.
    ///
    /// # Errors
    ///
    /// Returns [`GeodesicError::NotConverged`] for nearly antipodal points.
    pub fn distance_to(&self, other: &Self) -> Result<Metres, GeodesicError> {
        geodesic::distance(self, other, &WGS84_ELLIPSOID)
    }

    /// Calculate the initial bearing to `other` on the WGS-84 ellipsoid.
    ///
    /// # Errors
    ///
    /// Returns [`GeodesicError::NotConverged`] for nearly antipodal points.
    pub fn bearing_to(&self, other: &Self) -> Result<Angle, GeodesicError> {
        geodesic::bearing(self, other, &WGS84_ELLIPSOID)
    }
}

impl Validate for GeoPoint {
    /// Test whether a `GeoPoint` is a valid location, i.e. not the
    /// [`GeoPoint::invalid`] sentinel.
    fn is_valid(&self) -> bool {
        self.latitude.0 <= 90.0
    }
}

impl Default for GeoPoint {
    /// The default `GeoPoint` is the [`GeoPoint::invalid`] sentinel.
    fn default() -> Self {
        Self::invalid()
    }
}

impl From<LatLong> for GeoPoint {
    fn from(value: LatLong) -> Self {
        Self::new(value.lat(), value.lon())
    }
}

impl From<GeoPoint> for LatLong {
    fn from(value: GeoPoint) -> Self {
        Self::new(value.latitude, value.longitude)
    }
}

impl core::ops::Add for GeoPoint {
    type Output = Self;

    /// Component-wise addition, for combining a position with a delta.
    fn add(self, rhs: Self) -> Self {
        Self::new(
            Degrees(self.latitude.0 + rhs.latitude.0),
            Degrees(self.longitude.0 + rhs.longitude.0),
        )
    }
}

impl core::ops::Sub for GeoPoint {
    type Output = Self;

    /// Component-wise subtraction followed by normalization, for deriving
    /// the delta between two positions.
    fn sub(self, rhs: Self) -> Self {
        let mut result = Self::new(
            Degrees(self.latitude.0 - rhs.latitude.0),
            Degrees(self.longitude.0 - rhs.longitude.0),
        );
        result.normalize();
        result
    }
}

impl core::ops::Mul<f64> for GeoPoint {
    type Output = Self;

    /// Scale both components, for interpolating deltas.
    fn mul(self, rhs: f64) -> Self {
        Self::new(
            Degrees(self.latitude.0 * rhs),
            Degrees(self.longitude.0 * rhs),
        )
    }
}

/// A displacement on the surface of the ellipsoid: a geodesic distance in
/// `Metres` and an initial bearing.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GeoVector {
    /// The distance, non-negative when valid.
    pub distance: Metres,
    /// The initial bearing.
    pub bearing: Angle,
}

impl GeoVector {
    /// Constructor.
    /// * `distance` - the distance.
    /// * `bearing` - the initial bearing.
    #[must_use]
    pub const fn new(distance: Metres, bearing: Angle) -> Self {
        Self { distance, bearing }
    }

    /// Construct a zero-length `GeoVector`.
    #[must_use]
    pub fn zero() -> Self {
        Self::new(Metres(0.0), Angle::default())
    }

    /// Construct the reserved "no displacement" sentinel, with a negative
    /// distance. A reserved-value encoding, see [`GeoPoint::invalid`].
    #[must_use]
    pub fn invalid() -> Self {
        Self::new(Metres(-1.0), Angle::default())
    }

    /// Construct a `GeoVector` from the geodesic between a pair of
    /// positions on the WGS-84 ellipsoid.
    ///
    /// # Errors
    ///
    /// Returns [`GeodesicError::NotConverged`] for nearly antipodal points.
    pub fn between(a: &GeoPoint, b: &GeoPoint) -> Result<Self, GeodesicError> {
        geodesic::distance_bearing(a, b, &WGS84_ELLIPSOID)
    }

    /// Project `source` along the vector on the WGS-84 ellipsoid.
    #[must_use]
    pub fn end_point(&self, source: &GeoPoint) -> GeoPoint {
        geodesic::find_latitude_longitude(source, self.bearing, self.distance, &WGS84_ELLIPSOID)
    }

    /// Project `source` along half the vector on the WGS-84 ellipsoid.
    #[must_use]
    pub fn mid_point(&self, source: &GeoPoint) -> GeoPoint {
        geodesic::find_latitude_longitude(
            source,
            self.bearing,
            Metres(0.5 * self.distance.0),
            &WGS84_ELLIPSOID,
        )
    }

    /// The bearing as a compass bearing in `Degrees`, normalized into
    /// [0°, 360°).
    #[must_use]
    pub fn bearing_degrees(&self) -> Degrees {
        let degrees = Degrees::from(self.bearing);
        if degrees.0 < 0.0 {
            Degrees(degrees.0 + 360.0)
        } else {
            degrees
        }
    }
}

impl Validate for GeoVector {
    /// Test whether a `GeoVector` is valid: whether `distance` >= 0.
    fn is_valid(&self) -> bool {
        self.distance.0 >= 0.0
    }
}

impl Default for GeoVector {
    /// The default `GeoVector` is the [`GeoVector::invalid`] sentinel.
    fn default() -> Self {
        Self::invalid()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use angle_sc::is_within_tolerance;

    #[test]
    fn test_ellipsoid_wgs84() {
        let geoid = Ellipsoid::wgs84();
        assert_eq!(ellipsoid::wgs84::A, geoid.a());
        assert_eq!(ellipsoid::wgs84::F, geoid.f());
        assert_eq!(
            ellipsoid::calculate_minor_axis(ellipsoid::wgs84::A, ellipsoid::wgs84::F),
            geoid.b()
        );
        assert_eq!(1.0 - ellipsoid::wgs84::F, geoid.one_minus_f());
        assert_eq!(
            ellipsoid::calculate_sq_eccentricity(ellipsoid::wgs84::F),
            geoid.e_2()
        );
        assert_eq!(
            ellipsoid::calculate_sq_2nd_eccentricity(ellipsoid::wgs84::F),
            geoid.ep_2()
        );

        let geoid_clone = geoid.clone();
        assert!(geoid_clone == geoid);

        assert_eq!(*WGS84_ELLIPSOID, geoid);
    }

    #[test]
    fn test_geo_point_invalid_sentinel() {
        let invalid = GeoPoint::invalid();
        assert!(!invalid.is_valid());
        assert!(!invalid.check());
        assert_eq!(invalid, GeoPoint::default());

        let valid = GeoPoint::new(Degrees(51.0), Degrees(7.0));
        assert!(valid.is_valid());
        assert!(valid.check());

        // poles and the antimeridian are valid locations
        assert!(GeoPoint::new(Degrees(90.0), Degrees(180.0)).check());
        assert!(GeoPoint::new(Degrees(-90.0), Degrees(-180.0)).check());
        assert!(!GeoPoint::new(Degrees(90.1), Degrees(0.0)).check());
        assert!(!GeoPoint::new(Degrees(0.0), Degrees(180.1)).check());
        assert!(!GeoPoint::new(Degrees(f64::NAN), Degrees(0.0)).check());
    }

    #[test]
    fn test_geo_point_normalize() {
        let mut point = GeoPoint::new(Degrees(45.0), Degrees(190.0));
        point.normalize();
        assert_eq!(Degrees(-170.0), point.longitude);
        assert_eq!(Degrees(45.0), point.latitude);

        let mut point = GeoPoint::new(Degrees(45.0), Degrees(-181.0));
        point.normalize();
        assert_eq!(Degrees(179.0), point.longitude);

        // 180° is kept, -180° wraps to 180°
        let mut point = GeoPoint::new(Degrees(0.0), Degrees(180.0));
        point.normalize();
        assert_eq!(Degrees(180.0), point.longitude);

        let mut point = GeoPoint::new(Degrees(0.0), Degrees(-180.0));
        point.normalize();
        assert_eq!(Degrees(180.0), point.longitude);

        let mut point = GeoPoint::new(Degrees(91.0), Degrees(0.0));
        point.normalize();
        assert_eq!(Degrees(90.0), point.latitude);
    }

    #[test]
    fn test_geo_point_arithmetic() {
        let point = GeoPoint::new(Degrees(50.0), Degrees(10.0));
        let delta = GeoPoint::new(Degrees(1.0), Degrees(-2.0));

        let sum = point + delta;
        assert_eq!(Degrees(51.0), sum.latitude);
        assert_eq!(Degrees(8.0), sum.longitude);

        let difference = sum - point;
        assert_eq!(Degrees(1.0), difference.latitude);
        assert_eq!(Degrees(-2.0), difference.longitude);

        let scaled = delta * 0.5;
        assert_eq!(Degrees(0.5), scaled.latitude);
        assert_eq!(Degrees(-1.0), scaled.longitude);

        // subtraction wraps the longitude difference
        let east = GeoPoint::new(Degrees(0.0), Degrees(179.0));
        let west = GeoPoint::new(Degrees(0.0), Degrees(-179.0));
        let wrapped = west - east;
        assert_eq!(Degrees(2.0), wrapped.longitude);
    }

    #[test]
    fn test_geo_point_lat_long_interop() {
        let point = GeoPoint::from(LatLong::new(Degrees(42.0), Degrees(29.0)));
        assert_eq!(Degrees(42.0), point.latitude);
        assert_eq!(Degrees(29.0), point.longitude);

        let round_trip = LatLong::from(point);
        assert_eq!(Degrees(42.0), round_trip.lat());
        assert_eq!(Degrees(29.0), round_trip.lon());
    }

    #[test]
    fn test_geo_vector_validity() {
        assert!(GeoVector::zero().is_valid());
        assert!(!GeoVector::invalid().is_valid());
        assert_eq!(GeoVector::invalid(), GeoVector::default());
        assert!(GeoVector::new(Metres(1000.0), Angle::default()).is_valid());
    }

    #[test]
    fn test_geo_vector_bearing_degrees() {
        let vector = GeoVector::new(Metres(1.0), Angle::from(Degrees(-90.0)));
        assert!(is_within_tolerance(
            270.0,
            vector.bearing_degrees().0,
            1e-13
        ));

        let vector = GeoVector::new(Metres(1.0), Angle::from(Degrees(45.0)));
        assert!(is_within_tolerance(45.0, vector.bearing_degrees().0, 1e-13));
    }

    #[test]
    fn test_geo_vector_end_point() {
        let istanbul = GeoPoint::new(Degrees(42.0), Degrees(29.0));
        let washington = GeoPoint::new(Degrees(39.0), Degrees(-77.0));

        let vector = GeoVector::between(&istanbul, &washington).expect("should converge");
        assert!(vector.is_valid());

        let end = vector.end_point(&istanbul);
        assert!(is_within_tolerance(39.0, end.latitude.0, 1e-6));
        assert!(is_within_tolerance(-77.0, end.longitude.0, 1e-6));

        let mid = vector.mid_point(&istanbul);
        let d1 = istanbul.distance_to(&mid).expect("should converge");
        assert!(is_within_tolerance(0.5 * vector.distance.0, d1.0, 1e-2));
    }
}
