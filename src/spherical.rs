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

//! The spherical module contains fast approximations of the geodesic
//! operations, assuming a perfect sphere with the FAI sphere radius
//! instead of the WGS-84 ellipsoid.
//!
//! All solutions are closed-form spherical trigonometry: there is no
//! convergence loop, so they are strictly faster than the [`crate::geodesic`]
//! module and cannot fail. Results differ from the ellipsoidal module by up
//! to ~0.3% depending on latitude; callers choose this module only where
//! that error is acceptable (thermal-drift adjustment, live-rendering
//! lookahead), never for competition scoring distances.
//!
//! [`arc_distance_bearing`] returns the distance in its primitive angular
//! form so that callers performing further angle arithmetic can avoid the
//! radius multiplication; [`distance_bearing`] converts to metres on the
//! FAI sphere.

#![allow(clippy::similar_names)]
#![allow(clippy::suboptimal_flops)]

use crate::{GeoPoint, GeoVector, Metres};
use angle_sc::{trig, Angle, Degrees, Radians};
use unit_sphere::great_circle;

/// The radius of the FAI sphere in metres.
pub const FAI_SPHERE_RADIUS: Metres = Metres(6_371_000.0);

/// Convert a distance in metres to an arc distance on the FAI sphere.
#[must_use]
pub const fn metres_to_radians(distance: Metres) -> Radians {
    Radians(distance.0 / FAI_SPHERE_RADIUS.0)
}

/// Convert an arc distance on the FAI sphere to a distance in metres.
#[must_use]
pub const fn radians_to_metres(arc_distance: Radians) -> Metres {
    Metres(arc_distance.0 * FAI_SPHERE_RADIUS.0)
}

/// Calculate the great circle arc distance between a pair of positions.
/// * `loc1`, `loc2` - the start and finish positions.
///
/// returns the arc distance in `Radians`.
#[must_use]
pub fn arc_distance(loc1: &GeoPoint, loc2: &GeoPoint) -> Radians {
    great_circle::calculate_gc_distance(
        Angle::from(loc1.latitude),
        Angle::from(loc2.latitude),
        Angle::from(loc2.longitude - loc1.longitude),
    )
}

/// Calculate the great circle arc distance and initial bearing between a
/// pair of positions.
/// * `loc1`, `loc2` - the start and finish positions.
///
/// returns the arc distance in `Radians` and the bearing at `loc1`.
#[must_use]
pub fn arc_distance_bearing(loc1: &GeoPoint, loc2: &GeoPoint) -> (Radians, Angle) {
    let lat1 = Angle::from(loc1.latitude);
    let lat2 = Angle::from(loc2.latitude);
    let delta_long = Angle::from(loc2.longitude - loc1.longitude);
    (
        great_circle::calculate_gc_distance(lat1, lat2, delta_long),
        great_circle::calculate_gc_azimuth(lat1, lat2, delta_long),
    )
}

/// Calculate the great circle distance in metres and the initial bearing
/// between a pair of positions on the FAI sphere.
#[must_use]
pub fn distance_bearing(loc1: &GeoPoint, loc2: &GeoPoint) -> GeoVector {
    let (arc, bearing) = arc_distance_bearing(loc1, loc2);
    GeoVector::new(radians_to_metres(arc), bearing)
}

/// Calculate the great circle distance in metres between a pair of
/// positions on the FAI sphere.
#[must_use]
pub fn distance(loc1: &GeoPoint, loc2: &GeoPoint) -> Metres {
    radians_to_metres(arc_distance(loc1, loc2))
}

/// Calculate the initial bearing of the great circle between a pair of
/// positions.
#[must_use]
pub fn bearing(loc1: &GeoPoint, loc2: &GeoPoint) -> Angle {
    arc_distance_bearing(loc1, loc2).1
}

/// Calculate the position reached by travelling from `loc` on the given
/// bearing for the given distance on the FAI sphere.
/// * `loc` - the start position.
/// * `bearing` - the initial bearing.
/// * `distance` - the distance in metres.
///
/// returns the position at `distance` along the great circle. A
/// non-positive distance returns `loc` unchanged.
#[must_use]
pub fn find_latitude_longitude(loc: &GeoPoint, bearing: Angle, distance: Metres) -> GeoPoint {
    if distance.0 <= 0.0 {
        return *loc;
    }

    let sigma = Angle::from(metres_to_radians(distance));
    let lat = Angle::from(loc.latitude);

    let sin_lat2 = trig::UnitNegRange::clamp(
        lat.sin().0 * sigma.cos().0 + lat.cos().0 * sigma.sin().0 * bearing.cos().0,
    );
    let lat2 = Angle::new(sin_lat2, trig::swap_sin_cos(sin_lat2));

    let delta_long = Angle::from_y_x(
        bearing.sin().0 * sigma.sin().0 * lat.cos().0,
        sigma.cos().0 - lat.sin().0 * sin_lat2.0,
    );
    let lon2 = Angle::from(loc.longitude) + delta_long;

    GeoPoint::new(Degrees::from(lat2), Degrees::from(lon2))
}

/// Calculate how far along the great circle from `loc1` towards `loc2` the
/// position `loc3` projects, on the FAI sphere.
///
/// returns zero if either decomposed distance is non-positive.
#[must_use]
pub fn projected_distance(loc1: &GeoPoint, loc2: &GeoPoint, loc3: &GeoPoint) -> Metres {
    decompose_track(loc1, loc2, loc3).map_or(Metres(0.0), |(along_track, _, _)| {
        radians_to_metres(along_track)
    })
}

/// Decompose the position `loc3` into along and across track angles
/// relative to the great circle from `loc1` towards `loc2`.
///
/// returns the along track angle, the signed across track angle (positive
/// right of the path) and the course from `loc1` to `loc2`, or `None` if
/// either decomposed distance is non-positive, including the near-zero
/// sine artefacts of coincident inputs.
pub(crate) fn decompose_track(
    loc1: &GeoPoint,
    loc2: &GeoPoint,
    loc3: &GeoPoint,
) -> Option<(Radians, Radians, Angle)> {
    let (dist_ad, crs_ad) = arc_distance_bearing(loc1, loc3);
    if dist_ad.0 <= 0.0 {
        return None;
    }

    let (dist_ab, crs_ab) = arc_distance_bearing(loc1, loc2);
    if dist_ab.0 <= 0.0 {
        return None;
    }

    let sin_dist_ad = libm::sin(dist_ad.0);

    let cross_track = libm::asin(sin_dist_ad * (crs_ad - crs_ab).sin().0);
    let sin_xtd = libm::sin(cross_track);
    let cos_xtd = libm::cos(cross_track);

    let along_track = libm::asin(
        libm::sqrt(f64::max(0.0, sin_dist_ad * sin_dist_ad - sin_xtd * sin_xtd)) / cos_xtd,
    );

    Some((Radians(along_track), Radians(cross_track), crs_ab))
}
