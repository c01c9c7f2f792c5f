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

//! The geodesic module solves the direct and inverse geodesic problems on
//! the surface of an ellipsoid with
//! [Vincenty's formulae](https://en.wikipedia.org/wiki/Vincenty%27s_formulae).
//!
//! The inverse solution iterates on the longitude difference `lambda` of
//! the corresponding great circle on the auxiliary sphere. The iteration is
//! known not to converge for nearly antipodal positions; that case is
//! reported as [`GeodesicError::NotConverged`] so that callers can never
//! consume a stale or half-computed result.
//!
//! The direct solution iterates on the arc distance `sigma`, which is
//! contractive and treated as infallible.
//!
//! [`projected_distance`], [`cross_track_error`], [`middle`] and
//! [`intermediate_point`] decompose their inputs with the fast closed-form
//! [`crate::spherical`] module and only reconstruct the resulting position
//! with the ellipsoidal direct formula; they trade sub-metre accuracy for
//! speed. [`double_distance`] goes further and stays entirely on the FAI
//! sphere.

#![allow(clippy::float_cmp)]
#![allow(clippy::many_single_char_names)]
#![allow(clippy::similar_names)]
#![allow(clippy::suboptimal_flops)]

use crate::spherical;
use crate::{Ellipsoid, GeoPoint, GeoVector, Metres};
use angle_sc::{Angle, Degrees, Radians};
use unit_sphere::vector;

/// The maximum number of iterations of the inverse `lambda` and direct
/// `sigma` fixed-point solutions.
const MAX_ITERATIONS: u32 = 20;

/// The fixed-point convergence threshold in radians.
const CONVERGENCE_THRESHOLD: f64 = 1e-7;

/// The reason a geodesic solution could not be calculated.
#[derive(Clone, Copy, Debug, Eq, PartialEq, thiserror::Error)]
pub enum GeodesicError {
    /// The inverse solution did not converge within the iteration limit.
    /// This occurs for nearly antipodal positions, where Vincenty's
    /// `lambda` iteration oscillates instead of converging.
    #[error("inverse geodesic solution did not converge, positions are nearly antipodal")]
    NotConverged,
}

/// Evaluate Vincenty's `A` series from `u²`.
#[must_use]
fn evaluate_big_a(u_sq: f64) -> f64 {
    1.0 + u_sq / 16_384.0 * (4096.0 + u_sq * (-768.0 + u_sq * (320.0 - 175.0 * u_sq)))
}

/// Evaluate Vincenty's `B` series from `u²`.
#[must_use]
fn evaluate_big_b(u_sq: f64) -> f64 {
    u_sq / 1024.0 * (256.0 + u_sq * (-128.0 + u_sq * (74.0 - 47.0 * u_sq)))
}

/// Evaluate Vincenty's `C` term from the flattening and `cos²alpha`.
#[must_use]
fn evaluate_big_c(f: f64, cos_sq_alpha: f64) -> f64 {
    f / 16.0 * cos_sq_alpha * (4.0 + f * (4.0 - 3.0 * cos_sq_alpha))
}

/// Evaluate Vincenty's `delta sigma` series.
#[must_use]
fn evaluate_delta_sigma(
    big_b: f64,
    sin_sigma: f64,
    cos_sigma: f64,
    cos_2sigma_m: f64,
) -> f64 {
    big_b
        * sin_sigma
        * (cos_2sigma_m
            + big_b / 4.0
                * (cos_sigma * (-1.0 + 2.0 * cos_2sigma_m * cos_2sigma_m)
                    - big_b / 6.0
                        * cos_2sigma_m
                        * (-3.0 + 4.0 * sin_sigma * sin_sigma)
                        * (-3.0 + 4.0 * cos_2sigma_m * cos_2sigma_m)))
}

/// Calculate the geodesic distance and initial bearing between a pair of
/// positions with Vincenty's inverse formula.
/// * `loc1`, `loc2` - the start and finish positions.
/// * `ellipsoid` - the `Ellipsoid`.
///
/// returns the `GeoVector` from `loc1` to `loc2`: the geodesic distance in
/// metres and the bearing at `loc1`. Coincident positions yield the zero
/// vector without iterating.
///
/// # Errors
///
/// Returns [`GeodesicError::NotConverged`] if the `lambda` iteration does
/// not converge within the iteration limit, which occurs for nearly
/// antipodal positions.
pub fn distance_bearing(
    loc1: &GeoPoint,
    loc2: &GeoPoint,
    ellipsoid: &Ellipsoid,
) -> Result<GeoVector, GeodesicError> {
    let f = ellipsoid.f();

    let beta1 = ellipsoid.calculate_parametric_latitude(Angle::from(loc1.latitude));
    let beta2 = ellipsoid.calculate_parametric_latitude(Angle::from(loc2.latitude));
    let sin_u1 = beta1.sin().0;
    let cos_u1 = beta1.cos().0;
    let sin_u2 = beta2.sin().0;
    let cos_u2 = beta2.cos().0;

    // the longitude difference, normalized into (-pi, pi]
    let l = Radians::from(Angle::from(loc2.longitude - loc1.longitude)).0;

    let mut lambda = l;
    let mut sin_lambda = libm::sin(lambda);
    let mut cos_lambda = libm::cos(lambda);
    let mut sin_sigma: f64;
    let mut cos_sigma: f64;
    let mut sigma: f64;
    let mut cos_sq_alpha: f64;
    let mut cos_2sigma_m: f64;
    let mut converged = false;

    let mut iterations = MAX_ITERATIONS;
    loop {
        let temp1 = cos_u2 * sin_lambda;
        let temp2 = cos_u1 * sin_u2 - sin_u1 * cos_u2 * cos_lambda;
        sin_sigma = libm::sqrt(temp1 * temp1 + temp2 * temp2);
        if sin_sigma == 0.0 {
            // coincident positions
            return Ok(GeoVector::zero());
        }
        cos_sigma = sin_u1 * sin_u2 + cos_u1 * cos_u2 * cos_lambda;
        sigma = libm::atan2(sin_sigma, cos_sigma);

        let sin_alpha = cos_u1 * cos_u2 * sin_lambda / sin_sigma;
        cos_sq_alpha = (1.0 - sin_alpha) * (1.0 + sin_alpha);
        cos_2sigma_m = if cos_sq_alpha == 0.0 {
            // an equatorial line
            0.0
        } else {
            cos_sigma - 2.0 * sin_u1 * sin_u2 / cos_sq_alpha
        };

        let c = evaluate_big_c(f, cos_sq_alpha);
        let lambda_prev = lambda;
        lambda = l
            + (1.0 - c)
                * f
                * sin_alpha
                * (sigma
                    + c * sin_sigma
                        * (cos_2sigma_m
                            + c * cos_sigma * (-1.0 + 2.0 * cos_2sigma_m * cos_2sigma_m)));
        sin_lambda = libm::sin(lambda);
        cos_lambda = libm::cos(lambda);

        if libm::fabs(lambda - lambda_prev) <= CONVERGENCE_THRESHOLD {
            converged = true;
            break;
        }

        iterations -= 1;
        if iterations == 0 {
            break;
        }
    }

    if !converged {
        return Err(GeodesicError::NotConverged);
    }

    let u_sq = cos_sq_alpha * ellipsoid.ep_2();
    let big_a = evaluate_big_a(u_sq);
    let big_b = evaluate_big_b(u_sq);
    let delta_sigma = evaluate_delta_sigma(big_b, sin_sigma, cos_sigma, cos_2sigma_m);

    let distance = Metres(ellipsoid.b().0 * big_a * (sigma - delta_sigma));
    let bearing = Angle::from_y_x(
        cos_u2 * sin_lambda,
        cos_u1 * sin_u2 - sin_u1 * cos_u2 * cos_lambda,
    );

    Ok(GeoVector::new(distance, bearing))
}

/// Calculate the geodesic distance between a pair of positions.
/// See [`distance_bearing`].
///
/// # Errors
///
/// Returns [`GeodesicError::NotConverged`] for nearly antipodal positions.
pub fn distance(
    loc1: &GeoPoint,
    loc2: &GeoPoint,
    ellipsoid: &Ellipsoid,
) -> Result<Metres, GeodesicError> {
    distance_bearing(loc1, loc2, ellipsoid).map(|v| v.distance)
}

/// Calculate the initial bearing of the geodesic between a pair of
/// positions. See [`distance_bearing`].
///
/// # Errors
///
/// Returns [`GeodesicError::NotConverged`] for nearly antipodal positions.
pub fn bearing(
    loc1: &GeoPoint,
    loc2: &GeoPoint,
    ellipsoid: &Ellipsoid,
) -> Result<Angle, GeodesicError> {
    distance_bearing(loc1, loc2, ellipsoid).map(|v| v.bearing)
}

/// Calculate the position reached by travelling from `loc` on the given
/// bearing for the given distance, with Vincenty's direct formula.
/// * `loc` - the start position.
/// * `bearing` - the initial bearing.
/// * `distance` - the distance in metres.
/// * `ellipsoid` - the `Ellipsoid`.
///
/// returns the position at `distance` along the geodesic, with the
/// longitude renormalized into (-180°, 180°]. A non-positive distance
/// returns `loc` unchanged, without iterating.
#[must_use]
pub fn find_latitude_longitude(
    loc: &GeoPoint,
    bearing: Angle,
    distance: Metres,
    ellipsoid: &Ellipsoid,
) -> GeoPoint {
    if distance.0 <= 0.0 {
        return *loc;
    }

    let f = ellipsoid.f();

    let beta1 = ellipsoid.calculate_parametric_latitude(Angle::from(loc.latitude));
    let sin_u1 = beta1.sin().0;
    let cos_u1 = beta1.cos().0;
    let sin_alpha1 = bearing.sin().0;
    let cos_alpha1 = bearing.cos().0;

    let sigma1 = libm::atan2(sin_u1, cos_u1 * cos_alpha1);
    let sin_alpha = cos_u1 * sin_alpha1;
    let cos_sq_alpha = (1.0 - sin_alpha) * (1.0 + sin_alpha);

    let u_sq = cos_sq_alpha * ellipsoid.ep_2();
    let big_a = evaluate_big_a(u_sq);
    let big_b = evaluate_big_b(u_sq);

    let base_sigma = distance.0 / (ellipsoid.b().0 * big_a);
    let mut sigma = base_sigma;

    let mut iterations = MAX_ITERATIONS;
    loop {
        let cos_2sigma_m = libm::cos(2.0 * sigma1 + sigma);
        let sin_sigma = libm::sin(sigma);
        let cos_sigma = libm::cos(sigma);
        let delta_sigma = evaluate_delta_sigma(big_b, sin_sigma, cos_sigma, cos_2sigma_m);

        let sigma_prev = sigma;
        sigma = base_sigma + delta_sigma;

        iterations -= 1;
        if libm::fabs(sigma - sigma_prev) <= CONVERGENCE_THRESHOLD || iterations == 0 {
            break;
        }
    }

    let sin_sigma = libm::sin(sigma);
    let cos_sigma = libm::cos(sigma);
    let cos_2sigma_m = libm::cos(2.0 * sigma1 + sigma);

    let temp = sin_u1 * sin_sigma - cos_u1 * cos_sigma * cos_alpha1;
    let latitude = libm::atan2(
        sin_u1 * cos_sigma + cos_u1 * sin_sigma * cos_alpha1,
        ellipsoid.one_minus_f() * libm::sqrt(sin_alpha * sin_alpha + temp * temp),
    );
    let lambda = libm::atan2(
        sin_sigma * sin_alpha1,
        cos_u1 * cos_sigma - sin_u1 * sin_sigma * cos_alpha1,
    );
    let c = evaluate_big_c(f, cos_sq_alpha);
    let l = lambda
        - (1.0 - c)
            * f
            * sin_alpha
            * (sigma
                + c * sin_sigma
                    * (cos_2sigma_m + c * cos_sigma * (-1.0 + 2.0 * cos_2sigma_m * cos_2sigma_m)));

    let mut result = GeoPoint::new(
        Degrees(latitude.to_degrees()),
        Degrees(loc.longitude.0 + l.to_degrees()),
    );
    result.normalize();
    result
}

/// Calculate how far along the path from `loc1` towards `loc2` the
/// position `loc3` projects, i.e. the along track distance from `loc1` to
/// the point abeam `loc3`.
///
/// The decomposition into along and across track angles is performed on
/// the FAI sphere for speed; this function accepts the reduced accuracy by
/// design. The abeam position itself is reconstructed with the ellipsoidal
/// direct formula and the distance to it measured ellipsoidally.
///
/// returns zero if either decomposed distance is non-positive, including
/// the near-zero sine artefacts of coincident inputs.
///
/// # Errors
///
/// Returns [`GeodesicError::NotConverged`] if the final distance
/// measurement fails to converge.
pub fn projected_distance(
    loc1: &GeoPoint,
    loc2: &GeoPoint,
    loc3: &GeoPoint,
    ellipsoid: &Ellipsoid,
) -> Result<Metres, GeodesicError> {
    let Some((along_track, _, crs_ab)) = spherical::decompose_track(loc1, loc2, loc3) else {
        return Ok(Metres(0.0));
    };

    let abeam = find_latitude_longitude(
        loc1,
        crs_ab,
        spherical::radians_to_metres(along_track),
        ellipsoid,
    );
    distance(loc1, &abeam, ellipsoid)
}

/// Calculate the signed across track distance of `loc3` from the path
/// from `loc1` towards `loc2`, and the position abeam `loc3` on that path.
///
/// Positive across track distances lie right of the path. The same
/// spherical decomposition and accuracy trade-off as
/// [`projected_distance`]; degenerate inputs yield a zero distance and
/// `loc1` as the abeam position.
#[must_use]
pub fn cross_track_error(
    loc1: &GeoPoint,
    loc2: &GeoPoint,
    loc3: &GeoPoint,
    ellipsoid: &Ellipsoid,
) -> (Metres, GeoPoint) {
    let Some((along_track, cross_track, crs_ab)) = spherical::decompose_track(loc1, loc2, loc3)
    else {
        return (Metres(0.0), *loc1);
    };

    let abeam = find_latitude_longitude(
        loc1,
        crs_ab,
        spherical::radians_to_metres(along_track),
        ellipsoid,
    );
    (spherical::radians_to_metres(cross_track), abeam)
}

/// Calculate the position half way between a pair of positions, along the
/// geodesic.
///
/// # Errors
///
/// Returns [`GeodesicError::NotConverged`] for nearly antipodal positions.
pub fn middle(
    a: &GeoPoint,
    b: &GeoPoint,
    ellipsoid: &Ellipsoid,
) -> Result<GeoPoint, GeodesicError> {
    let total = distance(a, b, ellipsoid)?;
    let arc_total = spherical::metres_to_radians(total);
    Ok(interpolate(a, b, Radians(0.5 * arc_total.0), arc_total))
}

/// Calculate the position at distance `dthis` along the geodesic from
/// `loc1` towards `loc2`.
///
/// Edge cases: identical positions or a non-positive total distance return
/// `loc1`; `dthis` at or beyond the total distance returns `loc2` exactly,
/// side-stepping round-off in the interpolation formula; a non-positive
/// `dthis` returns `loc1` exactly.
///
/// # Errors
///
/// Returns [`GeodesicError::NotConverged`] for nearly antipodal positions.
pub fn intermediate_point(
    loc1: &GeoPoint,
    loc2: &GeoPoint,
    dthis: Metres,
    ellipsoid: &Ellipsoid,
) -> Result<GeoPoint, GeodesicError> {
    if dthis.0 <= 0.0 {
        return Ok(*loc1);
    }

    let dtotal = distance(loc1, loc2, ellipsoid)?;
    if dthis.0 >= dtotal.0 {
        return Ok(*loc2);
    }

    Ok(interpolate(
        loc1,
        loc2,
        spherical::metres_to_radians(dthis),
        spherical::metres_to_radians(dtotal),
    ))
}

/// Interpolate between a pair of positions at the given fraction of the
/// total arc distance.
///
/// The positions are converted to 3D Cartesian points, summed with the
/// great circle interpolation weights and projected back to spherical
/// coordinates.
/// * `angle_this`, `angle_total` - the partial and total arc distances.
fn interpolate(loc1: &GeoPoint, loc2: &GeoPoint, angle_this: Radians, angle_total: Radians) -> GeoPoint {
    if loc1 == loc2 || angle_total.0 <= 0.0 {
        return *loc1;
    }

    let fraction = (angle_this.0 / angle_total.0).clamp(0.0, 1.0);
    let d = angle_total.0;
    let inv_sin_d = 1.0 / libm::sin(d);

    let a = libm::sin((1.0 - fraction) * d) * inv_sin_d;
    let b = libm::sin(fraction * d) * inv_sin_d;

    let v1 = vector::to_point(Angle::from(loc1.latitude), Angle::from(loc1.longitude));
    let v2 = vector::to_point(Angle::from(loc2.latitude), Angle::from(loc2.longitude));
    let v = v1 * a + v2 * b;

    let mut result = GeoPoint::new(
        Degrees::from(vector::latitude(&v)),
        Degrees::from(vector::longitude(&v)),
    );
    result.normalize();
    result
}

/// Calculate the sum of the distances `loc1` to `loc2` and `loc2` to
/// `loc3` as great circle distances on the FAI sphere.
///
/// This is intentionally low-accuracy: it is used for ranking alternate
/// airports by total deviation, not for competition-grade measurement, and
/// the established ranking behaviour depends on the spherical formula.
#[must_use]
pub fn double_distance(loc1: &GeoPoint, loc2: &GeoPoint, loc3: &GeoPoint) -> Metres {
    let d12 = spherical::arc_distance(loc1, loc2);
    let d23 = spherical::arc_distance(loc2, loc3);
    Metres(spherical::FAI_SPHERE_RADIUS.0 * (d12.0 + d23.0))
}
