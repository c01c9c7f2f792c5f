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

// extern crate we're testing, same as any other code would do.
extern crate fai_wgs84;

use angle_sc::{is_within_tolerance, Angle, Degrees};
use csv::ReaderBuilder;
use fai_wgs84::{geodesic, spherical, GeoPoint, Metres, WGS84_ELLIPSOID};
use std::env;
use std::path::Path;

#[test]
fn test_direct_inverse_round_trip_grid() {
    for lat in [-60.0, -30.0, 0.0, 30.0, 60.0] {
        let start = GeoPoint::new(Degrees(lat), Degrees(9.0));

        for i in 0..36 {
            let azimuth = Angle::from(Degrees(f64::from(i) * 10.0 + 5.0));

            for dist in [1_000.0, 100_000.0, 1_000_000.0] {
                let end = geodesic::find_latitude_longitude(
                    &start,
                    azimuth,
                    Metres(dist),
                    &WGS84_ELLIPSOID,
                );
                let result = geodesic::distance_bearing(&start, &end, &WGS84_ELLIPSOID)
                    .expect("should converge");

                assert!(is_within_tolerance(dist, result.distance.0, 1e-2));

                let delta_bearing = Degrees::from(result.bearing - azimuth).0;
                assert!(delta_bearing.abs() < 1e-5);
            }
        }
    }
}

#[test]
fn test_spherical_module_agreement() {
    // the simplified module is documented to be within ~0.3% of the
    // ellipsoidal module
    let pairs = [
        (
            GeoPoint::new(Degrees(42.0), Degrees(29.0)),
            GeoPoint::new(Degrees(39.0), Degrees(-77.0)),
        ),
        (
            GeoPoint::new(Degrees(-33.9), Degrees(18.4)),
            GeoPoint::new(Degrees(-31.9), Degrees(115.9)),
        ),
        (
            GeoPoint::new(Degrees(51.0), Degrees(7.0)),
            GeoPoint::new(Degrees(50.4), Degrees(11.5)),
        ),
    ];

    for (a, b) in &pairs {
        let ellipsoidal = geodesic::distance(a, b, &WGS84_ELLIPSOID).expect("should converge");
        let approximate = spherical::distance(a, b);

        let relative_error = (ellipsoidal.0 - approximate.0).abs() / ellipsoidal.0;
        assert!(relative_error < 0.005);

        let bearing_e = geodesic::bearing(a, b, &WGS84_ELLIPSOID).expect("should converge");
        let bearing_s = spherical::bearing(a, b);
        let delta_bearing = Degrees::from(bearing_e - bearing_s).0;
        assert!(delta_bearing.abs() < 0.3);
    }
}

#[test]
fn test_distance_symmetry_grid() {
    let points = [
        GeoPoint::new(Degrees(-40.0), Degrees(70.0)),
        GeoPoint::new(Degrees(30.0), Degrees(0.0)),
        GeoPoint::new(Degrees(51.0), Degrees(7.0)),
        GeoPoint::new(Degrees(0.0), Degrees(-120.0)),
    ];

    for a in &points {
        for b in &points {
            let d_ab = geodesic::distance(a, b, &WGS84_ELLIPSOID).expect("should converge");
            let d_ba = geodesic::distance(b, a, &WGS84_ELLIPSOID).expect("should converge");
            assert!(is_within_tolerance(d_ab.0, d_ba.0, 1e-2));
        }
    }
}

#[test]
#[ignore]
fn test_geodesic_examples() {
    // Read GEODTEST_DIR/GeodTest.dat file and run tests
    let filename = "GeodTest.dat";
    let dir_key = "GEODTEST_DIR";

    let p = env::var(dir_key).expect("Environment variable not found: GEODTEST_DIR");
    let path = Path::new(&p);
    let file_path = path.join(filename);
    let mut csv_reader = ReaderBuilder::new()
        .has_headers(false)
        .delimiter(b' ')
        .from_path(file_path)
        .expect("Could not read file: GeodTest.dat");

    let mut line_number = 1;
    let mut not_converged = 0;
    for result in csv_reader.records() {
        let record = result.expect("Could not parse record");

        let lat1 = Degrees(record[0].parse::<f64>().expect("lat1"));
        let lon1 = Degrees(record[1].parse::<f64>().expect("lon1"));
        let azi1 = Degrees(record[2].parse::<f64>().expect("azi1"));
        let lat2 = Degrees(record[3].parse::<f64>().expect("lat2"));
        let lon2 = Degrees(record[4].parse::<f64>().expect("lon2"));
        let d_metres = Metres(record[6].parse::<f64>().expect("d_metres"));

        let a = GeoPoint::new(lat1, lon1);
        let b = GeoPoint::new(lat2, lon2);

        match geodesic::distance_bearing(&a, &b, &WGS84_ELLIPSOID) {
            Ok(result) => {
                let delta_length = libm::fabs(d_metres.0 - result.distance.0);
                if 0.1 < delta_length {
                    panic!(
                        "length, line: {:?} delta: {:?} length: {:?} result: {:?} ",
                        line_number, delta_length, d_metres, result.distance
                    );
                }

                let delta_azimuth =
                    libm::fabs(Degrees::from(result.bearing - Angle::from(azi1)).0);
                if 1.0e-4 < delta_azimuth {
                    panic!(
                        "azimuth, line: {:?} delta: {:?} azimuth: {:?} ",
                        line_number, delta_azimuth, azi1
                    );
                }
            }
            Err(_) => {
                // Vincenty's inverse formula does not converge for the
                // nearly antipodal section of the data set
                not_converged += 1;
            }
        }

        line_number += 1;
        if 200_000 < line_number {
            break;
        }
    }

    println!("not converged: {:?}", not_converged);
}
