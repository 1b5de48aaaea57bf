//! Surface distances and areas on the mean earth sphere, plus straight-line
//! chord lengths through earth-centred space.

use constants::geodesy::MEAN_EARTH_RADIUS;

use super::GeoPoint;
use super::ellipsoid::geodetic_to_ecef;

/// Great-circle distance between two points in metres (haversine).
pub fn haversine_distance(a: &GeoPoint, b: &GeoPoint) -> f64 {
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();
    let d_lat = lat2 - lat1;
    let d_lon = (b.lon - a.lon).to_radians();

    let h = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);
    2.0 * MEAN_EARTH_RADIUS * h.sqrt().atan2((1.0 - h).sqrt())
}

/// Geodesic length of a line string in metres.
pub fn geodesic_length(points: &[GeoPoint]) -> f64 {
    points
        .windows(2)
        .map(|pair| haversine_distance(&pair[0], &pair[1]))
        .sum()
}

/// Area of a ring on the sphere in square metres.
///
/// The ring may be open or closed; a repeated closing vertex adds nothing.
/// Winding order does not matter.
pub fn geodesic_area(ring: &[GeoPoint]) -> f64 {
    if ring.len() < 3 {
        return 0.0;
    }

    let mut area = 0.0;
    let mut previous = ring[ring.len() - 1];

    for point in ring {
        area += (point.lon - previous.lon).to_radians()
            * (2.0 + previous.lat.to_radians().sin() + point.lat.to_radians().sin());
        previous = *point;
    }

    (area * MEAN_EARTH_RADIUS * MEAN_EARTH_RADIUS / 2.0).abs()
}

/// Sum of straight-line distances between consecutive points in earth-centred
/// space, in metres.
pub fn chord_length(points: &[GeoPoint]) -> f64 {
    points
        .windows(2)
        .map(|pair| geodetic_to_ecef(&pair[0]).distance(geodetic_to_ecef(&pair[1])))
        .sum()
}
