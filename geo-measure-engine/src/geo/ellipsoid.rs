//! WGS84 reference ellipsoid: geodetic/Cartesian conversion and ray picking.

use bevy::math::DVec3;
use constants::geodesy::{WGS84_ECCENTRICITY_SQ, WGS84_SEMI_MAJOR_AXIS, WGS84_SEMI_MINOR_AXIS};

use super::GeoPoint;

const GEODETIC_ITERATIONS: usize = 8;

/// Convert a geodetic point to earth-centred, earth-fixed metres.
pub fn geodetic_to_ecef(point: &GeoPoint) -> DVec3 {
    let lon = point.lon.to_radians();
    let lat = point.lat.to_radians();
    let height = point.height_or_zero();

    let (sin_lat, cos_lat) = lat.sin_cos();
    let (sin_lon, cos_lon) = lon.sin_cos();
    let n = prime_vertical_radius(sin_lat);

    DVec3::new(
        (n + height) * cos_lat * cos_lon,
        (n + height) * cos_lat * sin_lon,
        (n * (1.0 - WGS84_ECCENTRICITY_SQ) + height) * sin_lat,
    )
}

/// Convert earth-centred metres back to longitude, latitude and height.
///
/// Returns `None` for the earth's centre, where latitude is undefined.
pub fn ecef_to_geodetic(ecef: DVec3) -> Option<GeoPoint> {
    let p = ecef.x.hypot(ecef.y);
    if p < 1e-9 {
        if ecef.z.abs() < 1e-9 {
            return None;
        }
        let lat = 90.0_f64.copysign(ecef.z);
        return Some(GeoPoint::with_height(
            0.0,
            lat,
            ecef.z.abs() - WGS84_SEMI_MINOR_AXIS,
        ));
    }

    let lon = ecef.y.atan2(ecef.x);
    let mut lat = ecef.z.atan2(p * (1.0 - WGS84_ECCENTRICITY_SQ));
    let mut height = 0.0;

    for _ in 0..GEODETIC_ITERATIONS {
        let n = prime_vertical_radius(lat.sin());
        height = p / lat.cos() - n;
        lat = ecef
            .z
            .atan2(p * (1.0 - WGS84_ECCENTRICITY_SQ * n / (n + height)));
    }

    Some(GeoPoint::with_height(
        lon.to_degrees(),
        lat.to_degrees(),
        height,
    ))
}

/// Nearest intersection of a ray with the ellipsoid surface, in earth-centred
/// metres. `None` when the ray misses or the ellipsoid lies behind the origin.
pub fn ray_intersection(origin: DVec3, direction: DVec3) -> Option<DVec3> {
    // Scale space so the ellipsoid becomes the unit sphere.
    let radii = DVec3::new(
        WGS84_SEMI_MAJOR_AXIS,
        WGS84_SEMI_MAJOR_AXIS,
        WGS84_SEMI_MINOR_AXIS,
    );
    let o = origin / radii;
    let d = direction / radii;

    let a = d.dot(d);
    if a <= f64::EPSILON {
        return None;
    }
    let b = 2.0 * o.dot(d);
    let c = o.dot(o) - 1.0;

    let discriminant = b * b - 4.0 * a * c;
    if discriminant < 0.0 {
        return None;
    }

    let root = discriminant.sqrt();
    let near = (-b - root) / (2.0 * a);
    let far = (-b + root) / (2.0 * a);

    let t = if near >= 0.0 {
        near
    } else if far >= 0.0 {
        far
    } else {
        return None;
    };

    Some(origin + direction * t)
}

fn prime_vertical_radius(sin_lat: f64) -> f64 {
    WGS84_SEMI_MAJOR_AXIS / (1.0 - WGS84_ECCENTRICITY_SQ * sin_lat * sin_lat).sqrt()
}
