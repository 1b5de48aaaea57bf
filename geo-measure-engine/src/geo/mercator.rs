//! Spherical Web Mercator (EPSG:3857) projection.

use bevy::math::DVec2;
use constants::geodesy::{WEB_MERCATOR_HALF_EXTENT, WEB_MERCATOR_RADIUS};

use super::GeoPoint;

/// Project longitude/latitude to Mercator metres.
pub fn project(point: &GeoPoint) -> DVec2 {
    let x = WEB_MERCATOR_RADIUS * point.lon.to_radians();
    let y = WEB_MERCATOR_RADIUS
        * (std::f64::consts::FRAC_PI_4 + point.lat.to_radians() / 2.0)
            .tan()
            .ln();
    DVec2::new(x, y)
}

/// Unproject Mercator metres. Positions outside the projected square have no
/// geographic counterpart and yield `None`.
pub fn unproject(projected: DVec2) -> Option<GeoPoint> {
    if !projected.is_finite()
        || projected.x.abs() > WEB_MERCATOR_HALF_EXTENT
        || projected.y.abs() > WEB_MERCATOR_HALF_EXTENT
    {
        return None;
    }

    let lon = (projected.x / WEB_MERCATOR_RADIUS).to_degrees();
    let lat = (2.0 * (projected.y / WEB_MERCATOR_RADIUS).exp().atan()
        - std::f64::consts::FRAC_PI_2)
        .to_degrees();
    Some(GeoPoint::new(lon, lat))
}
