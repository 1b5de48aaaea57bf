/// WGS84 semi-major axis in metres.
pub const WGS84_SEMI_MAJOR_AXIS: f64 = 6_378_137.0;

/// WGS84 flattening.
pub const WGS84_FLATTENING: f64 = 1.0 / 298.257_223_563;

/// WGS84 semi-minor axis in metres.
pub const WGS84_SEMI_MINOR_AXIS: f64 = WGS84_SEMI_MAJOR_AXIS * (1.0 - WGS84_FLATTENING);

/// WGS84 first eccentricity squared.
pub const WGS84_ECCENTRICITY_SQ: f64 = WGS84_FLATTENING * (2.0 - WGS84_FLATTENING);

/// Mean earth radius used for spherical geodesic length and area, in metres.
pub const MEAN_EARTH_RADIUS: f64 = 6_371_008.8;

/// Sphere radius of the Web Mercator projection (EPSG:3857).
pub const WEB_MERCATOR_RADIUS: f64 = WGS84_SEMI_MAJOR_AXIS;

/// Half width of the Web Mercator square, in projected metres.
pub const WEB_MERCATOR_HALF_EXTENT: f64 = std::f64::consts::PI * WEB_MERCATOR_RADIUS;

/// Web Mercator ground resolution at zoom 0 for 256 px tiles, metres per pixel.
pub const WEB_MERCATOR_ZOOM0_RESOLUTION: f64 = 2.0 * WEB_MERCATOR_HALF_EXTENT / 256.0;
