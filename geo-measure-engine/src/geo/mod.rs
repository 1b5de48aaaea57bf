//! Geographic primitives used by the measurement surfaces.
//!
//! Points are stored as longitude/latitude in degrees with an optional height
//! in metres. The submodules convert them to the spaces each surface works
//! in:
//!
//! - [`ellipsoid`]: WGS84 earth-centred Cartesian coordinates and ray picking
//!   against the reference ellipsoid (3-D globe).
//! - [`mercator`]: Web Mercator projected metres (2-D map).
//! - [`geodesic`]: lengths and areas measured along the earth's surface.

pub mod ellipsoid;
pub mod geodesic;
pub mod mercator;
pub mod point;

pub use point::GeoPoint;
