use serde::{Deserialize, Serialize};

/// A picked world coordinate in WGS84 degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lon: f64,
    pub lat: f64,
    /// Height above the ellipsoid in metres, when the surface knows it.
    pub height: Option<f64>,
}

impl GeoPoint {
    pub fn new(lon: f64, lat: f64) -> Self {
        Self {
            lon,
            lat,
            height: None,
        }
    }

    pub fn with_height(lon: f64, lat: f64, height: f64) -> Self {
        Self {
            lon,
            lat,
            height: Some(height),
        }
    }

    /// `[lon, lat]` pair as written into GeoJSON coordinates.
    pub fn lon_lat(&self) -> [f64; 2] {
        [self.lon, self.lat]
    }

    /// `[lon, lat, height]` with a missing height reported as zero.
    pub fn lon_lat_height(&self) -> [f64; 3] {
        [self.lon, self.lat, self.height.unwrap_or(0.0)]
    }

    pub fn height_or_zero(&self) -> f64 {
        self.height.unwrap_or(0.0)
    }
}
