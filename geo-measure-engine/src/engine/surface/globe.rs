use bevy::math::{DVec3, Vec2, Vec3};
use bevy::prelude::{Camera, GlobalTransform};
use constants::coordinate_system::{inverse_transform_coordinates, transform_coordinates};
use constants::render_settings::GLOBE_WORLD_UNITS_PER_METER;

use crate::geo::GeoPoint;
use crate::geo::ellipsoid::{ecef_to_geodetic, geodetic_to_ecef, ray_intersection};
use crate::geo::geodesic::chord_length;
use crate::tools::measure::error::SurfaceError;
use crate::tools::measure::record::MeasurementKind;
use crate::tools::measure::surface::{MeasureSurface, PickResolver};

/// 3-D globe view: the WGS84 ellipsoid in earth-centred space, Y up.
pub struct GlobeSurface<'a> {
    camera: &'a Camera,
    transform: &'a GlobalTransform,
}

impl<'a> GlobeSurface<'a> {
    pub fn new(camera: &'a Camera, transform: &'a GlobalTransform) -> Self {
        Self { camera, transform }
    }
}

/// Engine world position to earth-centred metres.
pub fn world_to_ecef(world: Vec3) -> DVec3 {
    let (x, y, z) =
        inverse_transform_coordinates(world.x as f64, world.y as f64, world.z as f64);
    DVec3::new(x, y, z) / GLOBE_WORLD_UNITS_PER_METER
}

/// Earth-centred metres to engine world position.
pub fn ecef_to_world(ecef: DVec3) -> Vec3 {
    let (x, y, z) = transform_coordinates(ecef.x, ecef.y, ecef.z);
    (DVec3::new(x, y, z) * GLOBE_WORLD_UNITS_PER_METER).as_vec3()
}

/// World position of a geographic point, raised `lift` metres above its
/// own height.
pub fn geo_to_globe_world(point: &GeoPoint, lift: f64) -> Vec3 {
    let raised = GeoPoint::with_height(point.lon, point.lat, point.height_or_zero() + lift);
    ecef_to_world(geodetic_to_ecef(&raised))
}

/// Intersect a world-space ray with the ellipsoid.
pub fn globe_ray_to_geo(origin: Vec3, direction: Vec3) -> Option<GeoPoint> {
    let (dx, dy, dz) =
        inverse_transform_coordinates(direction.x as f64, direction.y as f64, direction.z as f64);
    let hit = ray_intersection(world_to_ecef(origin), DVec3::new(dx, dy, dz))?;
    ecef_to_geodetic(hit)
}

impl PickResolver for GlobeSurface<'_> {
    fn resolve_ground_point(&mut self, screen: Vec2) -> Result<Option<GeoPoint>, SurfaceError> {
        let ray = self
            .camera
            .viewport_to_world(self.transform, screen)
            .map_err(|err| SurfaceError::Pick(format!("{err:?}")))?;
        Ok(globe_ray_to_geo(ray.origin, *ray.direction))
    }
}

impl MeasureSurface for GlobeSurface<'_> {
    fn name(&self) -> &'static str {
        "3d"
    }

    fn supports(&self, kind: MeasurementKind) -> bool {
        kind == MeasurementKind::Distance
    }

    fn metric(&self, kind: MeasurementKind, vertices: &[GeoPoint]) -> Result<f64, SurfaceError> {
        match kind {
            MeasurementKind::Distance => Ok(chord_length(vertices)),
            MeasurementKind::Area => Err(SurfaceError::UnsupportedMetric {
                surface: self.name(),
                kind,
            }),
        }
    }
}
