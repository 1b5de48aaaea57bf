use bevy::math::{DVec2, Vec2};
use bevy::prelude::{Camera, GlobalTransform};
use constants::render_settings::MAP_WORLD_UNITS_PER_METER;

use crate::geo::geodesic::{geodesic_area, geodesic_length};
use crate::geo::{GeoPoint, mercator};
use crate::tools::measure::error::SurfaceError;
use crate::tools::measure::record::MeasurementKind;
use crate::tools::measure::surface::{MeasureSurface, PickResolver};

/// 2-D map view: Web Mercator metres laid flat on the XY plane.
pub struct PlanarSurface<'a> {
    camera: &'a Camera,
    transform: &'a GlobalTransform,
}

impl<'a> PlanarSurface<'a> {
    pub fn new(camera: &'a Camera, transform: &'a GlobalTransform) -> Self {
        Self { camera, transform }
    }
}

/// Map-plane world position to a geographic point.
pub fn map_world_to_geo(world: Vec2) -> Option<GeoPoint> {
    mercator::unproject(world.as_dvec2() / MAP_WORLD_UNITS_PER_METER)
}

/// Geographic point to its map-plane world position.
pub fn geo_to_map_world(point: &GeoPoint) -> Vec2 {
    (mercator::project(point) * MAP_WORLD_UNITS_PER_METER).as_vec2()
}

/// Map-plane world position of a Mercator coordinate.
pub fn mercator_to_map_world(projected: DVec2) -> Vec2 {
    (projected * MAP_WORLD_UNITS_PER_METER).as_vec2()
}

impl PickResolver for PlanarSurface<'_> {
    fn resolve_ground_point(&mut self, screen: Vec2) -> Result<Option<GeoPoint>, SurfaceError> {
        let world = self
            .camera
            .viewport_to_world_2d(self.transform, screen)
            .map_err(|err| SurfaceError::Pick(format!("{err:?}")))?;
        Ok(map_world_to_geo(world))
    }
}

impl MeasureSurface for PlanarSurface<'_> {
    fn name(&self) -> &'static str {
        "2d"
    }

    fn supports(&self, _kind: MeasurementKind) -> bool {
        true
    }

    fn metric(&self, kind: MeasurementKind, vertices: &[GeoPoint]) -> Result<f64, SurfaceError> {
        Ok(match kind {
            MeasurementKind::Distance => geodesic_length(vertices),
            MeasurementKind::Area => geodesic_area(vertices),
        })
    }
}
