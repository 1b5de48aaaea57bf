//! Temporary shapes drawn while a measurement is being picked.

use std::collections::HashMap;

use bevy::math::{Isometry2d, Isometry3d};
use bevy::prelude::*;
use constants::render_settings::{
    DRAW_VERTEX_SIZE, DRAW_VERTEX_SIZE_PX, FLOATING_VERTEX_COLOUR, GLOBE_DRAW_LIFT_METERS,
    GLOBE_WORLD_UNITS_PER_METER, SHAPE_COLOUR, SHAPE_FILL_EDGE_COLOUR,
};

use crate::engine::camera::viewport_camera::{GlobeOrbitCamera, MapCamera};
use crate::engine::surface::globe::geo_to_globe_world;
use crate::engine::surface::planar::geo_to_map_world;
use crate::engine::surface::{SurfaceKind, ViewMode};
use crate::geo::GeoPoint;
use crate::tools::measure::error::SurfaceError;
use crate::tools::measure::record::MeasurementKind;
use crate::tools::measure::surface::{ShapeHandle, ShapeRenderer};

#[derive(Debug, Clone)]
pub struct LiveShape {
    pub kind: MeasurementKind,
    pub surface: SurfaceKind,
    pub points: Vec<GeoPoint>,
}

/// Every live shape currently registered, keyed by handle.
#[derive(Resource, Default)]
pub struct LiveShapes {
    next_id: u32,
    shapes: HashMap<ShapeHandle, LiveShape>,
}

impl LiveShapes {
    pub fn get(&self, handle: ShapeHandle) -> Option<&LiveShape> {
        self.shapes.get(&handle)
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &LiveShape> {
        self.shapes.values()
    }
}

/// [`ShapeRenderer`] for one surface, backed by the [`LiveShapes`] resource.
pub struct LiveShapeRenderer<'a> {
    shapes: &'a mut LiveShapes,
    surface: SurfaceKind,
}

impl<'a> LiveShapeRenderer<'a> {
    pub fn new(shapes: &'a mut LiveShapes, surface: SurfaceKind) -> Self {
        Self { shapes, surface }
    }
}

impl ShapeRenderer for LiveShapeRenderer<'_> {
    fn render_live_shape(
        &mut self,
        kind: MeasurementKind,
        points: &[GeoPoint],
    ) -> Result<ShapeHandle, SurfaceError> {
        let handle = ShapeHandle(self.shapes.next_id);
        self.shapes.next_id = self.shapes.next_id.wrapping_add(1);
        self.shapes.shapes.insert(
            handle,
            LiveShape {
                kind,
                surface: self.surface,
                points: points.to_vec(),
            },
        );
        Ok(handle)
    }

    fn refresh(&mut self, handle: ShapeHandle, points: &[GeoPoint]) -> Result<(), SurfaceError> {
        let shape = self
            .shapes
            .shapes
            .get_mut(&handle)
            .ok_or(SurfaceError::UnknownShape(handle))?;
        shape.points.clear();
        shape.points.extend_from_slice(points);
        Ok(())
    }

    fn dispose(&mut self, handle: ShapeHandle) -> Result<(), SurfaceError> {
        self.shapes
            .shapes
            .remove(&handle)
            .map(|_| ())
            .ok_or(SurfaceError::UnknownShape(handle))
    }
}

/// Draw the live shapes of the visible surface. The last point of each shape
/// is the floating vertex and gets its own marker.
pub fn draw_live_shapes(
    mut gizmos: Gizmos,
    live_shapes: Res<LiveShapes>,
    view_mode: Res<ViewMode>,
    map_camera: Option<Res<MapCamera>>,
    globe_camera: Option<Res<GlobeOrbitCamera>>,
) {
    let visible = view_mode.surface();
    let marker_radius_2d = map_camera
        .as_deref()
        .map_or(DRAW_VERTEX_SIZE_PX, |camera| {
            DRAW_VERTEX_SIZE_PX * camera.units_per_pixel()
        });
    let marker_radius_3d = globe_camera.as_deref().map_or(DRAW_VERTEX_SIZE, |camera| {
        DRAW_VERTEX_SIZE * (camera.altitude * GLOBE_WORLD_UNITS_PER_METER) as f32
    });

    for shape in live_shapes.iter().filter(|shape| shape.surface == visible) {
        let edge_colour = match shape.kind {
            MeasurementKind::Distance => SHAPE_COLOUR,
            MeasurementKind::Area => SHAPE_FILL_EDGE_COLOUR,
        };
        let closed = shape.kind == MeasurementKind::Area && shape.points.len() > 2;
        let Some((floating, confirmed)) = shape.points.split_last() else {
            continue;
        };

        match shape.surface {
            SurfaceKind::Planar => {
                let positions: Vec<Vec2> = shape.points.iter().map(geo_to_map_world).collect();
                gizmos.linestrip_2d(outline(&positions, closed), edge_colour);
                for point in confirmed {
                    gizmos.circle_2d(
                        Isometry2d::from_translation(geo_to_map_world(point)),
                        marker_radius_2d,
                        SHAPE_COLOUR,
                    );
                }
                gizmos.circle_2d(
                    Isometry2d::from_translation(geo_to_map_world(floating)),
                    marker_radius_2d,
                    FLOATING_VERTEX_COLOUR,
                );
            }
            SurfaceKind::Globe => {
                let lifted = |point: &GeoPoint| geo_to_globe_world(point, GLOBE_DRAW_LIFT_METERS);
                let positions: Vec<Vec3> = shape.points.iter().map(lifted).collect();
                gizmos.linestrip(outline(&positions, closed), edge_colour);
                for point in confirmed {
                    gizmos.sphere(
                        Isometry3d::from_translation(lifted(point)),
                        marker_radius_3d,
                        SHAPE_COLOUR,
                    );
                }
                gizmos.sphere(
                    Isometry3d::from_translation(lifted(floating)),
                    marker_radius_3d,
                    FLOATING_VERTEX_COLOUR,
                );
            }
        }
    }
}

fn outline<T: Copy>(positions: &[T], closed: bool) -> Vec<T> {
    let mut outline = positions.to_vec();
    if closed {
        if let Some(first) = positions.first() {
            outline.push(*first);
        }
    }
    outline
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handles_are_unique_and_disposed_once() {
        let mut shapes = LiveShapes::default();
        let mut renderer = LiveShapeRenderer::new(&mut shapes, SurfaceKind::Planar);
        let points = [GeoPoint::new(0.0, 0.0), GeoPoint::new(0.0, 0.0)];

        let first = renderer
            .render_live_shape(MeasurementKind::Distance, &points)
            .unwrap();
        let second = renderer
            .render_live_shape(MeasurementKind::Area, &points)
            .unwrap();
        assert_ne!(first, second);

        renderer.dispose(first).unwrap();
        assert!(matches!(
            renderer.dispose(first),
            Err(SurfaceError::UnknownShape(handle)) if handle == first
        ));
        assert_eq!(shapes.len(), 1);
    }

    #[test]
    fn refresh_replaces_the_points() {
        let mut shapes = LiveShapes::default();
        let mut renderer = LiveShapeRenderer::new(&mut shapes, SurfaceKind::Globe);
        let handle = renderer
            .render_live_shape(MeasurementKind::Distance, &[GeoPoint::new(1.0, 1.0)])
            .unwrap();

        renderer
            .refresh(handle, &[GeoPoint::new(1.0, 1.0), GeoPoint::new(2.0, 2.0)])
            .unwrap();

        let shape = shapes.get(handle).unwrap();
        assert_eq!(shape.points.len(), 2);
        assert_eq!(shape.surface, SurfaceKind::Globe);
    }

    #[test]
    fn area_outline_is_closed() {
        assert_eq!(outline(&[1, 2, 3], true), vec![1, 2, 3, 1]);
        assert_eq!(outline(&[1, 2, 3], false), vec![1, 2, 3]);
    }
}
