//! Collaborator contracts a map surface supplies to the capture controller.

use bevy::math::Vec2;

use super::error::SurfaceError;
use super::record::MeasurementKind;
use crate::geo::GeoPoint;

/// Resolves a screen position (window pixels) to a world coordinate.
pub trait PickResolver {
    /// `Ok(None)` means the position is outside the navigable surface; that
    /// is a normal condition, not an error.
    fn resolve_ground_point(&mut self, screen: Vec2) -> Result<Option<GeoPoint>, SurfaceError>;
}

/// Identifies one live shape registered with a [`ShapeRenderer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ShapeHandle(pub u32);

/// Draws the in-progress shape while the user is picking points.
pub trait ShapeRenderer {
    /// Start drawing a shape bound to `points`.
    fn render_live_shape(
        &mut self,
        kind: MeasurementKind,
        points: &[GeoPoint],
    ) -> Result<ShapeHandle, SurfaceError>;

    /// Replace the point sequence of a live shape after the accumulator changed.
    fn refresh(&mut self, handle: ShapeHandle, points: &[GeoPoint]) -> Result<(), SurfaceError>;

    /// Release a live shape and every marker it drew.
    fn dispose(&mut self, handle: ShapeHandle) -> Result<(), SurfaceError>;
}

/// A pickable surface that also knows how to measure on itself.
pub trait MeasureSurface: PickResolver {
    fn name(&self) -> &'static str;

    fn supports(&self, kind: MeasurementKind) -> bool;

    /// Raw metric of confirmed vertices: metres for distance, square metres
    /// for area.
    fn metric(&self, kind: MeasurementKind, vertices: &[GeoPoint]) -> Result<f64, SurfaceError>;
}
