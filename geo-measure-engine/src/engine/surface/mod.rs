//! Map surfaces hosting a measurement controller.
//!
//! Each surface is a camera entity carrying a [`SurfaceKind`] and a
//! [`MeasureController`]. Only the surface matching the current [`ViewMode`]
//! renders and receives input; [`SurfaceAdapter`] gives systems a single
//! [`MeasureSurface`] over whichever kind they are looking at.

pub mod globe;
pub mod planar;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::engine::scene::live_shapes::{LiveShapeRenderer, LiveShapes};
use crate::geo::GeoPoint;
use crate::rpc::web_rpc::WebRpcInterface;
use crate::tools::measure::controller::MeasureController;
use crate::tools::measure::error::SurfaceError;
use crate::tools::measure::record::MeasurementKind;
use crate::tools::measure::surface::{MeasureSurface, PickResolver};
use crate::tools::measure::systems::MeasureStatus;
use crate::tools::tool_manager::ToolManager;
use globe::GlobeSurface;
use planar::PlanarSurface;

#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SurfaceKind {
    Planar,
    Globe,
}

impl SurfaceKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Planar => "2d",
            Self::Globe => "3d",
        }
    }
}

/// Which surface is on screen.
#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ViewMode {
    #[default]
    #[serde(rename = "2d")]
    Planar,
    #[serde(rename = "3d")]
    Globe,
}

impl ViewMode {
    pub fn from_string(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "2d" => Some(Self::Planar),
            "3d" => Some(Self::Globe),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        self.surface().as_str()
    }

    pub fn surface(self) -> SurfaceKind {
        match self {
            Self::Planar => SurfaceKind::Planar,
            Self::Globe => SurfaceKind::Globe,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Self::Planar => Self::Globe,
            Self::Globe => Self::Planar,
        }
    }
}

/// Request to show a surface. `None` toggles.
#[derive(Event, Debug, Clone, Copy)]
pub struct ViewModeEvent {
    pub mode: Option<ViewMode>,
}

/// A surface kind bound to the camera that views it.
pub enum SurfaceAdapter<'a> {
    Planar(PlanarSurface<'a>),
    Globe(GlobeSurface<'a>),
}

impl<'a> SurfaceAdapter<'a> {
    pub fn new(kind: SurfaceKind, camera: &'a Camera, transform: &'a GlobalTransform) -> Self {
        match kind {
            SurfaceKind::Planar => Self::Planar(PlanarSurface::new(camera, transform)),
            SurfaceKind::Globe => Self::Globe(GlobeSurface::new(camera, transform)),
        }
    }
}

impl PickResolver for SurfaceAdapter<'_> {
    fn resolve_ground_point(&mut self, screen: Vec2) -> Result<Option<GeoPoint>, SurfaceError> {
        match self {
            Self::Planar(surface) => surface.resolve_ground_point(screen),
            Self::Globe(surface) => surface.resolve_ground_point(screen),
        }
    }
}

impl MeasureSurface for SurfaceAdapter<'_> {
    fn name(&self) -> &'static str {
        match self {
            Self::Planar(surface) => surface.name(),
            Self::Globe(surface) => surface.name(),
        }
    }

    fn supports(&self, kind: MeasurementKind) -> bool {
        match self {
            Self::Planar(surface) => surface.supports(kind),
            Self::Globe(surface) => surface.supports(kind),
        }
    }

    fn metric(&self, kind: MeasurementKind, vertices: &[GeoPoint]) -> Result<f64, SurfaceError> {
        match self {
            Self::Planar(surface) => surface.metric(kind, vertices),
            Self::Globe(surface) => surface.metric(kind, vertices),
        }
    }
}

/// Switch the visible surface. Any measurement in progress on either surface
/// is discarded and the tool is cleared.
pub fn apply_view_mode_events(
    mut events: EventReader<ViewModeEvent>,
    mut view_mode: ResMut<ViewMode>,
    mut tool_manager: ResMut<ToolManager>,
    mut live_shapes: ResMut<LiveShapes>,
    mut status: ResMut<MeasureStatus>,
    mut surfaces: Query<(&mut MeasureController, &mut Camera, &SurfaceKind)>,
    mut rpc_interface: ResMut<WebRpcInterface>,
) {
    for event in events.read() {
        let target = event.mode.unwrap_or_else(|| view_mode.toggled());

        for (mut controller, mut camera, kind) in &mut surfaces {
            let mut renderer = LiveShapeRenderer::new(&mut live_shapes, *kind);
            if let Err(err) = controller.deactivate(&mut renderer) {
                error!("Failed to release {} surface: {}", kind.as_str(), err);
            }
            camera.is_active = *kind == target.surface();
        }
        status.live = None;

        if tool_manager.deactivate_current_tool().is_some() {
            rpc_interface.send_notification(
                "tool_state_changed",
                serde_json::json!({
                    "tool": "none",
                    "surface": view_mode.as_str()
                }),
            );
        }

        if *view_mode != target {
            info!("View mode changed: {} -> {}", view_mode.as_str(), target.as_str());
        }
        *view_mode = target;

        rpc_interface.send_notification(
            "view_mode_changed",
            serde_json::json!({ "view_mode": target.as_str() }),
        );
    }
}

/// `V` toggles the view (native builds only).
#[cfg(not(target_arch = "wasm32"))]
pub fn handle_view_mode_shortcut(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut view_events: EventWriter<ViewModeEvent>,
) {
    if keyboard.just_pressed(KeyCode::KeyV) {
        view_events.write(ViewModeEvent { mode: None });
    }
}

#[cfg(target_arch = "wasm32")]
pub fn handle_view_mode_shortcut() {}
