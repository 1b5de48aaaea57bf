use std::fmt;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::engine::scene::live_shapes::{LiveShapeRenderer, LiveShapes};
use crate::engine::surface::{SurfaceAdapter, SurfaceKind, ViewMode};
use crate::rpc::web_rpc::WebRpcInterface;
use crate::tools::measure::controller::MeasureController;
use crate::tools::measure::record::MeasurementKind;
use crate::tools::measure::systems::MeasureStatus;

/// Measurement tool selected on a surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolState {
    #[default]
    None,
    Distance,
    Area,
}

impl ToolState {
    /// Convert string identifier to tool state for RPC compatibility.
    pub fn from_string(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "none" => Some(Self::None),
            "distance" => Some(Self::Distance),
            "area" => Some(Self::Area),
            _ => None,
        }
    }

    /// Convert tool state to string identifier for frontend communication.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Distance => "distance",
            Self::Area => "area",
        }
    }

    /// The measurement this tool captures, if any.
    pub fn kind(self) -> Option<MeasurementKind> {
        match self {
            Self::None => None,
            Self::Distance => Some(MeasurementKind::Distance),
            Self::Area => Some(MeasurementKind::Area),
        }
    }
}

impl fmt::Display for ToolState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resource tracking the tool armed on the visible surface.
#[derive(Resource, Default)]
pub struct ToolManager {
    active_tool: ToolState,
}

impl ToolManager {
    /// Record the newly armed tool. Returns whether it differs from the
    /// previous one.
    pub fn activate_tool(&mut self, tool: ToolState) -> bool {
        let changed = self.active_tool != tool;
        self.active_tool = tool;
        info!("Tool manager activated: {}", tool);
        changed
    }

    /// Clear the selection, returning the tool that was active.
    pub fn deactivate_current_tool(&mut self) -> Option<ToolState> {
        let previous = std::mem::take(&mut self.active_tool);
        if previous == ToolState::None {
            return None;
        }
        info!("Tool manager deactivated: {}", previous);
        Some(previous)
    }

    pub fn active_tool(&self) -> ToolState {
        self.active_tool
    }
}

/// Event fired when tool selection changes via RPC or keyboard shortcuts.
#[derive(Event, Debug, Clone, Copy)]
pub struct ToolSelectionEvent {
    pub tool: ToolState,
    pub source: ToolSelectionSource,
}

/// Event fired to put the active tool away.
#[derive(Event, Debug, Clone, Copy)]
pub struct ClearToolEvent {
    pub source: ToolSelectionSource,
}

/// Source of tool selection for debugging and conditional logic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolSelectionSource {
    Rpc,
    Keyboard,
    /// Reset after a measurement finished.
    Finish,
}

/// Arm the requested tool on the visible surface. Hidden surfaces are always
/// left without a tool.
pub fn handle_tool_selection_events(
    mut events: EventReader<ToolSelectionEvent>,
    mut tool_manager: ResMut<ToolManager>,
    view_mode: Res<ViewMode>,
    mut live_shapes: ResMut<LiveShapes>,
    mut status: ResMut<MeasureStatus>,
    mut surfaces: Query<(
        &mut MeasureController,
        &SurfaceKind,
        &Camera,
        &GlobalTransform,
    )>,
    mut rpc_interface: ResMut<WebRpcInterface>,
) {
    for event in events.read() {
        let visible = view_mode.surface();
        status.live = None;

        for (mut controller, kind, camera, transform) in &mut surfaces {
            let surface = SurfaceAdapter::new(*kind, camera, transform);
            let mut renderer = LiveShapeRenderer::new(&mut live_shapes, *kind);
            let tool = if *kind == visible {
                event.tool
            } else {
                ToolState::None
            };

            match controller.set_tool(tool, &surface, &mut renderer) {
                Ok(()) if *kind == visible => {
                    tool_manager.activate_tool(tool);
                    info!("{} tool armed via {:?}", tool, event.source);
                    rpc_interface.send_notification(
                        "tool_state_changed",
                        serde_json::json!({
                            "tool": tool.as_str(),
                            "surface": kind.as_str()
                        }),
                    );
                }
                Ok(()) => {}
                Err(err) => {
                    warn!("Tool selection rejected: {}", err);
                    rpc_interface.send_notification(
                        "measure_error",
                        serde_json::json!({ "message": err.to_string() }),
                    );
                    // The previous tool was disarmed before the rejection.
                    if tool_manager.deactivate_current_tool().is_some() {
                        rpc_interface.send_notification(
                            "tool_state_changed",
                            serde_json::json!({
                                "tool": ToolState::None.as_str(),
                                "surface": kind.as_str()
                            }),
                        );
                    }
                }
            }
        }
    }
}

/// Deactivate every controller, discarding any shape in progress.
pub fn handle_clear_tool_events(
    mut events: EventReader<ClearToolEvent>,
    mut tool_manager: ResMut<ToolManager>,
    view_mode: Res<ViewMode>,
    mut live_shapes: ResMut<LiveShapes>,
    mut status: ResMut<MeasureStatus>,
    mut controllers: Query<(&mut MeasureController, &SurfaceKind)>,
    mut rpc_interface: ResMut<WebRpcInterface>,
) {
    for event in events.read() {
        for (mut controller, kind) in &mut controllers {
            let mut renderer = LiveShapeRenderer::new(&mut live_shapes, *kind);
            if let Err(err) = controller.deactivate(&mut renderer) {
                error!("Failed to clear {} tool: {}", kind.as_str(), err);
            }
        }
        status.live = None;

        if tool_manager.deactivate_current_tool().is_some() {
            info!("Tool cleared via {:?}", event.source);
            rpc_interface.send_notification(
                "tool_state_changed",
                serde_json::json!({
                    "tool": ToolState::None.as_str(),
                    "surface": view_mode.as_str()
                }),
            );
        }
    }
}

/// System handling keyboard shortcuts for tool selection (native builds only).
#[cfg(not(target_arch = "wasm32"))]
pub fn handle_tool_keyboard_shortcuts(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut tool_events: EventWriter<ToolSelectionEvent>,
    mut clear_events: EventWriter<ClearToolEvent>,
) {
    if keyboard.just_pressed(KeyCode::KeyM) {
        tool_events.write(ToolSelectionEvent {
            tool: ToolState::Distance,
            source: ToolSelectionSource::Keyboard,
        });
    }

    if keyboard.just_pressed(KeyCode::KeyN) {
        tool_events.write(ToolSelectionEvent {
            tool: ToolState::Area,
            source: ToolSelectionSource::Keyboard,
        });
    }

    if keyboard.just_pressed(KeyCode::Escape) {
        clear_events.write(ClearToolEvent {
            source: ToolSelectionSource::Keyboard,
        });
    }
}

/// Placeholder system for WASM builds where keyboard shortcuts are disabled.
#[cfg(target_arch = "wasm32")]
pub fn handle_tool_keyboard_shortcuts() {
    // Tools are controlled via RPC only.
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::measure::controller::CapturePhase;
    use crate::tools::measure::record::ScaledValue;

    fn test_app(view_mode: ViewMode) -> App {
        let mut app = App::new();
        app.insert_resource(view_mode)
            .init_resource::<ToolManager>()
            .init_resource::<LiveShapes>()
            .init_resource::<MeasureStatus>()
            .init_resource::<WebRpcInterface>()
            .add_event::<ToolSelectionEvent>()
            .add_event::<ClearToolEvent>()
            .add_systems(
                Update,
                (handle_tool_selection_events, handle_clear_tool_events).chain(),
            );

        for kind in [SurfaceKind::Planar, SurfaceKind::Globe] {
            app.world_mut().spawn((
                MeasureController::default(),
                kind,
                Camera::default(),
                GlobalTransform::default(),
            ));
        }
        app
    }

    fn controller_states(app: &mut App) -> Vec<(SurfaceKind, ToolState, CapturePhase)> {
        let mut query = app
            .world_mut()
            .query::<(&SurfaceKind, &MeasureController)>();
        let mut states: Vec<_> = query
            .iter(app.world())
            .map(|(kind, c)| (*kind, c.tool(), c.phase()))
            .collect();
        states.sort_by_key(|(kind, _, _)| *kind == SurfaceKind::Globe);
        states
    }

    fn notifications(app: &App) -> Vec<(String, serde_json::Value)> {
        app.world()
            .resource::<WebRpcInterface>()
            .pending_notifications()
            .iter()
            .map(|n| (n.method.clone(), n.params.clone()))
            .collect()
    }

    fn select(app: &mut App, tool: ToolState) {
        app.world_mut().send_event(ToolSelectionEvent {
            tool,
            source: ToolSelectionSource::Rpc,
        });
        app.update();
    }

    #[test]
    fn tool_state_uses_lowercase_names() {
        assert_eq!(ToolState::from_string("Distance"), Some(ToolState::Distance));
        assert_eq!(ToolState::from_string("polygon"), None);
        assert_eq!(
            serde_json::to_value(ToolState::Area).unwrap(),
            serde_json::json!("area")
        );
        assert_eq!(ToolState::None.kind(), None);
    }

    #[test]
    fn selection_arms_only_the_visible_surface() {
        let mut app = test_app(ViewMode::Planar);
        select(&mut app, ToolState::Area);

        assert_eq!(
            controller_states(&mut app),
            vec![
                (SurfaceKind::Planar, ToolState::Area, CapturePhase::Armed),
                (SurfaceKind::Globe, ToolState::None, CapturePhase::Idle),
            ]
        );
        assert_eq!(
            app.world().resource::<ToolManager>().active_tool(),
            ToolState::Area
        );
        assert_eq!(
            notifications(&app),
            vec![(
                "tool_state_changed".to_string(),
                serde_json::json!({ "tool": "area", "surface": "2d" })
            )]
        );
    }

    #[test]
    fn area_on_the_globe_is_rejected() {
        let mut app = test_app(ViewMode::Globe);
        select(&mut app, ToolState::Area);

        let states = controller_states(&mut app);
        assert_eq!(states[1], (SurfaceKind::Globe, ToolState::None, CapturePhase::Idle));
        assert_eq!(
            app.world().resource::<ToolManager>().active_tool(),
            ToolState::None
        );
        let sent = notifications(&app);
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].0, "measure_error");
    }

    #[test]
    fn rejected_selection_reports_the_disarmed_tool() {
        let mut app = test_app(ViewMode::Globe);
        select(&mut app, ToolState::Distance);
        select(&mut app, ToolState::Area);

        let states = controller_states(&mut app);
        assert_eq!(states[1], (SurfaceKind::Globe, ToolState::None, CapturePhase::Idle));
        assert_eq!(
            app.world().resource::<ToolManager>().active_tool(),
            ToolState::None
        );

        let sent = notifications(&app);
        let methods: Vec<_> = sent.iter().map(|(method, _)| method.as_str()).collect();
        assert_eq!(
            methods,
            vec!["tool_state_changed", "measure_error", "tool_state_changed"]
        );
        assert_eq!(
            sent[2].1,
            serde_json::json!({ "tool": "none", "surface": "3d" })
        );
    }

    #[test]
    fn clear_event_disarms_every_controller() {
        let mut app = test_app(ViewMode::Globe);
        select(&mut app, ToolState::Distance);
        app.world_mut().resource_mut::<MeasureStatus>().live =
            Some(ScaledValue::from_length(1_230.0));

        app.world_mut().send_event(ClearToolEvent {
            source: ToolSelectionSource::Keyboard,
        });
        app.update();

        assert_eq!(app.world().resource::<MeasureStatus>().live, None);

        assert!(
            controller_states(&mut app)
                .iter()
                .all(|(_, tool, phase)| *tool == ToolState::None && *phase == CapturePhase::Idle)
        );
        let sent = notifications(&app);
        assert_eq!(
            sent.last().unwrap(),
            &(
                "tool_state_changed".to_string(),
                serde_json::json!({ "tool": "none", "surface": "3d" })
            )
        );
    }
}
