//! Distance and area measurement on the map surfaces.
//!
//! The capture logic lives in [`controller::MeasureController`], written once
//! against the [`surface`] traits. Everything else here wires it into Bevy:
//!
//! ```text
//! CursorMoved / mouse / Enter
//!   └─> collect_measure_input()          CaptureInputEvent
//!       └─> drive_measure_controllers()  measure_started / measure_updated
//!           └─> MeasurementEnded
//!               └─> record_finished_measurements()
//!                   ├─> MeasurementLog ("Measurement n")
//!                   ├─> measurement_end notification
//!                   └─> ClearToolEvent (deactivate_after_finish)
//! ```
//!
//! Finish gestures: double click on the 2-D map, right click on the globe,
//! Enter on either.

use bevy::prelude::*;

use crate::engine::core::app_state::AppState;
use crate::engine::scene::live_shapes::{LiveShapes, draw_live_shapes};
use crate::engine::surface::{ViewModeEvent, apply_view_mode_events, handle_view_mode_shortcut};
use crate::tools::tool_manager::{
    ClearToolEvent, ToolManager, ToolSelectionEvent, handle_clear_tool_events,
    handle_tool_keyboard_shortcuts, handle_tool_selection_events,
};

pub mod controller;
pub mod error;
pub mod input;
pub mod record;
pub mod shape;
pub mod surface;
pub mod systems;

use input::{CaptureInputEvent, collect_measure_input};
use systems::{
    MeasureStatus, MeasurementEnded, MeasurementLog, drive_measure_controllers,
    record_finished_measurements,
};

pub struct MeasureToolPlugin;

impl Plugin for MeasureToolPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ToolManager>()
            .init_resource::<LiveShapes>()
            .init_resource::<MeasurementLog>()
            .init_resource::<MeasureStatus>()
            .add_event::<ToolSelectionEvent>()
            .add_event::<ClearToolEvent>()
            .add_event::<ViewModeEvent>()
            .add_event::<CaptureInputEvent>()
            .add_event::<MeasurementEnded>()
            .add_systems(
                Update,
                (
                    // Tool and view changes first so input lands on the new state.
                    handle_tool_keyboard_shortcuts,
                    handle_view_mode_shortcut,
                    apply_view_mode_events,
                    handle_tool_selection_events,
                    handle_clear_tool_events,
                    collect_measure_input,
                    drive_measure_controllers,
                    record_finished_measurements,
                    draw_live_shapes,
                )
                    .chain()
                    .run_if(in_state(AppState::Running)),
            );
    }
}
