use bevy::prelude::*;

use crate::engine::core::app_state::StatusText;
use crate::engine::surface::ViewMode;
use crate::tools::measure::systems::MeasureStatus;
use crate::tools::tool_manager::ToolManager;

pub fn status_text_update_system(
    tool_manager: Res<ToolManager>,
    view_mode: Res<ViewMode>,
    status: Res<MeasureStatus>,
    mut query: Query<&mut Text, With<StatusText>>,
) {
    if !(tool_manager.is_changed() || view_mode.is_changed() || status.is_changed()) {
        return;
    }

    let text = status_line(tool_manager.active_tool().as_str(), *view_mode, &status);
    for mut status_text in &mut query {
        status_text.0 = text.clone();
    }
}

fn status_line(tool: &str, view_mode: ViewMode, status: &MeasureStatus) -> String {
    match status.live {
        Some(live) => format!("{} | {}: {}", view_mode.as_str(), tool, live.label()),
        None => format!("{} | {}", view_mode.as_str(), tool),
    }
}
