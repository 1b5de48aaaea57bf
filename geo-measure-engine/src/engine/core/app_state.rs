use bevy::prelude::*;

use crate::engine::core::config::ConfigLoader;

#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Hash, States)]
pub enum AppState {
    #[default]
    Loading,
    Running,
}

#[derive(Component)]
pub struct FpsText;

#[derive(Component)]
pub struct StatusText;

// Final transition to running state once the configuration is in place
pub fn transition_to_running(
    config_loader: Res<ConfigLoader>,
    mut next_state: ResMut<NextState<AppState>>,
) {
    if config_loader.loaded {
        info!("→ Configuration ready, transitioning to Running state");
        next_state.set(AppState::Running);
    }
}
