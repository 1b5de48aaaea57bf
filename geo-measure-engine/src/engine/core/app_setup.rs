use bevy::asset::AssetMetaCheck;
use bevy::diagnostic::FrameTimeDiagnosticsPlugin;
use bevy::prelude::*;
use bevy_common_assets::json::JsonAssetPlugin;

use crate::engine::camera::viewport_camera::{globe_camera_controller, map_camera_controller};
use crate::engine::core::app_state::{AppState, transition_to_running};
use crate::engine::core::config::{
    ConfigLoader, MeasureConfig, load_config_system, start_config_loading,
};
use crate::engine::core::window_config::create_window_config;
use crate::engine::scene::surfaces::spawn_surfaces;
use crate::engine::surface::ViewMode;
use crate::engine::systems::fps_tracking::fps_notification_system;
use crate::rpc::web_rpc::WebRpcPlugin;
use crate::tools::measure::MeasureToolPlugin;

#[cfg(not(target_arch = "wasm32"))]
use crate::engine::core::app_state::{FpsText, StatusText};
#[cfg(not(target_arch = "wasm32"))]
use crate::engine::systems::{
    fps_tracking::fps_text_update_system, status_text::status_text_update_system,
};

pub fn create_app() -> App {
    let mut app = App::new();

    app.add_plugins(create_default_plugins())
        .init_state::<AppState>()
        .add_plugins(FrameTimeDiagnosticsPlugin::default())
        // Registers MeasureConfig as a loadable asset type from JSON files.
        .add_plugins(JsonAssetPlugin::<MeasureConfig>::new(&["json"]))
        .add_plugins(WebRpcPlugin)
        .add_plugins(MeasureToolPlugin);

    app.init_resource::<ConfigLoader>()
        .init_resource::<ViewMode>();

    app.add_systems(Startup, start_config_loading)
        .add_systems(
            Update,
            (load_config_system, transition_to_running)
                .chain()
                .run_if(in_state(AppState::Loading)),
        )
        .add_systems(OnEnter(AppState::Running), spawn_surfaces);

    let runtime_systems = (
        map_camera_controller,
        globe_camera_controller,
        fps_notification_system,
    );
    app.add_systems(Update, runtime_systems.run_if(in_state(AppState::Running)));

    #[cfg(not(target_arch = "wasm32"))]
    {
        app.add_systems(
            Update,
            (fps_text_update_system, status_text_update_system)
                .run_if(in_state(AppState::Running)),
        )
        .add_systems(Startup, create_native_overlays);
    }

    app
}

// FPS counter and measurement readout; the web page draws its own
#[cfg(not(target_arch = "wasm32"))]
fn create_native_overlays(mut commands: Commands) {
    commands
        .spawn(Node {
            width: Val::Percent(100.0),
            height: Val::Percent(100.0),
            ..default()
        })
        .with_children(|parent| {
            parent.spawn((
                Text::new("FPS: "),
                TextFont {
                    font_size: 16.0,
                    ..default()
                },
                TextColor(Color::srgb(1., 0., 0.)),
                Node {
                    position_type: PositionType::Absolute,
                    bottom: Val::Px(12.0),
                    right: Val::Px(12.0),
                    ..default()
                },
                FpsText,
            ));
            parent.spawn((
                Text::new(""),
                TextFont {
                    font_size: 16.0,
                    ..default()
                },
                TextColor(Color::WHITE),
                Node {
                    position_type: PositionType::Absolute,
                    top: Val::Px(12.0),
                    left: Val::Px(12.0),
                    ..default()
                },
                StatusText,
            ));
        });
}

fn create_default_plugins() -> impl PluginGroup {
    let window_config = WindowPlugin {
        primary_window: Some(create_window_config()),
        ..default()
    };

    let asset_config = AssetPlugin {
        meta_check: AssetMetaCheck::Never,
        ..default()
    };

    DefaultPlugins.set(window_config).set(asset_config)
}
