//! Runtime configuration loaded from `assets/measure_config.json`.

use bevy::asset::LoadState;
use bevy::prelude::*;
use constants::input::{DOUBLE_CLICK_RADIUS_PX, DOUBLE_CLICK_SECS};
use serde::{Deserialize, Serialize};

use crate::engine::surface::ViewMode;
use crate::geo::GeoPoint;

pub const CONFIG_PATH: &str = "measure_config.json";

/// Gesture that finishes a shape on a surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinishGesture {
    DoubleClick,
    SecondaryClick,
}

/// Where both cameras start.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InitialView {
    pub lon: f64,
    pub lat: f64,
    /// Globe eye height in metres.
    pub height: f64,
    /// Map zoom level.
    pub zoom: f64,
}

impl Default for InitialView {
    fn default() -> Self {
        Self {
            lon: -74.07,
            lat: 4.71,
            height: 20_000.0,
            zoom: 12.0,
        }
    }
}

impl InitialView {
    pub fn point(&self) -> GeoPoint {
        GeoPoint::with_height(self.lon, self.lat, self.height)
    }
}

#[derive(Asset, TypePath, Resource, Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MeasureConfig {
    pub initial_view_mode: ViewMode,
    pub initial_view: InitialView,
    pub double_click_secs: f64,
    pub double_click_radius_px: f32,
    pub planar_finish: FinishGesture,
    pub globe_finish: FinishGesture,
    /// Put the tool away once a measurement has been emitted.
    pub deactivate_after_finish: bool,
}

impl Default for MeasureConfig {
    fn default() -> Self {
        Self {
            initial_view_mode: ViewMode::Planar,
            initial_view: InitialView::default(),
            double_click_secs: DOUBLE_CLICK_SECS,
            double_click_radius_px: DOUBLE_CLICK_RADIUS_PX,
            planar_finish: FinishGesture::DoubleClick,
            globe_finish: FinishGesture::SecondaryClick,
            deactivate_after_finish: true,
        }
    }
}

#[derive(Resource, Default)]
pub struct ConfigLoader {
    handle: Option<Handle<MeasureConfig>>,
    pub loaded: bool,
}

pub fn start_config_loading(mut loader: ResMut<ConfigLoader>, asset_server: Res<AssetServer>) {
    info!("Loading configuration from: {}", CONFIG_PATH);
    loader.handle = Some(asset_server.load(CONFIG_PATH));
}

/// Insert the loaded configuration, or the defaults when loading failed.
pub fn load_config_system(
    mut commands: Commands,
    mut loader: ResMut<ConfigLoader>,
    asset_server: Res<AssetServer>,
    configs: Res<Assets<MeasureConfig>>,
) {
    if loader.loaded {
        return;
    }
    let Some(handle) = loader.handle.clone() else {
        return;
    };

    if let Some(config) = configs.get(&handle) {
        info!("Configuration loaded");
        commands.insert_resource(config.clone());
        loader.loaded = true;
    } else if let Some(LoadState::Failed(err)) = asset_server.get_load_state(handle.id()) {
        warn!("Configuration unavailable ({}), using defaults", err);
        commands.insert_resource(MeasureConfig::default());
        loader.loaded = true;
    }
}
