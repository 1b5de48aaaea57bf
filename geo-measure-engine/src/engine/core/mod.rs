//! Core application setup and state management.
//!
//! Handles application lifecycle, window configuration, runtime configuration
//! loading and plugin initialisation for both native and WASM targets.

/// Application setup and plugin configuration for the Bevy engine.
///
/// Creates the main app with both map surfaces, the measurement tools and the
/// RPC bridge.
pub mod app_setup;

/// Application state machine: loading the configuration, then running.
pub mod app_state;

/// Runtime configuration asset (`measure_config.json`) and its loader.
pub mod config;

/// Platform-specific window configuration for native and WASM builds.
///
/// Configures canvas integration for web targets and vsync settings.
pub mod window_config;
