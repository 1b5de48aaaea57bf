//! Runtime diagnostics and on-screen readouts.

/// FPS tracking and notification systems for performance monitoring.
///
/// Sends frame rate updates to frontend via RPC and updates native UI overlays.
pub mod fps_tracking;

/// Native overlay showing the armed tool, the view and the live measurement.
#[cfg(not(target_arch = "wasm32"))]
pub mod status_text;
