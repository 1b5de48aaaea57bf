//! Interactive measurement tools.
//!
//! Provides distance and area measurement on the 2-D map and the 3-D globe,
//! with unified tool manager coordination and RPC integration for frontend
//! control.
//!
//! ## Tool Manager Architecture
//!
//! The `ToolManager` resource tracks the tool armed on the visible surface:
//! - Only one tool can be active at a time, on one surface
//! - Tools are activated via keyboard shortcuts (native) or RPC events (WASM)
//! - Deactivation discards any shape in progress and notifies the frontend
//!
//! ### Tool Activation Flow
//!
//! ```text
//! Keyboard/RPC Input
//!   └─> ToolSelectionEvent
//!       └─> handle_tool_selection_events()
//!           ├─> Disarm hidden surfaces
//!           ├─> Re-arm the visible surface's controller
//!           └─> Send RPC notification to frontend
//! ```
//!
//! ## Available Tools
//!
//! ### Distance (`ToolState::Distance`)
//! - **Activation**: `M` key (native) or `tool_selection` RPC with `"distance"`
//! - **Map**: great-circle length along the picked vertices
//! - **Globe**: straight-line length through earth-centred space
//!
//! ### Area (`ToolState::Area`)
//! - **Activation**: `N` key (native) or `tool_selection` RPC with `"area"`
//! - **Map only**: spherical area of the closed ring; the globe rejects it
//!
//! `Escape` (native) or `clear_tool` RPC puts the tool away; `V` toggles the
//! view.

/// Measurement capture controller, records and their Bevy systems.
pub mod measure;

/// Unified tool manager coordinating exclusive tool activation and state.
///
/// Handles tool selection events from keyboard shortcuts and RPC with frontend notifications.
pub mod tool_manager;
