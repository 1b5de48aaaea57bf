//! JSON-RPC 2.0 communication layer for web frontend integration.
//!
//! Implements bidirectional messaging between the Bevy engine and the map
//! page hosting it via iframe postMessage, supporting both request-response
//! and notification patterns.
//!
//! ## Architecture
//!
//! The RPC system uses standard JSON-RPC 2.0 protocol with:
//! - **Requests**: Expect responses with matching IDs
//! - **Notifications**: One-way messages without responses
//! - **Responses**: Reply to requests with results or errors
//!
//! ## Message Flow
//!
//! ```text
//! Host page (parent)    <──postMessage──>  Bevy (iframe)
//!        │                                        │
//!        ├─ Request (with ID) ──────────────────> │
//!        │                                        ├─ Process request
//!        │ <───────────────── Response (with ID) ─┤
//!        │                                        │
//!        │ <────────── Notification (no ID) ─────┤
//! ```
//!
//! ## Sending Notifications from Bevy
//!
//! Use `WebRpcInterface::send_notification()` to push updates to the frontend:
//!
//! ```rust,ignore
//! fn your_system(mut rpc: ResMut<WebRpcInterface>) {
//!     rpc.send_notification("event_name", json!({
//!         "data": "value",
//!         "timestamp": 123456
//!     }));
//! }
//! ```
//!
//! ## Error Handling
//!
//! Standard JSON-RPC 2.0 error codes:
//! - `-32700`: Parse error
//! - `-32600`: Invalid request
//! - `-32601`: Method not found
//! - `-32602`: Invalid params
//! - `-32603`: Internal error
//!
//! ## Methods
//!
//! ### Tool Management
//! - `tool_selection { tool }`: arm `distance`, `area` or `none` on the visible surface
//! - `clear_tool`: deactivate the current tool, discarding any shape in progress
//!
//! ### View
//! - `set_view_mode { mode }`: show the `2d` map or the `3d` globe
//!
//! ### Measurements
//! - `get_measurements`: every measurement finished this session, as save payloads
//!
//! ### Diagnostics
//! - `get_fps`: Retrieve current frame rate
//!
//! ## Notifications
//!
//! - `tool_state_changed`, `view_mode_changed`
//! - `measure_started`, `measure_updated`, `measurement_end`, `measure_error`
//! - `fps_update`

/// JSON-RPC 2.0 bidirectional communication system for the host page.
///
/// Handles request-response patterns, notifications, and WASM message listeners.
pub mod web_rpc;
