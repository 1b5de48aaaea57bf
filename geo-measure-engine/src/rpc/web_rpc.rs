use crate::engine::surface::{ViewMode, ViewModeEvent};
use crate::tools::measure::systems::MeasurementLog;
use crate::tools::tool_manager::{
    ClearToolEvent, ToolSelectionEvent, ToolSelectionSource, ToolState,
};
use bevy::diagnostic::{DiagnosticsStore, FrameTimeDiagnosticsPlugin};
use bevy::prelude::*;
use serde::{Deserialize, Serialize};

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::JsValue;

#[cfg(target_arch = "wasm32")]
use web_sys::{MessageEvent, window};

/// JSON-RPC 2.0 request structure.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RpcRequest {
    pub jsonrpc: String,
    pub method: String,
    #[serde(default)]
    pub params: serde_json::Value,
    pub id: Option<serde_json::Value>,
}

/// JSON-RPC 2.0 response structure.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RpcResponse {
    pub jsonrpc: String,
    pub result: Option<serde_json::Value>,
    pub error: Option<RpcError>,
    pub id: Option<serde_json::Value>,
}

/// JSON-RPC 2.0 notification structure for one-way communication.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RpcNotification {
    pub jsonrpc: String,
    pub method: String,
    pub params: serde_json::Value,
}

/// JSON-RPC 2.0 error object.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RpcError {
    pub code: i32,
    pub message: String,
    pub data: Option<serde_json::Value>,
}

/// Resource managing bidirectional RPC communication between the frontend
/// and Bevy. Handles both request-response patterns and notification
/// broadcasting.
#[derive(Resource, Default)]
pub struct WebRpcInterface {
    outgoing_notifications: Vec<RpcNotification>,
    outgoing_responses: Vec<RpcResponse>,
}

impl WebRpcInterface {
    /// Send notification to the frontend without expecting response.
    pub fn send_notification(&mut self, method: &str, params: serde_json::Value) {
        self.outgoing_notifications.push(RpcNotification {
            jsonrpc: "2.0".to_string(),
            method: method.to_string(),
            params,
        });
    }

    /// Notifications queued since the last transmission.
    pub fn pending_notifications(&self) -> &[RpcNotification] {
        &self.outgoing_notifications
    }

    /// Queue response for transmission to the frontend.
    fn queue_response(&mut self, response: RpcResponse) {
        self.outgoing_responses.push(response);
    }
}

/// Plugin establishing WebRPC communication layer for iframe-based deployment.
pub struct WebRpcPlugin;

impl Plugin for WebRpcPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<WebRpcInterface>()
            .add_event::<IncomingRpcMessage>()
            .add_systems(
                Update,
                (
                    process_incoming_messages,
                    handle_rpc_messages,
                    send_outgoing_messages,
                )
                    .chain(),
            );

        #[cfg(target_arch = "wasm32")]
        app.add_systems(Startup, setup_message_listener);
    }
}

#[cfg(target_arch = "wasm32")]
fn setup_message_listener(mut commands: Commands) {
    use std::sync::Arc;
    use std::sync::Mutex;

    // Thread-safe message queue for cross-thread communication.
    let message_queue: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
    let queue_clone = message_queue.clone();

    let closure = Closure::wrap(Box::new(move |event: MessageEvent| {
        // Filter messages to ensure they contain string data.
        if let Ok(data) = event.data().dyn_into::<js_sys::JsString>() {
            let message_str: String = data.into();

            if message_str.contains("jsonrpc") {
                if let Ok(mut queue) = queue_clone.lock() {
                    queue.push(message_str);
                }
            }
        }
    }) as Box<dyn FnMut(MessageEvent)>);

    if let Some(window) = window() {
        if let Err(e) =
            window.add_event_listener_with_callback("message", closure.as_ref().unchecked_ref())
        {
            error!("Failed to register message listener: {:?}", e);
            return;
        }
    }

    // Prevent closure from being dropped by transferring ownership to JS.
    closure.forget();
    commands.insert_resource(MessageQueue(message_queue));
}

/// Resource wrapping thread-safe message queue for WASM event handling.
#[derive(Resource)]
struct MessageQueue(std::sync::Arc<std::sync::Mutex<Vec<String>>>);

/// Event representing incoming RPC message from the frontend.
#[derive(Event)]
pub struct IncomingRpcMessage {
    pub content: String,
}

fn process_incoming_messages(
    message_queue: Option<Res<MessageQueue>>,
    mut message_events: EventWriter<IncomingRpcMessage>,
) {
    let Some(queue_res) = message_queue else {
        return;
    };

    let messages = if let Ok(mut queue) = queue_res.0.lock() {
        std::mem::take(&mut *queue)
    } else {
        Vec::new()
    };

    for message_str in messages {
        message_events.write(IncomingRpcMessage {
            content: message_str,
        });
    }
}

/// Engine action requested by an RPC method.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RpcCommand {
    SelectTool(ToolState),
    ClearTool,
    SetViewMode(ViewMode),
}

/// Read-only engine state RPC methods may report.
pub struct RpcContext<'a> {
    pub fps: f32,
    pub measurements: &'a MeasurementLog,
}

fn handle_rpc_messages(
    mut events: EventReader<IncomingRpcMessage>,
    diagnostics: Res<DiagnosticsStore>,
    measurements: Option<Res<MeasurementLog>>,
    mut rpc_interface: ResMut<WebRpcInterface>,
    mut tool_events: EventWriter<ToolSelectionEvent>,
    mut clear_events: EventWriter<ClearToolEvent>,
    mut view_events: EventWriter<ViewModeEvent>,
) {
    let empty_log = MeasurementLog::default();
    let context = RpcContext {
        fps: current_fps(&diagnostics),
        measurements: measurements.as_deref().unwrap_or(&empty_log),
    };

    for event in events.read() {
        let request = match serde_json::from_str::<RpcRequest>(&event.content) {
            Ok(request) => request,
            Err(parse_error) => {
                warn!("RPC parse error: {}", parse_error);
                rpc_interface.queue_response(create_error_response(
                    serde_json::Value::Null,
                    -32700,
                    "Parse error",
                    Some(serde_json::json!({ "details": parse_error.to_string() })),
                ));
                continue;
            }
        };

        debug!("Processing RPC method: {}", request.method);
        let mut commands = Vec::new();
        if let Some(response) = handle_rpc_request(&request, &context, &mut commands) {
            rpc_interface.queue_response(response);
        }

        for command in commands {
            match command {
                RpcCommand::SelectTool(tool) => {
                    tool_events.write(ToolSelectionEvent {
                        tool,
                        source: ToolSelectionSource::Rpc,
                    });
                }
                RpcCommand::ClearTool => {
                    clear_events.write(ClearToolEvent {
                        source: ToolSelectionSource::Rpc,
                    });
                }
                RpcCommand::SetViewMode(mode) => {
                    view_events.write(ViewModeEvent { mode: Some(mode) });
                }
            }
        }
    }
}

/// Handle individual RPC request. Commands are collected for both requests
/// and notifications; only requests with an ID get a response.
pub fn handle_rpc_request(
    request: &RpcRequest,
    context: &RpcContext,
    commands: &mut Vec<RpcCommand>,
) -> Option<RpcResponse> {
    if request.jsonrpc != "2.0" {
        return request.id.clone().map(|id| {
            create_error_response(id, -32600, "Invalid request", None)
        });
    }

    let result = match request.method.as_str() {
        "tool_selection" => handle_tool_selection(&request.params, commands),
        "clear_tool" => {
            commands.push(RpcCommand::ClearTool);
            Ok(serde_json::json!({ "success": true }))
        }
        "set_view_mode" => handle_set_view_mode(&request.params, commands),
        "get_measurements" => handle_get_measurements(context.measurements),
        "get_fps" => Ok(serde_json::json!({ "fps": context.fps })),
        _ => {
            warn!("Unknown RPC method: {}", request.method);
            return request.id.clone().map(|id| {
                create_error_response(
                    id,
                    -32601,
                    "Method not found",
                    Some(serde_json::json!({"method": request.method})),
                )
            });
        }
    };

    // Notifications have no ID and never get a response.
    let id = request.id.clone()?;

    match result {
        Ok(result_value) => Some(RpcResponse {
            jsonrpc: "2.0".to_string(),
            result: Some(result_value),
            error: None,
            id: Some(id),
        }),
        Err(error) => Some(RpcResponse {
            jsonrpc: "2.0".to_string(),
            result: None,
            error: Some(error),
            id: Some(id),
        }),
    }
}

/// Dispatch a tool selection. Success means the selection was queued;
/// surfaces that cannot host the tool report back with `measure_error`.
fn handle_tool_selection(
    params: &serde_json::Value,
    commands: &mut Vec<RpcCommand>,
) -> Result<serde_json::Value, RpcError> {
    #[derive(serde::Deserialize)]
    struct ToolSelectionParams {
        tool: String,
    }

    let tool_params = serde_json::from_value::<ToolSelectionParams>(params.clone())
        .map_err(|_| RpcError::invalid_params("Expected 'tool' parameter"))?;

    let tool = ToolState::from_string(&tool_params.tool)
        .ok_or_else(|| RpcError::invalid_params(&format!("Unknown tool: {}", tool_params.tool)))?;

    commands.push(RpcCommand::SelectTool(tool));
    info!("Tool selection dispatched: {}", tool);

    Ok(serde_json::json!({
        "success": true,
        "active_tool": tool.as_str()
    }))
}

fn handle_set_view_mode(
    params: &serde_json::Value,
    commands: &mut Vec<RpcCommand>,
) -> Result<serde_json::Value, RpcError> {
    #[derive(serde::Deserialize)]
    struct ViewModeParams {
        mode: String,
    }

    let view_params = serde_json::from_value::<ViewModeParams>(params.clone())
        .map_err(|_| RpcError::invalid_params("Expected 'mode' parameter"))?;

    let mode = ViewMode::from_string(&view_params.mode).ok_or_else(|| {
        RpcError::invalid_params(&format!("Unknown view mode: {}", view_params.mode))
    })?;

    commands.push(RpcCommand::SetViewMode(mode));

    Ok(serde_json::json!({
        "success": true,
        "view_mode": mode.as_str()
    }))
}

fn handle_get_measurements(log: &MeasurementLog) -> Result<serde_json::Value, RpcError> {
    serde_json::to_value(log.entries())
        .map_err(|e| RpcError::internal_error(&format!("Failed to serialise measurements: {e}")))
}

fn current_fps(diagnostics: &DiagnosticsStore) -> f32 {
    diagnostics
        .get(&FrameTimeDiagnosticsPlugin::FPS)
        .and_then(|fps_diagnostic| fps_diagnostic.smoothed())
        .unwrap_or(0.0) as f32
}

/// Create standardized error response with optional data payload.
fn create_error_response(
    id: serde_json::Value,
    code: i32,
    message: &str,
    data: Option<serde_json::Value>,
) -> RpcResponse {
    RpcResponse {
        jsonrpc: "2.0".to_string(),
        result: None,
        error: Some(RpcError {
            code,
            message: message.to_string(),
            data,
        }),
        id: Some(id),
    }
}

/// Send queued notifications and responses to the frontend.
fn send_outgoing_messages(mut rpc_interface: ResMut<WebRpcInterface>) {
    // Send notifications first.
    for notification in rpc_interface.outgoing_notifications.drain(..) {
        send_message_to_parent(&notification);
    }

    // Send responses second to maintain order.
    for response in rpc_interface.outgoing_responses.drain(..) {
        send_message_to_parent(&response);
    }
}

/// Send serialized message to parent window (frontend).
fn send_message_to_parent<T: Serialize>(message: &T) {
    #[cfg(target_arch = "wasm32")]
    {
        match serde_json::to_string(message) {
            Ok(json) => {
                if let Some(window) = window() {
                    if let Some(parent) = window.parent().ok().flatten() {
                        if let Err(e) = parent.post_message(&JsValue::from_str(&json), "*") {
                            error!("Failed to send message to parent: {:?}", e);
                        }
                    } else {
                        warn!("No parent window available for message transmission");
                    }
                } else {
                    error!("Window object not available");
                }
            }
            Err(e) => {
                error!("Failed to serialize message: {}", e);
            }
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        // No-op for non-WASM targets.
        let _ = message;
    }
}

/// Standard RPC error codes and constructors.
impl RpcError {
    pub fn invalid_params(message: &str) -> Self {
        Self {
            code: -32602,
            message: message.to_string(),
            data: None,
        }
    }

    pub fn internal_error(message: &str) -> Self {
        Self {
            code: -32603,
            message: message.to_string(),
            data: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::GeoPoint;
    use crate::tools::measure::record::{Measurement, MeasurementKind};

    fn request(method: &str, params: serde_json::Value, id: Option<i64>) -> RpcRequest {
        RpcRequest {
            jsonrpc: "2.0".to_string(),
            method: method.to_string(),
            params,
            id: id.map(serde_json::Value::from),
        }
    }

    fn call(req: &RpcRequest, log: &MeasurementLog) -> (Option<RpcResponse>, Vec<RpcCommand>) {
        let context = RpcContext {
            fps: 59.5,
            measurements: log,
        };
        let mut commands = Vec::new();
        let response = handle_rpc_request(req, &context, &mut commands);
        (response, commands)
    }

    #[test]
    fn tool_selection_queues_the_tool() {
        let log = MeasurementLog::default();
        let (response, commands) = call(
            &request("tool_selection", serde_json::json!({ "tool": "area" }), Some(1)),
            &log,
        );

        let response = response.unwrap();
        assert_eq!(
            response.result,
            Some(serde_json::json!({ "success": true, "active_tool": "area" }))
        );
        assert_eq!(commands, vec![RpcCommand::SelectTool(ToolState::Area)]);
    }

    #[test]
    fn unknown_tool_is_invalid_params() {
        let log = MeasurementLog::default();
        let (response, commands) = call(
            &request("tool_selection", serde_json::json!({ "tool": "polygon" }), Some(2)),
            &log,
        );

        assert_eq!(response.unwrap().error.unwrap().code, -32602);
        assert!(commands.is_empty());
    }

    #[test]
    fn notifications_act_without_responding() {
        let log = MeasurementLog::default();
        let (response, commands) = call(
            &request("set_view_mode", serde_json::json!({ "mode": "3d" }), None),
            &log,
        );

        assert!(response.is_none());
        assert_eq!(commands, vec![RpcCommand::SetViewMode(ViewMode::Globe)]);
    }

    #[test]
    fn unknown_method_is_method_not_found() {
        let log = MeasurementLog::default();
        let (response, _) = call(&request("hide_points", serde_json::Value::Null, Some(3)), &log);
        assert_eq!(response.unwrap().error.unwrap().code, -32601);
    }

    #[test]
    fn wrong_protocol_version_is_invalid_request() {
        let log = MeasurementLog::default();
        let mut req = request("clear_tool", serde_json::Value::Null, Some(4));
        req.jsonrpc = "1.0".to_string();
        let (response, commands) = call(&req, &log);

        assert_eq!(response.unwrap().error.unwrap().code, -32600);
        assert!(commands.is_empty());
    }

    #[test]
    fn get_measurements_lists_the_log() {
        let mut log = MeasurementLog::default();
        log.record(Measurement::new(
            MeasurementKind::Distance,
            250.0,
            &[GeoPoint::new(0.0, 0.0), GeoPoint::new(0.0, 0.001)],
        ));

        let (response, _) = call(&request("get_measurements", serde_json::Value::Null, Some(5)), &log);
        let result = response.unwrap().result.unwrap();

        assert_eq!(result.as_array().map(Vec::len), Some(1));
        assert_eq!(result[0]["name"], "Measurement 1");
        assert_eq!(result[0]["measurement_type"], "distance");
    }

    #[test]
    fn request_without_params_parses() {
        let req: RpcRequest =
            serde_json::from_str(r#"{"jsonrpc":"2.0","method":"get_fps","id":7}"#).unwrap();
        let log = MeasurementLog::default();
        let (response, _) = call(&req, &log);
        assert_eq!(
            response.unwrap().result,
            Some(serde_json::json!({ "fps": 59.5 }))
        );
    }
}
