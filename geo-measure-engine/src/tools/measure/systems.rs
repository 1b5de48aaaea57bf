//! Bevy systems connecting the capture controllers to input, rendering and
//! the frontend.

use bevy::prelude::*;

use super::controller::{CaptureInput, CaptureOutcome, MeasureController};
use super::input::CaptureInputEvent;
use super::record::{Measurement, MeasurementPayload, ScaledValue};
use super::surface::{MeasureSurface, ShapeRenderer};
use crate::engine::core::config::MeasureConfig;
use crate::engine::scene::live_shapes::{LiveShapeRenderer, LiveShapes};
use crate::engine::surface::{SurfaceAdapter, SurfaceKind};
use crate::rpc::web_rpc::WebRpcInterface;
use crate::tools::tool_manager::{ClearToolEvent, ToolSelectionSource};

/// Fired once for every completed shape.
#[derive(Event, Debug, Clone)]
pub struct MeasurementEnded {
    pub surface: SurfaceKind,
    pub measurement: Measurement,
}

/// Finished measurements of this session, in completion order.
#[derive(Resource, Default, Debug)]
pub struct MeasurementLog {
    entries: Vec<MeasurementPayload>,
}

impl MeasurementLog {
    /// Name the measurement after its position in the log and store it.
    pub fn record(&mut self, measurement: Measurement) -> &MeasurementPayload {
        let name = format!("Measurement {}", self.entries.len() + 1);
        self.entries.push(measurement.to_payload(name));
        &self.entries[self.entries.len() - 1]
    }

    pub fn entries(&self) -> &[MeasurementPayload] {
        &self.entries
    }
}

/// Live value of the shape being drawn, for the on-screen readout.
#[derive(Resource, Default, Debug)]
pub struct MeasureStatus {
    pub live: Option<ScaledValue>,
}

/// Feed capture signals to the controller of the surface they address.
pub fn drive_measure_controllers(
    mut events: EventReader<CaptureInputEvent>,
    mut surfaces: Query<(
        &mut MeasureController,
        &SurfaceKind,
        &Camera,
        &GlobalTransform,
    )>,
    mut live_shapes: ResMut<LiveShapes>,
    mut status: ResMut<MeasureStatus>,
    mut ended: EventWriter<MeasurementEnded>,
    mut rpc_interface: ResMut<WebRpcInterface>,
) {
    for event in events.read() {
        let Some((mut controller, kind, camera, transform)) = surfaces
            .iter_mut()
            .find(|(_, kind, _, _)| **kind == event.surface)
        else {
            continue;
        };

        let mut surface = SurfaceAdapter::new(*kind, camera, transform);
        let mut renderer = LiveShapeRenderer::new(&mut live_shapes, *kind);

        if let Some(measurement) = apply_capture_input(
            &mut controller,
            event.input,
            &mut surface,
            &mut renderer,
            &mut status,
            &mut rpc_interface,
        ) {
            ended.write(MeasurementEnded {
                surface: *kind,
                measurement,
            });
        }
    }
}

/// Run one capture signal through a controller and tell the frontend what
/// happened. Returns the measurement the signal completed, if any.
pub fn apply_capture_input<S, R>(
    controller: &mut MeasureController,
    input: CaptureInput,
    surface: &mut S,
    renderer: &mut R,
    status: &mut MeasureStatus,
    rpc_interface: &mut WebRpcInterface,
) -> Option<Measurement>
where
    S: MeasureSurface + ?Sized,
    R: ShapeRenderer + ?Sized,
{
    match controller.handle_input(input, surface, renderer) {
        Ok(CaptureOutcome::Ignored) => None,
        Ok(CaptureOutcome::Started(point)) => {
            rpc_interface.send_notification(
                "measure_started",
                serde_json::json!({ "position": point.lon_lat_height() }),
            );
            status.live = controller.preview(&*surface);
            None
        }
        Ok(CaptureOutcome::Updated) => {
            status.live = controller.preview(&*surface);
            if let (Some(live), Some(shape)) = (status.live, controller.shape()) {
                rpc_interface.send_notification(
                    "measure_updated",
                    serde_json::json!({
                        "kind": shape.kind(),
                        "value": live.value,
                        "unit": live.unit,
                        "label": live.label()
                    }),
                );
            }
            None
        }
        Ok(CaptureOutcome::Finished(measurement)) => {
            status.live = None;
            Some(measurement)
        }
        Err(err) => {
            error!("Measurement on {} surface failed: {}", surface.name(), err);
            rpc_interface.send_notification(
                "measure_error",
                serde_json::json!({ "message": err.to_string() }),
            );
            None
        }
    }
}

/// Log finished measurements, hand them to the frontend and put the tool
/// away when configured to.
pub fn record_finished_measurements(
    mut ended: EventReader<MeasurementEnded>,
    mut log: ResMut<MeasurementLog>,
    config: Res<MeasureConfig>,
    mut clear_events: EventWriter<ClearToolEvent>,
    mut rpc_interface: ResMut<WebRpcInterface>,
) {
    for event in ended.read() {
        let payload = log.record(event.measurement.clone());
        info!(
            "{} recorded on {} surface: {}",
            payload.name,
            event.surface.as_str(),
            payload.measurement.label()
        );

        match serde_json::to_value(payload) {
            Ok(params) => rpc_interface.send_notification("measurement_end", params),
            Err(err) => error!("Failed to serialise {}: {}", payload.name, err),
        }

        if config.deactivate_after_finish {
            clear_events.write(ClearToolEvent {
                source: ToolSelectionSource::Finish,
            });
        }
    }
}
