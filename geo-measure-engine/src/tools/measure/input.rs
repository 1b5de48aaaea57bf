use bevy::prelude::*;
use bevy::window::PrimaryWindow;

use super::controller::CaptureInput;
use crate::engine::core::config::{FinishGesture, MeasureConfig};
use crate::engine::surface::{SurfaceKind, ViewMode};

/// A capture signal addressed to one surface's controller.
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct CaptureInputEvent {
    pub surface: SurfaceKind,
    pub input: CaptureInput,
}

/// Pairs consecutive primary presses into double clicks.
#[derive(Debug, Default)]
pub struct ClickTracker {
    last_press: Option<(f64, Vec2)>,
}

impl ClickTracker {
    /// Register a press at `now` seconds. Returns `true` when it completes a
    /// double click; the pair is then consumed so a third press starts over.
    pub fn register_press(
        &mut self,
        now: f64,
        position: Vec2,
        window_secs: f64,
        radius_px: f32,
    ) -> bool {
        if let Some((at, previous)) = self.last_press.take() {
            if now - at <= window_secs && previous.distance(position) <= radius_px {
                return true;
            }
        }
        self.last_press = Some((now, position));
        false
    }

    pub fn reset(&mut self) {
        self.last_press = None;
    }
}

/// Translate window input into capture signals for the visible surface, in
/// the order the user produced them: pointer moves, then presses, then keys.
pub fn collect_measure_input(
    mut cursor_moved: EventReader<CursorMoved>,
    mouse: Res<ButtonInput<MouseButton>>,
    keyboard: Res<ButtonInput<KeyCode>>,
    windows: Query<&Window, With<PrimaryWindow>>,
    time: Res<Time>,
    config: Res<MeasureConfig>,
    view_mode: Res<ViewMode>,
    mut tracker: Local<ClickTracker>,
    mut last_surface: Local<Option<SurfaceKind>>,
    mut capture_events: EventWriter<CaptureInputEvent>,
) {
    let surface = view_mode.surface();
    if *last_surface != Some(surface) {
        tracker.reset();
        *last_surface = Some(surface);
    }
    let gesture = match surface {
        SurfaceKind::Planar => config.planar_finish,
        SurfaceKind::Globe => config.globe_finish,
    };
    let mut send = |input| {
        capture_events.write(CaptureInputEvent { surface, input });
    };

    for moved in cursor_moved.read() {
        send(CaptureInput::Move(moved.position));
    }

    let cursor = windows.single().ok().and_then(Window::cursor_position);

    if mouse.just_pressed(MouseButton::Left) {
        if let Some(position) = cursor {
            let double = gesture == FinishGesture::DoubleClick
                && tracker.register_press(
                    time.elapsed_secs_f64(),
                    position,
                    config.double_click_secs,
                    config.double_click_radius_px,
                );
            if double {
                send(CaptureInput::Finish);
            } else {
                send(CaptureInput::Pick(position));
            }
        }
    }

    if gesture == FinishGesture::SecondaryClick && mouse.just_pressed(MouseButton::Right) {
        send(CaptureInput::Finish);
    }

    if keyboard.any_just_pressed([KeyCode::Enter, KeyCode::NumpadEnter]) {
        send(CaptureInput::Finish);
    }
}
