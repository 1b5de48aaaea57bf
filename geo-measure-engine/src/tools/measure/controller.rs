//! Measurement capture state machine.
//!
//! One controller lives on each map surface. It turns the raw sequence of
//! pick, pointer-move and finish signals into at most one [`Measurement`] per
//! activation, using the surface's [`PickResolver`] to locate points and a
//! [`ShapeRenderer`] to draw the shape while it is being picked.
//!
//! ```text
//! Idle ──arm──> Armed ──pick(hit)──> Drawing ──finish──> Idle (+ Measurement)
//!   ^             │                    │  ^
//!   └──deactivate─┴────────────────────┘  └── pick / move (hit) ──┘
//! ```
//!
//! Picks or moves that miss the surface never change state. A finish signal
//! with fewer confirmed vertices than the tool needs is ignored and the shape
//! keeps drawing.

use bevy::log::{debug, error, info, warn};
use bevy::math::Vec2;
use bevy::prelude::Component;

use super::error::MeasureError;
use super::record::{Measurement, MeasurementKind, ScaledValue};
use super::shape::ActiveShape;
use super::surface::{MeasureSurface, ShapeHandle, ShapeRenderer};
use crate::geo::GeoPoint;
use crate::tools::tool_manager::ToolState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CapturePhase {
    #[default]
    Idle,
    Armed,
    Drawing,
}

/// Input signals the controller reacts to. Screen positions are window
/// pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CaptureInput {
    Pick(Vec2),
    Move(Vec2),
    Finish,
}

/// Result of feeding one input to the controller.
#[derive(Debug, Clone, PartialEq)]
pub enum CaptureOutcome {
    /// Nothing changed: no tool, a miss, or a premature finish.
    Ignored,
    /// The first vertex was confirmed.
    Started(GeoPoint),
    /// A vertex was confirmed or the floating vertex moved.
    Updated,
    /// The shape completed. The receiver owns the record.
    Finished(Measurement),
}

#[derive(Component, Debug, Default)]
pub struct MeasureController {
    tool: ToolState,
    phase: CapturePhase,
    shape: Option<ActiveShape>,
    live_shape: Option<ShapeHandle>,
}

impl MeasureController {
    pub fn tool(&self) -> ToolState {
        self.tool
    }

    pub fn phase(&self) -> CapturePhase {
        self.phase
    }

    pub fn shape(&self) -> Option<&ActiveShape> {
        self.shape.as_ref()
    }

    /// Switch tools. Any shape in progress is discarded and its live
    /// rendering released before the new tool is armed, including when the
    /// same tool is selected again.
    pub fn set_tool<S, R>(
        &mut self,
        tool: ToolState,
        surface: &S,
        renderer: &mut R,
    ) -> Result<(), MeasureError>
    where
        S: MeasureSurface + ?Sized,
        R: ShapeRenderer + ?Sized,
    {
        self.deactivate(renderer)?;

        let Some(kind) = tool.kind() else {
            return Ok(());
        };

        if !surface.supports(kind) {
            return Err(MeasureError::UnsupportedTool {
                tool,
                surface: surface.name(),
            });
        }

        self.tool = tool;
        self.phase = CapturePhase::Armed;
        debug!("{} tool armed on {} surface", tool, surface.name());
        Ok(())
    }

    /// Drop the shape in progress and stop listening. Never emits.
    pub fn deactivate<R>(&mut self, renderer: &mut R) -> Result<(), MeasureError>
    where
        R: ShapeRenderer + ?Sized,
    {
        self.tool = ToolState::None;
        self.release(renderer)
    }

    /// Feed one input signal through the state machine.
    pub fn handle_input<S, R>(
        &mut self,
        input: CaptureInput,
        surface: &mut S,
        renderer: &mut R,
    ) -> Result<CaptureOutcome, MeasureError>
    where
        S: MeasureSurface + ?Sized,
        R: ShapeRenderer + ?Sized,
    {
        match (self.phase, input) {
            (CapturePhase::Armed, CaptureInput::Pick(screen)) => {
                self.begin_shape(screen, surface, renderer)
            }
            (CapturePhase::Drawing, CaptureInput::Pick(screen)) => {
                self.confirm_vertex(screen, surface, renderer)
            }
            (CapturePhase::Drawing, CaptureInput::Move(screen)) => {
                self.track_pointer(screen, surface, renderer)
            }
            (CapturePhase::Drawing, CaptureInput::Finish) => self.finish(surface, renderer),
            _ => Ok(CaptureOutcome::Ignored),
        }
    }

    /// Live value of the shape including the floating vertex, for on-screen
    /// feedback while drawing.
    pub fn preview<S>(&self, surface: &S) -> Option<ScaledValue>
    where
        S: MeasureSurface + ?Sized,
    {
        let shape = self.shape.as_ref()?;
        let metric = surface.metric(shape.kind(), shape.points()).ok()?;
        Some(ScaledValue::from_metric(shape.kind(), metric))
    }

    fn begin_shape<S, R>(
        &mut self,
        screen: Vec2,
        surface: &mut S,
        renderer: &mut R,
    ) -> Result<CaptureOutcome, MeasureError>
    where
        S: MeasureSurface + ?Sized,
        R: ShapeRenderer + ?Sized,
    {
        let Some(kind) = self.tool.kind() else {
            return Ok(CaptureOutcome::Ignored);
        };
        let Some(point) = surface.resolve_ground_point(screen)? else {
            debug!("pick at {screen} missed the {} surface", surface.name());
            return Ok(CaptureOutcome::Ignored);
        };

        let shape = ActiveShape::start(kind, point);
        let handle = renderer.render_live_shape(kind, shape.points())?;

        self.shape = Some(shape);
        self.live_shape = Some(handle);
        self.phase = CapturePhase::Drawing;
        info!(
            "{} measurement started at ({:.6}, {:.6})",
            kind, point.lon, point.lat
        );
        Ok(CaptureOutcome::Started(point))
    }

    fn confirm_vertex<S, R>(
        &mut self,
        screen: Vec2,
        surface: &mut S,
        renderer: &mut R,
    ) -> Result<CaptureOutcome, MeasureError>
    where
        S: MeasureSurface + ?Sized,
        R: ShapeRenderer + ?Sized,
    {
        let Some(point) = surface.resolve_ground_point(screen)? else {
            debug!("pick at {screen} missed the {} surface", surface.name());
            return Ok(CaptureOutcome::Ignored);
        };
        let Some(shape) = self.shape.as_mut() else {
            return Ok(CaptureOutcome::Ignored);
        };

        shape.confirm(point);
        self.refresh(renderer)?;
        Ok(CaptureOutcome::Updated)
    }

    fn track_pointer<S, R>(
        &mut self,
        screen: Vec2,
        surface: &mut S,
        renderer: &mut R,
    ) -> Result<CaptureOutcome, MeasureError>
    where
        S: MeasureSurface + ?Sized,
        R: ShapeRenderer + ?Sized,
    {
        let Some(point) = surface.resolve_ground_point(screen)? else {
            return Ok(CaptureOutcome::Ignored);
        };
        let Some(shape) = self.shape.as_mut() else {
            return Ok(CaptureOutcome::Ignored);
        };

        shape.track(point);
        self.refresh(renderer)?;
        Ok(CaptureOutcome::Updated)
    }

    fn finish<S, R>(
        &mut self,
        surface: &mut S,
        renderer: &mut R,
    ) -> Result<CaptureOutcome, MeasureError>
    where
        S: MeasureSurface + ?Sized,
        R: ShapeRenderer + ?Sized,
    {
        let Some(shape) = self.shape.as_ref() else {
            return Ok(CaptureOutcome::Ignored);
        };

        let kind = shape.kind();
        if shape.confirmed_len() < kind.min_vertices() {
            warn!(
                "cannot finish {} measurement: need at least {} points, have {}",
                kind,
                kind.min_vertices(),
                shape.confirmed_len()
            );
            return Ok(CaptureOutcome::Ignored);
        }

        let vertex_count = shape.confirmed_len();
        let metric = surface.metric(kind, shape.confirmed())?;
        let measurement = Measurement::new(kind, metric, shape.confirmed());

        // The measurement stands even if the live shape cannot be removed.
        if let Err(err) = self.release(renderer) {
            error!("Failed to dispose live {} shape: {}", kind, err);
        }
        info!(
            "{} measurement finished: {} ({} points)",
            kind,
            measurement.label(),
            vertex_count
        );
        Ok(CaptureOutcome::Finished(measurement))
    }

    fn refresh<R>(&mut self, renderer: &mut R) -> Result<(), MeasureError>
    where
        R: ShapeRenderer + ?Sized,
    {
        if let (Some(handle), Some(shape)) = (self.live_shape, self.shape.as_ref()) {
            renderer.refresh(handle, shape.points())?;
        }
        Ok(())
    }

    /// Back to Idle. State is cleared before the renderer is asked to
    /// dispose, so a renderer failure cannot leave a stale shape behind.
    fn release<R>(&mut self, renderer: &mut R) -> Result<(), MeasureError>
    where
        R: ShapeRenderer + ?Sized,
    {
        self.phase = CapturePhase::Idle;
        self.shape = None;
        if let Some(handle) = self.live_shape.take() {
            renderer.dispose(handle)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::{HashMap, VecDeque};

    use super::*;
    use crate::geo::geodesic::{chord_length, geodesic_area, geodesic_length};
    use crate::tools::measure::error::SurfaceError;
    use crate::tools::measure::record::{Geometry, MeasurementUnit};
    use crate::tools::measure::surface::PickResolver;

    /// Surface that answers picks from a script, one entry per resolve call.
    struct ScriptedSurface {
        picks: VecDeque<Option<GeoPoint>>,
        resolve_calls: usize,
        supports_area: bool,
        chord: bool,
    }

    impl ScriptedSurface {
        fn planar(picks: impl IntoIterator<Item = Option<GeoPoint>>) -> Self {
            Self {
                picks: picks.into_iter().collect(),
                resolve_calls: 0,
                supports_area: true,
                chord: false,
            }
        }

        fn globe(picks: impl IntoIterator<Item = Option<GeoPoint>>) -> Self {
            Self {
                supports_area: false,
                chord: true,
                ..Self::planar(picks)
            }
        }
    }

    impl PickResolver for ScriptedSurface {
        fn resolve_ground_point(
            &mut self,
            _screen: Vec2,
        ) -> Result<Option<GeoPoint>, SurfaceError> {
            self.resolve_calls += 1;
            Ok(self.picks.pop_front().flatten())
        }
    }

    impl MeasureSurface for ScriptedSurface {
        fn name(&self) -> &'static str {
            if self.chord { "globe" } else { "planar" }
        }

        fn supports(&self, kind: MeasurementKind) -> bool {
            kind == MeasurementKind::Distance || self.supports_area
        }

        fn metric(
            &self,
            kind: MeasurementKind,
            vertices: &[GeoPoint],
        ) -> Result<f64, SurfaceError> {
            Ok(match kind {
                MeasurementKind::Distance if self.chord => chord_length(vertices),
                MeasurementKind::Distance => geodesic_length(vertices),
                MeasurementKind::Area => geodesic_area(vertices),
            })
        }
    }

    #[derive(Default)]
    struct RecordingRenderer {
        next: u32,
        live: HashMap<ShapeHandle, Vec<GeoPoint>>,
        calls: usize,
        fail_refresh: bool,
        fail_dispose: bool,
    }

    impl ShapeRenderer for RecordingRenderer {
        fn render_live_shape(
            &mut self,
            _kind: MeasurementKind,
            points: &[GeoPoint],
        ) -> Result<ShapeHandle, SurfaceError> {
            self.calls += 1;
            let handle = ShapeHandle(self.next);
            self.next += 1;
            self.live.insert(handle, points.to_vec());
            Ok(handle)
        }

        fn refresh(&mut self, handle: ShapeHandle, points: &[GeoPoint]) -> Result<(), SurfaceError> {
            self.calls += 1;
            if self.fail_refresh {
                return Err(SurfaceError::Render("device lost".into()));
            }
            let live = self
                .live
                .get_mut(&handle)
                .ok_or(SurfaceError::UnknownShape(handle))?;
            *live = points.to_vec();
            Ok(())
        }

        fn dispose(&mut self, handle: ShapeHandle) -> Result<(), SurfaceError> {
            self.calls += 1;
            if self.fail_dispose {
                return Err(SurfaceError::Render("device lost".into()));
            }
            self.live
                .remove(&handle)
                .map(|_| ())
                .ok_or(SurfaceError::UnknownShape(handle))
        }
    }

    fn hit(lon: f64, lat: f64) -> Option<GeoPoint> {
        Some(GeoPoint::with_height(lon, lat, 0.0))
    }

    fn armed(
        tool: ToolState,
        surface: &ScriptedSurface,
        renderer: &mut RecordingRenderer,
    ) -> MeasureController {
        let mut controller = MeasureController::default();
        controller.set_tool(tool, surface, renderer).unwrap();
        controller
    }

    fn feed(
        controller: &mut MeasureController,
        inputs: &[CaptureInput],
        surface: &mut ScriptedSurface,
        renderer: &mut RecordingRenderer,
    ) -> Vec<CaptureOutcome> {
        inputs
            .iter()
            .map(|input| controller.handle_input(*input, surface, renderer).unwrap())
            .collect()
    }

    fn finished(outcomes: &[CaptureOutcome]) -> Vec<&Measurement> {
        outcomes
            .iter()
            .filter_map(|outcome| match outcome {
                CaptureOutcome::Finished(m) => Some(m),
                _ => None,
            })
            .collect()
    }

    const PICK: CaptureInput = CaptureInput::Pick(Vec2::ZERO);
    const MOVE: CaptureInput = CaptureInput::Move(Vec2::ZERO);

    #[test]
    fn distance_geometry_has_one_pair_per_pick_in_order() {
        let mut surface = ScriptedSurface::planar([
            hit(0.0, 0.0),
            hit(0.5, 0.5),
            hit(1.0, 0.0),
            hit(1.5, 1.5),
            hit(2.0, 0.0),
            hit(9.0, 9.0),
        ]);
        let mut renderer = RecordingRenderer::default();
        let mut controller = armed(ToolState::Distance, &surface, &mut renderer);

        let outcomes = feed(
            &mut controller,
            &[PICK, MOVE, PICK, MOVE, PICK, MOVE, CaptureInput::Finish],
            &mut surface,
            &mut renderer,
        );

        let measurements = finished(&outcomes);
        assert_eq!(measurements.len(), 1);
        assert_eq!(
            measurements[0].geometry,
            Geometry::LineString(vec![[0.0, 0.0], [1.0, 0.0], [2.0, 0.0]])
        );
        assert_eq!(controller.phase(), CapturePhase::Idle);
        assert!(renderer.live.is_empty());
    }

    #[test]
    fn consecutive_picks_without_moves_keep_every_vertex() {
        let mut surface = ScriptedSurface::planar([hit(0.0, 0.0), hit(0.0, 1.0), hit(0.0, 2.0)]);
        let mut renderer = RecordingRenderer::default();
        let mut controller = armed(ToolState::Distance, &surface, &mut renderer);

        let outcomes = feed(
            &mut controller,
            &[PICK, PICK, PICK, CaptureInput::Finish],
            &mut surface,
            &mut renderer,
        );

        assert_eq!(
            finished(&outcomes)[0].geometry,
            Geometry::LineString(vec![[0.0, 0.0], [0.0, 1.0], [0.0, 2.0]])
        );
    }

    #[test]
    fn rearming_twice_without_picks_emits_nothing() {
        let surface = ScriptedSurface::planar([]);
        let mut renderer = RecordingRenderer::default();
        let mut controller = MeasureController::default();

        for _ in 0..2 {
            controller
                .set_tool(ToolState::Distance, &surface, &mut renderer)
                .unwrap();
            assert_eq!(controller.phase(), CapturePhase::Armed);
            controller
                .set_tool(ToolState::None, &surface, &mut renderer)
                .unwrap();
            assert_eq!(controller.phase(), CapturePhase::Idle);
        }
        controller
            .set_tool(ToolState::Distance, &surface, &mut renderer)
            .unwrap();

        assert!(controller.shape().is_none());
        assert_eq!(renderer.calls, 0);
    }

    #[test]
    fn reselecting_the_same_tool_discards_the_shape_in_progress() {
        let mut surface = ScriptedSurface::planar([hit(0.0, 0.0), hit(1.0, 1.0)]);
        let mut renderer = RecordingRenderer::default();
        let mut controller = armed(ToolState::Distance, &surface, &mut renderer);

        feed(&mut controller, &[PICK, PICK], &mut surface, &mut renderer);
        controller
            .set_tool(ToolState::Distance, &surface, &mut renderer)
            .unwrap();

        assert_eq!(controller.phase(), CapturePhase::Armed);
        assert!(controller.shape().is_none());
        assert!(renderer.live.is_empty());
    }

    #[test]
    fn deactivating_mid_drawing_emits_nothing() {
        let mut surface =
            ScriptedSurface::planar([hit(0.0, 0.0), hit(1.0, 0.0), hit(2.0, 0.0)]);
        let mut renderer = RecordingRenderer::default();
        let mut controller = armed(ToolState::Distance, &surface, &mut renderer);

        let outcomes = feed(&mut controller, &[PICK, PICK, MOVE], &mut surface, &mut renderer);
        controller.deactivate(&mut renderer).unwrap();
        let after = feed(&mut controller, &[CaptureInput::Finish], &mut surface, &mut renderer);

        assert!(finished(&outcomes).is_empty());
        assert_eq!(after, vec![CaptureOutcome::Ignored]);
        assert_eq!(controller.phase(), CapturePhase::Idle);
        assert_eq!(controller.tool(), ToolState::None);
        assert!(renderer.live.is_empty());
    }

    #[test]
    fn pointer_move_while_armed_is_a_no_op() {
        let mut surface = ScriptedSurface::planar([hit(3.0, 3.0)]);
        let mut renderer = RecordingRenderer::default();
        let mut controller = armed(ToolState::Distance, &surface, &mut renderer);

        let outcomes = feed(&mut controller, &[MOVE, MOVE], &mut surface, &mut renderer);

        assert_eq!(outcomes, vec![CaptureOutcome::Ignored; 2]);
        assert_eq!(surface.resolve_calls, 0);
        assert_eq!(renderer.calls, 0);
        assert!(controller.shape().is_none());
    }

    #[test]
    fn missed_picks_and_moves_leave_state_unchanged() {
        let mut surface = ScriptedSurface::planar([None, hit(0.0, 0.0), hit(0.2, 0.2), None, None]);
        let mut renderer = RecordingRenderer::default();
        let mut controller = armed(ToolState::Distance, &surface, &mut renderer);

        let first = feed(&mut controller, &[PICK], &mut surface, &mut renderer);
        assert_eq!(first, vec![CaptureOutcome::Ignored]);
        assert_eq!(controller.phase(), CapturePhase::Armed);

        feed(&mut controller, &[PICK, MOVE], &mut surface, &mut renderer);
        let before = controller.shape().cloned();
        let misses = feed(&mut controller, &[MOVE, PICK], &mut surface, &mut renderer);

        assert_eq!(misses, vec![CaptureOutcome::Ignored; 2]);
        assert_eq!(controller.shape().cloned(), before);
        assert_eq!(controller.phase(), CapturePhase::Drawing);
    }

    #[test]
    fn floating_vertex_tracks_the_pointer() {
        let mut surface = ScriptedSurface::planar([hit(0.0, 0.0), hit(0.3, 0.3), hit(0.4, 0.4)]);
        let mut renderer = RecordingRenderer::default();
        let mut controller = armed(ToolState::Distance, &surface, &mut renderer);

        feed(&mut controller, &[PICK, MOVE, MOVE], &mut surface, &mut renderer);

        let shape = controller.shape().unwrap();
        assert_eq!(shape.confirmed_len(), 1);
        assert_eq!(shape.floating(), hit(0.4, 0.4).as_ref());
        let live = renderer.live.values().next().unwrap();
        assert_eq!(live.as_slice(), shape.points());
    }

    #[test]
    fn premature_finish_keeps_drawing() {
        let mut surface = ScriptedSurface::planar([hit(0.0, 0.0), hit(0.5, 0.5), hit(1.0, 1.0)]);
        let mut renderer = RecordingRenderer::default();
        let mut controller = armed(ToolState::Distance, &surface, &mut renderer);

        let outcomes = feed(
            &mut controller,
            &[PICK, MOVE, CaptureInput::Finish],
            &mut surface,
            &mut renderer,
        );

        assert_eq!(outcomes[2], CaptureOutcome::Ignored);
        assert_eq!(controller.phase(), CapturePhase::Drawing);
        assert_eq!(controller.shape().unwrap().floating(), hit(0.5, 0.5).as_ref());

        let outcomes = feed(
            &mut controller,
            &[PICK, CaptureInput::Finish],
            &mut surface,
            &mut renderer,
        );
        assert_eq!(finished(&outcomes).len(), 1);
    }

    #[test]
    fn area_needs_three_vertices_and_closes_the_ring() {
        let mut surface = ScriptedSurface::planar([
            hit(0.0, 0.0),
            hit(0.01, 0.0),
            hit(0.01, 0.01),
            hit(0.0, 0.01),
        ]);
        let mut renderer = RecordingRenderer::default();
        let mut controller = armed(ToolState::Area, &surface, &mut renderer);

        let early = feed(
            &mut controller,
            &[PICK, PICK, CaptureInput::Finish],
            &mut surface,
            &mut renderer,
        );
        assert!(finished(&early).is_empty());

        let outcomes = feed(
            &mut controller,
            &[PICK, PICK, CaptureInput::Finish],
            &mut surface,
            &mut renderer,
        );
        let measurement = finished(&outcomes)[0];

        assert_eq!(measurement.kind, MeasurementKind::Area);
        assert_eq!(measurement.unit, MeasurementUnit::Hectares);
        assert!((measurement.value - 123.64).abs() < 0.05, "got {}", measurement.value);
        let Geometry::Polygon(rings) = &measurement.geometry else {
            panic!("expected polygon");
        };
        assert_eq!(rings[0].len(), 5);
        assert_eq!(rings[0][0], rings[0][4]);
    }

    #[test]
    fn globe_scenario_measures_about_1_11_km() {
        let mut surface = ScriptedSurface::globe([hit(0.0, 0.0), hit(0.0, 0.01)]);
        let mut renderer = RecordingRenderer::default();
        let mut controller = armed(ToolState::Distance, &surface, &mut renderer);

        let outcomes = feed(
            &mut controller,
            &[PICK, PICK, CaptureInput::Finish],
            &mut surface,
            &mut renderer,
        );
        let measurement = finished(&outcomes)[0];

        assert_eq!(measurement.kind, MeasurementKind::Distance);
        assert_eq!(measurement.unit, MeasurementUnit::Kilometers);
        assert!((measurement.value - 1.11).abs() < 0.01, "got {}", measurement.value);
        assert_eq!(
            measurement.geometry,
            Geometry::LineString(vec![[0.0, 0.0], [0.0, 0.01]])
        );
    }

    #[test]
    fn globe_rejects_area_and_stays_idle() {
        let surface = ScriptedSurface::globe([]);
        let mut renderer = RecordingRenderer::default();
        let mut controller = MeasureController::default();

        let err = controller
            .set_tool(ToolState::Area, &surface, &mut renderer)
            .unwrap_err();

        assert!(matches!(err, MeasureError::UnsupportedTool { .. }));
        assert_eq!(controller.phase(), CapturePhase::Idle);
        assert_eq!(controller.tool(), ToolState::None);
    }

    #[test]
    fn input_after_finish_is_ignored_until_rearmed() {
        let mut surface =
            ScriptedSurface::planar([hit(0.0, 0.0), hit(1.0, 0.0), hit(5.0, 5.0), hit(6.0, 6.0)]);
        let mut renderer = RecordingRenderer::default();
        let mut controller = armed(ToolState::Distance, &surface, &mut renderer);

        feed(
            &mut controller,
            &[PICK, PICK, CaptureInput::Finish],
            &mut surface,
            &mut renderer,
        );
        let after = feed(&mut controller, &[PICK, MOVE], &mut surface, &mut renderer);

        assert_eq!(after, vec![CaptureOutcome::Ignored; 2]);
        assert_eq!(surface.resolve_calls, 2);

        controller
            .set_tool(ToolState::Distance, &surface, &mut renderer)
            .unwrap();
        let restarted = feed(&mut controller, &[PICK], &mut surface, &mut renderer);
        assert!(matches!(restarted[0], CaptureOutcome::Started(_)));
    }

    #[test]
    fn renderer_failure_propagates_to_the_caller() {
        let mut surface = ScriptedSurface::planar([hit(0.0, 0.0), hit(1.0, 1.0)]);
        let mut renderer = RecordingRenderer::default();
        let mut controller = armed(ToolState::Distance, &surface, &mut renderer);

        feed(&mut controller, &[PICK], &mut surface, &mut renderer);
        renderer.fail_refresh = true;
        let err = controller
            .handle_input(MOVE, &mut surface, &mut renderer)
            .unwrap_err();

        assert!(matches!(err, MeasureError::Surface(SurfaceError::Render(_))));
    }

    #[test]
    fn dispose_failure_still_finishes_the_measurement() {
        let mut surface = ScriptedSurface::planar([hit(0.0, 0.0), hit(0.0, 0.005)]);
        let mut renderer = RecordingRenderer::default();
        let mut controller = armed(ToolState::Distance, &surface, &mut renderer);

        feed(&mut controller, &[PICK, PICK], &mut surface, &mut renderer);
        renderer.fail_dispose = true;
        let outcome = controller
            .handle_input(CaptureInput::Finish, &mut surface, &mut renderer)
            .unwrap();

        let CaptureOutcome::Finished(measurement) = outcome else {
            panic!("expected a finished measurement, got {:?}", outcome);
        };
        assert!((measurement.value - 555.97).abs() < 0.1, "got {}", measurement.value);
        assert_eq!(controller.phase(), CapturePhase::Idle);
        assert!(controller.shape().is_none());
    }

    #[test]
    fn preview_includes_the_floating_vertex() {
        let mut surface = ScriptedSurface::planar([hit(0.0, 0.0), hit(0.0, 0.005)]);
        let mut renderer = RecordingRenderer::default();
        let mut controller = armed(ToolState::Distance, &surface, &mut renderer);

        assert!(controller.preview(&surface).is_none());
        feed(&mut controller, &[PICK, MOVE], &mut surface, &mut renderer);

        let preview = controller.preview(&surface).unwrap();
        assert_eq!(preview.unit, MeasurementUnit::Meters);
        assert!((preview.value - 555.97).abs() < 0.1, "got {}", preview.value);
    }
}
