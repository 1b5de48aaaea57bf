use bevy::input::mouse::{MouseMotion, MouseScrollUnit, MouseWheel};
use bevy::math::DVec2;
use bevy::prelude::*;
use constants::geodesy::{WEB_MERCATOR_HALF_EXTENT, WEB_MERCATOR_ZOOM0_RESOLUTION};
use constants::input::{GLOBE_ORBIT_SPEED_DEG, MAP_PAN_SPEED_PX, ZOOM_STEP_PER_LINE};
use constants::render_settings::MAP_WORLD_UNITS_PER_METER;

use crate::engine::surface::globe::geo_to_globe_world;
use crate::engine::surface::planar::mercator_to_map_world;
use crate::engine::surface::{SurfaceKind, ViewMode};
use crate::geo::{GeoPoint, mercator};

const MIN_MAP_ZOOM: f64 = 0.0;
const MAX_MAP_ZOOM: f64 = 20.0;
const MIN_GLOBE_ALTITUDE: f64 = 100.0;
const MAX_GLOBE_ALTITUDE: f64 = 30_000_000.0;
const GLOBE_MAX_LAT: f64 = 85.0;
/// Altitude at which the orbit speed equals `GLOBE_ORBIT_SPEED_DEG`.
const GLOBE_REFERENCE_ALTITUDE: f64 = 10_000_000.0;
const GLOBE_DRAG_DEG_PER_PX: f64 = 0.1;

/// Pan/zoom state of the 2-D map camera.
#[derive(Resource, Debug, Clone)]
pub struct MapCamera {
    /// View centre in Web Mercator metres.
    pub center: DVec2,
    /// Slippy-map zoom level, fractional.
    pub zoom: f64,
}

impl MapCamera {
    pub fn new(view: &GeoPoint, zoom: f64) -> Self {
        Self {
            center: mercator::project(view),
            zoom: zoom.clamp(MIN_MAP_ZOOM, MAX_MAP_ZOOM),
        }
    }

    /// Projected metres covered by one screen pixel.
    pub fn meters_per_pixel(&self) -> f64 {
        WEB_MERCATOR_ZOOM0_RESOLUTION / 2f64.powf(self.zoom)
    }

    /// World units covered by one screen pixel.
    pub fn units_per_pixel(&self) -> f32 {
        (self.meters_per_pixel() * MAP_WORLD_UNITS_PER_METER) as f32
    }

    /// Move the centre by a screen-space offset in pixels (x right, y down).
    pub fn pan_pixels(&mut self, delta: Vec2) {
        let meters = self.meters_per_pixel();
        self.center.x -= delta.x as f64 * meters;
        self.center.y += delta.y as f64 * meters;
        self.center = self.center.clamp(
            DVec2::splat(-WEB_MERCATOR_HALF_EXTENT),
            DVec2::splat(WEB_MERCATOR_HALF_EXTENT),
        );
    }

    pub fn zoom_by(&mut self, steps: f64) {
        self.zoom = (self.zoom + steps).clamp(MIN_MAP_ZOOM, MAX_MAP_ZOOM);
    }
}

/// Orbit state of the 3-D globe camera.
#[derive(Resource, Debug, Clone)]
pub struct GlobeOrbitCamera {
    pub lon: f64,
    pub lat: f64,
    /// Height of the eye above the ellipsoid in metres.
    pub altitude: f64,
    pub smooth_factor: f32,
}

impl GlobeOrbitCamera {
    pub fn new(view: &GeoPoint) -> Self {
        Self {
            lon: view.lon,
            lat: view.lat.clamp(-GLOBE_MAX_LAT, GLOBE_MAX_LAT),
            altitude: view
                .height_or_zero()
                .clamp(MIN_GLOBE_ALTITUDE, MAX_GLOBE_ALTITUDE),
            smooth_factor: 12.0,
        }
    }

    /// Orbit by a number of degrees at the reference altitude. Lower
    /// altitudes orbit proportionally slower.
    pub fn orbit(&mut self, d_lon: f64, d_lat: f64) {
        let rate = (self.altitude / GLOBE_REFERENCE_ALTITUDE).min(1.0);
        self.lon = wrap_longitude(self.lon + d_lon * rate);
        self.lat = (self.lat + d_lat * rate).clamp(-GLOBE_MAX_LAT, GLOBE_MAX_LAT);
    }

    pub fn zoom_by(&mut self, steps: f64) {
        self.altitude = (self.altitude * (1.0 - 0.4 * steps).max(0.1))
            .clamp(MIN_GLOBE_ALTITUDE, MAX_GLOBE_ALTITUDE);
    }

    /// Eye transform looking straight down at the orbit point.
    pub fn target_transform(&self) -> Transform {
        let eye = geo_to_globe_world(
            &GeoPoint::with_height(self.lon, self.lat, self.altitude),
            0.0,
        );
        Transform::from_translation(eye).looking_at(Vec3::ZERO, Vec3::Y)
    }
}

fn wrap_longitude(lon: f64) -> f64 {
    (lon + 180.0).rem_euclid(360.0) - 180.0
}

/// Keyboard and wheel-or-drag navigation shared by both cameras.
struct NavigationInput {
    keys: Vec2,
    drag: Vec2,
    scroll: f64,
}

fn read_navigation(
    keyboard: &ButtonInput<KeyCode>,
    mouse_button: &ButtonInput<MouseButton>,
    mouse_motion: &mut EventReader<MouseMotion>,
    scroll_events: &mut EventReader<MouseWheel>,
) -> NavigationInput {
    let mut keys = Vec2::ZERO;
    if keyboard.any_pressed([KeyCode::KeyW, KeyCode::ArrowUp]) {
        keys.y += 1.0;
    }
    if keyboard.any_pressed([KeyCode::KeyS, KeyCode::ArrowDown]) {
        keys.y -= 1.0;
    }
    if keyboard.any_pressed([KeyCode::KeyD, KeyCode::ArrowRight]) {
        keys.x += 1.0;
    }
    if keyboard.any_pressed([KeyCode::KeyA, KeyCode::ArrowLeft]) {
        keys.x -= 1.0;
    }

    let motion: Vec2 = mouse_motion.read().map(|m| m.delta).sum();
    let drag = if mouse_button.pressed(MouseButton::Middle) {
        motion
    } else {
        Vec2::ZERO
    };

    let scroll = scroll_events
        .read()
        .map(|ev| match ev.unit {
            MouseScrollUnit::Line => ev.y as f64,
            MouseScrollUnit::Pixel => ev.y as f64 * 0.05,
        })
        .sum();

    NavigationInput { keys, drag, scroll }
}

/// Pan and zoom the map camera while the 2-D view is shown.
pub fn map_camera_controller(
    mut cameras: Query<(&mut Transform, &SurfaceKind)>,
    mut map_camera: ResMut<MapCamera>,
    view_mode: Res<ViewMode>,
    keyboard: Res<ButtonInput<KeyCode>>,
    mouse_button: Res<ButtonInput<MouseButton>>,
    mut mouse_motion: EventReader<MouseMotion>,
    mut scroll_events: EventReader<MouseWheel>,
    time: Res<Time>,
) {
    if *view_mode != ViewMode::Planar {
        return;
    }

    let input = read_navigation(
        &keyboard,
        &mouse_button,
        &mut mouse_motion,
        &mut scroll_events,
    );

    if input.keys != Vec2::ZERO {
        // Keys move the view; the pixel offset is the opposite of a drag.
        let step = input.keys.normalize() * MAP_PAN_SPEED_PX * time.delta_secs();
        map_camera.pan_pixels(Vec2::new(-step.x, step.y));
    }
    if input.drag != Vec2::ZERO {
        map_camera.pan_pixels(input.drag);
    }
    if input.scroll.abs() > f64::EPSILON {
        map_camera.zoom_by(input.scroll * ZOOM_STEP_PER_LINE);
    }

    let units_per_pixel = map_camera.units_per_pixel();
    let center = mercator_to_map_world(map_camera.center);
    for (mut transform, kind) in &mut cameras {
        if *kind != SurfaceKind::Planar {
            continue;
        }
        transform.translation.x = center.x;
        transform.translation.y = center.y;
        transform.scale = Vec3::new(units_per_pixel, units_per_pixel, 1.0);
    }
}

/// Orbit and zoom the globe camera while the 3-D view is shown.
pub fn globe_camera_controller(
    mut cameras: Query<(&mut Transform, &SurfaceKind)>,
    mut orbit: ResMut<GlobeOrbitCamera>,
    view_mode: Res<ViewMode>,
    keyboard: Res<ButtonInput<KeyCode>>,
    mouse_button: Res<ButtonInput<MouseButton>>,
    mut mouse_motion: EventReader<MouseMotion>,
    mut scroll_events: EventReader<MouseWheel>,
    time: Res<Time>,
) {
    if *view_mode != ViewMode::Globe {
        return;
    }

    let input = read_navigation(
        &keyboard,
        &mouse_button,
        &mut mouse_motion,
        &mut scroll_events,
    );

    if input.keys != Vec2::ZERO {
        let step = input.keys.normalize().as_dvec2()
            * GLOBE_ORBIT_SPEED_DEG
            * time.delta_secs_f64();
        orbit.orbit(step.x, step.y);
    }
    if input.drag != Vec2::ZERO {
        orbit.orbit(
            -input.drag.x as f64 * GLOBE_DRAG_DEG_PER_PX,
            input.drag.y as f64 * GLOBE_DRAG_DEG_PER_PX,
        );
    }
    if input.scroll.abs() > f64::EPSILON {
        orbit.zoom_by(input.scroll * ZOOM_STEP_PER_LINE);
    }

    let target = orbit.target_transform();
    let lerp_speed = (orbit.smooth_factor * time.delta_secs()).min(1.0);
    for (mut transform, kind) in &mut cameras {
        if *kind != SurfaceKind::Globe {
            continue;
        }
        transform.translation = transform.translation.lerp(target.translation, lerp_speed);
        transform.rotation = transform.rotation.slerp(target.rotation, lerp_speed);
    }
}
