//! Spawns both map surfaces once the configuration is known.

use bevy::prelude::*;
use bevy::render::camera::ClearColorConfig;
use constants::geodesy::{WGS84_SEMI_MAJOR_AXIS, WGS84_SEMI_MINOR_AXIS};
use constants::render_settings::{GLOBE_COLOUR, GLOBE_WORLD_UNITS_PER_METER, MAP_BACKGROUND_COLOUR};

use super::grid::create_graticules;
use crate::engine::camera::viewport_camera::{GlobeOrbitCamera, MapCamera};
use crate::engine::core::config::MeasureConfig;
use crate::engine::surface::planar::mercator_to_map_world;
use crate::engine::surface::{SurfaceKind, ViewMode};
use crate::tools::measure::controller::MeasureController;

/// Closest the globe camera may clip, in world units (10 m).
const GLOBE_NEAR_PLANE: f32 = 1.0e-5;

pub fn spawn_surfaces(
    mut commands: Commands,
    config: Res<MeasureConfig>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut colour_materials: ResMut<Assets<ColorMaterial>>,
) {
    let view = config.initial_view.point();
    let view_mode = config.initial_view_mode;
    let map_camera = MapCamera::new(&view, config.initial_view.zoom);
    let orbit = GlobeOrbitCamera::new(&view);

    let map_center = mercator_to_map_world(map_camera.center);
    let units_per_pixel = map_camera.units_per_pixel();
    commands.spawn((
        Camera2d,
        Camera {
            is_active: view_mode == ViewMode::Planar,
            order: 0,
            clear_color: ClearColorConfig::Custom(MAP_BACKGROUND_COLOUR),
            ..default()
        },
        Transform::from_translation(map_center.extend(0.0))
            .with_scale(Vec3::new(units_per_pixel, units_per_pixel, 1.0)),
        MeasureController::default(),
        SurfaceKind::Planar,
    ));

    commands.spawn((
        Camera3d::default(),
        Camera {
            is_active: view_mode == ViewMode::Globe,
            order: 1,
            ..default()
        },
        Projection::from(PerspectiveProjection {
            near: GLOBE_NEAR_PLANE,
            ..default()
        }),
        orbit.target_transform(),
        MeasureController::default(),
        SurfaceKind::Globe,
    ));

    spawn_globe(&mut commands, &mut meshes, &mut materials);
    spawn_lighting(&mut commands);
    create_graticules(
        &mut commands,
        &mut meshes,
        &mut materials,
        &mut colour_materials,
    );

    info!(
        "Surfaces ready, showing {} view at ({:.4}, {:.4})",
        view_mode.as_str(),
        view.lon,
        view.lat
    );
    commands.insert_resource(map_camera);
    commands.insert_resource(orbit);
    commands.insert_resource(view_mode);
}

/// WGS84 ellipsoid: a sphere of the equatorial radius squashed along Y.
fn spawn_globe(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
) {
    let radius = (WGS84_SEMI_MAJOR_AXIS * GLOBE_WORLD_UNITS_PER_METER) as f32;
    let flattening = (WGS84_SEMI_MINOR_AXIS / WGS84_SEMI_MAJOR_AXIS) as f32;

    commands.spawn((
        Mesh3d(meshes.add(Sphere::new(radius).mesh().uv(128, 64))),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: GLOBE_COLOUR,
            perceptual_roughness: 0.9,
            ..default()
        })),
        Transform::from_scale(Vec3::new(1.0, flattening, 1.0)),
    ));
}

fn spawn_lighting(commands: &mut Commands) {
    commands.spawn((
        DirectionalLight {
            shadows_enabled: false,
            ..default()
        },
        Transform::from_rotation(Quat::from_euler(
            EulerRot::ZYX,
            0.0,
            1.0,
            -std::f32::consts::FRAC_PI_4,
        )),
    ));
    commands.insert_resource(AmbientLight {
        brightness: 400.0,
        ..default()
    });
}
