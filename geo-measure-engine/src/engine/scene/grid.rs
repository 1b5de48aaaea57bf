/// Longitude/latitude graticule for both map surfaces
use bevy::asset::RenderAssetUsages;
use bevy::prelude::*;
use bevy::render::mesh::{Indices, PrimitiveTopology};
use constants::render_settings::{
    GLOBE_GRATICULE_LIFT_METERS, GRATICULE_COLOUR, GRATICULE_SEGMENTS, GRATICULE_STEP_DEG,
};

use crate::engine::surface::SurfaceKind;
use crate::engine::surface::globe::geo_to_globe_world;
use crate::engine::surface::planar::geo_to_map_world;
use crate::geo::GeoPoint;

/// Northern edge of the square Web Mercator world.
const MERCATOR_MAX_LAT: f64 = 85.051_128_78;

#[derive(Component)]
pub struct Graticule(pub SurfaceKind);

/// Meridians and parallels every `step_deg`, each sampled into `segments`
/// pieces. Meridians run between `±max_lat`; the poles themselves get no
/// parallel.
pub fn graticule_lines(step_deg: f64, segments: usize, max_lat: f64) -> Vec<Vec<GeoPoint>> {
    let mut lines = Vec::new();
    let meridian_count = (360.0 / step_deg).round() as usize;
    let segments = segments.max(1);

    for i in 0..meridian_count {
        let lon = -180.0 + i as f64 * step_deg;
        lines.push(
            (0..=segments)
                .map(|s| {
                    let t = s as f64 / segments as f64;
                    GeoPoint::new(lon, -max_lat + t * 2.0 * max_lat)
                })
                .collect(),
        );
    }

    let mut lat = -90.0 + step_deg;
    while lat < 90.0 - f64::EPSILON {
        if lat.abs() <= max_lat {
            lines.push(
                (0..=segments)
                    .map(|s| {
                        let t = s as f64 / segments as f64;
                        GeoPoint::new(-180.0 + t * 360.0, lat)
                    })
                    .collect(),
            );
        }
        lat += step_deg;
    }

    lines
}

/// Join every polyline into one line-list mesh.
fn create_line_list_mesh(lines: &[Vec<Vec3>]) -> Mesh {
    let mut vertices: Vec<[f32; 3]> = Vec::new();
    let mut indices = Vec::new();

    for line in lines {
        let base = vertices.len() as u32;
        vertices.extend(line.iter().map(|v| v.to_array()));
        for i in 1..line.len() as u32 {
            indices.extend_from_slice(&[base + i - 1, base + i]);
        }
    }

    let mut mesh = Mesh::new(PrimitiveTopology::LineList, RenderAssetUsages::RENDER_WORLD);
    mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, vertices);
    mesh.insert_indices(Indices::U32(indices));
    mesh
}

/// Spawn the map and globe graticules.
pub fn create_graticules(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
    colour_materials: &mut Assets<ColorMaterial>,
) {
    let map_lines: Vec<Vec<Vec3>> =
        graticule_lines(GRATICULE_STEP_DEG, GRATICULE_SEGMENTS, MERCATOR_MAX_LAT)
            .iter()
            .map(|line| line.iter().map(|p| geo_to_map_world(p).extend(0.0)).collect())
            .collect();

    commands.spawn((
        Mesh2d(meshes.add(create_line_list_mesh(&map_lines))),
        MeshMaterial2d(colour_materials.add(ColorMaterial::from(GRATICULE_COLOUR))),
        Transform::default(),
        Graticule(SurfaceKind::Planar),
    ));

    let globe_lines: Vec<Vec<Vec3>> = graticule_lines(GRATICULE_STEP_DEG, GRATICULE_SEGMENTS, 90.0)
        .iter()
        .map(|line| {
            line.iter()
                .map(|p| geo_to_globe_world(p, GLOBE_GRATICULE_LIFT_METERS))
                .collect()
        })
        .collect();

    commands.spawn((
        Mesh3d(meshes.add(create_line_list_mesh(&globe_lines))),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: GRATICULE_COLOUR,
            alpha_mode: AlphaMode::Blend,
            unlit: true,
            ..default()
        })),
        Transform::default(),
        Graticule(SurfaceKind::Globe),
    ));
}
