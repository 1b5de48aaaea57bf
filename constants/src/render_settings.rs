use bevy::color::Color;

/// World units per projected metre on the 2-D map (1 unit = 1 km).
pub const MAP_WORLD_UNITS_PER_METER: f64 = 1.0e-3;

/// World units per earth-centred metre on the 3-D globe.
pub const GLOBE_WORLD_UNITS_PER_METER: f64 = 1.0e-6;

/// Height at which live shapes are drawn above the globe to avoid z-fighting.
pub const GLOBE_DRAW_LIFT_METERS: f64 = 400.0;

/// Height of the graticule above the globe surface.
pub const GLOBE_GRATICULE_LIFT_METERS: f64 = 1_500.0;

/// Spacing between graticule lines in degrees.
pub const GRATICULE_STEP_DEG: f64 = 10.0;

/// Samples per graticule line.
pub const GRATICULE_SEGMENTS: usize = 90;

/// Vertex marker radius on the map, in screen pixels.
pub const DRAW_VERTEX_SIZE_PX: f32 = 6.0;

/// Vertex marker radius on the globe, as a fraction of the camera altitude.
pub const DRAW_VERTEX_SIZE: f32 = 0.004;

pub const SHAPE_COLOUR: Color = Color::srgb(1.0, 0.8, 0.2);
pub const SHAPE_FILL_EDGE_COLOUR: Color = Color::srgb(1.0, 0.65, 0.0);
pub const FLOATING_VERTEX_COLOUR: Color = Color::srgb(1.0, 1.0, 1.0);
pub const GRATICULE_COLOUR: Color = Color::srgba(1.0, 1.0, 1.0, 0.25);
pub const MAP_BACKGROUND_COLOUR: Color = Color::srgb(0.122, 0.161, 0.216);
pub const GLOBE_COLOUR: Color = Color::srgb(0.16, 0.32, 0.45);
