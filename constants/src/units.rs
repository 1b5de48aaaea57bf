/// Distances at or above this many metres are reported in kilometres.
pub const METERS_PER_KILOMETER: f64 = 1_000.0;

/// Areas at or above this many square metres are reported in hectares.
pub const SQUARE_METERS_PER_HECTARE: f64 = 10_000.0;

/// Confirmed vertices needed before a distance shape can finish.
pub const MIN_DISTANCE_VERTICES: usize = 2;

/// Confirmed vertices needed before an area ring can finish.
pub const MIN_AREA_VERTICES: usize = 3;
