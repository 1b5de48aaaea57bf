/// Maximum delay between two primary presses that count as a double click.
pub const DOUBLE_CLICK_SECS: f64 = 0.3;

/// Maximum cursor travel between two presses of a double click, in pixels.
pub const DOUBLE_CLICK_RADIUS_PX: f32 = 4.0;

/// Map pan speed in screen pixels per second.
pub const MAP_PAN_SPEED_PX: f32 = 600.0;

/// Zoom change per mouse wheel line.
pub const ZOOM_STEP_PER_LINE: f64 = 0.25;

/// Globe orbit speed in degrees per second at the reference altitude.
pub const GLOBE_ORBIT_SPEED_DEG: f64 = 30.0;
