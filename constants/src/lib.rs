//! Compile-time settings shared by the measurement engine.

pub mod coordinate_system;
pub mod geodesy;
pub mod input;
pub mod render_settings;
pub mod units;
