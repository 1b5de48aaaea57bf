//! Navigation for the two map cameras.
//!
//! The 2-D map pans and zooms through Web Mercator zoom levels; the 3-D
//! globe orbits the earth centre with smooth interpolation. Only the camera
//! of the visible view reacts to keyboard and mouse input.

/// Map and globe camera resources and their controller systems.
pub mod viewport_camera;
