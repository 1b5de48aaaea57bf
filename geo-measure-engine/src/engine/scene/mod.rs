//! Scene content shared by both map surfaces.
//!
//! Spawns the cameras, the globe and the graticules, and draws the shapes
//! being measured.

/// Latitude/longitude graticule meshes for the map and the globe.
pub mod grid;

/// Shapes under construction and the gizmo system drawing them.
pub mod live_shapes;

/// Camera, globe and lighting setup once the configuration is loaded.
pub mod surfaces;
