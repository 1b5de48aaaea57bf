use thiserror::Error;

use super::record::MeasurementKind;
use super::surface::ShapeHandle;
use crate::tools::tool_manager::ToolState;

/// Failure reported by a surface collaborator (pick resolver or renderer).
#[derive(Debug, Error)]
pub enum SurfaceError {
    #[error("pick resolution failed: {0}")]
    Pick(String),
    #[error("live shape rendering failed: {0}")]
    Render(String),
    #[error("no live shape registered for handle {0:?}")]
    UnknownShape(ShapeHandle),
    #[error("the {surface} surface cannot compute {kind}")]
    UnsupportedMetric {
        surface: &'static str,
        kind: MeasurementKind,
    },
}

#[derive(Debug, Error)]
pub enum MeasureError {
    #[error("the {surface} surface does not support the {tool} tool")]
    UnsupportedTool {
        tool: ToolState,
        surface: &'static str,
    },
    #[error(transparent)]
    Surface(#[from] SurfaceError),
}
