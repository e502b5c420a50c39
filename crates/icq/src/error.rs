//! Error types for shape model operations.

use crate::mesh::GridIndex;

/// Errors that can occur while building, transforming or serializing a shape model.
#[derive(Debug, thiserror::Error)]
pub enum IcqError {
    #[error("Malformed ICQ input at line {line}: {reason}")]
    MalformedInput { line: usize, reason: String },

    #[error("Seam inconsistency: {first} holds {first_value}, but {second} holds {second_value}")]
    SeamInconsistency {
        first: GridIndex,
        second: GridIndex,
        first_value: glam::DVec3,
        second_value: glam::DVec3,
    },

    #[error("Unsupported operation: {0}")]
    UnsupportedOperation(String),

    #[error("Invalid resolution: {0}")]
    InvalidResolution(String),

    /// Zero-length vectors found while normalizing; `indices` lists every offender.
    #[error("Degenerate geometry: {} zero-length vector(s), first at index {}", .indices.len(), .indices.first().copied().unwrap_or_default())]
    DegenerateGeometry { indices: Vec<usize> },

    #[error("Grid index {0} is out of range")]
    IndexOutOfRange(GridIndex),

    #[error("Vertex count mismatch: expected {expected}, found {found}")]
    VertexCountMismatch { expected: usize, found: usize },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
