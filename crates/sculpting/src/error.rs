//! Error types for sculpting operations.

use icq::IcqError;

/// Errors that can occur while sculpting a shape model.
#[derive(Debug, thiserror::Error)]
pub enum SculptError {
    #[error(transparent)]
    Mesh(#[from] IcqError),

    /// Adaptive refinement hit its pass cap before resolving the target feature size.
    #[error(
        "Resolution unreachable: feature size {target} needs more than {passes} refinement pass(es) (reached {reached} at Q = {resolution})"
    )]
    ResolutionUnreachable {
        target: f64,
        reached: f64,
        passes: usize,
        resolution: usize,
    },

    #[error("Invalid cone {index}: {reason}")]
    InvalidCone { index: usize, reason: String },

    #[error("Invalid perturbation: {0}")]
    InvalidPerturbation(String),
}
