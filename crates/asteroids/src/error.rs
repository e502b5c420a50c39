//! Error types for asteroid sampling.

use asteroid_config::ConfigError;
use icq::IcqError;
use sculpting::SculptError;

/// Errors that can occur while sampling, describing or staging an asteroid.
#[derive(Debug, thiserror::Error)]
pub enum SampleError {
    #[error(transparent)]
    Sculpt(#[from] SculptError),

    #[error(transparent)]
    Mesh(#[from] IcqError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Failed to serialize description: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Render failed: {0}")]
    Render(String),
}
