//! Random asteroid generation on top of the sculpting engine.
//!
//! Samplers draw perturbation descriptors from a caller-supplied RNG, hand
//! them to a [`sculpting::Sculptor`] and return the finished mesh with a
//! [`ShapeDescription`] of what was applied. Viewing conditions and the
//! renderer scene contract live alongside so a batch driver only has to fan
//! samples out and persist them.
//!
//! - [`samplers`] - spherical-harmonic, cone-field and spiked asteroids
//! - [`description`] - serializable records of sampled shapes
//! - [`spatial_state`] - rotation axes, approach angles and phase iteration
//! - [`scene`] - camera/light placement for an external renderer

pub mod description;
pub mod distributions;
pub mod error;
pub mod samplers;
pub mod scene;
pub mod spatial_state;

pub use description::{ShapeDescription, Spike};
pub use error::SampleError;
pub use samplers::{
    AsteroidSampler, ConeAsteroidSampler, HarmonicAsteroidSampler, SampledAsteroid, SpikeSampler,
};
pub use scene::{Renderer, SceneDescription};
pub use spatial_state::{sample_conditions, write_conditions, Condition, SpatialState, SpatialStates};
