//! Asteroid samplers.
//!
//! Each sampler is a pure function of its configuration and the RNG it is
//! handed: the same seed yields the same mesh and description. Samplers own
//! no state between calls, so a batch driver can run one per thread with
//! independently seeded RNGs.

mod cones;
mod harmonic;
mod spikes;

use icq::QuadSphereMesh;
use rand::Rng;

use crate::description::ShapeDescription;
use crate::error::SampleError;

pub use cones::ConeAsteroidSampler;
pub use harmonic::HarmonicAsteroidSampler;
pub use spikes::SpikeSampler;

/// A finished shape and the record of how it was made.
#[derive(Debug, Clone)]
pub struct SampledAsteroid {
    pub mesh: QuadSphereMesh,
    pub description: ShapeDescription,
}

/// Draws one asteroid per call.
pub trait AsteroidSampler {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<SampledAsteroid, SampleError>;
}

/// Unit cube refined `passes` times.
pub(crate) fn seed_mesh(passes: usize) -> Result<QuadSphereMesh, SampleError> {
    let mut mesh = QuadSphereMesh::unit_cube(1)?;
    mesh.refine(passes);
    Ok(mesh)
}
