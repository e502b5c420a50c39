//! Spiked cubes: single interior vertices pulled out of a refined cube.

use std::collections::BTreeSet;

use asteroid_config::SpikesConfig;
use rand::Rng;
use tracing::debug;

use super::{seed_mesh, AsteroidSampler, SampledAsteroid};
use crate::description::{ShapeDescription, Spike};
use crate::error::SampleError;

#[derive(Debug, Clone, Default)]
pub struct SpikeSampler {
    pub config: SpikesConfig,
}

impl SpikeSampler {
    pub fn new(config: SpikesConfig) -> Self {
        Self { config }
    }

    /// Distinct interior vertices on the allowed faces.
    pub fn sample_spikes<R: Rng + ?Sized>(&self, rng: &mut R, q: usize) -> Vec<Spike> {
        let mut spikes = BTreeSet::new();
        while spikes.len() < self.config.num_spikes {
            let face = self.config.spikable_faces[rng.random_range(0..self.config.spikable_faces.len())];
            let i = rng.random_range(1..q);
            let j = rng.random_range(1..q);
            spikes.insert(Spike { face, i, j });
        }
        spikes.into_iter().collect()
    }
}

impl AsteroidSampler for SpikeSampler {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<SampledAsteroid, SampleError> {
        self.config.validate()?;
        let mut mesh = seed_mesh(self.config.resolution_power)?;
        let q = mesh.resolution();

        let face_normals = (0..icq::FACE_COUNT)
            .map(|face| mesh.face_center(face))
            .collect::<Result<Vec<_>, _>>()?;

        let spikes = self.sample_spikes(rng, q);
        for spike in &spikes {
            let old = mesh.get_vertex(spike.face, spike.i, spike.j)?;
            let moved = old + face_normals[spike.face] * self.config.spike_size;
            mesh.set_vertex(spike.face, spike.i, spike.j, moved)?;
        }

        debug!("SpikeSampler: {} spike(s), Q = {}", spikes.len(), q);
        Ok(SampledAsteroid {
            description: ShapeDescription::Spikes {
                spikes,
                spike_size: self.config.spike_size,
                resolution: q,
            },
            mesh,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use icq::QuadSphereMesh;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_spikes_move_only_chosen_vertices() {
        let sampler = SpikeSampler::new(SpikesConfig {
            num_spikes: 5,
            ..SpikesConfig::default()
        });
        let asteroid = sampler.sample(&mut StdRng::seed_from_u64(5)).unwrap();
        let cube = {
            let mut mesh = QuadSphereMesh::unit_cube(1).unwrap();
            mesh.refine(2);
            mesh
        };

        let ShapeDescription::Spikes { spikes, spike_size, resolution } = &asteroid.description else {
            panic!("unexpected description");
        };
        assert_eq!(*resolution, 4);
        assert_eq!(spikes.len(), 5);
        assert_eq!(*spike_size, 0.1);

        let mut moved = 0;
        for flat in 0..cube.raw_vertex_count() {
            let before = cube.flat_vertices()[flat];
            let after = asteroid.mesh.flat_vertices()[flat];
            if before != after {
                moved += 1;
                let idx = cube.grid_index(flat);
                assert!(spikes.contains(&Spike { face: idx.face, i: idx.i, j: idx.j }));
                assert!([1, 4, 5].contains(&idx.face));
                let normal = cube.face_center(idx.face).unwrap();
                assert!(((after - before) - normal * 0.1).length() < 1e-12);
            }
        }
        assert_eq!(moved, 5);
        assert!(asteroid.mesh.validate_seams(true).unwrap());
    }

    #[test]
    fn test_too_many_spikes_rejected() {
        let sampler = SpikeSampler::new(SpikesConfig {
            num_spikes: 28,
            ..SpikesConfig::default()
        });
        assert!(matches!(
            sampler.sample(&mut StdRng::seed_from_u64(0)),
            Err(SampleError::Config(_))
        ));
    }
}
