//! Spherical-harmonic asteroids.

use asteroid_config::HarmonicsConfig;
use rand::Rng;
use sculpting::{HarmonicPerturbation, SculptConfig, Sculptor};
use tracing::debug;

use super::{seed_mesh, AsteroidSampler, SampledAsteroid};
use crate::description::ShapeDescription;
use crate::distributions::{beta_one, geometric};
use crate::error::SampleError;

/// Ball of `base_radius` modulated by a sequence of random harmonics.
///
/// Degree `n ~ Geometric(degree_decay)`, order `m` uniform in `-n..=n` and
/// magnitude `base_radius * Beta(1, 1 + magnitude_decay * n * |m|)`, so high
/// orders are mostly faint.
#[derive(Debug, Clone, Default)]
pub struct HarmonicAsteroidSampler {
    pub config: HarmonicsConfig,
    pub sculpt: SculptConfig,
}

impl HarmonicAsteroidSampler {
    pub fn new(config: HarmonicsConfig) -> Self {
        Self {
            config,
            sculpt: SculptConfig::default(),
        }
    }

    /// Draw one perturbation descriptor.
    pub fn sample_perturbation<R: Rng + ?Sized>(&self, rng: &mut R) -> HarmonicPerturbation {
        let degree = geometric(rng, self.config.degree_decay);
        let n = degree as i32;
        let order = rng.random_range(-n..=n);
        let beta = 1.0 + self.config.magnitude_decay * degree as f64 * order.unsigned_abs() as f64;
        let magnitude = self.config.base_radius * beta_one(rng, beta);
        HarmonicPerturbation::new(degree, order, magnitude)
    }
}

impl AsteroidSampler for HarmonicAsteroidSampler {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<SampledAsteroid, SampleError> {
        self.config.validate()?;
        let mut sculptor = Sculptor::with_config(seed_mesh(self.config.base_resolution)?, self.sculpt);
        sculptor.normalize_to_radius(self.config.base_radius)?;

        let mut perturbations = Vec::with_capacity(self.config.num_perturbations);
        for _ in 0..self.config.num_perturbations {
            let perturbation = self.sample_perturbation(rng);
            sculptor.apply_harmonic(perturbation, true, self.config.resolution_margin)?;
            perturbations.push(perturbation);
        }

        let mesh = sculptor.into_mesh();
        debug!(
            "HarmonicAsteroidSampler: {} perturbation(s), Q = {}",
            perturbations.len(),
            mesh.resolution()
        );
        Ok(SampledAsteroid {
            description: ShapeDescription::Harmonic {
                base_radius: self.config.base_radius,
                perturbations,
                resolution: mesh.resolution(),
            },
            mesh,
        })
    }
}
