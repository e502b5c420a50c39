//! Cone-field asteroids.

use asteroid_config::ConesConfig;
use rand::Rng;
use sculpting::{Cone, ConeField, ConeProfile, SculptConfig, Sculptor};
use tracing::debug;

use super::{seed_mesh, AsteroidSampler, SampledAsteroid};
use crate::description::ShapeDescription;
use crate::distributions::{spherical_direction, uniform_in};
use crate::error::SampleError;

/// Ball covered by filleted bumps and craters of decreasing strength.
///
/// Cone `k` of `N` has its magnitude scaled by `1 - k * decay` with
/// `decay = 1 / N`, so the last cone keeps `1 / N` of its draw.
#[derive(Debug, Clone, Default)]
pub struct ConeAsteroidSampler {
    pub config: ConesConfig,
    pub sculpt: SculptConfig,
}

impl ConeAsteroidSampler {
    pub fn new(config: ConesConfig) -> Self {
        Self {
            config,
            sculpt: SculptConfig::default(),
        }
    }

    pub fn profile(&self) -> ConeProfile {
        ConeProfile::LinearWithFillet {
            top_fillet: self.config.top_fillet,
            base_fillet: self.config.base_fillet,
        }
    }

    /// Draw the cone field without applying it.
    pub fn sample_field<R: Rng + ?Sized>(&self, rng: &mut R) -> ConeField {
        let count = self.config.num_cones;
        let decay = self.config.magnitude_decay();

        // Directions first, then radii, then magnitudes
        let angles: Vec<(f64, f64)> = (0..count).map(|_| spherical_direction(rng)).collect();
        let radii: Vec<f64> = (0..count)
            .map(|_| uniform_in(rng, self.config.radius_range))
            .collect();
        let magnitudes: Vec<f64> = (0..count)
            .map(|k| uniform_in(rng, self.config.magnitude_range) * (1.0 - decay * k as f64))
            .collect();

        let cones = angles
            .into_iter()
            .zip(radii)
            .zip(magnitudes)
            .map(|(((theta, phi), radius), magnitude)| Cone::from_spherical(theta, phi, radius, magnitude))
            .collect();
        ConeField::new(cones, self.config.base_radius, self.profile())
    }
}

impl AsteroidSampler for ConeAsteroidSampler {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<SampledAsteroid, SampleError> {
        self.config.validate()?;
        let mut sculptor = Sculptor::with_config(seed_mesh(self.config.base_resolution)?, self.sculpt);

        let field = self.sample_field(rng);
        sculptor.perturb_cone_field(&field)?;

        let mesh = sculptor.into_mesh();
        debug!(
            "ConeAsteroidSampler: {} cone(s), Q = {}",
            field.cones.len(),
            mesh.resolution()
        );
        Ok(SampledAsteroid {
            description: ShapeDescription::Cones {
                field,
                resolution: mesh.resolution(),
            },
            mesh,
        })
    }
}
