//! Core sculpting types.
//!
//! Perturbation descriptors are plain values: the sculptor never samples
//! them, it only applies what the caller hands in and records it.

use std::f64::consts::{PI, TAU};

use glam::DVec3;
use icq::NormalWeighting;
use serde::{Deserialize, Serialize};

use crate::error::SculptError;

/// A single real spherical-harmonic perturbation `magnitude * Y_n^m`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HarmonicPerturbation {
    /// Degree `n`
    pub degree: u32,
    /// Order `m`, `-n..=n`
    pub order: i32,
    /// Radial amplitude in model units
    pub magnitude: f64,
}

impl HarmonicPerturbation {
    pub fn new(degree: u32, order: i32, magnitude: f64) -> Self {
        Self {
            degree,
            order,
            magnitude,
        }
    }

    /// Expected smallest angular feature of `Y_n^m`, in radians.
    pub fn feature_size(&self) -> f64 {
        let m = self.order.unsigned_abs();
        let polar = PI / (self.degree - m.min(self.degree) + 1) as f64;
        let azimuthal = if m == 0 { TAU } else { PI / m as f64 };
        polar.min(azimuthal)
    }

    pub(crate) fn validate(&self) -> Result<(), SculptError> {
        if self.order.unsigned_abs() > self.degree {
            return Err(SculptError::InvalidPerturbation(format!(
                "order {} exceeds degree {}",
                self.order, self.degree
            )));
        }
        if !self.magnitude.is_finite() {
            return Err(SculptError::InvalidPerturbation(format!(
                "magnitude {} is not finite",
                self.magnitude
            )));
        }
        Ok(())
    }
}

/// Falloff profile of a cone as a function of angular distance.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ConeProfile {
    /// `magnitude * (radius - d)`
    #[default]
    Linear,
    /// `magnitude * (radius - d)^2 / radius^2`
    Quadratic,
    /// Linear cone with circular fillets at the peak and at the rim.
    ///
    /// Fillet radii are fractions of the cone radius and must sum to less
    /// than 1. Peak height and support match [`ConeProfile::Linear`].
    LinearWithFillet { top_fillet: f64, base_fillet: f64 },
}

impl ConeProfile {
    /// Default filleted profile used by the cone asteroid generator.
    pub const fn filleted() -> Self {
        ConeProfile::LinearWithFillet {
            top_fillet: 0.25,
            base_fillet: 0.25,
        }
    }
}

/// One angular cone: a bump (positive magnitude) or crater (negative).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Cone {
    /// Center direction, unit length once validated
    pub direction: DVec3,
    /// Angular radius (chord measure) of the support
    pub radius: f64,
    /// Slope of the profile; peak weight is `magnitude * radius`
    pub magnitude: f64,
}

impl Cone {
    pub fn new(direction: DVec3, radius: f64, magnitude: f64) -> Self {
        Self {
            direction,
            radius,
            magnitude,
        }
    }

    /// Cone centered at ISO spherical angles: colatitude `theta`, longitude `phi`.
    pub fn from_spherical(theta: f64, phi: f64, radius: f64, magnitude: f64) -> Self {
        let (sin_theta, cos_theta) = theta.sin_cos();
        let (sin_phi, cos_phi) = phi.sin_cos();
        Self::new(
            DVec3::new(sin_theta * cos_phi, sin_theta * sin_phi, cos_theta),
            radius,
            magnitude,
        )
    }
}

/// Cones applied simultaneously on a sphere of radius `base_radius`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConeField {
    pub cones: Vec<Cone>,
    pub base_radius: f64,
    pub profile: ConeProfile,
}

impl ConeField {
    pub fn new(cones: Vec<Cone>, base_radius: f64, profile: ConeProfile) -> Self {
        Self {
            cones,
            base_radius,
            profile,
        }
    }

    /// Build from parallel per-cone arrays.
    pub fn from_parallel(
        directions: &[DVec3],
        radii: &[f64],
        magnitudes: &[f64],
        base_radius: f64,
        profile: ConeProfile,
    ) -> Result<Self, SculptError> {
        if radii.len() != directions.len() || magnitudes.len() != directions.len() {
            return Err(SculptError::InvalidCone {
                index: directions.len().min(radii.len()).min(magnitudes.len()),
                reason: format!(
                    "array lengths differ: {} directions, {} radii, {} magnitudes",
                    directions.len(),
                    radii.len(),
                    magnitudes.len()
                ),
            });
        }
        let cones = directions
            .iter()
            .zip(radii)
            .zip(magnitudes)
            .map(|((&direction, &radius), &magnitude)| Cone::new(direction, radius, magnitude))
            .collect();
        Ok(Self::new(cones, base_radius, profile))
    }
}

/// Record of a transform applied by the sculptor, in application order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AppliedPerturbation {
    Normalize { radius: f64 },
    Refine { passes: usize },
    Harmonic {
        perturbation: HarmonicPerturbation,
        /// Resolution the harmonic was evaluated at
        resolution: usize,
    },
    Cones(ConeField),
    SetVertex {
        face: usize,
        i: usize,
        j: usize,
        value: DVec3,
    },
}

/// Configuration for the sculptor.
///
/// Values are configurable and should not be treated as magic numbers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SculptConfig {
    /// Most refinement passes a single adaptive request may add (default: 8)
    pub max_refine_passes: usize,
    /// Weighting of triangle contributions to vertex normals (default: LegacyDot)
    pub normal_weighting: NormalWeighting,
}

impl Default for SculptConfig {
    fn default() -> Self {
        Self {
            max_refine_passes: 8,
            normal_weighting: NormalWeighting::LegacyDot,
        }
    }
}
