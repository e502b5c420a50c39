//! Real spherical harmonics.
//!
//! Orthonormal on the unit sphere, Condon-Shortley phase included:
//!
//! ```text
//! Y_n^0            = N_n^0 P_n^0(cos θ)
//! Y_n^m,  m > 0    = √2 N_n^m P_n^m(cos θ) cos(mφ)
//! Y_n^m,  m < 0    = ±√2 N_n^|m| P_n^|m|(cos θ) sin(|m|φ),  minus for even |m|
//! ```
//!
//! θ is the colatitude from +z and φ the longitude from +x. On the polar axis
//! the longitude is taken as 0.

use std::f64::consts::{PI, SQRT_2};

use glam::DVec3;

use crate::error::SculptError;
use crate::types::HarmonicPerturbation;

/// Precomputed evaluator for one `(n, m)` pair.
#[derive(Debug, Clone)]
pub struct HarmonicBasis {
    degree: u32,
    order: i32,
    /// `(a_l, b_l)` for `l = |m|+2 ..= n`
    recurrence: Vec<(f64, f64)>,
}

impl HarmonicBasis {
    pub fn new(degree: u32, order: i32) -> Result<Self, SculptError> {
        HarmonicPerturbation::new(degree, order, 0.0).validate()?;
        let m = order.unsigned_abs() as f64;
        let recurrence = (order.unsigned_abs() + 2..=degree)
            .map(|l| {
                let l = l as f64;
                let a = ((4.0 * l * l - 1.0) / (l * l - m * m)).sqrt();
                let b = (((l - 1.0) * (l - 1.0) - m * m) / (4.0 * (l - 1.0) * (l - 1.0) - 1.0)).sqrt();
                (a, b)
            })
            .collect();
        Ok(Self {
            degree,
            order,
            recurrence,
        })
    }

    pub fn degree(&self) -> u32 {
        self.degree
    }

    pub fn order(&self) -> i32 {
        self.order
    }

    /// Orthonormalized associated Legendre value `N_n^|m| P_n^|m|(x)`.
    fn legendre(&self, x: f64) -> f64 {
        let x = x.clamp(-1.0, 1.0);
        let m = self.order.unsigned_abs();
        let s = (1.0 - x * x).max(0.0).sqrt();

        let mut p_mm = (1.0 / (4.0 * PI)).sqrt();
        for k in 1..=m {
            let k = k as f64;
            p_mm *= -((2.0 * k + 1.0) / (2.0 * k)).sqrt() * s;
        }
        if self.degree == m {
            return p_mm;
        }

        let mut p_prev = p_mm;
        let mut p_curr = x * (2.0 * m as f64 + 3.0).sqrt() * p_mm;
        for &(a, b) in &self.recurrence {
            let p_next = a * (x * p_curr - b * p_prev);
            p_prev = p_curr;
            p_curr = p_next;
        }
        p_curr
    }

    /// Value at `direction`, which need not be unit length.
    ///
    /// Returns `None` for the zero vector.
    pub fn evaluate(&self, direction: DVec3) -> Option<f64> {
        let unit = direction.try_normalize()?;
        let p = self.legendre(unit.z);
        if self.order == 0 {
            return Some(p);
        }

        let phi = if unit.x == 0.0 && unit.y == 0.0 {
            0.0
        } else {
            unit.y.atan2(unit.x)
        };
        let m = self.order.unsigned_abs();
        let value = if self.order > 0 {
            SQRT_2 * p * (m as f64 * phi).cos()
        } else {
            let v = SQRT_2 * p * (m as f64 * phi).sin();
            if m % 2 == 0 { -v } else { v }
        };
        Some(value)
    }
}

/// Evaluate `Y_n^m` at `direction`.
pub fn real_spherical_harmonic(degree: u32, order: i32, direction: DVec3) -> Result<f64, SculptError> {
    let basis = HarmonicBasis::new(degree, order)?;
    basis
        .evaluate(direction)
        .ok_or_else(|| SculptError::InvalidPerturbation("direction has zero length".to_string()))
}
