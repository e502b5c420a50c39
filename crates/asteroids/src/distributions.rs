//! Small samplers not covered by `rand` itself.

use std::f64::consts::TAU;

use glam::DVec3;
use rand::Rng;

/// Number of Bernoulli(p) trials up to and including the first success.
///
/// Support `1, 2, ...`. `p` must be in `(0, 1]`.
pub fn geometric<R: Rng + ?Sized>(rng: &mut R, p: f64) -> u32 {
    if p >= 1.0 {
        return 1;
    }
    // Inverse CDF on (0, 1]
    let u = 1.0 - rng.random::<f64>();
    let trials = (u.ln() / (1.0 - p).ln()).ceil();
    trials.clamp(1.0, u32::MAX as f64) as u32
}

/// Beta(1, b) by inversion: `1 - U^(1/b)`.
pub fn beta_one<R: Rng + ?Sized>(rng: &mut R, b: f64) -> f64 {
    let u: f64 = rng.random();
    1.0 - u.powf(1.0 / b)
}

/// Uniform value in `[range[0], range[1])`, or `range[0]` for an empty range.
pub fn uniform_in<R: Rng + ?Sized>(rng: &mut R, range: [f64; 2]) -> f64 {
    range[0] + (range[1] - range[0]) * rng.random::<f64>()
}

/// Uniform ISO spherical angles `(theta, phi)` of a direction on the unit sphere.
pub fn spherical_direction<R: Rng + ?Sized>(rng: &mut R) -> (f64, f64) {
    let theta = (2.0 * rng.random::<f64>() - 1.0).acos();
    let phi = TAU * rng.random::<f64>();
    (theta, phi)
}

/// Uniform unit vector, by sampling the z coordinate and the azimuth.
pub fn unit_vector<R: Rng + ?Sized>(rng: &mut R) -> DVec3 {
    let z = -1.0 + 2.0 * rng.random::<f64>();
    let azimuth = TAU * rng.random::<f64>();
    let radial = (1.0 - z * z).max(0.0).sqrt();
    DVec3::new(radial * azimuth.cos(), radial * azimuth.sin(), z)
}
