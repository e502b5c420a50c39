//! Cone falloff profiles.
//!
//! A cone adds `profile(d)` to the radial weight of every vertex within its
//! angular radius, where `d` is the chord distance between the vertex
//! direction and the cone direction.

use glam::DVec3;

use crate::types::ConeProfile;

/// Chord distance between two directions, `sqrt(2 (1 - a·b))` for unit vectors.
///
/// Approximates the great-circle angle for small separations.
pub fn angular_distance(a: DVec3, b: DVec3) -> f64 {
    (2.0 * (1.0 - a.dot(b))).max(0.0).sqrt()
}

impl ConeProfile {
    /// Weight contribution at chord distance `distance` from a cone's center.
    ///
    /// Zero outside `radius`. `magnitude` is the slope of the linear ramp, so
    /// the peak is `magnitude * radius` for every profile.
    pub fn evaluate(&self, distance: f64, radius: f64, magnitude: f64) -> f64 {
        if distance >= radius {
            return 0.0;
        }
        let d = distance.max(0.0);
        match *self {
            ConeProfile::Linear => magnitude * (radius - d),
            ConeProfile::Quadratic => {
                let t = radius - d;
                magnitude * t * t / (radius * radius)
            }
            ConeProfile::LinearWithFillet {
                top_fillet,
                base_fillet,
            } => {
                if top_fillet == 0.0 && base_fillet == 0.0 {
                    return magnitude * (radius - d);
                }
                let fillet = FilletGeometry::new(radius, magnitude.abs() * radius, top_fillet, base_fillet);
                magnitude.signum() * fillet.height(d)
            }
        }
    }

    /// Fillet fractions are non-negative and leave room for a linear ramp.
    pub fn is_valid(&self) -> bool {
        match *self {
            ConeProfile::Linear | ConeProfile::Quadratic => true,
            ConeProfile::LinearWithFillet {
                top_fillet,
                base_fillet,
            } => top_fillet >= 0.0 && base_fillet >= 0.0 && top_fillet + base_fillet < 1.0,
        }
    }
}

/// Tangent geometry of a filleted cone in the (distance, height) plane.
///
/// The profile is a cap arc of radius `r_top` centered on the axis, a straight
/// ramp of slope `-slope`, and a rim arc of radius `r_base` centered at
/// `(radius, r_base)`. Both arcs meet the ramp tangentially; the peak stays at
/// `height` and the rim arc touches zero exactly at `radius`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilletGeometry {
    pub radius: f64,
    pub height: f64,
    pub r_top: f64,
    pub r_base: f64,
    /// Magnitude of the ramp slope
    pub slope: f64,
    /// Ramp line intercept at distance 0
    pub intercept: f64,
    /// Distance where the cap arc meets the ramp
    pub top_tangent: f64,
    /// Distance where the ramp meets the rim arc
    pub base_tangent: f64,
}

impl FilletGeometry {
    /// Solve the ramp for peak `height` over support `radius`.
    ///
    /// `top_fillet` and `base_fillet` are fractions of `radius`; their sum
    /// must be below 1.
    pub fn new(radius: f64, height: f64, top_fillet: f64, base_fillet: f64) -> Self {
        let r_top = top_fillet * radius;
        let r_base = base_fillet * radius;
        let r = r_top + r_base;

        // Tangency to both arcs: S² (ρ² - R²) - 2ρ(h - R) S + (h² - 2hR) = 0
        let disc = (radius * radius + height * height - 2.0 * r * height).max(0.0);
        let slope = (radius * (height - r) + r * disc.sqrt()) / (radius * radius - r * r);
        let k = (1.0 + slope * slope).sqrt();
        let intercept = height + r_top * (k - 1.0);

        Self {
            radius,
            height,
            r_top,
            r_base,
            slope,
            intercept,
            top_tangent: r_top * slope / k,
            base_tangent: radius - r_base * slope / k,
        }
    }

    /// Non-negative profile height at `distance`.
    pub fn height(&self, distance: f64) -> f64 {
        let x = distance.max(0.0);
        if x >= self.radius {
            return 0.0;
        }
        if x <= self.top_tangent {
            let k = (1.0 + self.slope * self.slope).sqrt();
            let center = self.intercept - self.r_top * k;
            return center + (self.r_top * self.r_top - x * x).max(0.0).sqrt();
        }
        if x >= self.base_tangent {
            let dx = x - self.radius;
            return (self.r_base - (self.r_base * self.r_base - dx * dx).max(0.0).sqrt()).max(0.0);
        }
        (self.intercept - self.slope * x).max(0.0)
    }
}
