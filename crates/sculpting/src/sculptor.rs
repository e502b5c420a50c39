//! Sculptor: applies radial transforms to a cube-sphere mesh.
//!
//! Each transform maps every vertex of the redundant arena through a pure
//! function into a new buffer, then commits the buffer to the mesh. Nothing
//! is written back lazily; a transform either commits completely or fails
//! with the mesh unchanged.

use glam::DVec3;
use icq::{IcqError, PolygonModel, QuadSphereMesh};
use tracing::{debug, trace};

use crate::cones::angular_distance;
use crate::error::SculptError;
use crate::harmonics::HarmonicBasis;
use crate::types::{AppliedPerturbation, ConeField, HarmonicPerturbation, SculptConfig};

/// Owns a mesh while it is being sculpted.
#[derive(Debug, Clone)]
pub struct Sculptor {
    mesh: QuadSphereMesh,
    config: SculptConfig,
    history: Vec<AppliedPerturbation>,
}

impl Sculptor {
    pub fn new(mesh: QuadSphereMesh) -> Self {
        Self::with_config(mesh, SculptConfig::default())
    }

    pub fn with_config(mesh: QuadSphereMesh, config: SculptConfig) -> Self {
        Self {
            mesh,
            config,
            history: Vec::new(),
        }
    }

    pub fn mesh(&self) -> &QuadSphereMesh {
        &self.mesh
    }

    /// Finish sculpting and take the mesh.
    pub fn into_mesh(self) -> QuadSphereMesh {
        self.mesh
    }

    pub fn config(&self) -> &SculptConfig {
        &self.config
    }

    /// Transforms applied so far, in order.
    pub fn history(&self) -> &[AppliedPerturbation] {
        &self.history
    }

    /// Deduplicated model with normals weighted per the configuration.
    pub fn polygon_model(&self) -> Result<PolygonModel, SculptError> {
        Ok(PolygonModel::from_mesh(&self.mesh).with_normals(self.config.normal_weighting)?)
    }

    // ========================================================================
    // Transforms
    // ========================================================================

    /// Project every vertex onto the sphere of radius `radius`.
    pub fn normalize_to_radius(&mut self, radius: f64) -> Result<(), SculptError> {
        let vertices = self.map_vertices(|v| v.try_normalize().map(|unit| unit * radius))?;
        self.commit(vertices)?;
        self.history.push(AppliedPerturbation::Normalize { radius });
        debug!("normalize_to_radius: r = {}", radius);
        Ok(())
    }

    /// Add `magnitude * Y_n^m(v̂)` to the radius of every vertex.
    ///
    /// With `adaptive_refine` the mesh is first refined until `margin` times
    /// its smallest angular feature fits within the harmonic's feature size.
    pub fn perturb_spherical_harmonic(
        &mut self,
        magnitude: f64,
        order: i32,
        degree: u32,
        adaptive_refine: bool,
        margin: f64,
    ) -> Result<(), SculptError> {
        self.apply_harmonic(HarmonicPerturbation::new(degree, order, magnitude), adaptive_refine, margin)
    }

    /// Apply a harmonic perturbation descriptor.
    pub fn apply_harmonic(
        &mut self,
        perturbation: HarmonicPerturbation,
        adaptive_refine: bool,
        margin: f64,
    ) -> Result<(), SculptError> {
        let basis = HarmonicBasis::new(perturbation.degree, perturbation.order)?;
        perturbation.validate()?;
        if adaptive_refine {
            self.adaptive_refine_until(perturbation.feature_size(), margin)?;
        }

        let magnitude = perturbation.magnitude;
        let vertices = self.map_vertices(|v| {
            let length = v.length();
            if length == 0.0 {
                return None;
            }
            let y = basis.evaluate(v)?;
            Some(v * (1.0 + magnitude * y / length))
        })?;
        self.commit(vertices)?;

        debug!(
            "perturb_spherical_harmonic: n = {}, m = {}, magnitude = {:.4}, Q = {}",
            perturbation.degree,
            perturbation.order,
            magnitude,
            self.mesh.resolution()
        );
        self.history.push(AppliedPerturbation::Harmonic {
            perturbation,
            resolution: self.mesh.resolution(),
        });
        Ok(())
    }

    /// Apply all cones of `field` at once.
    ///
    /// Each vertex becomes `base_radius * w * v̂` with
    /// `w = 1 + Σ profile(d_c)` over every cone `c`.
    pub fn perturb_cone_field(&mut self, field: &ConeField) -> Result<(), SculptError> {
        if !field.profile.is_valid() {
            return Err(SculptError::InvalidPerturbation(format!(
                "invalid cone profile {:?}",
                field.profile
            )));
        }
        if !field.base_radius.is_finite() {
            return Err(SculptError::InvalidPerturbation(format!(
                "base radius {} is not finite",
                field.base_radius
            )));
        }

        let mut cones = Vec::with_capacity(field.cones.len());
        for (index, cone) in field.cones.iter().enumerate() {
            let direction = cone.direction.try_normalize().ok_or_else(|| SculptError::InvalidCone {
                index,
                reason: "direction is zero or not finite".to_string(),
            })?;
            if !(cone.radius > 0.0) || !cone.radius.is_finite() {
                return Err(SculptError::InvalidCone {
                    index,
                    reason: format!("radius {} must be positive", cone.radius),
                });
            }
            if !cone.magnitude.is_finite() {
                return Err(SculptError::InvalidCone {
                    index,
                    reason: format!("magnitude {} is not finite", cone.magnitude),
                });
            }
            cones.push((direction, cone.radius, cone.magnitude));
        }

        let profile = field.profile;
        let base_radius = field.base_radius;
        let vertices = self.map_vertices(|v| {
            let unit = v.try_normalize()?;
            let weight = cones.iter().fold(1.0, |w, &(direction, radius, magnitude)| {
                w + profile.evaluate(angular_distance(unit, direction), radius, magnitude)
            });
            Some(unit * (base_radius * weight))
        })?;
        self.commit(vertices)?;

        debug!(
            "perturb_cone_field: {} cone(s), {:?}, base radius {}",
            field.cones.len(),
            profile,
            base_radius
        );
        self.history.push(AppliedPerturbation::Cones(field.clone()));
        Ok(())
    }

    // ========================================================================
    // Resolution
    // ========================================================================

    /// Refine while `margin * feature size > target`.
    ///
    /// Returns the number of passes applied. Fails with
    /// [`SculptError::ResolutionUnreachable`] once `max_refine_passes` passes
    /// were not enough; passes already applied are kept.
    pub fn adaptive_refine_until(&mut self, target: f64, margin: f64) -> Result<usize, SculptError> {
        if !(target > 0.0) || !target.is_finite() || !(margin > 0.0) || !margin.is_finite() {
            return Err(SculptError::InvalidPerturbation(format!(
                "adaptive refinement needs positive finite target and margin, got {} and {}",
                target, margin
            )));
        }

        let mut passes = 0;
        loop {
            let feature = self.mesh.estimate_min_angular_feature_size();
            if margin * feature <= target {
                break;
            }
            if passes == self.config.max_refine_passes {
                if passes > 0 {
                    self.history.push(AppliedPerturbation::Refine { passes });
                }
                return Err(SculptError::ResolutionUnreachable {
                    target,
                    reached: feature,
                    passes,
                    resolution: self.mesh.resolution(),
                });
            }
            self.mesh.refine(1);
            passes += 1;
            trace!(
                "adaptive_refine_until: pass {}, Q = {}, feature {:.5} -> target {:.5}",
                passes,
                self.mesh.resolution(),
                feature,
                target
            );
        }

        if passes > 0 {
            self.history.push(AppliedPerturbation::Refine { passes });
            debug!(
                "adaptive_refine_until: {} pass(es), Q = {}",
                passes,
                self.mesh.resolution()
            );
        }
        Ok(passes)
    }

    pub fn refine(&mut self, passes: usize) {
        self.mesh.refine(passes);
        if passes > 0 {
            self.history.push(AppliedPerturbation::Refine { passes });
        }
    }

    /// Move one interior vertex. Boundary vertices are rejected by the mesh.
    pub fn set_vertex(&mut self, face: usize, i: usize, j: usize, value: DVec3) -> Result<(), SculptError> {
        self.mesh.set_vertex(face, i, j, value)?;
        self.history.push(AppliedPerturbation::SetVertex { face, i, j, value });
        Ok(())
    }

    // ========================================================================
    // Internals
    // ========================================================================

    /// Evaluate `f` on every vertex, collecting the indices where it fails.
    fn map_vertices<F>(&self, f: F) -> Result<Vec<DVec3>, SculptError>
    where
        F: Fn(DVec3) -> Option<DVec3>,
    {
        let mut degenerate = Vec::new();
        let vertices: Vec<DVec3> = self
            .mesh
            .flat_vertices()
            .iter()
            .enumerate()
            .map(|(idx, &v)| {
                f(v).unwrap_or_else(|| {
                    degenerate.push(idx);
                    v
                })
            })
            .collect();

        if degenerate.is_empty() {
            Ok(vertices)
        } else {
            Err(IcqError::DegenerateGeometry {
                indices: degenerate,
            }
            .into())
        }
    }

    fn commit(&mut self, vertices: Vec<DVec3>) -> Result<(), SculptError> {
        self.mesh.replace_vertices(vertices)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Cone, ConeProfile};

    fn ball(q_passes: usize, radius: f64) -> Sculptor {
        let mut sculptor = Sculptor::new(QuadSphereMesh::unit_cube(1).unwrap());
        sculptor.refine(q_passes);
        sculptor.normalize_to_radius(radius).unwrap();
        sculptor
    }

    #[test]
    fn test_normalize_to_radius() {
        let sculptor = ball(2, 15.0);
        for v in sculptor.mesh().flat_vertices() {
            assert!((v.length() - 15.0).abs() < 1e-12);
        }
        assert!(sculptor.mesh().validate_seams(true).unwrap());
        assert_eq!(
            sculptor.history(),
            &[
                AppliedPerturbation::Refine { passes: 2 },
                AppliedPerturbation::Normalize { radius: 15.0 }
            ]
        );
    }

    #[test]
    fn test_normalize_rejects_zero_vertex_without_mutation() {
        let mut mesh = QuadSphereMesh::unit_cube(2).unwrap();
        mesh.set_vertex(0, 1, 1, DVec3::ZERO).unwrap();
        let before = mesh.flat_vertices().to_vec();
        let mut sculptor = Sculptor::new(mesh);

        match sculptor.normalize_to_radius(1.0) {
            Err(SculptError::Mesh(IcqError::DegenerateGeometry { indices })) => {
                assert_eq!(indices, vec![4]);
            }
            other => panic!("expected degenerate geometry, got {other:?}"),
        }
        assert_eq!(sculptor.mesh().flat_vertices(), before.as_slice());
        assert!(sculptor.history().is_empty());
    }

    #[test]
    fn test_zero_magnitude_harmonic_is_identity() {
        let mut sculptor = ball(2, 3.0);
        let before = sculptor.mesh().flat_vertices().to_vec();
        for (n, m) in [(0, 0), (3, -2), (5, 5), (4, 1)] {
            sculptor.perturb_spherical_harmonic(0.0, m, n, false, 4.0).unwrap();
        }
        assert_eq!(sculptor.mesh().flat_vertices(), before.as_slice());
    }

    #[test]
    fn test_harmonic_changes_radius_by_y() {
        let mut sculptor = ball(2, 2.0);
        let before = sculptor.mesh().flat_vertices().to_vec();
        sculptor.perturb_spherical_harmonic(0.5, 1, 2, false, 4.0).unwrap();
        let basis = HarmonicBasis::new(2, 1).unwrap();
        for (old, new) in before.iter().zip(sculptor.mesh().flat_vertices()) {
            let expected = 2.0 + 0.5 * basis.evaluate(*old).unwrap();
            assert!((new.length() - expected).abs() < 1e-12);
            assert!(new.normalize().dot(old.normalize()) > 1.0 - 1e-12);
        }
        assert!(sculptor.mesh().validate_seams(false).unwrap());
    }

    #[test]
    fn test_harmonic_adaptive_refinement() {
        let mut sculptor = ball(1, 1.0);
        assert_eq!(sculptor.mesh().resolution(), 2);
        sculptor.perturb_spherical_harmonic(0.1, 3, 6, true, 4.0).unwrap();

        let feature = HarmonicPerturbation::new(6, 3, 0.1).feature_size();
        let mesh = sculptor.mesh();
        assert!(mesh.resolution() > 2);
        assert!(4.0 * mesh.estimate_min_angular_feature_size() <= feature);
        assert!(matches!(
            sculptor.history().last(),
            Some(AppliedPerturbation::Harmonic { resolution, .. }) if *resolution == mesh.resolution()
        ));
    }

    #[test]
    fn test_adaptive_refine_cap() {
        let config = SculptConfig {
            max_refine_passes: 2,
            ..SculptConfig::default()
        };
        let mut sculptor = Sculptor::with_config(QuadSphereMesh::unit_cube(1).unwrap(), config);
        let result = sculptor.adaptive_refine_until(1e-3, 1.0);
        assert!(matches!(
            result,
            Err(SculptError::ResolutionUnreachable { passes: 2, resolution: 4, .. })
        ));
        assert_eq!(sculptor.adaptive_refine_until(10.0, 1.0).unwrap(), 0);
        assert!(sculptor.adaptive_refine_until(0.0, 1.0).is_err());
    }

    #[test]
    fn test_invalid_harmonic_rejected() {
        let mut sculptor = ball(1, 1.0);
        assert!(sculptor.perturb_spherical_harmonic(1.0, 3, 2, false, 4.0).is_err());
    }

    #[test]
    fn test_cone_clamp_leaves_far_vertices() {
        for profile in [ConeProfile::Linear, ConeProfile::Quadratic] {
            let mut sculptor = ball(3, 1.0);
            let before = sculptor.mesh().flat_vertices().to_vec();
            let cone = Cone::new(DVec3::Z, 0.5, 0.3);
            sculptor
                .perturb_cone_field(&ConeField::new(vec![cone], 1.0, profile))
                .unwrap();

            let mut touched = 0;
            for (old, new) in before.iter().zip(sculptor.mesh().flat_vertices()) {
                if angular_distance(old.normalize(), DVec3::Z) > 0.5 {
                    assert!((*new - *old).length() < 1e-15);
                } else if new.length() > 1.0 + 1e-12 {
                    touched += 1;
                }
            }
            assert!(touched > 0);
        }
    }

    #[test]
    fn test_cone_peak_and_crater() {
        let mut sculptor = ball(2, 1.0);
        let field = ConeField::new(
            vec![Cone::new(DVec3::Z, 0.6, 0.5), Cone::new(DVec3::NEG_Z * 3.0, 0.6, -0.5)],
            10.0,
            ConeProfile::filleted(),
        );
        sculptor.perturb_cone_field(&field).unwrap();
        let mesh = sculptor.mesh();
        let top = mesh.face_center(0).unwrap();
        let bottom = mesh.face_center(5).unwrap();
        assert!((top.length() - 10.0 * 1.3).abs() < 1e-9);
        assert!((bottom.length() - 10.0 * 0.7).abs() < 1e-9);
        assert!(mesh.validate_seams(true).unwrap());
    }

    #[test]
    fn test_cones_apply_simultaneously() {
        let cones = vec![Cone::new(DVec3::X, 0.8, 0.4), Cone::new(DVec3::X, 0.8, 0.4)];
        let mut sculptor = ball(2, 1.0);
        sculptor
            .perturb_cone_field(&ConeField::new(cones, 2.0, ConeProfile::Linear))
            .unwrap();
        let peak = sculptor.mesh().face_center(2).unwrap();
        // 1 + 0.32 + 0.32, not (1 + 0.32)^2
        assert!((peak.length() - 2.0 * 1.64).abs() < 1e-12);
    }

    #[test]
    fn test_invalid_cones_rejected_without_mutation() {
        let mut sculptor = ball(1, 1.0);
        let before = sculptor.mesh().flat_vertices().to_vec();
        let bad_radius = ConeField::new(vec![Cone::new(DVec3::X, 0.0, 0.1)], 1.0, ConeProfile::Linear);
        assert!(matches!(
            sculptor.perturb_cone_field(&bad_radius),
            Err(SculptError::InvalidCone { index: 0, .. })
        ));
        let bad_direction = ConeField::new(
            vec![Cone::new(DVec3::X, 0.2, 0.1), Cone::new(DVec3::ZERO, 0.2, 0.1)],
            1.0,
            ConeProfile::Linear,
        );
        assert!(matches!(
            sculptor.perturb_cone_field(&bad_direction),
            Err(SculptError::InvalidCone { index: 1, .. })
        ));
        let bad_profile = ConeField::new(
            vec![],
            1.0,
            ConeProfile::LinearWithFillet { top_fillet: 0.7, base_fillet: 0.5 },
        );
        assert!(sculptor.perturb_cone_field(&bad_profile).is_err());
        assert_eq!(sculptor.mesh().flat_vertices(), before.as_slice());
    }

    #[test]
    fn test_set_vertex_pass_through() {
        let mut sculptor = ball(1, 1.0);
        assert!(sculptor.set_vertex(1, 0, 1, DVec3::ONE).is_err());
        sculptor.set_vertex(1, 1, 1, DVec3::ONE).unwrap();
        assert_eq!(sculptor.mesh().get_vertex(1, 1, 1).unwrap(), DVec3::ONE);
        assert!(matches!(
            sculptor.history().last(),
            Some(AppliedPerturbation::SetVertex { face: 1, .. })
        ));
    }

    #[test]
    fn test_polygon_model_has_normals() {
        let sculptor = ball(2, 1.0);
        let model = sculptor.polygon_model().unwrap();
        assert_eq!(model.vertex_count(), 98);
        assert_eq!(model.normals.as_ref().map(Vec::len), Some(98));
    }
}
