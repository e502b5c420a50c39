//! Deduplicated polygon model handed to exporters and renderers.

use glam::DVec3;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::IcqError;
use crate::mesh::QuadSphereMesh;
use crate::normals::{compute_vertex_normals, NormalWeighting};

/// Unique vertices, triangles over them and optional per-vertex normals.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PolygonModel {
    pub positions: Vec<DVec3>,
    /// Counter-clockwise seen from outside, 0-based
    pub triangles: Vec<[u32; 3]>,
    pub normals: Option<Vec<DVec3>>,
}

/// Interleaved vertex record for GPU upload.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, bytemuck::Pod, bytemuck::Zeroable)]
#[repr(C)]
pub struct RenderVertex {
    pub position: [f32; 3],
    /// Zero when the model has no normals
    pub normal: [f32; 3],
}

impl PolygonModel {
    /// Collapse seam classes of `mesh` into a polygon model without normals.
    ///
    /// Seam copies that disagree are logged by [`QuadSphereMesh::unique_vertices`]
    /// and the class representative is used.
    pub fn from_mesh(mesh: &QuadSphereMesh) -> Self {
        let deduped = mesh.unique_vertices();
        let triangles = mesh.unique_triangle_indices();
        debug!(
            "PolygonModel: {} raw -> {} unique vertices, {} triangles",
            mesh.raw_vertex_count(),
            deduped.positions.len(),
            triangles.len()
        );
        Self {
            positions: deduped.positions,
            triangles,
            normals: None,
        }
    }

    /// Attach vertex normals computed with `weighting`.
    pub fn with_normals(mut self, weighting: NormalWeighting) -> Result<Self, IcqError> {
        self.normals = Some(compute_vertex_normals(
            &self.positions,
            &self.triangles,
            weighting,
        )?);
        Ok(self)
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    /// Single-precision interleaved vertices, in position order.
    pub fn to_render_vertices(&self) -> Vec<RenderVertex> {
        self.positions
            .iter()
            .enumerate()
            .map(|(idx, p)| {
                let normal = self
                    .normals
                    .as_ref()
                    .and_then(|normals| normals.get(idx))
                    .map(|n| n.as_vec3().to_array())
                    .unwrap_or([0.0; 3]);
                RenderVertex {
                    position: p.as_vec3().to_array(),
                    normal,
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_mesh_counts() {
        let mesh = QuadSphereMesh::unit_cube(4).unwrap();
        let model = PolygonModel::from_mesh(&mesh);
        assert_eq!(model.vertex_count(), 98);
        assert_eq!(model.triangle_count(), 192);
        assert!(model.normals.is_none());
        assert!(model
            .triangles
            .iter()
            .flatten()
            .all(|&idx| (idx as usize) < model.vertex_count()));
    }

    #[test]
    fn test_with_normals_on_cube_faces() {
        let mesh = QuadSphereMesh::unit_cube(2).unwrap();
        let model = PolygonModel::from_mesh(&mesh)
            .with_normals(NormalWeighting::TriangleArea)
            .unwrap();
        let normals = model.normals.as_ref().unwrap();
        // Face centers are flat: normal equals the face axis
        let top = model
            .positions
            .iter()
            .position(|p| *p == DVec3::Z)
            .unwrap();
        assert!((normals[top] - DVec3::Z).length() < 1e-12);
    }

    #[test]
    fn test_render_vertices_are_pod() {
        let mesh = QuadSphereMesh::unit_cube(1).unwrap();
        let model = PolygonModel::from_mesh(&mesh)
            .with_normals(NormalWeighting::default())
            .unwrap();
        let vertices = model.to_render_vertices();
        assert_eq!(vertices.len(), 8);
        let bytes: &[u8] = bytemuck::cast_slice(&vertices);
        assert_eq!(bytes.len(), 8 * 24);
        for v in &vertices {
            let n = glam::Vec3::from_array(v.normal);
            let p = glam::Vec3::from_array(v.position);
            assert!(n.dot(p) > 0.0);
        }
    }

    #[test]
    fn test_render_vertices_without_normals() {
        let mesh = QuadSphereMesh::unit_cube(1).unwrap();
        let vertices = PolygonModel::from_mesh(&mesh).to_render_vertices();
        assert!(vertices.iter().all(|v| v.normal == [0.0; 3]));
    }
}
