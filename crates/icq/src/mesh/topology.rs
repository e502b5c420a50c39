//! Triangulation and vertex deduplication for QuadSphereMesh.
//!
//! Every grid cell `(j, i)` is split along its `(j, i)`-`(j+1, i+1)` diagonal
//! into two triangles, both wound counter-clockwise when seen from outside
//! the cube:
//!
//! ```text
//!   (j,i) ------ (j,i+1)
//!     |  \    A     |
//!     |    \        |
//!     |  B   \      |
//!   (j+1,i) --- (j+1,i+1)
//! ```

use glam::DVec3;
use tracing::warn;

use super::{GridIndex, QuadSphereMesh, SeamClassId, FACE_COUNT};

/// Two copies of one physical vertex that disagree numerically.
#[derive(Debug, Clone, PartialEq)]
pub struct SeamMismatch {
    pub class: SeamClassId,
    /// Cell whose value was kept
    pub representative: GridIndex,
    /// Cell holding a different value
    pub member: GridIndex,
    pub expected: DVec3,
    pub found: DVec3,
}

/// Unique vertices with the seam inconsistencies found while collapsing them.
#[derive(Debug, Clone, Default)]
pub struct DedupedVertices {
    /// One position per seam class, in class order
    pub positions: Vec<DVec3>,
    /// Copies that disagreed with their class representative
    pub mismatches: Vec<SeamMismatch>,
}

impl DedupedVertices {
    /// Whether every seam class was numerically consistent.
    pub fn is_consistent(&self) -> bool {
        self.mismatches.is_empty()
    }
}

impl QuadSphereMesh {
    /// Triangles of every face over grid indices, one list per face.
    pub fn triangulated_faces(&self) -> Vec<Vec<[GridIndex; 3]>> {
        let q = self.q;
        (0..FACE_COUNT)
            .map(|face| {
                let mut triangles = Vec::with_capacity(2 * q * q);
                for i in 0..q {
                    for j in 0..q {
                        let corner = GridIndex::new(face, j, i);
                        let right = GridIndex::new(face, j, i + 1);
                        let below = GridIndex::new(face, j + 1, i);
                        let diagonal = GridIndex::new(face, j + 1, i + 1);
                        triangles.push([corner, diagonal, right]);
                        triangles.push([corner, below, diagonal]);
                    }
                }
                triangles
            })
            .collect()
    }

    /// Triangles over the flat (redundant) vertex order.
    pub fn redundant_triangle_indices(&self) -> Vec<[u32; 3]> {
        self.triangulated_faces()
            .into_iter()
            .flatten()
            .map(|tri| tri.map(|index| self.flat_index(index) as u32))
            .collect()
    }

    /// Triangles over unique vertex indices (seam class ids).
    pub fn unique_triangle_indices(&self) -> Vec<[u32; 3]> {
        self.redundant_triangle_indices()
            .into_iter()
            .map(|tri| tri.map(|flat| self.seams.class_of(flat as usize)))
            .collect()
    }

    /// Collapse seam classes to single vertices.
    ///
    /// The representative of each class is its lowest flat index. Copies that
    /// differ from the representative are reported, never silently merged.
    pub fn unique_vertices(&self) -> DedupedVertices {
        let positions = (0..self.seams.class_count() as SeamClassId)
            .map(|class| self.vertices[self.seams.representative(class)])
            .collect();
        let mismatches = self.seam_mismatches();

        if let Some(first) = mismatches.first() {
            warn!(
                "unique_vertices: {} seam copies disagree with their representative (first: {} vs {})",
                mismatches.len(),
                first.representative,
                first.member
            );
        }

        DedupedVertices {
            positions,
            mismatches,
        }
    }

    /// Number of triangles, `12 * Q^2`.
    pub fn triangle_count(&self) -> usize {
        2 * FACE_COUNT * self.q * self.q
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_triangle_counts() {
        for q in 1..6 {
            let mesh = QuadSphereMesh::unit_cube(q).unwrap();
            assert_eq!(mesh.redundant_triangle_indices().len(), 12 * q * q);
            assert_eq!(mesh.unique_triangle_indices().len(), 12 * q * q);
            assert_eq!(mesh.triangle_count(), 12 * q * q);
        }
    }

    #[test]
    fn test_triangulated_faces_are_per_face() {
        let mesh = QuadSphereMesh::unit_cube(3).unwrap();
        let faces = mesh.triangulated_faces();
        assert_eq!(faces.len(), 6);
        for (face, triangles) in faces.iter().enumerate() {
            assert_eq!(triangles.len(), 18);
            assert!(triangles.iter().flatten().all(|idx| idx.face == face));
        }
    }

    #[test]
    fn test_triangles_face_outward() {
        let mesh = QuadSphereMesh::unit_cube(3).unwrap();
        let v = mesh.flat_vertices();
        for [a, b, c] in mesh.redundant_triangle_indices() {
            let (p0, p1, p2) = (v[a as usize], v[b as usize], v[c as usize]);
            let normal = (p1 - p0).cross(p2 - p0);
            let centroid = (p0 + p1 + p2) / 3.0;
            assert!(normal.dot(centroid) > 0.0);
        }
    }

    #[test]
    fn test_unique_mesh_is_closed() {
        // In a closed manifold every undirected edge is used by exactly two triangles
        let mesh = QuadSphereMesh::unit_cube(4).unwrap();
        let mut directed = HashSet::new();
        for [a, b, c] in mesh.unique_triangle_indices() {
            for (from, to) in [(a, b), (b, c), (c, a)] {
                assert!(directed.insert((from, to)), "edge {from}->{to} repeated");
            }
        }
        for &(from, to) in &directed {
            assert!(directed.contains(&(to, from)), "edge {from}->{to} has no twin");
        }
    }

    #[test]
    fn test_unique_vertices_on_clean_mesh() {
        let mesh = QuadSphereMesh::unit_cube(4).unwrap();
        let deduped = mesh.unique_vertices();
        assert!(deduped.is_consistent());
        assert_eq!(deduped.positions.len(), 98);

        let distinct: HashSet<[u64; 3]> = deduped
            .positions
            .iter()
            .map(|p| p.to_array().map(f64::to_bits))
            .collect();
        assert_eq!(distinct.len(), 98);
    }

    #[test]
    fn test_unique_vertices_reports_mismatch() {
        let mesh = QuadSphereMesh::unit_cube(2).unwrap();
        let mut vertices = mesh.flat_vertices().to_vec();
        // Corrupt the face 1 copy of a seam vertex shared with face 0
        let idx = mesh.flat_index(GridIndex::new(1, 0, 1));
        vertices[idx] += DVec3::splat(0.5);
        let corrupted = QuadSphereMesh::from_flat(2, vertices).unwrap();

        let deduped = corrupted.unique_vertices();
        assert_eq!(deduped.mismatches.len(), 1);
        let mismatch = &deduped.mismatches[0];
        assert_eq!(mismatch.member, GridIndex::new(1, 0, 1));
        assert_eq!(mismatch.representative, GridIndex::new(0, 2, 1));
        assert_eq!(deduped.positions.len(), 26);
    }
}
