//! Six-face quadrilateral cube-sphere mesh.
//!
//! Faces numbering follows the legacy ICQ unfolding:
//!
//! ```text
//!                               +-------+
//!                               |   0   |
//!       +-------+-------+-------+-------+
//!       |   4   |   3   |   2   |   1   |
//!       +-------+-------+-------+-------+
//!                               |   5   |
//!                               +-------+
//! ```
//!
//! Each face is a `(Q+1)x(Q+1)` grid indexed by row `j` and column `i`, both
//! running from `0` to `Q`. Boundary rows and columns are stored once per
//! face, so every seam vertex has two (edge) or three (corner) copies; the
//! [`SeamTable`] identifies them.
//!
//! Vertices live in a single flat arena in face-major, then row-major, then
//! column order. That arena is the order of the ICQ file format and is always
//! authoritative: there is no separate grid to reconcile.

mod resolution;
mod seams;
mod topology;
mod validation;

use std::cell::Cell;
use std::fmt;

use glam::DVec3;
use serde::{Deserialize, Serialize};

use crate::error::IcqError;

pub use seams::{SeamClassId, SeamTable};
pub use topology::{DedupedVertices, SeamMismatch};

/// Number of cube faces.
pub const FACE_COUNT: usize = 6;

/// Position of a vertex in the face grid: face, row `j`, column `i`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridIndex {
    pub face: usize,
    pub j: usize,
    pub i: usize,
}

impl GridIndex {
    pub const fn new(face: usize, j: usize, i: usize) -> Self {
        Self { face, j, i }
    }
}

impl fmt::Display for GridIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(face {}, j {}, i {})", self.face, self.j, self.i)
    }
}

/// Quadrilateral cube-sphere mesh at resolution `Q`.
#[derive(Debug, Clone)]
pub struct QuadSphereMesh {
    /// Model resolution (cells per face side)
    pub(crate) q: usize,
    /// Flat vertex arena, `6 * (Q+1)^2` entries
    pub(crate) vertices: Vec<DVec3>,
    /// Seam identification for the current resolution
    pub(crate) seams: SeamTable,
    /// Memoized minimum angular feature size (see `resolution.rs`)
    pub(crate) feature_size: Cell<Option<f64>>,
}

/// Number of raw (redundant) vertices at resolution `q`.
pub fn raw_vertex_count(q: usize) -> usize {
    FACE_COUNT * (q + 1) * (q + 1)
}

/// Number of unique vertices at resolution `q`.
pub fn unique_vertex_count(q: usize) -> usize {
    let inner = q.saturating_sub(1);
    FACE_COUNT * inner * inner + 12 * inner + 8
}

impl QuadSphereMesh {
    /// Axis-aligned cube with half side 1, in the legacy face layout.
    ///
    /// Coordinates are computed from integer numerators so that copies of a
    /// seam vertex on different faces are bitwise identical.
    pub fn unit_cube(q: usize) -> Result<Self, IcqError> {
        if q == 0 {
            return Err(IcqError::InvalidResolution(
                "resolution must be at least 1".to_string(),
            ));
        }

        let qf = q as f64;
        let c = |k: usize| (2.0 * k as f64 - qf) / qf;

        let mut vertices = Vec::with_capacity(raw_vertex_count(q));
        for face in 0..FACE_COUNT {
            for j in 0..=q {
                for i in 0..=q {
                    let v = match face {
                        0 => DVec3::new(c(q - i), c(j), 1.0),
                        1 => DVec3::new(c(q - i), 1.0, c(q - j)),
                        2 => DVec3::new(1.0, c(i), c(q - j)),
                        3 => DVec3::new(c(i), -1.0, c(q - j)),
                        4 => DVec3::new(-1.0, c(q - i), c(q - j)),
                        _ => DVec3::new(c(q - i), c(q - j), -1.0),
                    };
                    vertices.push(v);
                }
            }
        }

        Self::from_flat(q, vertices)
    }

    /// Build a mesh from a flat vertex sequence in ICQ order.
    pub fn from_flat(q: usize, vertices: Vec<DVec3>) -> Result<Self, IcqError> {
        if q == 0 {
            return Err(IcqError::InvalidResolution(
                "resolution must be at least 1".to_string(),
            ));
        }
        let expected = raw_vertex_count(q);
        if vertices.len() != expected {
            return Err(IcqError::VertexCountMismatch {
                expected,
                found: vertices.len(),
            });
        }

        Ok(Self {
            q,
            vertices,
            seams: SeamTable::new(q),
            feature_size: Cell::new(None),
        })
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Model resolution `Q`.
    pub fn resolution(&self) -> usize {
        self.q
    }

    /// Flat vertex sequence in ICQ order (redundant at seams).
    pub fn flat_vertices(&self) -> &[DVec3] {
        &self.vertices
    }

    /// Number of raw vertices, `6 * (Q+1)^2`.
    pub fn raw_vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Number of unique vertices after seam identification.
    pub fn unique_vertex_count(&self) -> usize {
        self.seams.class_count()
    }

    /// Seam identification table for the current resolution.
    pub fn seams(&self) -> &SeamTable {
        &self.seams
    }

    /// Flat arena index of a grid position. Does not check bounds.
    pub fn flat_index(&self, index: GridIndex) -> usize {
        flat_index(self.q, index)
    }

    /// Grid position of a flat arena index.
    pub fn grid_index(&self, flat: usize) -> GridIndex {
        let side = self.q + 1;
        let per_face = side * side;
        let face = flat / per_face;
        let rem = flat % per_face;
        GridIndex::new(face, rem / side, rem % side)
    }

    /// Whether the grid position lies on a face boundary (shared with a neighbor face).
    pub fn is_boundary(&self, i: usize, j: usize) -> bool {
        i == 0 || j == 0 || i == self.q || j == self.q
    }

    fn check_index(&self, index: GridIndex) -> Result<(), IcqError> {
        if index.face >= FACE_COUNT || index.i > self.q || index.j > self.q {
            return Err(IcqError::IndexOutOfRange(index));
        }
        Ok(())
    }

    /// Vertex at column `i`, row `j` of `face`.
    pub fn get_vertex(&self, face: usize, i: usize, j: usize) -> Result<DVec3, IcqError> {
        let index = GridIndex::new(face, j, i);
        self.check_index(index)?;
        Ok(self.vertices[self.flat_index(index)])
    }

    /// Overwrite an interior vertex.
    ///
    /// Boundary vertices are shared with a neighboring face and cannot be
    /// moved individually; the mesh is left untouched in that case. The
    /// memoized feature size is not invalidated by this call.
    pub fn set_vertex(
        &mut self,
        face: usize,
        i: usize,
        j: usize,
        value: DVec3,
    ) -> Result<(), IcqError> {
        let index = GridIndex::new(face, j, i);
        self.check_index(index)?;
        if self.is_boundary(i, j) {
            return Err(IcqError::UnsupportedOperation(format!(
                "vertex {} lies on a face seam and cannot be set individually",
                index
            )));
        }
        let flat = self.flat_index(index);
        self.vertices[flat] = value;
        Ok(())
    }

    /// Replace the whole vertex sequence, keeping the resolution.
    ///
    /// This is a structural mutation: memoized metrics are dropped.
    pub fn replace_vertices(&mut self, vertices: Vec<DVec3>) -> Result<(), IcqError> {
        let expected = raw_vertex_count(self.q);
        if vertices.len() != expected {
            return Err(IcqError::VertexCountMismatch {
                expected,
                found: vertices.len(),
            });
        }
        self.vertices = vertices;
        self.invalidate_caches();
        Ok(())
    }

    /// Vertex in the middle of a face, at grid `(Q/2, Q/2)`.
    ///
    /// On a cube or a sphere this approximates the outward face direction.
    pub fn face_center(&self, face: usize) -> Result<DVec3, IcqError> {
        self.get_vertex(face, self.q / 2, self.q / 2)
    }

    pub(crate) fn invalidate_caches(&self) {
        self.feature_size.set(None);
    }
}

pub(crate) fn flat_index(q: usize, index: GridIndex) -> usize {
    let side = q + 1;
    index.face * side * side + index.j * side + index.i
}
