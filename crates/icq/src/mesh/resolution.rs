//! Resolution control: twofold refinement, coarsening and feature size.
//!
//! Refinement inserts midpoints along rows, columns and the triangulation
//! diagonal, so the refined surface is the same piecewise-linear surface
//! and stride-2 sampling recovers the original grid exactly.

use glam::DVec3;
use tracing::debug;

use super::{raw_vertex_count, QuadSphereMesh, SeamTable, FACE_COUNT};
use crate::error::IcqError;

impl QuadSphereMesh {
    /// Double the resolution `passes` times.
    pub fn refine(&mut self, passes: usize) {
        for _ in 0..passes {
            self.refine_once();
        }
        if passes > 0 {
            self.seams = SeamTable::new(self.q);
            self.invalidate_caches();
            debug!(
                "refine: {} pass(es), Q = {}, {} raw vertices",
                passes,
                self.q,
                self.vertices.len()
            );
        }
    }

    fn refine_once(&mut self) {
        let q = self.q;
        let fine = 2 * q;
        let side = q + 1;
        let fine_side = fine + 1;
        let coarse = |face: usize, j: usize, i: usize| self.vertices[face * side * side + j * side + i];
        let mid = |a: DVec3, b: DVec3| (a + b) / 2.0;

        let mut refined = Vec::with_capacity(raw_vertex_count(fine));
        for face in 0..FACE_COUNT {
            for jj in 0..fine_side {
                let (j, j_odd) = (jj / 2, jj % 2 == 1);
                for ii in 0..fine_side {
                    let (i, i_odd) = (ii / 2, ii % 2 == 1);
                    let v = match (j_odd, i_odd) {
                        (false, false) => coarse(face, j, i),
                        (false, true) => mid(coarse(face, j, i), coarse(face, j, i + 1)),
                        (true, false) => mid(coarse(face, j, i), coarse(face, j + 1, i)),
                        (true, true) => mid(coarse(face, j, i), coarse(face, j + 1, i + 1)),
                    };
                    refined.push(v);
                }
            }
        }

        self.vertices = refined;
        self.q = fine;
    }

    /// Halve the resolution `passes` times by keeping every second row and column.
    ///
    /// Fails without modifying the mesh if any pass would start from an odd
    /// resolution or drive `Q` below 1.
    pub fn coarsen(&mut self, passes: usize) -> Result<(), IcqError> {
        let mut q = self.q;
        for pass in 0..passes {
            if q / 2 < 1 || q % 2 != 0 {
                return Err(IcqError::InvalidResolution(format!(
                    "cannot coarsen Q = {} by {} pass(es): pass {} starts at Q = {}",
                    self.q,
                    passes,
                    pass + 1,
                    q
                )));
            }
            q /= 2;
        }

        for _ in 0..passes {
            self.coarsen_once();
        }
        if passes > 0 {
            self.seams = SeamTable::new(self.q);
            self.invalidate_caches();
            debug!("coarsen: {} pass(es), Q = {}", passes, self.q);
        }
        Ok(())
    }

    fn coarsen_once(&mut self) {
        let side = self.q + 1;
        let half = self.q / 2;
        let mut coarse = Vec::with_capacity(raw_vertex_count(half));
        for face in 0..FACE_COUNT {
            for j in 0..=half {
                for i in 0..=half {
                    coarse.push(self.vertices[face * side * side + 2 * j * side + 2 * i]);
                }
            }
        }
        self.vertices = coarse;
        self.q = half;
    }

    /// Smallest angle, seen from the origin, subtended by any mesh edge.
    ///
    /// Row, column and diagonal edges of every face are measured, including
    /// the closing edges along the last row and column. The result is
    /// memoized until the next refine, coarsen or vertex replacement; a
    /// single interior `set_vertex` leaves the memoized value stale.
    pub fn estimate_min_angular_feature_size(&self) -> f64 {
        if let Some(cached) = self.feature_size.get() {
            return cached;
        }

        let q = self.q;
        let side = q + 1;
        let mut min_angle = f64::INFINITY;
        for face in 0..FACE_COUNT {
            let base = face * side * side;
            let at = |j: usize, i: usize| self.vertices[base + j * side + i];
            for j in 0..=q {
                for i in 0..=q {
                    let v = at(j, i);
                    if i < q {
                        min_angle = min_angle.min(subtended_angle(v, at(j, i + 1)));
                    }
                    if j < q {
                        min_angle = min_angle.min(subtended_angle(v, at(j + 1, i)));
                    }
                    if i < q && j < q {
                        min_angle = min_angle.min(subtended_angle(v, at(j + 1, i + 1)));
                    }
                }
            }
        }

        self.feature_size.set(Some(min_angle));
        min_angle
    }
}

/// Angle between two position vectors, robust for small angles.
pub(crate) fn subtended_angle(a: DVec3, b: DVec3) -> f64 {
    a.cross(b).length().atan2(a.dot(b))
}
