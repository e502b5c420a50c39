//! Per-vertex normal estimation on triangle meshes.

use glam::DVec3;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::IcqError;

/// How triangle contributions are weighted when summing vertex normals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NormalWeighting {
    /// Raw cross product `e1 x e2` scaled by `(e1 . e2) / 2`, with both edges
    /// leaving the first vertex. Reproduces normals of models exported by
    /// older tools; the scale is not an area and can be negative for obtuse
    /// corners.
    #[default]
    LegacyDot,
    /// Unit face normal scaled by the triangle area, `|e1 x e2| / 2`.
    TriangleArea,
}

/// Unit normal per vertex, accumulated from the triangles touching it.
///
/// Triangles with a zero cross product are skipped. Fails with
/// [`IcqError::DegenerateGeometry`] listing every vertex whose accumulated
/// normal has zero length.
pub fn compute_vertex_normals(
    positions: &[DVec3],
    triangles: &[[u32; 3]],
    weighting: NormalWeighting,
) -> Result<Vec<DVec3>, IcqError> {
    let mut sums = vec![DVec3::ZERO; positions.len()];
    let mut skipped = 0usize;

    for tri in triangles {
        let [a, b, c] = tri.map(|idx| idx as usize);
        if a >= positions.len() || b >= positions.len() || c >= positions.len() {
            return Err(IcqError::VertexCountMismatch {
                expected: positions.len(),
                found: a.max(b).max(c) + 1,
            });
        }

        let e1 = positions[b] - positions[a];
        let e2 = positions[c] - positions[a];
        let cross = e1.cross(e2);
        let Some(unit) = cross.try_normalize() else {
            skipped += 1;
            continue;
        };

        let contribution = match weighting {
            NormalWeighting::LegacyDot => cross * (0.5 * e1.dot(e2)),
            NormalWeighting::TriangleArea => unit * (0.5 * cross.length()),
        };
        sums[a] += contribution;
        sums[b] += contribution;
        sums[c] += contribution;
    }

    if skipped > 0 {
        warn!("compute_vertex_normals: skipped {} degenerate triangle(s)", skipped);
    }

    let mut degenerate = Vec::new();
    let normals: Vec<DVec3> = sums
        .iter()
        .enumerate()
        .map(|(idx, sum)| {
            sum.try_normalize().unwrap_or_else(|| {
                degenerate.push(idx);
                DVec3::ZERO
            })
        })
        .collect();

    if !degenerate.is_empty() {
        return Err(IcqError::DegenerateGeometry {
            indices: degenerate,
        });
    }

    debug!(
        "compute_vertex_normals: {} vertices, {} triangles, {:?}",
        positions.len(),
        triangles.len(),
        weighting
    );
    Ok(normals)
}
