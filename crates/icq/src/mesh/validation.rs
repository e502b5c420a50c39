//! Seam validation for QuadSphereMesh.

use tracing::warn;

use super::{QuadSphereMesh, SeamClassId, SeamMismatch};
use crate::error::IcqError;

impl QuadSphereMesh {
    /// Check that all copies of every seam vertex hold equal coordinates.
    ///
    /// Equality is exact. With `strict` the first mismatch is returned as
    /// [`IcqError::SeamInconsistency`]; otherwise mismatches are logged and
    /// `Ok(false)` lets the caller decide.
    pub fn validate_seams(&self, strict: bool) -> Result<bool, IcqError> {
        let mismatches = self.seam_mismatches();
        let Some(first) = mismatches.first() else {
            return Ok(true);
        };

        if strict {
            return Err(IcqError::SeamInconsistency {
                first: first.representative,
                second: first.member,
                first_value: first.expected,
                second_value: first.found,
            });
        }

        warn!(
            "validate_seams: {} seam copies disagree (first: {} = {} vs {} = {})",
            mismatches.len(),
            first.representative,
            first.expected,
            first.member,
            first.found
        );
        Ok(false)
    }

    /// Every seam copy that differs from its class representative.
    ///
    /// Corner classes are compared pairwise against the representative;
    /// with exact equality that covers all three pairs.
    pub fn seam_mismatches(&self) -> Vec<SeamMismatch> {
        let mut mismatches = Vec::new();
        for class in 0..self.seams.class_count() as SeamClassId {
            let members = self.seams.members(class);
            if members.len() < 2 {
                continue;
            }
            let rep = members[0] as usize;
            let expected = self.vertices[rep];
            for &member in &members[1..] {
                let found = self.vertices[member as usize];
                if found != expected {
                    mismatches.push(SeamMismatch {
                        class,
                        representative: self.grid_index(rep),
                        member: self.grid_index(member as usize),
                        expected,
                        found,
                    });
                }
            }
        }
        mismatches
    }
}
