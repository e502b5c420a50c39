//! Viewing conditions and the states a batch renders per asteroid.
//!
//! A [`Condition`] fixes a rotation axis and the approach angle of the
//! observer. Every condition is rendered at each configured distance and
//! at `num_phases` evenly spaced rotation phases.

use std::f64::consts::TAU;
use std::io::{BufWriter, Write};

use asteroid_config::ViewConfig;
use glam::DVec3;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::distributions::{uniform_in, unit_vector};
use crate::error::SampleError;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    /// Unit rotation axis
    pub rotation_axis: DVec3,
    /// Longitude of the camera in the equatorial plane, radians
    pub approach_angle: f64,
}

/// Draw `count` conditions with uniform axes and approach angles in `approach_range`.
pub fn sample_conditions<R: Rng + ?Sized>(
    rng: &mut R,
    count: usize,
    approach_range: [f64; 2],
) -> Vec<Condition> {
    (0..count)
        .map(|_| Condition {
            rotation_axis: unit_vector(rng),
            approach_angle: uniform_in(rng, approach_range),
        })
        .collect()
}

/// Whitespace-separated conditions table with a comment header.
pub fn write_conditions<W: Write>(conditions: &[Condition], writer: W) -> Result<(), SampleError> {
    let mut writer = BufWriter::new(writer);
    writeln!(writer, "# RotAxis_x RotAxis_y RotAxis_z ApproachAngle")?;
    for c in conditions {
        writeln!(
            writer,
            "{} {} {} {}",
            c.rotation_axis.x, c.rotation_axis.y, c.rotation_axis.z, c.approach_angle
        )?;
    }
    writer.flush()?;
    Ok(())
}

/// One rendered view of an asteroid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpatialState {
    pub condition_id: usize,
    pub rotation_axis: DVec3,
    pub approach_angle: f64,
    pub distance: f64,
    pub phase_id: usize,
    /// Rotation about the axis, radians
    pub phase: f64,
}

impl SpatialState {
    /// File stem for the image of this state, e.g. `condition0_distance50_phase0003`.
    pub fn render_file_stem(&self) -> String {
        format!(
            "condition{}_distance{}_phase{:04}",
            self.condition_id, self.distance, self.phase_id
        )
    }
}

/// Iterates conditions, then distances, then phases (phase varies fastest).
#[derive(Debug, Clone)]
pub struct SpatialStates {
    conditions: Vec<Condition>,
    distances: Vec<f64>,
    num_phases: usize,
    next: usize,
}

impl SpatialStates {
    pub fn new(conditions: Vec<Condition>, distances: Vec<f64>, num_phases: usize) -> Self {
        Self {
            conditions,
            distances,
            num_phases,
            next: 0,
        }
    }

    pub fn from_view(conditions: Vec<Condition>, view: &ViewConfig) -> Self {
        Self::new(conditions, view.distances.clone(), view.num_phases)
    }

    fn total(&self) -> usize {
        self.conditions.len() * self.distances.len() * self.num_phases
    }
}

impl Iterator for SpatialStates {
    type Item = SpatialState;

    fn next(&mut self) -> Option<SpatialState> {
        if self.next >= self.total() {
            return None;
        }
        let n = self.next;
        self.next += 1;

        let phase_id = n % self.num_phases;
        let rest = n / self.num_phases;
        let distance_id = rest % self.distances.len();
        let condition_id = rest / self.distances.len();
        let condition = self.conditions[condition_id];

        Some(SpatialState {
            condition_id,
            rotation_axis: condition.rotation_axis,
            approach_angle: condition.approach_angle,
            distance: self.distances[distance_id],
            phase_id,
            phase: TAU * phase_id as f64 / self.num_phases as f64,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.total().saturating_sub(self.next);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for SpatialStates {}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_sample_conditions() {
        let mut rng = StdRng::seed_from_u64(8);
        let conditions = sample_conditions(&mut rng, 5, [0.0, 1.0]);
        assert_eq!(conditions.len(), 5);
        for c in &conditions {
            assert!((c.rotation_axis.length() - 1.0).abs() < 1e-12);
            assert!((0.0..1.0).contains(&c.approach_angle));
        }
        let fixed = sample_conditions(&mut rng, 2, [0.0, 0.0]);
        assert!(fixed.iter().all(|c| c.approach_angle == 0.0));
    }

    #[test]
    fn test_write_conditions() {
        let conditions = [Condition {
            rotation_axis: DVec3::Z,
            approach_angle: 0.5,
        }];
        let mut buf = Vec::new();
        write_conditions(&conditions, &mut buf).unwrap();
        assert_eq!(
            String::from_utf8(buf).unwrap(),
            "# RotAxis_x RotAxis_y RotAxis_z ApproachAngle\n0 0 1 0.5\n"
        );
    }

    #[test]
    fn test_state_order_and_phases() {
        let conditions = vec![
            Condition { rotation_axis: DVec3::X, approach_angle: 0.0 },
            Condition { rotation_axis: DVec3::Y, approach_angle: 1.0 },
        ];
        let states: Vec<_> = SpatialStates::new(conditions, vec![50.0, 80.0], 4).collect();
        assert_eq!(states.len(), 16);

        assert_eq!(states[0].condition_id, 0);
        assert_eq!(states[0].distance, 50.0);
        assert_eq!(states[3].phase_id, 3);
        assert!((states[3].phase - 1.5 * std::f64::consts::PI).abs() < 1e-15);
        assert_eq!(states[4].distance, 80.0);
        assert_eq!(states[4].phase_id, 0);
        assert_eq!(states[8].condition_id, 1);
        assert_eq!(states[8].rotation_axis, DVec3::Y);
        assert_eq!(states[15].render_file_stem(), "condition1_distance80_phase0003");
    }

    #[test]
    fn test_empty_inputs_yield_nothing() {
        let mut states = SpatialStates::new(Vec::new(), vec![50.0], 8);
        assert_eq!(states.len(), 0);
        assert!(states.next().is_none());

        let view = ViewConfig::default();
        let states = SpatialStates::from_view(
            vec![Condition { rotation_axis: DVec3::Z, approach_angle: 0.0 }],
            &view,
        );
        assert_eq!(states.len(), 8);
    }
}
