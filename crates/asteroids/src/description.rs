//! Records of what a sampler applied to produce a shape.

use std::io::{BufWriter, Write};

use glam::DVec3;
use sculpting::{ConeField, HarmonicPerturbation};
use serde::{Deserialize, Serialize};

use crate::error::SampleError;

/// Interior vertex pushed out along its face direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Spike {
    pub face: usize,
    pub i: usize,
    pub j: usize,
}

/// Description of a sampled asteroid, persisted next to its mesh.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ShapeDescription {
    Harmonic {
        base_radius: f64,
        /// In application order
        perturbations: Vec<HarmonicPerturbation>,
        /// Final resolution after adaptive refinement
        resolution: usize,
    },
    Cones {
        field: ConeField,
        resolution: usize,
    },
    Spikes {
        spikes: Vec<Spike>,
        spike_size: f64,
        resolution: usize,
    },
}

impl ShapeDescription {
    pub fn resolution(&self) -> usize {
        match self {
            ShapeDescription::Harmonic { resolution, .. }
            | ShapeDescription::Cones { resolution, .. }
            | ShapeDescription::Spikes { resolution, .. } => *resolution,
        }
    }

    /// One space-separated record per line:
    ///
    /// - harmonics: `degree order magnitude`
    /// - cones: `theta phi radius magnitude`, ISO angles of the cone direction
    /// - spikes: `face i j`
    pub fn write_ssv<W: Write>(&self, writer: W) -> Result<(), SampleError> {
        let mut writer = BufWriter::new(writer);
        match self {
            ShapeDescription::Harmonic { perturbations, .. } => {
                for p in perturbations {
                    writeln!(writer, "{} {} {}", p.degree, p.order, p.magnitude)?;
                }
            }
            ShapeDescription::Cones { field, .. } => {
                for cone in &field.cones {
                    let (theta, phi) = iso_angles(cone.direction);
                    writeln!(writer, "{} {} {} {}", theta, phi, cone.radius, cone.magnitude)?;
                }
            }
            ShapeDescription::Spikes { spikes, .. } => {
                for spike in spikes {
                    writeln!(writer, "{} {} {}", spike.face, spike.i, spike.j)?;
                }
            }
        }
        writer.flush()?;
        Ok(())
    }

    pub fn to_json(&self) -> Result<String, SampleError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Colatitude and longitude of a direction.
fn iso_angles(direction: DVec3) -> (f64, f64) {
    let unit = direction.normalize_or_zero();
    let theta = unit.z.clamp(-1.0, 1.0).acos();
    let phi = unit.y.atan2(unit.x);
    (theta, phi)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sculpting::{Cone, ConeProfile};

    fn ssv(description: &ShapeDescription) -> String {
        let mut buf = Vec::new();
        description.write_ssv(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_harmonic_ssv() {
        let description = ShapeDescription::Harmonic {
            base_radius: 15.0,
            perturbations: vec![
                HarmonicPerturbation::new(3, -2, 1.5),
                HarmonicPerturbation::new(1, 0, 0.25),
            ],
            resolution: 16,
        };
        assert_eq!(ssv(&description), "3 -2 1.5\n1 0 0.25\n");
        assert_eq!(description.resolution(), 16);
    }

    #[test]
    fn test_cone_ssv_uses_angles() {
        let cone = Cone::from_spherical(1.0, 0.5, 0.4, -0.1);
        let description = ShapeDescription::Cones {
            field: ConeField::new(vec![cone], 15.0, ConeProfile::filleted()),
            resolution: 64,
        };
        let text = ssv(&description);
        let fields: Vec<f64> = text.split_whitespace().map(|f| f.parse().unwrap()).collect();
        assert_eq!(fields.len(), 4);
        assert!((fields[0] - 1.0).abs() < 1e-12);
        assert!((fields[1] - 0.5).abs() < 1e-12);
        assert_eq!(&fields[2..], &[0.4, -0.1]);
    }

    #[test]
    fn test_cone_json_is_bit_exact() {
        let cone = Cone::new(
            glam::DVec3::new(-0.18606650905386554, 0.5, 0.8),
            0.7,
            -0.19271820917253174,
        );
        let description = ShapeDescription::Cones {
            field: ConeField::new(vec![cone], 15.0, ConeProfile::filleted()),
            resolution: 64,
        };
        let back: ShapeDescription = serde_json::from_str(&description.to_json().unwrap()).unwrap();
        let ShapeDescription::Cones { field, .. } = back else {
            panic!("unexpected description");
        };
        assert_eq!(field.cones[0].direction.x.to_bits(), (-0.18606650905386554f64).to_bits());
        assert_eq!(field.cones[0].magnitude.to_bits(), (-0.19271820917253174f64).to_bits());
    }

    #[test]
    fn test_spike_ssv_and_json() {
        let description = ShapeDescription::Spikes {
            spikes: vec![Spike { face: 4, i: 1, j: 3 }],
            spike_size: 0.1,
            resolution: 4,
        };
        assert_eq!(ssv(&description), "4 1 3\n");

        let json = description.to_json().unwrap();
        assert!(json.contains("\"kind\": \"spikes\""));
        let back: ShapeDescription = serde_json::from_str(&json).unwrap();
        assert_eq!(back, description);
    }
}
