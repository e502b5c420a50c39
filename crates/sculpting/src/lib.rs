//! Shape sculpting for cube-sphere asteroid models.
//!
//! This crate turns a [`icq::QuadSphereMesh`] into an asteroid-like body by
//! applying radial perturbations:
//! - Real spherical harmonics, with adaptive refinement so fine harmonics are
//!   never aliased onto an under-resolved grid
//! - Fields of angular "cones" (bumps and craters) with linear, quadratic or
//!   filleted profiles
//!
//! # Architecture
//!
//! Every transform is a pure function of a vertex's coordinates, evaluated
//! over the full redundant vertex arena into a fresh buffer and then committed
//! to the mesh in one step. Seam copies that hold equal inputs therefore hold
//! equal outputs, and a failing transform leaves the mesh untouched.
//!
//! ## Key Components
//!
//! - **Types**: perturbation descriptors and sculptor configuration
//! - **Harmonics**: normalized associated Legendre functions and real harmonics
//! - **Cones**: cone falloff profiles, including fillet geometry
//! - **Sculptor**: owns a mesh and applies transforms in sequence

pub mod cones;
pub mod error;
pub mod harmonics;
pub mod sculptor;
pub mod types;

pub use cones::{angular_distance, FilletGeometry};
pub use error::SculptError;
pub use harmonics::{real_spherical_harmonic, HarmonicBasis};
pub use sculptor::Sculptor;
pub use types::{AppliedPerturbation, Cone, ConeField, ConeProfile, HarmonicPerturbation, SculptConfig};
