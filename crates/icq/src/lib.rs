//! Cube-sphere shape models in the implicitly connected quadrilateral (ICQ) layout
//!
//! This crate provides the mesh engine that the sculpting and sampling crates
//! build on:
//! - [`QuadSphereMesh`] - six gnomonic cube faces glued into a topological sphere
//! - [`SeamTable`] - precomputed identification of vertices shared across faces
//! - [`format`] - reading and writing the legacy ICQ text format
//! - [`polygon`] - deduplicated polygon model with vertex normals
//! - [`normals`] - per-vertex normal estimation
//! - [`obj`] - Wavefront OBJ export

pub mod error;
pub mod format;
pub mod mesh;
pub mod normals;
pub mod obj;
pub mod polygon;

pub use error::IcqError;
pub use format::{load_icq, read_icq, save_icq, write_icq};
pub use mesh::{
    DedupedVertices, GridIndex, QuadSphereMesh, SeamClassId, SeamMismatch, SeamTable, FACE_COUNT,
};
pub use normals::{compute_vertex_normals, NormalWeighting};
pub use obj::{icq_to_obj, save_obj, write_obj};
pub use polygon::{PolygonModel, RenderVertex};
