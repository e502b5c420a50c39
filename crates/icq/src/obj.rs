//! Wavefront OBJ export.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use tracing::info;

use crate::error::IcqError;
use crate::format::load_icq;
use crate::normals::NormalWeighting;
use crate::polygon::PolygonModel;

/// Write `v`, optional `vn` and `f` records with 1-based indices.
pub fn write_obj<W: Write>(model: &PolygonModel, writer: W) -> Result<(), IcqError> {
    let mut writer = BufWriter::new(writer);
    for p in &model.positions {
        writeln!(writer, "v {} {} {}", p.x, p.y, p.z)?;
    }

    match &model.normals {
        Some(normals) => {
            if normals.len() != model.positions.len() {
                return Err(IcqError::VertexCountMismatch {
                    expected: model.positions.len(),
                    found: normals.len(),
                });
            }
            for n in normals {
                writeln!(writer, "vn {} {} {}", n.x, n.y, n.z)?;
            }
            for [a, b, c] in &model.triangles {
                let (a, b, c) = (a + 1, b + 1, c + 1);
                writeln!(writer, "f {a}//{a} {b}//{b} {c}//{c}")?;
            }
        }
        None => {
            for [a, b, c] in &model.triangles {
                writeln!(writer, "f {} {} {}", a + 1, b + 1, c + 1)?;
            }
        }
    }

    writer.flush()?;
    Ok(())
}

pub fn save_obj(model: &PolygonModel, path: impl AsRef<Path>) -> Result<(), IcqError> {
    let path = path.as_ref();
    write_obj(model, File::create(path)?)?;
    info!(
        "Saved OBJ {} ({} vertices, {} triangles)",
        path.display(),
        model.vertex_count(),
        model.triangle_count()
    );
    Ok(())
}

/// Convert an ICQ file into an OBJ file with vertex normals.
///
/// Seam inconsistencies in the input are logged, not fatal.
pub fn icq_to_obj(icq_path: impl AsRef<Path>, obj_path: impl AsRef<Path>) -> Result<(), IcqError> {
    let mesh = load_icq(icq_path)?;
    mesh.validate_seams(false)?;
    let model = PolygonModel::from_mesh(&mesh).with_normals(NormalWeighting::default())?;
    save_obj(&model, obj_path)
}
