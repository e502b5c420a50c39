//! Legacy ICQ text format.
//!
//! The first line holds the resolution `Q`; it is followed by `6 * (Q+1)^2`
//! lines of three coordinates in flat vertex order. Columns are
//! whitespace-separated on read and tab-separated on write.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Read, Write};
use std::path::Path;

use glam::DVec3;
use tracing::{debug, info};

use crate::error::IcqError;
use crate::mesh::{raw_vertex_count, QuadSphereMesh};

/// Parse an ICQ document.
pub fn read_icq<R: Read>(reader: R) -> Result<QuadSphereMesh, IcqError> {
    let reader = BufReader::new(reader);
    let mut q: Option<usize> = None;
    let mut vertices = Vec::new();

    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        let line_no = idx + 1;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        let Some(q) = q else {
            let parsed = trimmed.parse::<usize>().map_err(|_| IcqError::MalformedInput {
                line: line_no,
                reason: format!("expected a resolution, found {:?}", trimmed),
            })?;
            if parsed == 0 {
                return Err(IcqError::MalformedInput {
                    line: line_no,
                    reason: "resolution must be at least 1".to_string(),
                });
            }
            q = Some(parsed);
            vertices.reserve(raw_vertex_count(parsed));
            continue;
        };

        if vertices.len() == raw_vertex_count(q) {
            return Err(IcqError::MalformedInput {
                line: line_no,
                reason: format!("more than {} vertices for Q = {}", raw_vertex_count(q), q),
            });
        }
        vertices.push(parse_vertex(trimmed, line_no)?);
    }

    let Some(q) = q else {
        return Err(IcqError::MalformedInput {
            line: 0,
            reason: "empty input".to_string(),
        });
    };
    let expected = raw_vertex_count(q);
    if vertices.len() != expected {
        return Err(IcqError::MalformedInput {
            line: 0,
            reason: format!(
                "expected {} vertices for Q = {}, found {}",
                expected,
                q,
                vertices.len()
            ),
        });
    }

    debug!("read_icq: Q = {}, {} vertices", q, vertices.len());
    QuadSphereMesh::from_flat(q, vertices)
}

fn parse_vertex(line: &str, line_no: usize) -> Result<DVec3, IcqError> {
    let mut coords = [0.0f64; 3];
    let mut fields = line.split_whitespace();
    for (axis, slot) in coords.iter_mut().enumerate() {
        let field = fields.next().ok_or_else(|| IcqError::MalformedInput {
            line: line_no,
            reason: format!("expected 3 coordinates, found {}", axis),
        })?;
        *slot = field.parse().map_err(|_| IcqError::MalformedInput {
            line: line_no,
            reason: format!("invalid coordinate {:?}", field),
        })?;
    }
    if fields.next().is_some() {
        return Err(IcqError::MalformedInput {
            line: line_no,
            reason: "more than 3 coordinates".to_string(),
        });
    }
    Ok(DVec3::from_array(coords))
}

/// Serialize a mesh, six decimals per coordinate.
pub fn write_icq<W: Write>(mesh: &QuadSphereMesh, writer: W) -> Result<(), IcqError> {
    let mut writer = BufWriter::new(writer);
    writeln!(writer, "\t     {}", mesh.resolution())?;
    for v in mesh.flat_vertices() {
        writeln!(writer, "\t{:.6}\t{:.6}\t{:.6}", v.x, v.y, v.z)?;
    }
    writer.flush()?;
    Ok(())
}

/// Read an ICQ file from disk.
pub fn load_icq(path: impl AsRef<Path>) -> Result<QuadSphereMesh, IcqError> {
    let path = path.as_ref();
    let mesh = read_icq(File::open(path)?)?;
    info!("Loaded ICQ model {} (Q = {})", path.display(), mesh.resolution());
    Ok(mesh)
}

/// Write an ICQ file to disk, replacing any existing file.
pub fn save_icq(mesh: &QuadSphereMesh, path: impl AsRef<Path>) -> Result<(), IcqError> {
    let path = path.as_ref();
    write_icq(mesh, File::create(path)?)?;
    info!("Saved ICQ model {} (Q = {})", path.display(), mesh.resolution());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn to_text(mesh: &QuadSphereMesh) -> String {
        let mut buf = Vec::new();
        write_icq(mesh, &mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_write_header_and_lines() {
        let mesh = QuadSphereMesh::unit_cube(1).unwrap();
        let text = to_text(&mesh);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 25);
        assert_eq!(lines[0], "\t     1");
        assert_eq!(lines[1], "\t1.000000\t-1.000000\t1.000000");
        assert!(text.ends_with('\n'));
    }

    #[test]
    fn test_round_trip_is_byte_exact() {
        let mut mesh = QuadSphereMesh::unit_cube(3).unwrap();
        let projected = mesh.flat_vertices().iter().map(|v| v.normalize() * 7.3).collect();
        mesh.replace_vertices(projected).unwrap();

        let first = to_text(&mesh);
        let reread = read_icq(first.as_bytes()).unwrap();
        assert_eq!(reread.resolution(), 3);
        assert_eq!(to_text(&reread), first);
    }

    #[test]
    fn test_read_tolerates_whitespace() {
        let mesh = QuadSphereMesh::unit_cube(1).unwrap();
        let mut text = String::from("\n  1  \n");
        for v in mesh.flat_vertices() {
            text.push_str(&format!("{} {}   {}\n\n", v.x, v.y, v.z));
        }
        let parsed = read_icq(text.as_bytes()).unwrap();
        assert_eq!(parsed.flat_vertices(), mesh.flat_vertices());
    }

    #[test]
    fn test_read_rejects_missing_vertices() {
        let text = "1\n0 0 0\n";
        assert!(matches!(
            read_icq(text.as_bytes()),
            Err(IcqError::MalformedInput { line: 0, .. })
        ));
    }

    #[test]
    fn test_read_rejects_extra_vertices() {
        let mesh = QuadSphereMesh::unit_cube(1).unwrap();
        let text = to_text(&mesh) + "\t0.0\t0.0\t0.0\n";
        assert!(matches!(
            read_icq(text.as_bytes()),
            Err(IcqError::MalformedInput { line: 26, .. })
        ));
    }

    #[test]
    fn test_read_rejects_bad_lines() {
        assert!(matches!(
            read_icq("abc\n".as_bytes()),
            Err(IcqError::MalformedInput { line: 1, .. })
        ));
        assert!(matches!(
            read_icq("0\n".as_bytes()),
            Err(IcqError::MalformedInput { line: 1, .. })
        ));
        assert!(matches!(
            read_icq("1\n1.0 2.0\n".as_bytes()),
            Err(IcqError::MalformedInput { line: 2, .. })
        ));
        assert!(matches!(
            read_icq("1\n1.0 2.0 x\n".as_bytes()),
            Err(IcqError::MalformedInput { line: 2, .. })
        ));
        assert!(matches!(
            read_icq("1\n1 2 3 4\n".as_bytes()),
            Err(IcqError::MalformedInput { line: 2, .. })
        ));
        assert!(matches!(
            read_icq("".as_bytes()),
            Err(IcqError::MalformedInput { .. })
        ));
    }
}
