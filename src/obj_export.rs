use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::errors::*;
use crate::mesh::{Mesh, Submesh};

fn group_name(submesh: Submesh) -> &'static str {
    match submesh {
        Submesh::FloorAndCeiling => "floor_ceiling",
        Submesh::Walls => "walls",
    }
}

/// Writes the mesh as Wavefront OBJ text: positions, texture coordinates and normals, then one
/// group of faces per submesh. OBJ indices are 1-based.
pub fn write_obj<W: Write>(mesh: &Mesh, out: &mut W) -> Result<()> {
    writeln!(out, "# maze mesh: {}", mesh.stats())?;

    for v in mesh.vertices() {
        writeln!(out, "v {} {} {}", v.x, v.y, v.z)?;
    }
    for uv in mesh.uvs() {
        writeln!(out, "vt {} {}", uv.x, uv.y)?;
    }
    for n in mesh.normals() {
        writeln!(out, "vn {} {} {}", n.x, n.y, n.z)?;
    }

    let has_normals = !mesh.normals().is_empty();
    for &submesh in Submesh::ALL.iter() {
        writeln!(out, "g {}", group_name(submesh))?;
        for triangle in mesh.indices(submesh).chunks_exact(3) {
            write!(out, "f")?;
            for index in triangle {
                let i = index + 1;
                if has_normals {
                    write!(out, " {}/{}/{}", i, i, i)?;
                } else {
                    write!(out, " {}/{}", i, i)?;
                }
            }
            writeln!(out)?;
        }
    }

    Ok(())
}

pub fn write_obj_file<P: AsRef<Path>>(mesh: &Mesh, path: P) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path)
        .chain_err(|| format!("unable to create obj file {}", path.display()))?;
    let mut out = BufWriter::new(file);
    write_obj(mesh, &mut out)?;
    out.flush().chain_err(|| format!("unable to write obj file {}", path.display()))
}
