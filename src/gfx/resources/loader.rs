//! Mesh and texture loading
//!
//! Turns the two paths stored in a render component into CPU-side data:
//! an OBJ file becomes a flat triangle list, an image file becomes RGBA8
//! pixels. Paths starting with `builtin:` name procedural assets instead
//! of files, so a scene can be built and saved without any model on disk.

use std::path::Path;

use crate::errors::{CairnError, Result};
use crate::gfx::geometry::{generate_cube, generate_plane, generate_sphere};
use crate::gfx::rendering::TextureData;
use crate::gfx::scene::{Mesh, Vertex3D};
use crate::math::Vec3;

/// Prefix for procedural asset paths, e.g. `builtin:cube`.
pub const BUILTIN_PREFIX: &str = "builtin:";

/// Loads a mesh from an OBJ file or a `builtin:` name.
///
/// Every model in the OBJ file is appended to one triangle list. Faces are
/// triangulated; missing normals are replaced with flat face normals and
/// missing UVs with zero.
pub fn load_mesh(path: &str) -> Result<Mesh> {
    if let Some(name) = path.strip_prefix(BUILTIN_PREFIX) {
        let geometry = match name {
            "cube" => generate_cube(),
            "sphere" => generate_sphere(24, 16),
            "plane" => generate_plane(10.0, 10.0, 10, 10),
            _ => return Err(CairnError::UnknownBuiltin(path.to_string())),
        };
        return Ok(Mesh::from_geometry(&geometry));
    }

    let (models, _materials) = tobj::load_obj(
        Path::new(path),
        &tobj::LoadOptions {
            triangulate: true,
            single_index: true,
            ..Default::default()
        },
    )
    .map_err(|source| CairnError::MeshLoad {
        path: path.to_string(),
        source,
    })?;

    let mut vertices = Vec::new();
    for model in &models {
        flatten_obj_mesh(&model.mesh, &mut vertices);
    }

    if vertices.is_empty() {
        return Err(CairnError::EmptyMesh(path.to_string()));
    }

    log::debug!(
        "Loaded {} ({} models, {} triangles)",
        path,
        models.len(),
        vertices.len() / 3
    );
    Ok(Mesh::new(vertices))
}

/// Expands one indexed OBJ mesh into `out`.
fn flatten_obj_mesh(mesh: &tobj::Mesh, out: &mut Vec<Vertex3D>) {
    let has_normals = mesh.normals.len() == mesh.positions.len();
    let has_uvs = mesh.texcoords.len() / 2 == mesh.positions.len() / 3;
    let vertex_count = mesh.positions.len() / 3;

    for triangle in mesh.indices.chunks_exact(3) {
        if triangle.iter().any(|&i| i as usize >= vertex_count) {
            log::warn!("Skipping OBJ face with out-of-range index");
            continue;
        }

        let position = |i: u32| {
            let i = i as usize * 3;
            [mesh.positions[i], mesh.positions[i + 1], mesh.positions[i + 2]]
        };

        let face_normal = {
            let [a, b, c] = [triangle[0], triangle[1], triangle[2]].map(|i| Vec3::from(position(i)));
            (b - a).cross(c - a).normalize().to_array()
        };

        for &i in triangle {
            let normal = if has_normals {
                let n = i as usize * 3;
                [mesh.normals[n], mesh.normals[n + 1], mesh.normals[n + 2]]
            } else {
                face_normal
            };
            let uv = if has_uvs {
                let t = i as usize * 2;
                [mesh.texcoords[t], mesh.texcoords[t + 1]]
            } else {
                [0.0, 0.0]
            };
            out.push(Vertex3D::new(position(i), normal, uv));
        }
    }
}

/// Loads a texture from an image file or a `builtin:` name.
pub fn load_texture(path: &str) -> Result<TextureData> {
    if let Some(name) = path.strip_prefix(BUILTIN_PREFIX) {
        return match name {
            "white" => Ok(TextureData::white()),
            "checker" => Ok(checker_texture(8, 8)),
            _ => Err(CairnError::UnknownBuiltin(path.to_string())),
        };
    }

    let image = image::open(path).map_err(|source| CairnError::TextureLoad {
        path: path.to_string(),
        source,
    })?;
    let rgba = image.to_rgba8();
    let (width, height) = rgba.dimensions();

    log::debug!("Loaded {} ({}x{})", path, width, height);
    Ok(TextureData {
        width,
        height,
        rgba: rgba.into_raw(),
    })
}

fn checker_texture(width: u32, height: u32) -> TextureData {
    let mut rgba = Vec::with_capacity((width * height * 4) as usize);
    for y in 0..height {
        for x in 0..width {
            let shade = if (x + y) % 2 == 0 { 230 } else { 60 };
            rgba.extend_from_slice(&[shade, shade, shade, 255]);
        }
    }
    TextureData {
        width,
        height,
        rgba,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn temp_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("cairn-{}-{}", std::process::id(), name))
    }

    #[test]
    fn test_builtin_assets() {
        assert_eq!(load_mesh("builtin:cube").unwrap().triangle_count(), 12);
        assert!(!load_mesh("builtin:sphere").unwrap().is_empty());

        let checker = load_texture("builtin:checker").unwrap();
        assert_eq!(checker.rgba.len(), 8 * 8 * 4);

        assert!(matches!(
            load_mesh("builtin:teapot"),
            Err(CairnError::UnknownBuiltin(_))
        ));
        assert!(matches!(
            load_texture("builtin:nope"),
            Err(CairnError::UnknownBuiltin(_))
        ));
    }

    #[test]
    fn test_missing_files_are_errors() {
        assert!(matches!(
            load_mesh("/definitely/not/here.obj"),
            Err(CairnError::MeshLoad { .. })
        ));
        assert!(matches!(
            load_texture("/definitely/not/here.png"),
            Err(CairnError::TextureLoad { .. })
        ));
    }

    #[test]
    fn test_obj_quad_is_triangulated_with_face_normals() {
        let path = temp_path("quad.obj");
        {
            let mut file = std::fs::File::create(&path).unwrap();
            writeln!(file, "v 0 0 0").unwrap();
            writeln!(file, "v 1 0 0").unwrap();
            writeln!(file, "v 1 1 0").unwrap();
            writeln!(file, "v 0 1 0").unwrap();
            writeln!(file, "f 1 2 3 4").unwrap();
        }

        let mesh = load_mesh(path.to_str().unwrap()).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(mesh.triangle_count(), 2);
        for v in mesh.vertices() {
            assert_eq!(v.normal, [0.0, 0.0, 1.0]);
            assert_eq!(v.tex_coords, [0.0, 0.0]);
        }
    }
}
