use crate::gfx::geometry::GeometryData;
use crate::math::Vec3;

use super::vertex::Vertex3D;

/// CPU-side triangle soup: every three consecutive vertices form one
/// triangle, there is no index buffer.
///
/// Picking reads triangles straight from here; the renderer receives the
/// same vertices as bytes through [`Mesh::as_bytes`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    vertices: Vec<Vertex3D>,
}

impl Mesh {
    /// Trailing vertices that do not complete a triangle are dropped.
    pub fn new(mut vertices: Vec<Vertex3D>) -> Self {
        let whole = vertices.len() - vertices.len() % 3;
        vertices.truncate(whole);
        Self { vertices }
    }

    /// Expands indexed geometry into a flat triangle list.
    pub fn from_geometry(geometry: &GeometryData) -> Self {
        let vertices = geometry
            .indices
            .iter()
            .map(|&i| {
                let i = i as usize;
                Vertex3D::new(
                    geometry.vertices[i],
                    geometry.normals.get(i).copied().unwrap_or([0.0, 0.0, 0.0]),
                    geometry.tex_coords.get(i).copied().unwrap_or([0.0, 0.0]),
                )
            })
            .collect();
        Self::new(vertices)
    }

    pub fn vertices(&self) -> &[Vertex3D] {
        &self.vertices
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.vertices.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Model-space corners of triangle `index`.
    pub fn triangle(&self, index: usize) -> Option<[Vec3; 3]> {
        let start = index * 3;
        let tri = self.vertices.get(start..start + 3)?;
        Some([
            Vec3::from(tri[0].position),
            Vec3::from(tri[1].position),
            Vec3::from(tri[2].position),
        ])
    }

    pub fn triangles(&self) -> impl Iterator<Item = [Vec3; 3]> + '_ {
        self.vertices.chunks_exact(3).map(|tri| {
            [
                Vec3::from(tri[0].position),
                Vec3::from(tri[1].position),
                Vec3::from(tri[2].position),
            ]
        })
    }

    /// Interleaved vertex bytes for upload.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::geometry::generate_cube;

    fn vertex(x: f32, y: f32, z: f32) -> Vertex3D {
        Vertex3D::new([x, y, z], [0.0, 0.0, 1.0], [0.0, 0.0])
    }

    #[test]
    fn test_partial_triangle_is_dropped() {
        let mesh = Mesh::new(vec![
            vertex(0.0, 0.0, 0.0),
            vertex(1.0, 0.0, 0.0),
            vertex(0.0, 1.0, 0.0),
            vertex(5.0, 5.0, 5.0),
        ]);
        assert_eq!(mesh.vertex_count(), 3);
        assert_eq!(mesh.triangle_count(), 1);
        assert!(mesh.triangle(1).is_none());
        assert_eq!(mesh.triangle(0).unwrap()[1], Vec3::RIGHT);
    }

    #[test]
    fn test_cube_expands_to_twelve_triangles() {
        let mesh = Mesh::from_geometry(&generate_cube());
        assert_eq!(mesh.triangle_count(), 12);
        assert_eq!(mesh.triangles().count(), 12);
        assert_eq!(mesh.as_bytes().len(), 36 * std::mem::size_of::<Vertex3D>());
    }
}
