//! # Procedural Geometry Generation
//!
//! Primitive shapes built in code so the editor has something pickable
//! without any model files: the unit cube doubles as the proxy volume for
//! nodes whose payload is inactive.
//!
//! ## Supported Primitives
//!
//! - **Cube**: unit cube centred at the origin
//! - **Sphere**: UV sphere with configurable resolution
//! - **Plane**: flat Y-up ground plane with subdivisions
//!
//! ## Usage
//!
//! ```rust
//! use cairn::gfx::geometry::{generate_cube, generate_sphere};
//! use cairn::gfx::scene::Mesh;
//!
//! let proxy = Mesh::from_geometry(&generate_cube());
//! assert_eq!(proxy.triangle_count(), 12);
//!
//! let ball = generate_sphere(16, 8);
//! assert!(ball.triangle_count() > 0);
//! ```

pub mod primitives;

pub use primitives::*;

/// Indexed geometry as produced by the generators.
///
/// Turned into a flat triangle list with
/// [`Mesh::from_geometry`](crate::gfx::scene::Mesh::from_geometry).
#[derive(Debug, Clone, Default)]
pub struct GeometryData {
    /// Vertex positions (x, y, z)
    pub vertices: Vec<[f32; 3]>,
    /// Texture coordinates (u, v)
    pub tex_coords: Vec<[f32; 2]>,
    /// Normal vectors (x, y, z)
    pub normals: Vec<[f32; 3]>,
    /// Triangle indices (counter-clockwise winding)
    pub indices: Vec<u32>,
}

impl GeometryData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    fn push_vertex(&mut self, position: [f32; 3], normal: [f32; 3], uv: [f32; 2]) -> u32 {
        let index = self.vertices.len() as u32;
        self.vertices.push(position);
        self.normals.push(normal);
        self.tex_coords.push(uv);
        index
    }
}
