//! # Vertex Data Structures
//!
//! The interleaved vertex format shared by the OBJ loader, the procedural
//! primitives and the renderer interface.

/// A 3D vertex with position, normal and texture coordinates.
///
/// # Memory Layout
///
/// The `#[repr(C)]` attribute keeps the interleaved `x y z nx ny nz u v`
/// layout, 32 bytes per vertex, so a mesh can be handed to a GPU backend
/// with a plain byte cast.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Default, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex3D {
    /// 3D position coordinates [x, y, z]
    pub position: [f32; 3],
    /// 3D normal vector [nx, ny, nz] for lighting calculations
    pub normal: [f32; 3],
    /// Texture coordinates [u, v]
    pub tex_coords: [f32; 2],
}

impl Vertex3D {
    /// Number of `f32` values per vertex in the interleaved layout.
    pub const FLOATS: usize = 8;

    pub fn new(position: [f32; 3], normal: [f32; 3], tex_coords: [f32; 2]) -> Self {
        Self {
            position,
            normal,
            tex_coords,
        }
    }
}
