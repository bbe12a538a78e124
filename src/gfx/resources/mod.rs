// src/gfx/resources/mod.rs
//! Asset loading
//!
//! OBJ meshes through `tobj`, textures through `image`, plus the
//! procedural `builtin:` assets.

pub mod loader;

// Re-export main functions
pub use loader::{load_mesh, load_texture, BUILTIN_PREFIX};
