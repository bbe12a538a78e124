// src/gfx/rendering/mod.rs
//! Renderer boundary
//!
//! Handle types, per-frame draw data and the [`RenderBackend`] trait that a
//! graphics API implements. [`HeadlessBackend`] is the in-crate
//! implementation.

pub mod backend;

// Re-export main types
pub use backend::{
    DrawItem, FrameData, HeadlessBackend, MeshHandle, RenderBackend, RenderTarget, TextureData,
    TextureHandle,
};
