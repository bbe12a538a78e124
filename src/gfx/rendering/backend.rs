//! Renderer interface
//!
//! The scene never talks to a graphics API directly. It uploads meshes and
//! textures through a [`RenderBackend`], keeps the returned handles in each
//! node's render component, and hands the backend one [`FrameData`] per
//! frame.

use std::collections::HashSet;

use cgmath::{Matrix4, SquareMatrix};

use crate::gfx::scene::{Mesh, NodeId};

/// Backend-issued id for an uploaded vertex buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MeshHandle(pub u32);

/// Backend-issued id for an uploaded texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureHandle(pub u32);

/// Decoded RGBA8 pixels, rows top to bottom.
#[derive(Debug, Clone, PartialEq)]
pub struct TextureData {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

impl TextureData {
    /// A single white pixel, used for untextured primitives.
    pub fn white() -> Self {
        Self {
            width: 1,
            height: 1,
            rgba: vec![255; 4],
        }
    }
}

/// Where a frame is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderTarget {
    /// Straight to the window surface.
    Screen,
    /// To an offscreen framebuffer that the editor shows inside its
    /// viewport panel.
    #[default]
    Viewport,
}

/// One visible node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawItem {
    pub node: NodeId,
    /// World matrix of the node, freshly recomposed.
    pub model: Matrix4<f32>,
    pub mesh: MeshHandle,
    pub texture: TextureHandle,
    pub vertex_count: usize,
    /// Set on the editor's current selection.
    pub highlighted: bool,
}

/// Everything a backend needs to draw one frame of the scene.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameData {
    pub view: Matrix4<f32>,
    pub projection: Matrix4<f32>,
    pub target: RenderTarget,
    pub items: Vec<DrawItem>,
}

impl Default for FrameData {
    fn default() -> Self {
        Self {
            view: Matrix4::identity(),
            projection: Matrix4::identity(),
            target: RenderTarget::default(),
            items: Vec::new(),
        }
    }
}

/// Graphics API boundary.
///
/// Handles stay valid until released; releasing a handle twice is a bug in
/// the caller and backends may log it.
pub trait RenderBackend {
    /// Uploads a flat triangle list and returns its handle.
    fn upload_mesh(&mut self, mesh: &Mesh) -> MeshHandle;

    /// Uploads RGBA8 pixels and returns their handle.
    fn upload_texture(&mut self, texture: &TextureData) -> TextureHandle;

    fn release_mesh(&mut self, handle: MeshHandle);

    fn release_texture(&mut self, handle: TextureHandle);

    /// Draws the scene, then the UI on top when draw data is given.
    fn draw_frame(&mut self, frame: &FrameData, ui: Option<&imgui::DrawData>);
}

/// Backend that draws nothing.
///
/// It hands out handles, tracks which ones are still alive and remembers
/// the last frame it was asked to draw. Tests use it directly; a
/// [`CairnApp::headless`](crate::app::CairnApp::headless) window runs the
/// whole frame against it, so the window itself stays blank.
#[derive(Debug, Default)]
pub struct HeadlessBackend {
    next_id: u32,
    live_meshes: HashSet<MeshHandle>,
    live_textures: HashSet<TextureHandle>,
    frames_drawn: u64,
    last_frame: Option<FrameData>,
}

impl HeadlessBackend {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_id(&mut self) -> u32 {
        self.next_id += 1;
        self.next_id
    }

    pub fn live_mesh_count(&self) -> usize {
        self.live_meshes.len()
    }

    pub fn live_texture_count(&self) -> usize {
        self.live_textures.len()
    }

    pub fn is_mesh_live(&self, handle: MeshHandle) -> bool {
        self.live_meshes.contains(&handle)
    }

    pub fn is_texture_live(&self, handle: TextureHandle) -> bool {
        self.live_textures.contains(&handle)
    }

    pub fn frames_drawn(&self) -> u64 {
        self.frames_drawn
    }

    pub fn last_frame(&self) -> Option<&FrameData> {
        self.last_frame.as_ref()
    }
}

impl RenderBackend for HeadlessBackend {
    fn upload_mesh(&mut self, mesh: &Mesh) -> MeshHandle {
        let handle = MeshHandle(self.next_id());
        log::debug!(
            "Uploaded mesh {:?} ({} vertices)",
            handle,
            mesh.vertex_count()
        );
        self.live_meshes.insert(handle);
        handle
    }

    fn upload_texture(&mut self, texture: &TextureData) -> TextureHandle {
        let handle = TextureHandle(self.next_id());
        log::debug!(
            "Uploaded texture {:?} ({}x{})",
            handle,
            texture.width,
            texture.height
        );
        self.live_textures.insert(handle);
        handle
    }

    fn release_mesh(&mut self, handle: MeshHandle) {
        if !self.live_meshes.remove(&handle) {
            log::warn!("Released unknown mesh handle {:?}", handle);
        }
    }

    fn release_texture(&mut self, handle: TextureHandle) {
        if !self.live_textures.remove(&handle) {
            log::warn!("Released unknown texture handle {:?}", handle);
        }
    }

    fn draw_frame(&mut self, frame: &FrameData, _ui: Option<&imgui::DrawData>) {
        self.frames_drawn += 1;
        self.last_frame = Some(frame.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::geometry::generate_cube;

    #[test]
    fn test_handles_are_tracked_until_released() {
        let mut backend = HeadlessBackend::new();
        let mesh = backend.upload_mesh(&Mesh::from_geometry(&generate_cube()));
        let texture = backend.upload_texture(&TextureData::white());

        assert_ne!(mesh.0, texture.0);
        assert!(backend.is_mesh_live(mesh));
        assert_eq!(backend.live_texture_count(), 1);

        backend.release_mesh(mesh);
        backend.release_texture(texture);
        assert_eq!(backend.live_mesh_count(), 0);
        assert_eq!(backend.live_texture_count(), 0);
    }

    #[test]
    fn test_draw_frame_records_last_frame() {
        let mut backend = HeadlessBackend::new();
        assert!(backend.last_frame().is_none());

        backend.draw_frame(&FrameData::default(), None);
        backend.draw_frame(&FrameData::default(), None);
        assert_eq!(backend.frames_drawn(), 2);
        assert_eq!(backend.last_frame().map(|f| f.items.len()), Some(0));
    }
}
