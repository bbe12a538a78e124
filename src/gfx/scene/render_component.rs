//! Render payload of a scene node

use crate::gfx::rendering::{MeshHandle, RenderBackend, TextureHandle};
use crate::gfx::resources::{load_mesh, load_texture};

use super::mesh::Mesh;

/// Mesh and texture attached to a node.
///
/// The component remembers the two paths it was built from so the scene can
/// be saved again. It is *active* only when both paths are set and both
/// assets loaded and uploaded; an inactive payload is not drawn and picking
/// falls back to a proxy volume for it.
#[derive(Debug, Default)]
pub struct RenderComponent {
    object_path: String,
    image_path: String,
    mesh: Option<Mesh>,
    mesh_handle: Option<MeshHandle>,
    texture_handle: Option<TextureHandle>,
    /// Drawn with the selection highlight.
    pub highlighted: bool,
}

impl RenderComponent {
    /// Unloaded component; call [`load`](Self::load) to activate it.
    pub fn new(object_path: impl Into<String>, image_path: impl Into<String>) -> Self {
        Self {
            object_path: object_path.into(),
            image_path: image_path.into(),
            ..Default::default()
        }
    }

    /// Builds a component and loads it right away.
    pub fn loaded(
        object_path: impl Into<String>,
        image_path: impl Into<String>,
        backend: &mut dyn RenderBackend,
    ) -> Self {
        let mut component = Self::new(object_path, image_path);
        component.load(backend);
        component
    }

    pub fn object_path(&self) -> &str {
        &self.object_path
    }

    pub fn image_path(&self) -> &str {
        &self.image_path
    }

    /// Loads both assets and uploads them.
    ///
    /// Failures are logged and leave the component inactive. Handles from a
    /// previous load are released first.
    pub fn load(&mut self, backend: &mut dyn RenderBackend) {
        self.release(backend);

        if self.object_path.is_empty() || self.image_path.is_empty() {
            return;
        }

        let mesh = match load_mesh(&self.object_path) {
            Ok(mesh) => mesh,
            Err(e) => {
                log::warn!("Render component inactive: {}", e);
                return;
            }
        };
        let texture = match load_texture(&self.image_path) {
            Ok(texture) => texture,
            Err(e) => {
                log::warn!("Render component inactive: {}", e);
                return;
            }
        };

        self.mesh_handle = Some(backend.upload_mesh(&mesh));
        self.texture_handle = Some(backend.upload_texture(&texture));
        self.mesh = Some(mesh);
    }

    /// Replaces both paths and reloads.
    pub fn update_paths(
        &mut self,
        object_path: impl Into<String>,
        image_path: impl Into<String>,
        backend: &mut dyn RenderBackend,
    ) {
        self.release(backend);
        self.object_path = object_path.into();
        self.image_path = image_path.into();
        self.load(backend);
    }

    /// Gives the uploaded handles back to the backend. Idempotent.
    pub fn release(&mut self, backend: &mut dyn RenderBackend) {
        if let Some(handle) = self.mesh_handle.take() {
            backend.release_mesh(handle);
        }
        if let Some(handle) = self.texture_handle.take() {
            backend.release_texture(handle);
        }
        self.mesh = None;
    }

    pub fn is_active(&self) -> bool {
        self.mesh.is_some() && self.mesh_handle.is_some() && self.texture_handle.is_some()
    }

    /// CPU copy of the loaded mesh, `None` while inactive.
    pub fn mesh(&self) -> Option<&Mesh> {
        self.mesh.as_ref().filter(|_| self.is_active())
    }

    /// Backend handles and vertex count, `None` while inactive.
    pub fn handles(&self) -> Option<(MeshHandle, TextureHandle, usize)> {
        match (self.mesh_handle, self.texture_handle, &self.mesh) {
            (Some(mesh), Some(texture), Some(data)) => Some((mesh, texture, data.vertex_count())),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::rendering::HeadlessBackend;

    #[test]
    fn test_empty_path_is_inactive() {
        let mut backend = HeadlessBackend::new();
        let component = RenderComponent::loaded("builtin:cube", "", &mut backend);
        assert!(!component.is_active());
        assert!(component.mesh().is_none());
        assert_eq!(backend.live_mesh_count(), 0);
    }

    #[test]
    fn test_failed_load_is_inactive() {
        let mut backend = HeadlessBackend::new();
        let component = RenderComponent::loaded("missing.obj", "builtin:white", &mut backend);
        assert!(!component.is_active());
        assert_eq!(backend.live_mesh_count(), 0);
        assert_eq!(backend.live_texture_count(), 0);
    }

    #[test]
    fn test_update_paths_releases_old_handles() {
        let mut backend = HeadlessBackend::new();
        let mut component = RenderComponent::loaded("builtin:cube", "builtin:white", &mut backend);
        let (old_mesh, old_texture, count) = component.handles().unwrap();
        assert_eq!(count, 36);

        component.update_paths("builtin:sphere", "builtin:checker", &mut backend);
        assert!(component.is_active());
        assert!(!backend.is_mesh_live(old_mesh));
        assert!(!backend.is_texture_live(old_texture));
        assert_eq!(backend.live_mesh_count(), 1);
        assert_eq!(component.object_path(), "builtin:sphere");

        component.release(&mut backend);
        component.release(&mut backend);
        assert_eq!(backend.live_mesh_count(), 0);
        assert!(!component.is_active());
    }
}
