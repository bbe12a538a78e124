//! Editor commands
//!
//! The editor owns the current selection, the hierarchy's move mode and the
//! inspector's text fields. Every command takes the scene (and the backend
//! when payloads change) explicitly, so the panels and the tests drive the
//! same code.

use std::path::Path;

use crate::behavior::BehaviorRegistry;
use crate::errors::Result;
use crate::gfx::camera::Viewport;
use crate::gfx::picking::ObjectPicker;
use crate::gfx::rendering::RenderBackend;
use crate::gfx::scene::document::{load_scene, save_scene};
use crate::gfx::scene::{NodeId, RenderComponent, Scene, Transform};
use crate::ui::forms::{InspectorForm, RenderForm, TransformForm};

/// Name given to nodes created from the editor.
pub const DEFAULT_NODE_NAME: &str = "Game Object";

#[derive(Debug, Default)]
pub struct Editor {
    selected: Option<NodeId>,
    moving: bool,
    /// Text fields of the inspector, rebuilt whenever the selection changes.
    pub inspector: InspectorForm,
}

impl Editor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected(&self) -> Option<NodeId> {
        self.selected
    }

    /// Whether the next hierarchy click reparents the selection.
    pub fn is_moving(&self) -> bool {
        self.moving
    }

    // ------------------------------------------------------------------
    // Selection
    // ------------------------------------------------------------------

    /// Selects `id`, moving the highlight from the previous selection.
    pub fn select(&mut self, scene: &mut Scene, id: NodeId) {
        if !scene.contains(id) {
            log::warn!("Ignoring selection of missing node {:?}", id);
            return;
        }
        self.set_highlight(scene, false);
        self.selected = Some(id);
        self.moving = false;
        self.set_highlight(scene, true);
        self.refresh_inspector(scene);
        log::info!("Selected {:?} '{}'", id, scene.get(id).map_or("", |n| n.name.as_str()));
    }

    /// Drops the selection and its highlight.
    pub fn clear(&mut self, scene: &mut Scene) {
        self.set_highlight(scene, false);
        self.selected = None;
        self.moving = false;
        self.inspector = InspectorForm::default();
    }

    fn set_highlight(&self, scene: &mut Scene, on: bool) {
        let render = self
            .selected
            .and_then(|id| scene.get_mut(id))
            .and_then(|node| node.render.as_mut());
        if let Some(render) = render {
            render.highlighted = on;
        }
    }

    /// Reloads the inspector fields from the selected node.
    pub fn refresh_inspector(&mut self, scene: &Scene) {
        self.inspector = self
            .selected
            .and_then(|id| scene.get(id))
            .map(InspectorForm::from_node)
            .unwrap_or_default();
    }

    /// Selects the nearest node under the cursor, or clears the selection
    /// when nothing is hit.
    pub fn pick(
        &mut self,
        scene: &mut Scene,
        picker: &ObjectPicker,
        cursor: [f32; 2],
        viewport: Viewport,
    ) -> Option<NodeId> {
        match picker.pick_at_cursor(scene, cursor, viewport) {
            Some(hit) => {
                self.select(scene, hit.node);
                Some(hit.node)
            }
            None => {
                self.clear(scene);
                None
            }
        }
    }

    // ------------------------------------------------------------------
    // Creation and deletion
    // ------------------------------------------------------------------

    /// Adds an empty top-level node and selects it.
    pub fn create_game_object(&mut self, scene: &mut Scene) -> NodeId {
        let id = scene.spawn(DEFAULT_NODE_NAME, Transform::identity());
        self.select(scene, id);
        id
    }

    /// Adds an empty child under the selection and selects it.
    pub fn create_child(&mut self, scene: &mut Scene) -> Option<NodeId> {
        let parent = self.selected?;
        match scene.spawn_child(parent, DEFAULT_NODE_NAME, Transform::identity()) {
            Ok(id) => {
                self.select(scene, id);
                Some(id)
            }
            Err(e) => {
                log::warn!("Could not create child: {}", e);
                None
            }
        }
    }

    /// Destroys the selected subtree.
    pub fn delete_selection(&mut self, scene: &mut Scene, backend: &mut dyn RenderBackend) {
        let Some(id) = self.selected.take() else {
            return;
        };
        self.moving = false;
        self.inspector = InspectorForm::default();
        if let Err(e) = scene.destroy(id, backend) {
            log::warn!("Could not delete {:?}: {}", id, e);
        }
    }

    // ------------------------------------------------------------------
    // Move mode
    // ------------------------------------------------------------------

    /// Turns move mode on or off. Needs a selection to turn on.
    pub fn toggle_move(&mut self) {
        self.moving = !self.moving && self.selected.is_some();
    }

    /// A click on `id` in the hierarchy: reparents the selection under it in
    /// move mode, selects it otherwise.
    pub fn hierarchy_clicked(&mut self, scene: &mut Scene, id: NodeId) {
        match self.selected {
            Some(selected) if self.moving && selected != id => {
                self.moving = false;
                if let Err(e) = scene.add_child(id, selected, None) {
                    log::warn!("Move rejected: {}", e);
                }
            }
            _ => self.select(scene, id),
        }
    }

    /// Makes the selection a top-level node and leaves move mode.
    pub fn move_selection_to_root(&mut self, scene: &mut Scene) {
        self.moving = false;
        if let Some(id) = self.selected {
            if let Err(e) = scene.move_to_root(id, None) {
                log::warn!("Move rejected: {}", e);
            }
        }
    }

    // ------------------------------------------------------------------
    // Inspector commits
    // ------------------------------------------------------------------

    pub fn commit_name(&mut self, scene: &mut Scene) {
        let Some(node) = self.selected.and_then(|id| scene.get_mut(id)) else {
            return;
        };
        node.name = self.inspector.name.clone();
    }

    /// Applies the transform fields. Returns `false`, keeping the old
    /// transform, if any field fails to parse.
    pub fn commit_transform(&mut self, scene: &mut Scene) -> bool {
        let Some(id) = self.selected else {
            return false;
        };
        let Some(transform) = self.inspector.transform.parse() else {
            log::warn!("Dropped transform edit for {:?}: not all fields are numbers", id);
            if let Some(node) = scene.get(id) {
                self.inspector.transform = TransformForm::from_transform(node.transform());
            }
            return false;
        };
        scene.update_transform(id, transform).is_ok()
    }

    /// Reloads the payload from the render fields; both fields empty removes
    /// it. The selection highlight carries over to the new payload.
    pub fn commit_render(&mut self, scene: &mut Scene, backend: &mut dyn RenderBackend) {
        let Some(id) = self.selected else {
            return;
        };
        let form: &RenderForm = &self.inspector.render;
        let (object_path, image_path) = form.paths();
        let result = if form.is_empty() {
            scene.set_render_component(id, None, backend)
        } else {
            match scene.get_mut(id).and_then(|node| node.render.as_mut()) {
                Some(render) => {
                    render.update_paths(object_path, image_path, backend);
                    Ok(())
                }
                None => {
                    let render = RenderComponent::loaded(object_path, image_path, backend);
                    scene.set_render_component(id, Some(render), backend)
                }
            }
        };
        if let Err(e) = result {
            log::warn!("Could not update payload of {:?}: {}", id, e);
        }
        self.set_highlight(scene, true);
    }

    /// Attaches the behavior named in the "Add Component" field, built with
    /// its default arguments.
    pub fn add_behavior(&mut self, scene: &mut Scene, registry: &BehaviorRegistry) -> Result<()> {
        let Some(id) = self.selected else {
            return Ok(());
        };
        let behavior = registry.create(self.inspector.new_behavior.trim(), &[])?;
        scene.attach_behavior(id, behavior)?;
        self.inspector.new_behavior.clear();
        Ok(())
    }

    // ------------------------------------------------------------------
    // Persistence
    // ------------------------------------------------------------------

    pub fn save(&self, scene: &Scene, path: impl AsRef<Path>) -> Result<()> {
        save_scene(scene, path)
    }

    /// Replaces the scene with the file at `path`. On failure the current
    /// scene is kept.
    pub fn load(
        &mut self,
        scene: &mut Scene,
        registry: &BehaviorRegistry,
        backend: &mut dyn RenderBackend,
        path: impl AsRef<Path>,
    ) -> Result<()> {
        let path = path.as_ref();
        self.clear(scene);
        load_scene(path, scene, registry, backend)?;
        log::info!("Loaded scene from {} ({} nodes)", path.display(), scene.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::behavior::Spin;
    use crate::errors::CairnError;
    use crate::gfx::camera::Projection;
    use crate::gfx::rendering::HeadlessBackend;
    use crate::math::Vec3;

    fn with_payload(scene: &mut Scene, backend: &mut HeadlessBackend, name: &str, at: Vec3) -> NodeId {
        let id = scene.spawn(name, Transform::from_position(at));
        let render = RenderComponent::loaded("builtin:cube", "builtin:white", backend);
        scene.set_render_component(id, Some(render), backend).unwrap();
        id
    }

    fn highlighted(scene: &Scene, id: NodeId) -> bool {
        scene.get(id).unwrap().render.as_ref().unwrap().highlighted
    }

    #[test]
    fn test_selection_moves_the_highlight() {
        let mut scene = Scene::new();
        let mut backend = HeadlessBackend::new();
        let mut editor = Editor::new();
        let a = with_payload(&mut scene, &mut backend, "A", Vec3::ZERO);
        let b = with_payload(&mut scene, &mut backend, "B", Vec3::ZERO);

        editor.select(&mut scene, a);
        assert!(highlighted(&scene, a));
        assert_eq!(editor.inspector.name, "A");

        editor.select(&mut scene, b);
        assert!(!highlighted(&scene, a));
        assert!(highlighted(&scene, b));

        editor.clear(&mut scene);
        assert!(!highlighted(&scene, b));
        assert_eq!(editor.selected(), None);
        assert_eq!(editor.inspector, InspectorForm::default());
    }

    #[test]
    fn test_create_and_delete() {
        let mut scene = Scene::new();
        let mut backend = HeadlessBackend::new();
        let mut editor = Editor::new();

        assert_eq!(editor.create_child(&mut scene), None);
        let root = editor.create_game_object(&mut scene);
        let child = editor.create_child(&mut scene).unwrap();
        assert_eq!(scene.get(child).unwrap().name, DEFAULT_NODE_NAME);
        assert_eq!(scene.parent(child), Some(root));
        assert_eq!(editor.selected(), Some(child));

        editor.select(&mut scene, root);
        editor.delete_selection(&mut scene, &mut backend);
        assert!(scene.is_empty());
        assert_eq!(editor.selected(), None);
    }

    #[test]
    fn test_move_mode_reparents_and_rejects_cycles() {
        let mut scene = Scene::new();
        let mut editor = Editor::new();
        let a = scene.spawn("A", Transform::identity());
        let b = scene.spawn("B", Transform::identity());

        editor.select(&mut scene, a);
        editor.toggle_move();
        assert!(editor.is_moving());
        editor.hierarchy_clicked(&mut scene, b);
        assert_eq!(scene.parent(a), Some(b));
        assert_eq!(scene.roots(), &[b]);
        assert!(!editor.is_moving());

        // B under its own child
        editor.select(&mut scene, b);
        editor.toggle_move();
        editor.hierarchy_clicked(&mut scene, a);
        assert_eq!(scene.parent(a), Some(b));
        assert_eq!(scene.parent(b), None);

        // without move mode a click just selects
        editor.hierarchy_clicked(&mut scene, a);
        assert_eq!(editor.selected(), Some(a));
        editor.move_selection_to_root(&mut scene);
        assert_eq!(scene.roots(), &[b, a]);
    }

    #[test]
    fn test_toggle_move_needs_a_selection() {
        let mut editor = Editor::new();
        editor.toggle_move();
        assert!(!editor.is_moving());
    }

    #[test]
    fn test_transform_commit_is_all_or_nothing() {
        let mut scene = Scene::new();
        let mut editor = Editor::new();
        let id = scene.spawn("Box", Transform::identity());
        editor.select(&mut scene, id);

        editor.inspector.transform.row_mut(0)[1] = "3".to_string();
        assert!(editor.commit_transform(&mut scene));
        assert_eq!(scene.get(id).unwrap().transform().position, Vec3::new(0.0, 3.0, 0.0));

        editor.inspector.transform.row_mut(0)[0] = "7".to_string();
        editor.inspector.transform.row_mut(1)[2] = "x".to_string();
        assert!(!editor.commit_transform(&mut scene));
        assert_eq!(scene.get(id).unwrap().transform().position, Vec3::new(0.0, 3.0, 0.0));
        assert_eq!(editor.inspector.transform.fields[0], "0");
    }

    #[test]
    fn test_name_and_render_commits() {
        let mut scene = Scene::new();
        let mut backend = HeadlessBackend::new();
        let mut editor = Editor::new();
        let id = scene.spawn("Box", Transform::identity());
        editor.select(&mut scene, id);

        editor.inspector.name = "Crate".to_string();
        editor.commit_name(&mut scene);
        assert_eq!(scene.get(id).unwrap().name, "Crate");

        editor.inspector.render.object_path = "builtin:cube".to_string();
        editor.inspector.render.image_path = "builtin:checker".to_string();
        editor.commit_render(&mut scene, &mut backend);
        assert!(scene.get(id).unwrap().has_payload());
        assert!(highlighted(&scene, id));
        assert_eq!(backend.live_mesh_count(), 1);

        editor.inspector.render.object_path = "builtin:sphere".to_string();
        editor.commit_render(&mut scene, &mut backend);
        assert_eq!(backend.live_mesh_count(), 1);

        editor.inspector.render = RenderForm::default();
        editor.commit_render(&mut scene, &mut backend);
        assert!(scene.get(id).unwrap().render.is_none());
        assert_eq!(backend.live_mesh_count(), 0);
        assert_eq!(backend.live_texture_count(), 0);
    }

    #[test]
    fn test_add_behavior_by_name() {
        let mut scene = Scene::new();
        let mut editor = Editor::new();
        let registry = BehaviorRegistry::with_builtins();
        let id = scene.spawn("Top", Transform::identity());
        editor.select(&mut scene, id);

        editor.inspector.new_behavior = "Spin".to_string();
        editor.add_behavior(&mut scene, &registry).unwrap();
        assert!(scene.get_component(id, Spin::KIND).is_some());
        assert!(editor.inspector.new_behavior.is_empty());

        editor.inspector.new_behavior = "Wobble".to_string();
        assert!(matches!(
            editor.add_behavior(&mut scene, &registry),
            Err(CairnError::UnknownBehavior(_))
        ));
    }

    #[test]
    fn test_click_picks_through_the_camera() {
        let mut scene = Scene::new();
        let mut backend = HeadlessBackend::new();
        let mut editor = Editor::new();
        let picker = ObjectPicker::default();
        let viewport = Viewport::new(0.0, 0.0, 160.0, 90.0);

        let camera = scene.spawn("Camera", Transform::identity());
        scene.set_active_camera(camera, Projection::default()).unwrap();
        let target = with_payload(&mut scene, &mut backend, "Target", Vec3::new(0.0, 0.0, 5.0));

        assert_eq!(editor.pick(&mut scene, &picker, [80.0, 45.0], viewport), Some(target));
        assert!(highlighted(&scene, target));

        assert_eq!(editor.pick(&mut scene, &picker, [1.0, 1.0], viewport), None);
        assert_eq!(editor.selected(), None);
        assert!(!highlighted(&scene, target));
    }

    #[test]
    fn test_save_then_load_replaces_the_scene() {
        let mut scene = Scene::new();
        let mut backend = HeadlessBackend::new();
        let mut editor = Editor::new();
        let registry = BehaviorRegistry::with_builtins();
        let path = std::env::temp_dir().join(format!("cairn_editor_{}.json", std::process::id()));

        let a = with_payload(&mut scene, &mut backend, "A", Vec3::ZERO);
        scene.spawn_child(a, "B", Transform::identity()).unwrap();
        editor.select(&mut scene, a);
        editor.save(&scene, &path).unwrap();

        editor.create_game_object(&mut scene);
        assert_eq!(scene.len(), 3);

        editor.load(&mut scene, &registry, &mut backend, &path).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(scene.len(), 2);
        assert_eq!(editor.selected(), None);
        let a = scene.find_by_name("A").unwrap();
        assert!(!highlighted(&scene, a));
        assert_eq!(backend.live_mesh_count(), 1);

        assert!(editor.load(&mut scene, &registry, &mut backend, "/no/such/scene.json").is_err());
        assert_eq!(scene.len(), 2);
    }
}
