//! Frame driver
//!
//! [`Runtime`] bundles the scene with everything that acts on it each frame
//! and runs the frame steps in order: behaviors, picking, then drawing. The
//! window shell feeds it events and time; tests drive it with the headless
//! backend.

use crate::behavior::{BehaviorManager, BehaviorRegistry, FlyCamera};
use crate::config::EditorConfig;
use crate::editor::Editor;
use crate::errors::Result;
use crate::gfx::camera::Viewport;
use crate::gfx::picking::ObjectPicker;
use crate::gfx::rendering::{FrameData, HeadlessBackend, RenderBackend, RenderTarget};
use crate::gfx::scene::{NodeId, Scene, Transform};
use crate::input::InputState;

/// Name of the camera node created when a scene has none.
pub const CAMERA_NODE_NAME: &str = "Camera";

pub struct Runtime<B: RenderBackend = HeadlessBackend> {
    pub scene: Scene,
    pub backend: B,
    pub registry: BehaviorRegistry,
    pub behaviors: BehaviorManager,
    pub input: InputState,
    pub picker: ObjectPicker,
    pub editor: Editor,
    pub config: EditorConfig,
    /// Where the next frame is drawn.
    pub target: RenderTarget,
    viewport: Viewport,
}

impl Runtime<HeadlessBackend> {
    pub fn headless(config: EditorConfig) -> Self {
        Self::new(config, HeadlessBackend::new())
    }
}

impl<B: RenderBackend> Runtime<B> {
    /// Empty scene with the built-in behaviors registered.
    pub fn new(config: EditorConfig, backend: B) -> Self {
        let viewport = Viewport::new(
            0.0,
            0.0,
            config.window.width as f32,
            config.window.height as f32,
        );
        Self {
            scene: Scene::new(),
            backend,
            registry: BehaviorRegistry::with_builtins(),
            behaviors: BehaviorManager::new(),
            input: InputState::new(),
            picker: ObjectPicker::new(config.picking.scope),
            editor: Editor::new(),
            target: RenderTarget::default(),
            viewport,
            config,
        }
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Moves the viewport and keeps the camera's aspect ratio in step.
    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        if let Some(camera) = self.scene.active_camera_mut() {
            camera.projection.aspect = viewport.aspect();
        }
    }

    /// Full-window viewport after a resize.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.set_viewport(Viewport::new(0.0, 0.0, width as f32, height as f32));
    }

    /// Returns the active camera, creating a fly camera at the origin if the
    /// scene has none.
    pub fn ensure_camera(&mut self) -> NodeId {
        if let Some(camera) = self.scene.active_camera() {
            return camera.node;
        }
        let node = self.scene.spawn(CAMERA_NODE_NAME, Transform::identity());
        let fly = FlyCamera::new(self.config.fly_camera.speed, self.config.fly_camera.sensitivity);
        if let Err(e) = self.scene.attach_behavior(node, Box::new(fly)) {
            log::warn!("Camera {:?} has no fly controls: {}", node, e);
        }
        let mut projection = self.config.projection();
        projection.aspect = self.viewport.aspect();
        if let Err(e) = self.scene.set_active_camera(node, projection) {
            log::warn!("Failed to activate camera {:?}: {}", node, e);
        }
        node
    }

    /// Behaviors and picking for one frame.
    ///
    /// A click is picked only when the UI did not take the pointer.
    pub fn step(&mut self, delta_time: f32, pointer_captured: bool) {
        self.behaviors
            .update(delta_time, &mut self.scene, &mut self.backend, &self.input);

        if let Some(cursor) = self.input.clicked() {
            if !pointer_captured && self.viewport.contains(cursor) {
                self.editor
                    .pick(&mut self.scene, &self.picker, cursor, self.viewport);
            }
        }
    }

    /// Draws the scene and the UI, then closes the input frame.
    pub fn render(&mut self, ui: Option<&imgui::DrawData>) -> FrameData {
        let frame = self.scene.frame_data(self.target);
        self.backend.draw_frame(&frame, ui);
        self.input.end_frame();
        frame
    }

    /// One complete frame without UI.
    pub fn frame(&mut self, delta_time: f32) -> FrameData {
        self.step(delta_time, false);
        self.render(None)
    }

    /// Saves to the configured scene path.
    pub fn save(&self) -> Result<()> {
        self.editor.save(&self.scene, &self.config.scene_path)
    }

    /// Loads the configured scene path, making sure a camera exists after.
    pub fn load(&mut self) -> Result<()> {
        self.editor.load(
            &mut self.scene,
            &self.registry,
            &mut self.backend,
            &self.config.scene_path,
        )?;
        self.set_viewport(self.viewport);
        self.ensure_camera();
        Ok(())
    }

    /// Destroys the selection, wired to the Delete key.
    pub fn delete_selection(&mut self) {
        self.editor
            .delete_selection(&mut self.scene, &mut self.backend);
    }
}
