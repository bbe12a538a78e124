//! # Cairn Prelude
//!
//! Commonly used types in one import.
//!
//! ```rust
//! use cairn::prelude::*;
//!
//! let mut scene = Scene::new();
//! let mut backend = HeadlessBackend::new();
//! let node = scene.spawn("Top", Transform::identity());
//! scene.attach_behavior(node, Box::new(Spin::new(Vec3::UP))).unwrap();
//!
//! BehaviorManager::new().update(1.0, &mut scene, &mut backend, &InputState::new());
//! assert_eq!(scene.get(node).unwrap().transform().rotation.y, 1.0);
//! ```

// Re-export core application types
pub use crate::app::CairnApp;
pub use crate::config::EditorConfig;
pub use crate::editor::Editor;
pub use crate::errors::{CairnError, Result};
pub use crate::runtime::Runtime;

// Re-export graphics and scene types
pub use crate::gfx::camera::{Projection, Viewport};
pub use crate::gfx::geometry::{generate_cube, generate_plane, generate_sphere, GeometryData};
pub use crate::gfx::picking::{ObjectPicker, PickScope, Ray};
pub use crate::gfx::rendering::{HeadlessBackend, RenderBackend};
pub use crate::gfx::scene::{NodeId, RenderComponent, Scene, Transform};

// Re-export behavior framework
pub use crate::behavior::{
    Behavior, BehaviorContext, BehaviorKind, BehaviorManager, BehaviorRegistry, FlyCamera, Spin,
};
pub use crate::input::InputState;
pub use crate::math::Vec3;

// Re-export common external dependencies
pub use imgui::Ui;
