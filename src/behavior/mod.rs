//! Behavior framework for the editor
//!
//! Behaviors are per-node scripts with `start`/`update`/`end` hooks. Nodes
//! own their behaviors; the [`BehaviorManager`] dispatches them once per
//! frame and the scene ends them when a node is destroyed.
//!
//! ## Quick Start
//!
//! ```rust
//! use cairn::behavior::{Behavior, BehaviorContext, BehaviorKind, BehaviorManager};
//! use cairn::gfx::rendering::HeadlessBackend;
//! use cairn::gfx::scene::{Scene, Transform};
//! use cairn::input::InputState;
//!
//! struct Rise;
//!
//! impl Behavior for Rise {
//!     fn kind(&self) -> BehaviorKind {
//!         BehaviorKind::new("Rise")
//!     }
//!
//!     fn update(&mut self, ctx: &mut BehaviorContext) {
//!         let mut t = *ctx.scene.get(ctx.node).unwrap().transform();
//!         t.position.y += ctx.delta_time;
//!         ctx.scene.update_transform(ctx.node, t).unwrap();
//!     }
//! }
//!
//! let mut scene = Scene::new();
//! let node = scene.spawn("Balloon", Transform::identity());
//! scene.attach_behavior(node, Box::new(Rise)).unwrap();
//!
//! let mut manager = BehaviorManager::new();
//! manager.update(0.5, &mut scene, &mut HeadlessBackend::new(), &InputState::new());
//! assert_eq!(scene.get(node).unwrap().transform().position.y, 0.5);
//! ```

pub mod builtin;
pub mod manager;
pub mod registry;
pub mod traits;

#[cfg(test)]
pub(crate) mod testing;

// Re-export main types
pub use builtin::{FlyCamera, Spin};
pub use manager::BehaviorManager;
pub(crate) use manager::end_slots;
pub use registry::{BehaviorFactory, BehaviorRegistry};
pub use traits::{Behavior, BehaviorContext, BehaviorKind, BehaviorSlot, LifecycleState};
