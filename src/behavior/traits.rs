//! Core behavior traits
//!
//! Defines the interface for per-node scripts and the context they run in.

use std::fmt;

use imgui::Ui;
use serde_json::Value;

use crate::gfx::rendering::RenderBackend;
use crate::gfx::scene::{NodeId, Scene};
use crate::input::InputState;

/// Stable identifier of a behavior type.
///
/// The name is what scene files store and what the registry maps to a
/// factory; component lookup compares kinds, never runtime types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BehaviorKind(&'static str);

impl BehaviorKind {
    pub const fn new(name: &'static str) -> Self {
        Self(name)
    }

    pub fn name(&self) -> &'static str {
        self.0
    }
}

impl fmt::Display for BehaviorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

/// What a behavior can reach while one of its hooks runs.
///
/// The behavior's own slot is taken out of its node for the duration of the
/// call, so the whole scene is available mutably, including the owning node.
pub struct BehaviorContext<'a> {
    pub scene: &'a mut Scene,
    pub backend: &'a mut dyn RenderBackend,
    pub input: &'a InputState,
    /// The node this behavior is attached to. Already gone from the scene
    /// when `end()` runs for a node destroyed mid-update.
    pub node: NodeId,
    /// Seconds since the previous frame, set by the host before each update.
    pub delta_time: f32,
}

/// Per-frame logic attached to a scene node
///
/// Every hook is optional. The host guarantees:
/// - `start()` once, on the first frame after the behavior is attached
/// - `update()` every frame after that, with a fresh delta time
/// - `end()` exactly once, when the node is destroyed or the behavior is
///   removed; release anything the behavior holds there
pub trait Behavior {
    /// Kind tag used for lookup and persistence.
    fn kind(&self) -> BehaviorKind;

    fn start(&mut self, _ctx: &mut BehaviorContext) {}

    fn update(&mut self, _ctx: &mut BehaviorContext) {}

    fn end(&mut self, _ctx: &mut BehaviorContext) {}

    /// Constructor arguments, written back to scene files so the registry
    /// can rebuild this behavior.
    fn args(&self) -> Vec<Value> {
        Vec::new()
    }

    /// Optional: inspector controls for this behavior
    fn render_ui(&mut self, _ui: &Ui) {}
}

/// Where a behavior is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    Constructed,
    Started,
    Ended,
}

/// A behavior as stored on its node.
pub struct BehaviorSlot {
    pub(crate) behavior: Box<dyn Behavior>,
    pub(crate) delta_time: f32,
    pub(crate) state: LifecycleState,
}

impl BehaviorSlot {
    pub fn new(behavior: Box<dyn Behavior>) -> Self {
        Self {
            behavior,
            delta_time: 0.0,
            state: LifecycleState::Constructed,
        }
    }

    pub fn state(&self) -> LifecycleState {
        self.state
    }

    pub fn delta_time(&self) -> f32 {
        self.delta_time
    }
}
