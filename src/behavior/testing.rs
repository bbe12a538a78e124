//! Behaviors that record their lifecycle, for tests.

use std::cell::RefCell;
use std::rc::Rc;

use serde_json::{json, Value};

use super::traits::{Behavior, BehaviorContext, BehaviorKind};

/// Shared log of `label:hook` events.
#[derive(Clone, Default)]
pub struct Recorder {
    events: Rc<RefCell<Vec<(String, f32)>>>,
}

impl Recorder {
    fn push(&self, label: &str, hook: &str, delta_time: f32) {
        self.events
            .borrow_mut()
            .push((format!("{}:{}", label, hook), delta_time));
    }

    pub fn events(&self) -> Vec<String> {
        self.events.borrow().iter().map(|(e, _)| e.clone()).collect()
    }

    pub fn count(&self, event: &str) -> usize {
        self.events.borrow().iter().filter(|(e, _)| e == event).count()
    }

    /// Delta times seen by `label`'s updates, in order.
    pub fn deltas(&self, label: &str) -> Vec<f32> {
        let update = format!("{}:update", label);
        self.events
            .borrow()
            .iter()
            .filter(|(e, _)| *e == update)
            .map(|(_, dt)| *dt)
            .collect()
    }
}

pub struct RecordingBehavior {
    label: String,
    recorder: Recorder,
}

impl RecordingBehavior {
    pub const KIND: BehaviorKind = BehaviorKind::new("Recording");

    pub fn new(label: &str, recorder: &Recorder) -> Self {
        Self {
            label: label.to_string(),
            recorder: recorder.clone(),
        }
    }
}

impl Behavior for RecordingBehavior {
    fn kind(&self) -> BehaviorKind {
        Self::KIND
    }

    fn start(&mut self, ctx: &mut BehaviorContext) {
        self.recorder.push(&self.label, "start", ctx.delta_time);
    }

    fn update(&mut self, ctx: &mut BehaviorContext) {
        self.recorder.push(&self.label, "update", ctx.delta_time);
    }

    fn end(&mut self, ctx: &mut BehaviorContext) {
        self.recorder.push(&self.label, "end", ctx.delta_time);
    }

    fn args(&self) -> Vec<Value> {
        vec![json!(self.label)]
    }
}

/// Destroys its own node on the first update.
pub struct DestroySelf {
    recorder: Recorder,
}

impl DestroySelf {
    pub fn new(recorder: &Recorder) -> Self {
        Self {
            recorder: recorder.clone(),
        }
    }
}

impl Behavior for DestroySelf {
    fn kind(&self) -> BehaviorKind {
        BehaviorKind::new("DestroySelf")
    }

    fn update(&mut self, ctx: &mut BehaviorContext) {
        self.recorder.push("destroy", "update", ctx.delta_time);
        ctx.scene
            .destroy(ctx.node, &mut *ctx.backend)
            .expect("node is alive during its own update");
    }

    fn end(&mut self, ctx: &mut BehaviorContext) {
        self.recorder.push("destroy", "end", ctx.delta_time);
    }
}

/// Moves its own node under `keeper` when ended.
pub struct ReparentOnEnd {
    keeper: crate::gfx::scene::NodeId,
}

impl ReparentOnEnd {
    pub fn new(keeper: crate::gfx::scene::NodeId) -> Self {
        Self { keeper }
    }
}

impl Behavior for ReparentOnEnd {
    fn kind(&self) -> BehaviorKind {
        BehaviorKind::new("ReparentOnEnd")
    }

    fn end(&mut self, ctx: &mut BehaviorContext) {
        ctx.scene
            .add_child(self.keeper, ctx.node, None)
            .expect("keeper and node are both alive");
    }
}
