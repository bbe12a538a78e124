//! Behavior dispatch
//!
//! Runs the start/update hooks of every behavior in the scene once per
//! frame, and the end hooks when behaviors are torn down.

use imgui::Ui;

use super::traits::{BehaviorContext, BehaviorSlot, LifecycleState};
use crate::gfx::rendering::RenderBackend;
use crate::gfx::scene::{NodeId, Scene};
use crate::input::InputState;

/// Drives behaviors from the host loop
pub struct BehaviorManager {
    is_paused: bool,
    time_scale: f32,
    frames: u64,
}

impl Default for BehaviorManager {
    fn default() -> Self {
        Self::new()
    }
}

impl BehaviorManager {
    pub fn new() -> Self {
        Self {
            is_paused: false,
            time_scale: 1.0,
            frames: 0,
        }
    }

    /// Update every behavior (called every frame)
    ///
    /// Nodes are visited parents first. For each behavior the delta time is
    /// stored, `start()` runs if it has not yet, then `update()`. A behavior
    /// that destroys its own node stops the remaining behaviors of that node
    /// from updating; they get their `end()` instead.
    ///
    /// # Arguments
    /// * `delta_time` - Time elapsed since last frame in seconds
    /// * `scene` - Scene whose behaviors are dispatched
    /// * `backend` - Renderer, for behaviors that load or release assets
    /// * `input` - This frame's input snapshot
    pub fn update(
        &mut self,
        delta_time: f32,
        scene: &mut Scene,
        backend: &mut dyn RenderBackend,
        input: &InputState,
    ) {
        if self.is_paused {
            return;
        }
        let delta_time = delta_time * self.time_scale;

        for node in scene.depth_first() {
            let mut slots = scene.take_behaviors(node);
            if slots.is_empty() {
                continue;
            }

            for slot in slots.iter_mut() {
                if !scene.contains(node) {
                    break;
                }
                slot.delta_time = delta_time;
                let mut ctx = BehaviorContext {
                    scene: &mut *scene,
                    backend: &mut *backend,
                    input,
                    node,
                    delta_time,
                };
                if slot.state == LifecycleState::Constructed {
                    slot.behavior.start(&mut ctx);
                    slot.state = LifecycleState::Started;
                }
                if ctx.scene.contains(node) {
                    slot.behavior.update(&mut ctx);
                }
            }

            if scene.contains(node) {
                scene.restore_behaviors(node, slots);
            } else {
                end_slots(scene, backend, node, slots);
            }
        }

        self.frames += 1;
    }

    /// Play/pause and time scale controls
    pub fn render_ui(&mut self, ui: &Ui) {
        if ui.button(if self.is_paused { "Play" } else { "Pause" }) {
            self.is_paused = !self.is_paused;
        }
        ui.same_line();
        ui.text(format!("frame {}", self.frames));
        ui.slider("Time Scale", 0.1, 3.0, &mut self.time_scale);
    }

    pub fn is_paused(&self) -> bool {
        self.is_paused
    }

    pub fn set_paused(&mut self, paused: bool) {
        self.is_paused = paused;
    }

    pub fn time_scale(&self) -> f32 {
        self.time_scale
    }

    /// Multiplier applied to every delta time; clamped to be non-negative.
    pub fn set_time_scale(&mut self, scale: f32) {
        self.time_scale = scale.max(0.0);
    }

    /// Frames dispatched so far (paused frames excluded).
    pub fn frames(&self) -> u64 {
        self.frames
    }
}

/// Calls `end()` on every slot that has not ended yet.
///
/// Used for destroyed nodes and removed behaviors. There is no live input
/// at teardown, so the hooks see an empty snapshot.
pub(crate) fn end_slots(
    scene: &mut Scene,
    backend: &mut dyn RenderBackend,
    node: NodeId,
    slots: Vec<BehaviorSlot>,
) {
    let input = InputState::default();
    for mut slot in slots {
        if slot.state == LifecycleState::Ended {
            continue;
        }
        let mut ctx = BehaviorContext {
            scene: &mut *scene,
            backend: &mut *backend,
            input: &input,
            node,
            delta_time: slot.delta_time,
        };
        slot.behavior.end(&mut ctx);
        slot.state = LifecycleState::Ended;
        log::debug!("Ended {} on {:?}", slot.behavior.kind(), node);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::behavior::testing::{DestroySelf, Recorder, RecordingBehavior};
    use crate::gfx::rendering::HeadlessBackend;
    use crate::gfx::scene::Transform;

    struct Host {
        scene: Scene,
        backend: HeadlessBackend,
        input: InputState,
        manager: BehaviorManager,
        recorder: Recorder,
    }

    impl Host {
        fn new() -> Self {
            Self {
                scene: Scene::new(),
                backend: HeadlessBackend::new(),
                input: InputState::new(),
                manager: BehaviorManager::new(),
                recorder: Recorder::default(),
            }
        }

        fn frame(&mut self, dt: f32) {
            self.manager
                .update(dt, &mut self.scene, &mut self.backend, &self.input);
        }

        fn attach(&mut self, node: NodeId, label: &str) {
            let behavior = RecordingBehavior::new(label, &self.recorder);
            self.scene.attach_behavior(node, Box::new(behavior)).unwrap();
        }
    }

    #[test]
    fn test_start_once_then_update_every_frame() {
        let mut host = Host::new();
        let node = host.scene.spawn("Node", Transform::identity());
        host.attach(node, "a");

        host.frame(0.5);
        host.frame(0.25);
        host.frame(0.125);

        assert_eq!(host.recorder.count("a:start"), 1);
        assert_eq!(host.recorder.count("a:update"), 3);
        assert_eq!(host.recorder.deltas("a"), vec![0.5, 0.25, 0.125]);
        assert_eq!(host.manager.frames(), 3);
    }

    #[test]
    fn test_children_are_dispatched_after_parents() {
        let mut host = Host::new();
        let parent = host.scene.spawn("Parent", Transform::identity());
        let child = host
            .scene
            .spawn_child(parent, "Child", Transform::identity())
            .unwrap();
        host.attach(child, "child");
        host.attach(parent, "parent");

        host.frame(0.016);
        assert_eq!(
            host.recorder.events(),
            vec!["parent:start", "parent:update", "child:start", "child:update"]
        );
    }

    #[test]
    fn test_behavior_attached_mid_frame_starts_next_frame() {
        let mut host = Host::new();
        let node = host.scene.spawn("Node", Transform::identity());
        host.frame(0.1);
        host.attach(node, "late");
        assert_eq!(host.recorder.count("late:start"), 0);

        host.frame(0.1);
        assert_eq!(host.recorder.count("late:start"), 1);
        assert!(host.scene.get(node).unwrap().behaviors().count() == 1);
    }

    #[test]
    fn test_paused_manager_skips_updates_and_scales_time() {
        let mut host = Host::new();
        let node = host.scene.spawn("Node", Transform::identity());
        host.attach(node, "a");

        host.manager.set_paused(true);
        host.frame(1.0);
        assert_eq!(host.recorder.count("a:update"), 0);

        host.manager.set_paused(false);
        host.manager.set_time_scale(2.0);
        host.frame(0.25);
        assert_eq!(host.recorder.deltas("a"), vec![0.5]);
    }

    #[test]
    fn test_self_destroying_node_ends_all_its_behaviors() {
        let mut host = Host::new();
        let node = host.scene.spawn("Doomed", Transform::identity());
        let child = host
            .scene
            .spawn_child(node, "Kid", Transform::identity())
            .unwrap();
        host.attach(child, "kid");
        host.scene
            .attach_behavior(node, Box::new(DestroySelf::new(&host.recorder)))
            .unwrap();
        host.attach(node, "sibling");

        host.frame(0.1);

        assert!(!host.scene.contains(node));
        assert!(!host.scene.contains(child));
        assert_eq!(host.recorder.count("destroy:end"), 1);
        assert_eq!(host.recorder.count("sibling:update"), 0);
        assert_eq!(host.recorder.count("sibling:end"), 1);
        assert_eq!(host.recorder.count("kid:update"), 0);
        assert_eq!(host.recorder.count("kid:end"), 1);

        host.frame(0.1);
        assert_eq!(host.recorder.count("sibling:end"), 1);
    }
}
