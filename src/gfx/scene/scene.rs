use cgmath::{Matrix4, SquareMatrix};
use slotmap::SlotMap;

use crate::behavior::{self, Behavior, BehaviorKind, BehaviorSlot};
use crate::errors::{CairnError, Result};
use crate::gfx::camera::{Projection, SceneCamera};
use crate::gfx::rendering::{DrawItem, FrameData, RenderBackend, RenderTarget};

use super::composition;
use super::node::Node;
use super::render_component::RenderComponent;
use super::transform::Transform;
use super::NodeId;

/// Scene graph containing every node, the root list and the active camera
///
/// Nodes live in an arena and refer to each other by [`NodeId`]. The root
/// list holds exactly the nodes without a parent, in display order; children
/// are reached through their parents and never listed twice.
///
/// Every structural or transform change recomposes the cached world matrix
/// of the affected subtree before returning.
#[derive(Debug, Default)]
pub struct Scene {
    nodes: SlotMap<NodeId, Node>,
    roots: Vec<NodeId>,
    active_camera: Option<SceneCamera>,
}

impl Scene {
    /// Creates an empty scene
    pub fn new() -> Self {
        Self::default()
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    /// Mutable access to name, payload and behaviors. The transform and the
    /// links are only changed through the scene's own methods.
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id)
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Top-level nodes in display order.
    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(id).and_then(|node| node.parent)
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.nodes
            .get(id)
            .map(|node| node.children.as_slice())
            .unwrap_or(&[])
    }

    /// True if `ancestor` is on the parent chain of `node` (a node is not its
    /// own ancestor).
    pub fn is_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = self.parent(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.parent(id);
        }
        false
    }

    /// Every node with its depth below the roots, parents before children.
    pub fn walk(&self) -> Vec<(NodeId, usize)> {
        let mut order = Vec::with_capacity(self.nodes.len());
        let mut stack: Vec<(NodeId, usize)> = self.roots.iter().rev().map(|&id| (id, 0)).collect();
        while let Some((id, depth)) = stack.pop() {
            let Some(node) = self.nodes.get(id) else {
                continue;
            };
            order.push((id, depth));
            stack.extend(node.children.iter().rev().map(|&child| (child, depth + 1)));
        }
        order
    }

    /// Every node, parents before children, siblings in order.
    pub fn depth_first(&self) -> Vec<NodeId> {
        self.walk().into_iter().map(|(id, _)| id).collect()
    }

    /// First node with this name in depth-first order.
    pub fn find_by_name(&self, name: &str) -> Option<NodeId> {
        self.depth_first()
            .into_iter()
            .find(|&id| self.nodes[id].name == name)
    }

    /// World matrix composed from the parent chain.
    pub fn world_matrix(&self, id: NodeId) -> Option<Matrix4<f32>> {
        composition::world_matrix(self, id)
    }

    // ------------------------------------------------------------------
    // Tree mutation
    // ------------------------------------------------------------------

    /// Adds a new top-level node and returns its id.
    pub fn spawn(&mut self, name: impl Into<String>, transform: Transform) -> NodeId {
        let id = self.nodes.insert(Node::new(name, transform));
        self.roots.push(id);
        self.recompose_subtree(id);
        log::debug!("Spawned {:?} '{}'", id, self.nodes[id].name);
        id
    }

    /// Adds a new node as the last child of `parent`.
    pub fn spawn_child(
        &mut self,
        parent: NodeId,
        name: impl Into<String>,
        transform: Transform,
    ) -> Result<NodeId> {
        if !self.contains(parent) {
            return Err(CairnError::NodeNotFound(parent));
        }
        let id = self.spawn(name, transform);
        self.add_child(parent, id, None)?;
        Ok(id)
    }

    /// Moves `child` under `parent` at `index` (clamped), or at the end.
    ///
    /// The child is first removed from its old parent or from the root list.
    /// Fails without touching the tree if `child` is `parent` or one of its
    /// ancestors.
    pub fn add_child(&mut self, parent: NodeId, child: NodeId, index: Option<usize>) -> Result<()> {
        for id in [parent, child] {
            if !self.contains(id) {
                return Err(CairnError::NodeNotFound(id));
            }
        }
        if child == parent || self.is_ancestor(child, parent) {
            return Err(CairnError::HierarchyCycle { child, parent });
        }

        self.unlink(child);
        let siblings = &mut self.nodes[parent].children;
        let at = index.map_or(siblings.len(), |i| i.min(siblings.len()));
        siblings.insert(at, child);
        self.nodes[child].parent = Some(parent);
        self.recompose_subtree(child);

        log::debug!("Attached {:?} under {:?} at {}", child, parent, at);
        Ok(())
    }

    /// Detaches `child` from its parent and makes it a top-level node at
    /// `index` (clamped), or at the end.
    pub fn move_to_root(&mut self, child: NodeId, index: Option<usize>) -> Result<()> {
        if !self.contains(child) {
            return Err(CairnError::NodeNotFound(child));
        }
        self.unlink(child);
        let at = index.map_or(self.roots.len(), |i| i.min(self.roots.len()));
        self.roots.insert(at, child);
        self.recompose_subtree(child);
        Ok(())
    }

    /// Replaces the local transform of `id` and recomposes it and every
    /// descendant.
    pub fn update_transform(&mut self, id: NodeId, transform: Transform) -> Result<()> {
        let node = self.nodes.get_mut(id).ok_or(CairnError::NodeNotFound(id))?;
        node.transform = Transform::new(transform.position, transform.scale, transform.rotation);
        self.recompose_subtree(id);
        Ok(())
    }

    /// Destroys `id` and its whole subtree.
    ///
    /// Per node: detach from the parent, release the payload's backend
    /// handles, end every behavior, destroy the children, free the slot.
    pub fn destroy(&mut self, id: NodeId, backend: &mut dyn RenderBackend) -> Result<()> {
        if !self.contains(id) {
            return Err(CairnError::NodeNotFound(id));
        }
        self.destroy_subtree(id, backend);
        Ok(())
    }

    /// Destroys every node.
    pub fn clear(&mut self, backend: &mut dyn RenderBackend) {
        while let Some(&root) = self.roots.first() {
            self.destroy_subtree(root, backend);
        }
        self.active_camera = None;
    }

    fn destroy_subtree(&mut self, id: NodeId, backend: &mut dyn RenderBackend) {
        self.unlink(id);

        if let Some(mut render) = self.nodes.get_mut(id).and_then(|node| node.render.take()) {
            render.release(backend);
        }

        // end() may attach more behaviors or destroy this node outright
        loop {
            let slots = match self.nodes.get_mut(id) {
                Some(node) if !node.behaviors.is_empty() => std::mem::take(&mut node.behaviors),
                _ => break,
            };
            behavior::end_slots(self, backend, id, slots);
        }

        while let Some(child) = self.nodes.get(id).and_then(|node| node.children.first().copied()) {
            self.destroy_subtree(child, backend);
        }

        if self.active_camera.is_some_and(|camera| camera.node == id) {
            log::info!("Active camera {:?} destroyed", id);
            self.active_camera = None;
        }

        // the end hooks may have linked this node somewhere again
        self.unlink(id);
        if let Some(node) = self.nodes.remove(id) {
            log::debug!("Destroyed {:?} '{}'", id, node.name);
        }
    }

    /// Removes `id` from its parent's child list or from the root list.
    fn unlink(&mut self, id: NodeId) {
        let Some(parent) = self.nodes.get_mut(id).and_then(|node| node.parent.take()) else {
            self.roots.retain(|&root| root != id);
            return;
        };
        if let Some(parent) = self.nodes.get_mut(parent) {
            parent.children.retain(|&child| child != id);
        }
    }

    /// Recomputes the cached world matrix of `id` by walking up its parent
    /// chain, then pushes it down to every descendant.
    fn recompose_subtree(&mut self, id: NodeId) {
        let Some(world) = composition::world_matrix(self, id) else {
            return;
        };
        let mut stack = vec![(id, world)];
        while let Some((id, world)) = stack.pop() {
            let Some(node) = self.nodes.get_mut(id) else {
                continue;
            };
            node.transform.model_matrix = world;
            let children = node.children.clone();
            for child in children {
                if let Some(c) = self.nodes.get(child) {
                    stack.push((child, world * c.transform.local_matrix()));
                }
            }
        }
    }

    // ------------------------------------------------------------------
    // Payloads and behaviors
    // ------------------------------------------------------------------

    /// Attaches a payload, releasing the previous one.
    pub fn set_render_component(
        &mut self,
        id: NodeId,
        render: Option<RenderComponent>,
        backend: &mut dyn RenderBackend,
    ) -> Result<()> {
        let node = self.nodes.get_mut(id).ok_or(CairnError::NodeNotFound(id))?;
        if let Some(mut old) = std::mem::replace(&mut node.render, render) {
            old.release(backend);
        }
        Ok(())
    }

    /// Attaches a behavior. Its `start()` runs on the next dispatched frame.
    pub fn attach_behavior(&mut self, id: NodeId, behavior: Box<dyn Behavior>) -> Result<()> {
        let node = self.nodes.get_mut(id).ok_or(CairnError::NodeNotFound(id))?;
        log::debug!("Attached behavior {} to {:?}", behavior.kind(), id);
        node.behaviors.push(BehaviorSlot::new(behavior));
        Ok(())
    }

    /// Removes the first behavior of `kind`, calling its `end()`.
    ///
    /// Returns `false` if the node has no such behavior.
    pub fn remove_behavior(
        &mut self,
        id: NodeId,
        kind: BehaviorKind,
        backend: &mut dyn RenderBackend,
    ) -> Result<bool> {
        let node = self.nodes.get_mut(id).ok_or(CairnError::NodeNotFound(id))?;
        let Some(index) = node.behaviors.iter().position(|slot| slot.behavior.kind() == kind) else {
            return Ok(false);
        };
        let slot = node.behaviors.remove(index);
        behavior::end_slots(self, backend, id, vec![slot]);
        Ok(true)
    }

    /// First behavior of `kind` on `id`.
    pub fn get_component(&self, id: NodeId, kind: BehaviorKind) -> Option<&dyn Behavior> {
        self.nodes.get(id)?.get_component(kind)
    }

    pub fn get_component_mut(
        &mut self,
        id: NodeId,
        kind: BehaviorKind,
    ) -> Option<&mut (dyn Behavior + 'static)> {
        self.nodes.get_mut(id)?.get_component_mut(kind)
    }

    pub(crate) fn take_behaviors(&mut self, id: NodeId) -> Vec<BehaviorSlot> {
        self.nodes
            .get_mut(id)
            .map(|node| std::mem::take(&mut node.behaviors))
            .unwrap_or_default()
    }

    /// Puts dispatched slots back in front of any attached meanwhile.
    pub(crate) fn restore_behaviors(&mut self, id: NodeId, mut slots: Vec<BehaviorSlot>) {
        if let Some(node) = self.nodes.get_mut(id) {
            slots.append(&mut node.behaviors);
            node.behaviors = slots;
        }
    }

    // ------------------------------------------------------------------
    // Camera and frame data
    // ------------------------------------------------------------------

    /// Makes `node` the camera the scene is viewed and picked through.
    pub fn set_active_camera(&mut self, node: NodeId, projection: Projection) -> Result<()> {
        if !self.contains(node) {
            return Err(CairnError::NodeNotFound(node));
        }
        log::info!("Active camera set to {:?}", node);
        self.active_camera = Some(SceneCamera { node, projection });
        Ok(())
    }

    pub fn active_camera(&self) -> Option<&SceneCamera> {
        self.active_camera.as_ref()
    }

    pub fn active_camera_mut(&mut self) -> Option<&mut SceneCamera> {
        self.active_camera.as_mut()
    }

    /// Inverse world matrix of the active camera.
    ///
    /// Identity without a camera; a singular camera matrix also falls back
    /// to identity with a warning.
    pub fn view_matrix(&self) -> Matrix4<f32> {
        let Some(camera) = self.active_camera else {
            return Matrix4::identity();
        };
        composition::inverse_world_matrix(self, camera.node).unwrap_or_else(|| {
            log::warn!("Camera {:?} has a singular world matrix, using identity view", camera.node);
            Matrix4::identity()
        })
    }

    /// One draw item per node with an active payload, parents first.
    pub fn draw_items(&self) -> Vec<DrawItem> {
        self.depth_first()
            .into_iter()
            .filter_map(|id| {
                let node = &self.nodes[id];
                let render = node.render.as_ref()?;
                let (mesh, texture, vertex_count) = render.handles()?;
                Some(DrawItem {
                    node: id,
                    model: *node.transform.model_matrix(),
                    mesh,
                    texture,
                    vertex_count,
                    highlighted: render.highlighted,
                })
            })
            .collect()
    }

    /// Everything the renderer needs for one frame.
    pub fn frame_data(&self, target: RenderTarget) -> FrameData {
        FrameData {
            view: self.view_matrix(),
            projection: self
                .active_camera
                .map(|camera| camera.projection.matrix())
                .unwrap_or_else(Matrix4::identity),
            target,
            items: self.draw_items(),
        }
    }
}
