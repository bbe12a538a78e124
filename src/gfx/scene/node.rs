use crate::behavior::{Behavior, BehaviorKind, BehaviorSlot};

use super::render_component::RenderComponent;
use super::transform::Transform;
use super::NodeId;

/// One game object in the scene tree.
///
/// Links to parent and children are arena ids owned by the [`Scene`]; only
/// the scene mutates them, which keeps the parent link and the parent's
/// child list in agreement.
///
/// [`Scene`]: super::Scene
pub struct Node {
    /// Display name, not required to be unique.
    pub name: String,
    pub(crate) transform: Transform,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    /// Optional mesh + texture. `None` means nothing to draw.
    pub render: Option<RenderComponent>,
    pub(crate) behaviors: Vec<BehaviorSlot>,
}

impl Node {
    pub(crate) fn new(name: impl Into<String>, transform: Transform) -> Self {
        Self {
            name: name.into(),
            transform,
            parent: None,
            children: Vec::new(),
            render: None,
            behaviors: Vec::new(),
        }
    }

    /// Local transform; its model matrix is the recomposed world matrix.
    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    /// Attached behaviors in attachment order.
    ///
    /// Empty for a node whose behaviors are being dispatched this instant.
    pub fn behaviors(&self) -> impl Iterator<Item = &dyn Behavior> + '_ {
        self.behaviors.iter().map(|slot| slot.behavior.as_ref())
    }

    pub fn behaviors_mut(&mut self) -> impl Iterator<Item = &mut (dyn Behavior + 'static)> + '_ {
        self.behaviors.iter_mut().map(|slot| slot.behavior.as_mut())
    }

    /// First behavior of the given kind.
    pub fn get_component(&self, kind: BehaviorKind) -> Option<&dyn Behavior> {
        self.behaviors()
            .find(|behavior| behavior.kind() == kind)
    }

    pub fn get_component_mut(&mut self, kind: BehaviorKind) -> Option<&mut (dyn Behavior + 'static)> {
        self.behaviors_mut()
            .find(|behavior| behavior.kind() == kind)
    }

    pub fn has_payload(&self) -> bool {
        self.render.as_ref().is_some_and(RenderComponent::is_active)
    }
}

impl std::fmt::Debug for Node {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Node")
            .field("name", &self.name)
            .field("parent", &self.parent)
            .field("children", &self.children)
            .field("behaviors", &self.behaviors.len())
            .finish()
    }
}
