//! # Scene Management Module
//!
//! The scene graph of the editor: an arena of [`Node`]s linked by stable
//! [`NodeId`] keys, each with a local [`Transform`], an optional
//! [`RenderComponent`] and attached behaviors.
//!
//! ## Key Components
//!
//! - [`Scene`] - Owns every node, the root list and the active camera
//! - [`Node`] - One game object: name, transform, links, payload, behaviors
//! - [`Transform`] - Position, scale and Euler rotation plus the cached world matrix
//! - [`composition`] - World and view matrices from the parent chain
//! - [`document`] - JSON scene files
//! - [`Mesh`] / [`Vertex3D`] - CPU-side triangle data used for picking and upload
//!
//! ## Usage
//!
//! ```rust
//! use cairn::gfx::scene::{Scene, Transform};
//! use cairn::math::Vec3;
//!
//! let mut scene = Scene::new();
//! let parent = scene.spawn("Parent", Transform::from_position(Vec3::new(1.0, 0.0, 0.0)));
//! let child = scene.spawn("Child", Transform::identity());
//! scene.add_child(parent, child, None).unwrap();
//!
//! let world = scene.world_matrix(child).unwrap();
//! assert_eq!(world.w.x, 1.0);
//! ```

pub mod composition;
pub mod document;
pub mod mesh;
pub mod node;
pub mod render_component;
pub mod scene;
pub mod transform;
pub mod vertex;

slotmap::new_key_type! {
    /// Stable handle to a node in a [`Scene`].
    pub struct NodeId;
}

// Re-export main types
pub use document::{BehaviorEntry, NodeDocument, SceneDocument};
pub use mesh::Mesh;
pub use node::Node;
pub use render_component::RenderComponent;
pub use scene::Scene;
pub use transform::Transform;
pub use vertex::Vertex3D;
