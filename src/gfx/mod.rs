//! # Graphics Module
//!
//! Everything the editor knows about 3D content: the scene graph, model-matrix
//! composition, cameras, picking, and the seam to whatever draws the frame.
//!
//! ## Architecture Overview
//!
//! - **Scene Graph** ([`scene`]) - Arena of nodes with parent-relative transforms
//! - **Camera** ([`camera`]) - Projection and cursor-to-ray conversion
//! - **Picking** ([`picking`]) - Ray/triangle tests and nearest-node search
//! - **Rendering** ([`rendering`]) - The [`RenderBackend`] trait and a headless backend
//! - **Resources** ([`resources`]) - OBJ and image loading, plus `builtin:` assets
//! - **Geometry** ([`geometry`]) - Procedural cube, sphere and plane
//!
//! ## Usage
//!
//! ```rust
//! use cairn::gfx::{Scene, Transform};
//! use cairn::math::Vec3;
//!
//! let mut scene = Scene::new();
//! let table = scene.spawn("Table", Transform::from_position(Vec3::new(0.0, 1.0, 0.0)));
//! let cup = scene
//!     .spawn_child(table, "Cup", Transform::from_position(Vec3::new(0.0, 0.5, 0.0)))
//!     .unwrap();
//! assert_eq!(scene.world_matrix(cup).unwrap().w.y, 1.5);
//! ```
//!
//! [`RenderBackend`]: rendering::RenderBackend

pub mod camera;
pub mod geometry;
pub mod picking;
pub mod rendering;
pub mod resources;
pub mod scene;

// Re-export commonly used types
pub use camera::{Projection, SceneCamera, Viewport};
pub use picking::{ObjectPicker, PickResult, PickScope, Ray};
pub use rendering::{HeadlessBackend, RenderBackend};
pub use scene::{NodeId, RenderComponent, Scene, Transform};
