//! # Object Picking System
//!
//! Click-to-select for the editor viewport, done by casting a ray against
//! the actual triangles of every candidate node.
//!
//! ## How it works
//!
//! 1. **Cursor to Ray**: the active camera's [`Projection`] turns the cursor
//!    into a ray in camera space, starting at the camera origin
//! 2. **Into camera space**: each triangle is moved by the node's world
//!    matrix, then by the camera's view matrix
//! 3. **Ray-Triangle test**: Möller–Trumbore gives the hit distance
//! 4. **Selection**: the node with the smallest positive distance wins
//!
//! Nodes without an active payload are tested against a proxy mesh (a unit
//! cube by default) placed with their own transform, so empty nodes can
//! still be clicked.
//!
//! ## Usage
//!
//! ```rust
//! use cairn::gfx::picking::{ray_triangle_intersection, Ray};
//! use cairn::math::Vec3;
//!
//! let ray = Ray::new(Vec3::ZERO, Vec3::FORWARD);
//! let triangle = [
//!     Vec3::new(-1.0, -1.0, 2.0),
//!     Vec3::new(1.0, -1.0, 2.0),
//!     Vec3::new(0.0, 1.0, 2.0),
//! ];
//! let t = ray_triangle_intersection(&ray, triangle).unwrap();
//! assert!((t - 2.0).abs() < 1e-6);
//! ```
//!
//! [`Projection`]: crate::gfx::camera::Projection

use cgmath::Matrix4;
use serde::{Deserialize, Serialize};

use crate::gfx::camera::Viewport;
use crate::gfx::geometry::generate_cube;
use crate::gfx::scene::{Mesh, NodeId, Scene};
use crate::math::Vec3;

/// Tolerance for the parallel test and for hits at the ray origin.
pub const EPSILON: f32 = 1e-6;

/// A 3D ray for intersection testing
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    /// Ray origin point
    pub origin: Vec3,
    /// Ray direction (normalized)
    pub direction: Vec3,
}

impl Ray {
    /// Create a new ray; the direction is normalized, so parameters along
    /// the ray are distances from the origin.
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize(),
        }
    }

    /// Get a point along the ray at distance t
    pub fn point_at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}

/// Which nodes a scene-level pick considers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PickScope {
    /// Top-level nodes only; children are never hit on their own.
    #[default]
    RootsOnly,
    /// Every node in the tree.
    WholeTree,
}

/// Result of an object picking operation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PickResult {
    /// The picked node
    pub node: NodeId,
    /// Distance from the camera along the ray
    pub distance: f32,
}

/// Möller–Trumbore ray/triangle intersection.
///
/// Returns the ray parameter `t` of the hit. [`Ray::new`] normalizes the
/// direction, so `t` is the distance from the origin whatever length the
/// direction was given with. Rays parallel to the triangle plane,
/// degenerate triangles and hits at or behind the origin give `None`.
pub fn ray_triangle_intersection(ray: &Ray, triangle: [Vec3; 3]) -> Option<f32> {
    let [p0, p1, p2] = triangle;
    let e1 = p1 - p0;
    let e2 = p2 - p0;

    let h = ray.direction.cross(e2);
    let det = e1 * h;
    if det.abs() < EPSILON {
        return None;
    }

    let inv_det = 1.0 / det;
    let s = ray.origin - p0;
    let u = inv_det * (s * h);
    if !(0.0..=1.0).contains(&u) {
        return None;
    }

    let q = s.cross(e1);
    let v = inv_det * (ray.direction * q);
    if v < 0.0 || u + v > 1.0 {
        return None;
    }

    let t = inv_det * (e2 * q);
    (t > EPSILON).then_some(t)
}

/// Nearest hit of `ray` on one node, in camera space.
///
/// Uses the node's payload mesh, or `fallback` when it has no active
/// payload, placed by the node's cached world matrix and then `view`.
pub fn find_t_of_node(
    scene: &Scene,
    node: NodeId,
    ray: &Ray,
    view: &Matrix4<f32>,
    fallback: &Mesh,
) -> Option<f32> {
    let node = scene.get(node)?;
    let mesh = node
        .render
        .as_ref()
        .and_then(|render| render.mesh())
        .unwrap_or(fallback);
    let model = node.transform().model_matrix();

    mesh.triangles()
        .filter_map(|triangle| {
            let in_camera = triangle.map(|p| p.transform_point(model).transform_point(view));
            ray_triangle_intersection(ray, in_camera)
        })
        .min_by(f32::total_cmp)
}

/// Nearest node hit by a camera-space ray, scanning top-level nodes only.
pub fn ray_cast(scene: &Scene, ray: &Ray, view: &Matrix4<f32>, fallback: &Mesh) -> Option<PickResult> {
    ray_cast_with_scope(scene, ray, view, fallback, PickScope::RootsOnly)
}

/// Nearest node hit by a camera-space ray among the nodes `scope` allows.
///
/// The active camera node is never a candidate: the ray starts inside its
/// proxy volume. Ties keep the node found first.
pub fn ray_cast_with_scope(
    scene: &Scene,
    ray: &Ray,
    view: &Matrix4<f32>,
    fallback: &Mesh,
    scope: PickScope,
) -> Option<PickResult> {
    let candidates = match scope {
        PickScope::RootsOnly => scene.roots().to_vec(),
        PickScope::WholeTree => scene.depth_first(),
    };

    let camera = scene.active_camera().map(|camera| camera.node);

    let mut closest: Option<PickResult> = None;
    for node in candidates {
        if Some(node) == camera {
            continue;
        }
        let Some(distance) = find_t_of_node(scene, node, ray, view, fallback) else {
            continue;
        };
        if closest.map_or(true, |best| distance < best.distance) {
            closest = Some(PickResult { node, distance });
        }
    }
    closest
}

/// Picks through the scene's active camera.
pub struct ObjectPicker {
    proxy: Mesh,
    scope: PickScope,
}

impl Default for ObjectPicker {
    fn default() -> Self {
        Self::new(PickScope::default())
    }
}

impl ObjectPicker {
    /// Picker with a unit cube as the proxy for payload-less nodes.
    pub fn new(scope: PickScope) -> Self {
        Self {
            proxy: Mesh::from_geometry(&generate_cube()),
            scope,
        }
    }

    pub fn with_proxy(mut self, proxy: Mesh) -> Self {
        self.proxy = proxy;
        self
    }

    pub fn scope(&self) -> PickScope {
        self.scope
    }

    pub fn set_scope(&mut self, scope: PickScope) {
        self.scope = scope;
    }

    /// Nearest node along a camera-space ray of the active camera.
    pub fn pick(&self, scene: &Scene, ray: &Ray) -> Option<PickResult> {
        ray_cast_with_scope(scene, ray, &scene.view_matrix(), &self.proxy, self.scope)
    }

    /// Nearest node under the cursor, `None` without an active camera or
    /// when the cursor is outside the viewport.
    pub fn pick_at_cursor(&self, scene: &Scene, cursor: [f32; 2], viewport: Viewport) -> Option<PickResult> {
        let camera = scene.active_camera()?;
        let ray = camera.projection.screen_ray(cursor, viewport)?;
        let result = self.pick(scene, &ray);
        log::debug!("Pick at {:?}: {:?}", cursor, result);
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::camera::Projection;
    use crate::gfx::rendering::HeadlessBackend;
    use crate::gfx::scene::{RenderComponent, Transform};
    use approx::assert_relative_eq;
    use cgmath::SquareMatrix;

    fn front_triangle(z: f32) -> [Vec3; 3] {
        [
            Vec3::new(-1.0, -1.0, z),
            Vec3::new(1.0, -1.0, z),
            Vec3::new(0.0, 1.0, z),
        ]
    }

    fn proxy() -> Mesh {
        Mesh::from_geometry(&generate_cube())
    }

    #[test]
    fn test_ray_hits_triangle_in_front() {
        let ray = Ray::new(Vec3::ZERO, Vec3::FORWARD);
        let t = ray_triangle_intersection(&ray, front_triangle(2.0)).unwrap();
        assert_relative_eq!(t, 2.0, epsilon = 1e-6);
    }

    #[test]
    fn test_hit_parameter_is_distance_for_long_direction() {
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, 5.0));
        let t = ray_triangle_intersection(&ray, front_triangle(2.0)).unwrap();
        assert_relative_eq!(t, 2.0, epsilon = 1e-6);
        assert!(ray.point_at(t).abs_diff_eq(Vec3::new(0.0, 0.0, 2.0), 1e-6));
    }

    #[test]
    fn test_triangle_behind_origin_is_missed() {
        let ray = Ray::new(Vec3::ZERO, Vec3::FORWARD);
        assert!(ray_triangle_intersection(&ray, front_triangle(-2.0)).is_none());
    }

    #[test]
    fn test_parallel_ray_is_missed() {
        let ray = Ray::new(Vec3::ZERO, Vec3::RIGHT);
        assert!(ray_triangle_intersection(&ray, front_triangle(2.0)).is_none());
    }

    #[test]
    fn test_degenerate_triangle_is_missed() {
        let ray = Ray::new(Vec3::ZERO, Vec3::FORWARD);
        let p = Vec3::new(0.0, 0.0, 2.0);
        assert!(ray_triangle_intersection(&ray, [p, p, p]).is_none());
    }

    #[test]
    fn test_ray_outside_triangle_is_missed() {
        let ray = Ray::new(Vec3::new(5.0, 0.0, 0.0), Vec3::FORWARD);
        assert!(ray_triangle_intersection(&ray, front_triangle(2.0)).is_none());
    }

    #[test]
    fn test_find_t_uses_node_transform_for_proxy() {
        let mut scene = Scene::new();
        let node = scene.spawn("Box", Transform::from_position(Vec3::new(0.0, 0.0, 5.0)));
        let ray = Ray::new(Vec3::ZERO, Vec3::FORWARD);

        let t = find_t_of_node(&scene, node, &ray, &Matrix4::identity(), &proxy()).unwrap();
        assert_relative_eq!(t, 4.5, epsilon = 1e-5);
    }

    #[test]
    fn test_find_t_prefers_active_payload() {
        let mut scene = Scene::new();
        let mut backend = HeadlessBackend::new();
        let node = scene.spawn(
            "Ball",
            Transform::from_position(Vec3::new(0.0, 0.0, 10.0)).with_scale(Vec3::new(2.0, 2.0, 2.0)),
        );
        let render = RenderComponent::loaded("builtin:sphere", "builtin:white", &mut backend);
        scene.set_render_component(node, Some(render), &mut backend).unwrap();

        let ray = Ray::new(Vec3::new(0.05, 0.07, 0.0), Vec3::FORWARD);
        let t = find_t_of_node(&scene, node, &ray, &Matrix4::identity(), &proxy()).unwrap();
        // radius-2 tessellated sphere, not the radius-1 proxy cube
        assert!(t > 7.9 && t < 8.2, "t = {}", t);
    }

    #[test]
    fn test_nearest_root_is_picked() {
        let mut scene = Scene::new();
        let far = scene.spawn("Far", Transform::from_position(Vec3::new(0.0, 0.0, 20.0)));
        let near = scene.spawn("Near", Transform::from_position(Vec3::new(0.0, 0.0, 8.0)));
        let _aside = scene.spawn("Aside", Transform::from_position(Vec3::new(30.0, 0.0, 8.0)));

        let ray = Ray::new(Vec3::ZERO, Vec3::FORWARD);
        let hit = ray_cast(&scene, &ray, &Matrix4::identity(), &proxy()).unwrap();
        assert_eq!(hit.node, near);
        assert_relative_eq!(hit.distance, 7.5, epsilon = 1e-5);

        let behind = Ray::new(Vec3::ZERO, Vec3::BACKWARD);
        assert!(ray_cast(&scene, &behind, &Matrix4::identity(), &proxy()).is_none());
        assert!(scene.contains(far));
    }

    #[test]
    fn test_empty_scene_picks_nothing() {
        let scene = Scene::new();
        let ray = Ray::new(Vec3::ZERO, Vec3::FORWARD);
        assert!(ray_cast(&scene, &ray, &Matrix4::identity(), &proxy()).is_none());
    }

    #[test]
    fn test_roots_only_ignores_nested_children() {
        let mut scene = Scene::new();
        let parent = scene.spawn("Parent", Transform::from_position(Vec3::new(0.0, 50.0, 0.0)));
        let child = scene
            .spawn_child(parent, "Child", Transform::from_position(Vec3::new(0.0, -50.0, 6.0)))
            .unwrap();
        let ray = Ray::new(Vec3::ZERO, Vec3::FORWARD);

        let roots_only = ray_cast_with_scope(&scene, &ray, &Matrix4::identity(), &proxy(), PickScope::RootsOnly);
        assert!(roots_only.is_none());

        let whole = ray_cast_with_scope(&scene, &ray, &Matrix4::identity(), &proxy(), PickScope::WholeTree).unwrap();
        assert_eq!(whole.node, child);
    }

    #[test]
    fn test_pick_goes_through_camera_view() {
        let mut scene = Scene::new();
        let camera = scene.spawn("Camera", Transform::from_position(Vec3::new(0.0, 0.0, -10.0)));
        scene.set_active_camera(camera, Projection::default()).unwrap();
        let target = scene.spawn("Target", Transform::identity());

        let picker = ObjectPicker::default();
        let viewport = Viewport::new(0.0, 0.0, 800.0, 450.0);
        let hit = picker.pick_at_cursor(&scene, [400.0, 225.0], viewport).unwrap();
        assert_eq!(hit.node, target);
        assert_relative_eq!(hit.distance, 9.5, epsilon = 1e-4);

        assert!(picker.pick_at_cursor(&scene, [5.0, 5.0], viewport).is_none());
    }
}
