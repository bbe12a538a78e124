//! Model-matrix composition
//!
//! A node's world matrix is its local matrix preceded by every ancestor's:
//! `world(n) = world(parent) * local(n)`. The walk starts at the node and
//! left-multiplies each ancestor in turn, which gives the same product as
//! multiplying from the root down.

use cgmath::{Matrix4, SquareMatrix};

use super::{NodeId, Scene};

/// World matrix of `node`, or `None` if it is not in the scene.
pub fn world_matrix(scene: &Scene, node: NodeId) -> Option<Matrix4<f32>> {
    let mut current = scene.get(node)?;
    let mut world = current.transform().local_matrix();
    while let Some(parent) = current.parent() {
        current = scene.get(parent)?;
        world = current.transform().local_matrix() * world;
    }
    Some(world)
}

/// Inverse of the world matrix, mapping world space into the node's own
/// frame. This is the view matrix when `node` is a camera.
///
/// `None` when the node is missing or its world matrix is singular (a zero
/// scale anywhere on the chain).
pub fn inverse_world_matrix(scene: &Scene, node: NodeId) -> Option<Matrix4<f32>> {
    world_matrix(scene, node)?.invert()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::scene::Transform;
    use crate::math::Vec3;
    use approx::assert_relative_eq;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn random_vec(rng: &mut StdRng, lo: f32, hi: f32) -> Vec3 {
        Vec3::new(
            rng.random_range(lo..hi),
            rng.random_range(lo..hi),
            rng.random_range(lo..hi),
        )
    }

    fn random_transform(rng: &mut StdRng) -> Transform {
        Transform::new(
            random_vec(rng, -5.0, 5.0),
            random_vec(rng, 0.5, 2.0),
            random_vec(rng, -3.0, 3.0),
        )
    }

    #[test]
    fn test_root_world_matrix_is_local() {
        let mut scene = Scene::new();
        let t = Transform::new(Vec3::new(1.0, 2.0, 3.0), Vec3::new(2.0, 1.0, 0.5), Vec3::new(0.1, 0.2, 0.3));
        let root = scene.spawn("Root", t);
        assert_eq!(world_matrix(&scene, root).unwrap(), t.local_matrix());
    }

    #[test]
    fn test_walk_up_equals_root_down() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut scene = Scene::new();
        let transforms: Vec<Transform> = (0..4).map(|_| random_transform(&mut rng)).collect();

        let mut parent = scene.spawn("n0", transforms[0]);
        let mut chain = vec![parent];
        for (i, t) in transforms.iter().enumerate().skip(1) {
            parent = scene.spawn_child(parent, format!("n{}", i), *t).unwrap();
            chain.push(parent);
        }

        let root_down = transforms
            .iter()
            .fold(Matrix4::identity(), |acc, t| acc * t.local_matrix());
        let leaf = *chain.last().unwrap();
        assert_relative_eq!(world_matrix(&scene, leaf).unwrap(), root_down, epsilon = 1e-4);
    }

    #[test]
    fn test_world_is_parent_world_times_local() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut scene = Scene::new();
        let mut ids = vec![scene.spawn("root", random_transform(&mut rng))];

        for i in 1..40 {
            let t = random_transform(&mut rng);
            let id = if rng.random_bool(0.2) {
                scene.spawn(format!("n{}", i), t)
            } else {
                let parent = ids[rng.random_range(0..ids.len())];
                scene.spawn_child(parent, format!("n{}", i), t).unwrap()
            };
            ids.push(id);
        }

        for &id in &ids {
            let node = scene.get(id).unwrap();
            let world = world_matrix(&scene, id).unwrap();
            let expected = match node.parent() {
                Some(parent) => world_matrix(&scene, parent).unwrap() * node.transform().local_matrix(),
                None => node.transform().local_matrix(),
            };
            assert_relative_eq!(world, expected, epsilon = 1e-3);
            assert_relative_eq!(*node.transform().model_matrix(), world, epsilon = 1e-3);
        }
    }

    #[test]
    fn test_zero_scale_propagates_to_descendants() {
        let mut scene = Scene::new();
        let parent = scene.spawn(
            "Flat",
            Transform::from_position(Vec3::new(0.0, 3.0, 0.0)).with_scale(Vec3::new(1.0, 0.0, 1.0)),
        );
        let child = scene
            .spawn_child(parent, "Child", Transform::from_position(Vec3::new(0.0, 5.0, 0.0)))
            .unwrap();

        let p = Vec3::new(0.0, 1.0, 0.0).transform_point(&world_matrix(&scene, child).unwrap());
        assert!(p.abs_diff_eq(Vec3::new(0.0, 3.0, 0.0), 1e-6));
        assert!(inverse_world_matrix(&scene, child).is_none());
    }

    #[test]
    fn test_inverse_maps_world_into_node_frame() {
        let mut scene = Scene::new();
        let camera = scene.spawn(
            "Camera",
            Transform::from_position(Vec3::new(0.0, 0.0, -10.0)).with_rotation(Vec3::new(0.0, 0.0, 0.5)),
        );
        let view = inverse_world_matrix(&scene, camera).unwrap();
        let world = world_matrix(&scene, camera).unwrap();
        assert_relative_eq!(view * world, Matrix4::identity(), epsilon = 1e-5);

        let eye = Vec3::new(0.0, 0.0, -10.0).transform_point(&view);
        assert!(eye.abs_diff_eq(Vec3::ZERO, 1e-5));
    }
}
