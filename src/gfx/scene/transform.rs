use cgmath::{Matrix4, Rad, SquareMatrix};
use serde::{Deserialize, Serialize};

use crate::math::Vec3;

/// Position, scale and Euler rotation of a node relative to its parent,
/// plus the cached world-space model matrix.
///
/// The cached matrix is only valid right after the scene recomposes it
/// (see [`Scene::update_transform`](super::Scene::update_transform)); a
/// transform built by hand carries the identity until it is attached.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub position: Vec3,
    pub scale: Vec3,
    /// Euler angles in radians. `x` turns about the X axis, `y` about the
    /// Z axis and `z` about the Y axis (yaw), applied X, then Z, then Y.
    pub rotation: Vec3,
    #[serde(skip, default = "identity_matrix")]
    pub(crate) model_matrix: Matrix4<f32>,
}

impl Transform {
    pub fn new(position: Vec3, scale: Vec3, rotation: Vec3) -> Self {
        Self {
            position,
            scale,
            rotation,
            model_matrix: Matrix4::identity(),
        }
    }

    /// All-zero transform, including a zero scale.
    pub fn zero() -> Self {
        Self::new(Vec3::ZERO, Vec3::ZERO, Vec3::ZERO)
    }

    /// Unit scale at the origin with no rotation.
    pub fn identity() -> Self {
        Self::new(Vec3::ZERO, Vec3::ONE, Vec3::ZERO)
    }

    pub fn from_position(position: Vec3) -> Self {
        Self::new(position, Vec3::ONE, Vec3::ZERO)
    }

    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_rotation(mut self, rotation: Vec3) -> Self {
        self.rotation = rotation;
        self
    }

    /// Matrix built from this transform alone, ignoring any parent.
    ///
    /// Vertices are scaled first, then rotated about X, Z and Y in that
    /// order, then translated. The order must not change: saved scenes rely
    /// on it to look the same.
    pub fn local_matrix(&self) -> Matrix4<f32> {
        let s = Matrix4::from_nonuniform_scale(self.scale.x, self.scale.y, self.scale.z);
        let rx = Matrix4::from_angle_x(Rad(self.rotation.x));
        let rz = Matrix4::from_angle_z(Rad(self.rotation.y));
        let ry = Matrix4::from_angle_y(Rad(self.rotation.z));
        let t = Matrix4::from_translation(self.position.into());
        t * ry * rz * rx * s
    }

    /// Last recomposed world matrix.
    pub fn model_matrix(&self) -> &Matrix4<f32> {
        &self.model_matrix
    }

    /// Same position, scale and rotation, ignoring the cached matrix.
    pub fn same_values(&self, other: &Transform) -> bool {
        self.position == other.position
            && self.scale == other.scale
            && self.rotation == other.rotation
    }
}

fn identity_matrix() -> Matrix4<f32> {
    Matrix4::identity()
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn test_scale_applies_before_translation() {
        let t = Transform::new(Vec3::new(10.0, 0.0, 0.0), Vec3::new(2.0, 2.0, 2.0), Vec3::ZERO);
        let p = Vec3::ONE.transform_point(&t.local_matrix());
        assert!(p.abs_diff_eq(Vec3::new(12.0, 2.0, 2.0), 1e-5));
    }

    #[test]
    fn test_rotation_component_axis_mapping() {
        // rotation.z turns about Y: +x swings to -z
        let yaw = Transform::identity().with_rotation(Vec3::new(0.0, 0.0, FRAC_PI_2));
        let p = Vec3::RIGHT.transform_point(&yaw.local_matrix());
        assert!(p.abs_diff_eq(Vec3::new(0.0, 0.0, -1.0), 1e-5));

        // rotation.y turns about Z: +x swings to +y
        let roll = Transform::identity().with_rotation(Vec3::new(0.0, FRAC_PI_2, 0.0));
        let p = Vec3::RIGHT.transform_point(&roll.local_matrix());
        assert!(p.abs_diff_eq(Vec3::UP, 1e-5));
    }

    #[test]
    fn test_rotation_order_x_then_z_then_y() {
        let r = Vec3::new(0.3, -0.7, 1.1);
        let t = Transform::identity().with_rotation(r);
        let expected = Matrix4::from_angle_y(Rad(r.z))
            * Matrix4::from_angle_z(Rad(r.y))
            * Matrix4::from_angle_x(Rad(r.x));
        assert_relative_eq!(t.local_matrix(), expected, epsilon = 1e-6);
    }

    #[test]
    fn test_zero_scale_collapses_points() {
        let p = Vec3::new(5.0, -3.0, 1.0).transform_point(&Transform::zero().local_matrix());
        assert_eq!(p, Vec3::ZERO);
    }
}
