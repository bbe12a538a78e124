use cgmath::Matrix4;
use serde::{Deserialize, Serialize};

use crate::gfx::picking::Ray;
use crate::gfx::scene::NodeId;
use crate::math::Vec3;

/// Perspective projection for a camera looking down its local +z axis.
///
/// Clip-space `w` is the camera-space depth, and depth maps `near` to -1
/// and `far` to +1.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Projection {
    pub near: f32,
    pub far: f32,
    /// Full horizontal field of view in degrees.
    pub horizontal_fov_deg: f32,
    /// Width over height of the target.
    pub aspect: f32,
}

impl Default for Projection {
    fn default() -> Self {
        Self {
            near: 0.1,
            far: 100_000.0,
            horizontal_fov_deg: 90.0,
            aspect: 16.0 / 9.0,
        }
    }
}

/// A viewport rectangle in window pixels, origin top left.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn contains(&self, point: [f32; 2]) -> bool {
        point[0] >= self.x
            && point[0] < self.x + self.width
            && point[1] >= self.y
            && point[1] < self.y + self.height
    }

    pub fn aspect(&self) -> f32 {
        if self.height > 0.0 {
            self.width / self.height
        } else {
            1.0
        }
    }
}

impl Projection {
    fn half_width_slope(&self) -> f32 {
        (self.horizontal_fov_deg.to_radians() / 2.0).tan()
    }

    /// Projection matrix in column-vector form.
    pub fn matrix(&self) -> Matrix4<f32> {
        let n = self.near;
        let f = self.far;
        let width = n * self.half_width_slope();
        let height = width / self.aspect;
        let a = (n + f) / (f - n);
        let b = (-2.0 * f * n) / (f - n);

        #[rustfmt::skip]
        let m = Matrix4::new(
            n / width, 0.0,        0.0, 0.0,
            0.0,       n / height, 0.0, 0.0,
            0.0,       0.0,        a,   1.0,
            0.0,       0.0,        b,   0.0,
        );
        m
    }

    /// Camera-space ray through `cursor`, or `None` outside the viewport.
    ///
    /// The ray starts at the camera origin and passes through the pixel on
    /// the near plane that the projection maps the cursor to.
    pub fn screen_ray(&self, cursor: [f32; 2], viewport: Viewport) -> Option<Ray> {
        if !viewport.contains(cursor) {
            return None;
        }
        let ndc_x = 2.0 * (cursor[0] - viewport.x) / viewport.width - 1.0;
        let ndc_y = 1.0 - 2.0 * (cursor[1] - viewport.y) / viewport.height;
        let slope = self.half_width_slope();
        Some(Ray::new(
            Vec3::ZERO,
            Vec3::new(ndc_x * slope, ndc_y * slope / self.aspect, 1.0),
        ))
    }
}

/// The node the scene is viewed through, with its lens.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneCamera {
    pub node: NodeId,
    pub projection: Projection,
}
