//! Behaviors that ship with the editor.

use std::f32::consts::{FRAC_PI_2, TAU};

use imgui::Ui;
use serde_json::{json, Value};
use winit::keyboard::KeyCode;

use super::traits::{Behavior, BehaviorContext, BehaviorKind};
use crate::errors::{CairnError, Result};
use crate::gfx::scene::Transform;
use crate::math::Vec3;

/// How close pitch may get to straight up or down.
const PITCH_MARGIN: f32 = 0.001;

/// Reads optional numeric constructor arguments, falling back to `defaults`.
fn numeric_args<const N: usize>(kind: BehaviorKind, args: &[Value], defaults: [f32; N]) -> Result<[f32; N]> {
    if args.len() > N {
        return Err(CairnError::BehaviorArgs {
            kind: kind.to_string(),
            reason: format!("expected at most {} arguments, got {}", N, args.len()),
        });
    }
    let mut values = defaults;
    for (i, arg) in args.iter().enumerate() {
        values[i] = arg.as_f64().ok_or_else(|| CairnError::BehaviorArgs {
            kind: kind.to_string(),
            reason: format!("argument {} is not a number: {}", i, arg),
        })? as f32;
    }
    Ok(values)
}

/// First-person camera: mouse look plus WASD movement.
///
/// Pitch is stored in `rotation.x` and yaw in `rotation.z` of the node's
/// transform. Movement ignores pitch: W/S go along the yawed forward axis,
/// A/D strafe, Space/Shift rise and sink.
pub struct FlyCamera {
    /// Units per second.
    pub speed: f32,
    /// Radians per pixel of mouse-look motion.
    pub sensitivity: f32,
    pitch: f32,
    yaw: f32,
}

impl FlyCamera {
    pub const KIND: BehaviorKind = BehaviorKind::new("FlyCamera");

    pub fn new(speed: f32, sensitivity: f32) -> Self {
        Self {
            speed,
            sensitivity,
            pitch: 0.0,
            yaw: 0.0,
        }
    }

    /// Registry factory: `[speed, sensitivity]`, both optional.
    pub fn from_args(args: &[Value]) -> Result<Box<dyn Behavior>> {
        let [speed, sensitivity] = numeric_args(Self::KIND, args, [5.0, 0.003])?;
        Ok(Box::new(Self::new(speed, sensitivity)))
    }

    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    /// Applies mouse-look motion. Yaw wraps into `[0, 2π)`, pitch stays
    /// strictly inside `(-π/2, π/2)`.
    pub fn look(&mut self, dx: f32, dy: f32) {
        self.yaw = (self.yaw + dx * self.sensitivity).rem_euclid(TAU);
        let limit = FRAC_PI_2 - PITCH_MARGIN;
        self.pitch = (self.pitch + dy * self.sensitivity).clamp(-limit, limit);
    }

    /// World-space displacement for the given movement intent
    /// (`x` strafe, `y` rise, `z` forward).
    pub fn displacement(&self, intent: Vec3, delta_time: f32) -> Vec3 {
        let step = intent.normalize() * self.speed * delta_time;
        let (sin, cos) = (-self.yaw).sin_cos();
        Vec3::new(step.x * cos - step.z * sin, step.y, step.x * sin + step.z * cos)
    }
}

impl Behavior for FlyCamera {
    fn kind(&self) -> BehaviorKind {
        Self::KIND
    }

    fn start(&mut self, ctx: &mut BehaviorContext) {
        // pick up the orientation the node was saved with
        if let Some(node) = ctx.scene.get(ctx.node) {
            let rotation = node.transform().rotation;
            self.pitch = rotation.x;
            self.yaw = rotation.z.rem_euclid(TAU);
        }
    }

    fn update(&mut self, ctx: &mut BehaviorContext) {
        let Some(node) = ctx.scene.get(ctx.node) else {
            return;
        };
        let current = *node.transform();

        let [dx, dy] = ctx.input.look_delta();
        self.look(dx, dy);

        let mut intent = Vec3::ZERO;
        for (key, axis) in [
            (KeyCode::KeyA, Vec3::LEFT),
            (KeyCode::KeyD, Vec3::RIGHT),
            (KeyCode::ShiftLeft, Vec3::DOWN),
            (KeyCode::Space, Vec3::UP),
            (KeyCode::KeyS, Vec3::BACKWARD),
            (KeyCode::KeyW, Vec3::FORWARD),
        ] {
            if ctx.input.is_pressed(key) {
                intent += axis;
            }
        }

        let moved = Transform::new(
            current.position + self.displacement(intent, ctx.delta_time),
            current.scale,
            Vec3::new(self.pitch, 0.0, self.yaw),
        );
        if !moved.same_values(&current) {
            if let Err(e) = ctx.scene.update_transform(ctx.node, moved) {
                log::warn!("Fly camera could not move {:?}: {}", ctx.node, e);
            }
        }
    }

    fn args(&self) -> Vec<Value> {
        vec![json!(self.speed), json!(self.sensitivity)]
    }

    fn render_ui(&mut self, ui: &Ui) {
        ui.slider("Speed", 0.1, 50.0, &mut self.speed);
        ui.slider("Sensitivity", 0.0001, 0.02, &mut self.sensitivity);
        ui.text(format!("pitch {:.3}  yaw {:.3}", self.pitch, self.yaw));
    }
}

/// Turns its node at a constant rate around each rotation component.
pub struct Spin {
    /// Radians per second added to `rotation`.
    pub rate: Vec3,
}

impl Spin {
    pub const KIND: BehaviorKind = BehaviorKind::new("Spin");

    pub fn new(rate: Vec3) -> Self {
        Self { rate }
    }

    /// Registry factory: `[x, y, z]` rates, all optional (default spins
    /// about the vertical axis).
    pub fn from_args(args: &[Value]) -> Result<Box<dyn Behavior>> {
        let [x, y, z] = numeric_args(Self::KIND, args, [0.0, 0.0, 1.0])?;
        Ok(Box::new(Self::new(Vec3::new(x, y, z))))
    }
}

impl Behavior for Spin {
    fn kind(&self) -> BehaviorKind {
        Self::KIND
    }

    fn update(&mut self, ctx: &mut BehaviorContext) {
        let Some(node) = ctx.scene.get(ctx.node) else {
            return;
        };
        let t = *node.transform();
        let rotation = t.rotation + self.rate * ctx.delta_time;
        if let Err(e) = ctx.scene.update_transform(ctx.node, t.with_rotation(rotation)) {
            log::warn!("Spin could not rotate {:?}: {}", ctx.node, e);
        }
    }

    fn args(&self) -> Vec<Value> {
        vec![json!(self.rate.x), json!(self.rate.y), json!(self.rate.z)]
    }

    fn render_ui(&mut self, ui: &Ui) {
        let mut rate = self.rate.to_array();
        if ui.input_float3("Rate", &mut rate).build() {
            self.rate = Vec3::from(rate);
        }
    }
}
