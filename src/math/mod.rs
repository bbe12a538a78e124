//! # Math Module
//!
//! Value types shared by the scene graph and the picking code. Matrices are
//! `cgmath::Matrix4<f32>` in column-vector convention: `M * v`.

pub mod vector;

pub use vector::Vec3;
