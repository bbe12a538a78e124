//! # Primitive Shape Generation
//!
//! All shapes come with outward normals and UVs in `[0, 1]`.

use super::GeometryData;
use std::f32::consts::PI;

/// Generate a unit cube centered at the origin
///
/// Vertices run from -0.5 to 0.5 on every axis, four per face so each face
/// keeps its own normal.
pub fn generate_cube() -> GeometryData {
    let mut data = GeometryData::new();

    // (normal, u axis, v axis) per face; corners are normal/2 ± u/2 ± v/2
    let faces: [([f32; 3], [f32; 3], [f32; 3]); 6] = [
        ([0.0, 0.0, 1.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
        ([0.0, 0.0, -1.0], [-1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
        ([-1.0, 0.0, 0.0], [0.0, 0.0, 1.0], [0.0, 1.0, 0.0]),
        ([1.0, 0.0, 0.0], [0.0, 0.0, -1.0], [0.0, 1.0, 0.0]),
        ([0.0, 1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, -1.0]),
        ([0.0, -1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0]),
    ];

    for (n, u, v) in faces {
        let corner = |su: f32, sv: f32| {
            [
                0.5 * (n[0] + su * u[0] + sv * v[0]),
                0.5 * (n[1] + su * u[1] + sv * v[1]),
                0.5 * (n[2] + su * u[2] + sv * v[2]),
            ]
        };
        let a = data.push_vertex(corner(-1.0, -1.0), n, [0.0, 0.0]);
        let b = data.push_vertex(corner(1.0, -1.0), n, [1.0, 0.0]);
        let c = data.push_vertex(corner(1.0, 1.0), n, [1.0, 1.0]);
        let d = data.push_vertex(corner(-1.0, 1.0), n, [0.0, 1.0]);
        data.indices.extend_from_slice(&[a, b, c, c, d, a]);
    }

    data
}

/// Generate a UV sphere with specified resolution
///
/// # Arguments
/// * `longitude_segments` - Number of vertical segments (longitude lines)
/// * `latitude_segments` - Number of horizontal segments (latitude lines)
///
/// Returns a sphere of radius 1.0 centered at the origin.
pub fn generate_sphere(longitude_segments: u32, latitude_segments: u32) -> GeometryData {
    let mut data = GeometryData::new();

    let long_segs = longitude_segments.max(3);
    let lat_segs = latitude_segments.max(2);

    for lat in 0..=lat_segs {
        let theta = lat as f32 * PI / lat_segs as f32;
        for long in 0..=long_segs {
            let phi = long as f32 * 2.0 * PI / long_segs as f32;
            let p = [theta.sin() * phi.cos(), theta.cos(), theta.sin() * phi.sin()];
            data.push_vertex(
                p,
                p,
                [long as f32 / long_segs as f32, lat as f32 / lat_segs as f32],
            );
        }
    }

    for lat in 0..lat_segs {
        for long in 0..long_segs {
            let first = lat * (long_segs + 1) + long;
            let second = first + long_segs + 1;
            data.indices
                .extend_from_slice(&[first, second, first + 1, second, second + 1, first + 1]);
        }
    }

    data
}

/// Generate a ground plane in the XZ plane facing +Y
///
/// Centered at the origin, `width` along X and `depth` along Z.
pub fn generate_plane(width: f32, depth: f32, width_segments: u32, depth_segments: u32) -> GeometryData {
    let mut data = GeometryData::new();

    let w_segs = width_segments.max(1);
    let d_segs = depth_segments.max(1);

    for row in 0..=d_segs {
        let v = row as f32 / d_segs as f32;
        for col in 0..=w_segs {
            let u = col as f32 / w_segs as f32;
            data.push_vertex(
                [(u - 0.5) * width, 0.0, (0.5 - v) * depth],
                [0.0, 1.0, 0.0],
                [u, v],
            );
        }
    }

    for row in 0..d_segs {
        for col in 0..w_segs {
            let i = row * (w_segs + 1) + col;
            let next_row = i + w_segs + 1;
            data.indices
                .extend_from_slice(&[i, i + 1, next_row, next_row, i + 1, next_row + 1]);
        }
    }

    data
}
