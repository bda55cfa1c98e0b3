//! UV sphere tessellation

use std::f32::consts::PI;

/// Raw buffers of a tessellated sphere
pub struct SphereBuffers {
    pub positions: Vec<[f32; 3]>,
    pub uvs: Vec<[f32; 2]>,
    pub normals: Vec<[f32; 3]>,
    pub indices: Vec<u32>,
}

/// Smallest tessellation that still encloses a volume
pub fn normalized_segments(width_segments: u32, height_segments: u32) -> (u32, u32) {
    (width_segments.max(3), height_segments.max(2))
}

/// Number of vertices produced for the given resolution
pub fn sphere_vertex_count(width_segments: u32, height_segments: u32) -> usize {
    let (width_segments, height_segments) = normalized_segments(width_segments, height_segments);
    (width_segments as usize + 1) * (height_segments as usize + 1)
}

/// Generate a Y-up UV sphere
///
/// # Arguments
/// * `radius` - Sphere radius
/// * `width_segments` - Number of longitude segments (u runs 0..1 around the Y axis)
/// * `height_segments` - Number of latitude bands (v runs 0..1 from the north pole down)
///
/// Rows of `width_segments + 1` vertices are emitted from v = 0 to v = 1, so
/// the seam column is duplicated and every vertex has its own UV.
pub fn generate_sphere(radius: f32, width_segments: u32, height_segments: u32) -> SphereBuffers {
    let (width_segments, height_segments) = normalized_segments(width_segments, height_segments);
    let count = sphere_vertex_count(width_segments, height_segments);

    let mut positions = Vec::with_capacity(count);
    let mut uvs = Vec::with_capacity(count);
    let mut normals = Vec::with_capacity(count);
    let mut indices = Vec::with_capacity((width_segments * height_segments * 6) as usize);

    for row in 0..=height_segments {
        let v = row as f32 / height_segments as f32;
        let theta = v * PI;
        let sin_theta = theta.sin();
        let cos_theta = theta.cos();

        for col in 0..=width_segments {
            let u = col as f32 / width_segments as f32;
            let phi = u * 2.0 * PI;

            let x = -phi.cos() * sin_theta;
            let y = cos_theta;
            let z = phi.sin() * sin_theta;

            positions.push([radius * x, radius * y, radius * z]);
            normals.push([x, y, z]);
            uvs.push([u, v]);
        }
    }

    let stride = width_segments + 1;
    for row in 0..height_segments {
        for col in 0..width_segments {
            let top_left = row * stride + col;
            let top_right = top_left + 1;
            let bottom_left = top_left + stride;
            let bottom_right = bottom_left + 1;

            // Counter-clockwise seen from outside
            indices.extend_from_slice(&[top_left, bottom_left, top_right]);
            indices.extend_from_slice(&[top_right, bottom_left, bottom_right]);
        }
    }

    SphereBuffers {
        positions,
        uvs,
        normals,
        indices,
    }
}
