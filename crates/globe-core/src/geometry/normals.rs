//! Normal calculation utilities for mesh data

/// Calculate the unnormalized normal of a triangle (length is twice its area)
fn triangle_cross(v0: [f32; 3], v1: [f32; 3], v2: [f32; 3]) -> [f32; 3] {
    let e1 = [v1[0] - v0[0], v1[1] - v0[1], v1[2] - v0[2]];
    let e2 = [v2[0] - v0[0], v2[1] - v0[1], v2[2] - v0[2]];

    [
        e1[1] * e2[2] - e1[2] * e2[1],
        e1[2] * e2[0] - e1[0] * e2[2],
        e1[0] * e2[1] - e1[1] * e2[0],
    ]
}

fn normalize_or(v: [f32; 3], fallback: [f32; 3]) -> [f32; 3] {
    let len = (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt();
    if len > 0.0 {
        [v[0] / len, v[1] / len, v[2] / len]
    } else {
        fallback
    }
}

/// Calculate normal for a single triangle
pub fn calculate_triangle_normal(v0: [f32; 3], v1: [f32; 3], v2: [f32; 3]) -> [f32; 3] {
    normalize_or(triangle_cross(v0, v1, v2), [0.0, 0.0, 1.0])
}

/// Calculate area-weighted smooth vertex normals from vertices and indices.
///
/// Triangles referencing out-of-range vertices are skipped. Vertices that
/// belong to no (non-degenerate) triangle fall back to their own direction
/// from the origin, which is the exact normal for a sphere.
pub fn calculate_vertex_normals(vertices: &[[f32; 3]], indices: &[u32]) -> Vec<[f32; 3]> {
    let mut accum = vec![[0.0f32; 3]; vertices.len()];

    for chunk in indices.chunks(3) {
        if chunk.len() != 3 {
            continue;
        }
        let [a, b, c] = [chunk[0] as usize, chunk[1] as usize, chunk[2] as usize];
        if a >= vertices.len() || b >= vertices.len() || c >= vertices.len() {
            continue;
        }

        let cross = triangle_cross(vertices[a], vertices[b], vertices[c]);
        for idx in [a, b, c] {
            for axis in 0..3 {
                accum[idx][axis] += cross[axis];
            }
        }
    }

    accum
        .into_iter()
        .zip(vertices)
        .map(|(n, v)| normalize_or(n, normalize_or(*v, [0.0, 1.0, 0.0])))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_triangle_normal() {
        let n = calculate_triangle_normal([0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]);
        assert_eq!(n, [0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_degenerate_triangle_fallback() {
        let n = calculate_triangle_normal([1.0, 1.0, 1.0], [1.0, 1.0, 1.0], [1.0, 1.0, 1.0]);
        assert_eq!(n, [0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_vertex_normals_shared_edge() {
        // Two triangles in the XY plane sharing an edge
        let vertices = [
            [0.0, 0.0, 0.0],
            [1.0, 0.0, 0.0],
            [0.0, 1.0, 0.0],
            [1.0, 1.0, 0.0],
        ];
        let indices = [0, 1, 2, 2, 1, 3];
        let normals = calculate_vertex_normals(&vertices, &indices);
        assert_eq!(normals.len(), 4);
        for n in normals {
            approx::assert_relative_eq!(n[2], 1.0, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_unreferenced_vertex_uses_radial_direction() {
        let vertices = [[0.0, 3.0, 0.0]];
        let normals = calculate_vertex_normals(&vertices, &[]);
        assert_eq!(normals, vec![[0.0, 1.0, 0.0]]);
    }
}
