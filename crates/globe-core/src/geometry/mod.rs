//! Sphere geometry with live vertex buffers
//!
//! - [`SphereGeometry`] owns positions, UVs, normals, indices and an optional
//!   barycentric attribute for wireframe rendering
//! - [`BoundingBox`] is recomputed from the live positions on demand

mod bounds;
mod normals;
mod sphere;

pub use bounds::BoundingBox;
pub use normals::{calculate_triangle_normal, calculate_vertex_normals};
pub use sphere::{SphereBuffers, generate_sphere, normalized_segments, sphere_vertex_count};

use glam::Vec3;

/// Barycentric corners assigned to the three vertices of each triangle
const BARYCENTRIC_CORNERS: [[f32; 3]; 3] = [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]];

/// Y-up UV sphere whose vertex buffer can be edited in place.
///
/// `positions`, `uvs` and `normals` always have the same length. Changing
/// the resolution never edits buffers incrementally; [`build`](Self::build)
/// discards and regenerates all of them.
#[derive(Debug, Clone)]
pub struct SphereGeometry {
    radius: f32,
    width_segments: u32,
    height_segments: u32,
    positions: Vec<[f32; 3]>,
    uvs: Vec<[f32; 2]>,
    normals: Vec<[f32; 3]>,
    indices: Vec<u32>,
    barycentric: Option<Vec<[f32; 3]>>,
    bounding_box: BoundingBox,
    dirty: bool,
}

impl SphereGeometry {
    /// Create and build a unit sphere
    pub fn new(width_segments: u32, height_segments: u32) -> Self {
        Self::with_radius(1.0, width_segments, height_segments)
    }

    /// Create and build a sphere of the given radius
    pub fn with_radius(radius: f32, width_segments: u32, height_segments: u32) -> Self {
        let (width_segments, height_segments) = normalized_segments(width_segments, height_segments);
        let mut geometry = Self {
            radius,
            width_segments,
            height_segments,
            positions: Vec::new(),
            uvs: Vec::new(),
            normals: Vec::new(),
            indices: Vec::new(),
            barycentric: None,
            bounding_box: BoundingBox::empty(),
            dirty: true,
        };
        geometry.build();
        geometry
    }

    /// Change the resolution. Takes effect on the next [`build`](Self::build).
    pub fn set_segments(&mut self, width_segments: u32, height_segments: u32) {
        let (width_segments, height_segments) = normalized_segments(width_segments, height_segments);
        self.width_segments = width_segments;
        self.height_segments = height_segments;
    }

    /// Regenerate every buffer at the current resolution
    pub fn build(&mut self) {
        let buffers = generate_sphere(self.radius, self.width_segments, self.height_segments);
        self.positions = buffers.positions;
        self.uvs = buffers.uvs;
        self.normals = buffers.normals;
        self.indices = buffers.indices;
        self.barycentric = None;
        self.update_bounding_box();
        self.dirty = true;
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn width_segments(&self) -> u32 {
        self.width_segments
    }

    pub fn height_segments(&self) -> u32 {
        self.height_segments
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn positions(&self) -> &[[f32; 3]] {
        &self.positions
    }

    /// Mutable access to positions. Callers must [`mark_dirty`](Self::mark_dirty) afterwards.
    pub fn positions_mut(&mut self) -> &mut [[f32; 3]] {
        &mut self.positions
    }

    pub fn uvs(&self) -> &[[f32; 2]] {
        &self.uvs
    }

    pub fn normals(&self) -> &[[f32; 3]] {
        &self.normals
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    pub fn barycentric(&self) -> Option<&[[f32; 3]]> {
        self.barycentric.as_deref()
    }

    pub fn bounding_box(&self) -> BoundingBox {
        self.bounding_box
    }

    /// Recompute smooth normals from the current positions
    pub fn generate_vertex_normals(&mut self) {
        self.normals = calculate_vertex_normals(&self.positions, &self.indices);
    }

    /// Recompute the bounding box from the current positions
    pub fn update_bounding_box(&mut self) {
        self.bounding_box = BoundingBox::from_points(self.positions.iter().map(|p| Vec3::from(*p)));
    }

    /// True when every index refers to its own vertex
    pub fn is_unique_vertex(&self) -> bool {
        self.indices.len() == self.positions.len()
            && self.indices.iter().enumerate().all(|(i, &idx)| idx as usize == i)
    }

    /// Give every triangle its own three vertices and assign barycentric
    /// coordinates `(1,0,0)`, `(0,1,0)`, `(0,0,1)` to them.
    ///
    /// This de-indexes the geometry, so the vertex count becomes
    /// `3 * triangle_count`.
    pub fn generate_barycentric(&mut self) {
        if !self.is_unique_vertex() {
            let vertex_count = self.positions.len();
            let indices: Vec<usize> = self
                .indices
                .iter()
                .map(|&i| i as usize)
                .filter(|&i| i < vertex_count)
                .collect();
            let usable = indices.len() - indices.len() % 3;

            self.positions = indices[..usable].iter().map(|&i| self.positions[i]).collect();
            self.uvs = indices[..usable].iter().map(|&i| self.uvs[i]).collect();
            self.normals = indices[..usable].iter().map(|&i| self.normals[i]).collect();
            self.indices = (0..usable as u32).collect();
        }

        self.barycentric = Some(
            (0..self.positions.len())
                .map(|i| BARYCENTRIC_CORNERS[i % 3])
                .collect(),
        );
        self.dirty = true;
    }

    /// Flag the buffers for re-upload
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Clear the dirty flag, returning whether it was set
    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vertex_count_matches_formula() {
        for width in [100, 200, 400] {
            let geometry = SphereGeometry::new(width, width / 2);
            assert_eq!(
                geometry.vertex_count(),
                (width as usize + 1) * (width as usize / 2 + 1)
            );
            assert_eq!(geometry.uvs().len(), geometry.vertex_count());
            assert_eq!(geometry.normals().len(), geometry.vertex_count());
        }
    }

    #[test]
    fn test_rebuild_changes_resolution() {
        let mut geometry = SphereGeometry::new(10, 5);
        geometry.set_segments(20, 10);
        assert_eq!(geometry.vertex_count(), 66);
        geometry.build();
        assert_eq!(geometry.vertex_count(), 21 * 11);
        assert_eq!(geometry.uvs().len(), 21 * 11);
    }

    #[test]
    fn test_bounding_box_of_unit_sphere() {
        let geometry = SphereGeometry::new(32, 16);
        let bbox = geometry.bounding_box();
        approx::assert_relative_eq!(bbox.max.y, 1.0, epsilon = 1e-5);
        approx::assert_relative_eq!(bbox.min.y, -1.0, epsilon = 1e-5);
        approx::assert_relative_eq!(bbox.max.x, 1.0, epsilon = 1e-3);
    }

    #[test]
    fn test_generate_barycentric_deindexes() {
        let mut geometry = SphereGeometry::new(8, 4);
        let triangles = geometry.triangle_count();
        geometry.take_dirty();

        geometry.generate_barycentric();

        assert!(geometry.is_dirty());
        assert!(geometry.is_unique_vertex());
        assert_eq!(geometry.vertex_count(), triangles * 3);
        assert_eq!(geometry.uvs().len(), geometry.vertex_count());
        let bary = geometry.barycentric().unwrap();
        assert_eq!(bary.len(), geometry.vertex_count());
        assert_eq!(bary[0], [1.0, 0.0, 0.0]);
        assert_eq!(bary[4], [0.0, 1.0, 0.0]);

        // A second pass keeps the vertex count
        geometry.generate_barycentric();
        assert_eq!(geometry.vertex_count(), triangles * 3);
    }

    #[test]
    fn test_build_drops_barycentric() {
        let mut geometry = SphereGeometry::new(8, 4);
        geometry.generate_barycentric();
        geometry.build();
        assert!(geometry.barycentric().is_none());
        assert_eq!(geometry.vertex_count(), 45);
    }

    #[test]
    fn test_take_dirty() {
        let mut geometry = SphereGeometry::new(4, 2);
        assert!(geometry.take_dirty());
        assert!(!geometry.take_dirty());
        geometry.mark_dirty();
        assert!(geometry.is_dirty());
    }
}
