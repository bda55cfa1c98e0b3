//! Height-field displacement of the base sphere.
//!
//! The engine owns the sphere geometry shared with the earth mesh and a
//! snapshot of its undisplaced positions. Displacement is only recomputed
//! when the height field, the quality tier or the wireframe flag changed
//! since the last pass.

use std::sync::Arc;

use parking_lot::RwLock;

use globe_core::{HeightField, Quality, SphereGeometry};

use crate::scene::SharedGeometry;

/// Inputs that decide whether a displacement pass has to run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct DisplacementInputs {
    field: Option<u64>,
    width_segments: u32,
    wireframe: bool,
}

/// Displaces the base sphere by a [`HeightField`]
#[derive(Debug)]
pub struct DisplacementEngine {
    geometry: SharedGeometry,
    pristine: Option<Vec<[f32; 3]>>,
    width_segments: u32,
    wireframe: bool,
    applied: Option<DisplacementInputs>,
}

impl Default for DisplacementEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl DisplacementEngine {
    /// Create the engine with a unit sphere at the default tier
    pub fn new() -> Self {
        let quality = Quality::default();
        let geometry =
            SphereGeometry::new(quality.width_segments(), quality.height_segments());
        Self {
            geometry: Arc::new(RwLock::new(geometry)),
            pristine: None,
            width_segments: quality.width_segments(),
            wireframe: false,
            applied: None,
        }
    }

    /// Geometry to bind on the base mesh
    pub fn geometry(&self) -> &SharedGeometry {
        &self.geometry
    }

    /// Undisplaced positions captured from the current build
    pub fn pristine_positions(&self) -> Option<&[[f32; 3]]> {
        self.pristine.as_deref()
    }

    /// Run a full pass if any governing input changed: select the tier,
    /// rebuild when needed, displace. Returns whether anything ran.
    pub fn update(&mut self, quality: Quality, wireframe: bool, field: Option<&HeightField>) -> bool {
        let requested = DisplacementInputs {
            field: field.map(HeightField::generation),
            width_segments: quality.width_segments(),
            wireframe,
        };
        if self.applied == Some(requested) {
            return false;
        }
        self.configure(quality, wireframe);
        self.displace(field)
    }

    /// Select the tier's resolution. Rebuilds the geometry when the width
    /// changed, when wireframe mode is on, or when a previous wireframe
    /// build left de-indexed buffers behind. Returns whether it rebuilt.
    pub fn configure(&mut self, quality: Quality, wireframe: bool) -> bool {
        let width_segments = quality.width_segments();
        let mut geometry = self.geometry.write();
        let rebuild = width_segments != self.width_segments
            || wireframe
            || geometry.barycentric().is_some();

        self.width_segments = width_segments;
        self.wireframe = wireframe;

        if rebuild {
            geometry.set_segments(width_segments, quality.height_segments());
            geometry.build();
            self.applied = None;
            tracing::debug!(
                "Rebuilt globe sphere at {}x{} ({} vertices)",
                geometry.width_segments(),
                geometry.height_segments(),
                geometry.vertex_count()
            );
        }
        rebuild
    }

    /// Displace every vertex by its height sample. A missing field
    /// displaces by zero. No-op when nothing changed since the last pass.
    pub fn displace(&mut self, field: Option<&HeightField>) -> bool {
        let inputs = DisplacementInputs {
            field: field.map(HeightField::generation),
            width_segments: self.width_segments,
            wireframe: self.wireframe,
        };
        if self.applied == Some(inputs) {
            return false;
        }

        let mut geometry = self.geometry.write();
        if geometry.barycentric().is_some() {
            geometry.build();
        }

        let stale = self
            .pristine
            .as_ref()
            .is_none_or(|pristine| pristine.len() != geometry.vertex_count());
        if stale {
            self.pristine = Some(geometry.positions().to_vec());
        }
        let Some(pristine) = self.pristine.as_deref() else {
            return false;
        };

        let scales: Vec<f32> = geometry
            .uvs()
            .iter()
            .map(|&[u, v]| field.map_or(0.0, |f| f.sample_uv(u, v)))
            .collect();
        displace_positions(geometry.positions_mut(), pristine, &scales);

        geometry.generate_vertex_normals();
        geometry.mark_dirty();
        geometry.update_bounding_box();
        if self.wireframe {
            geometry.generate_barycentric();
        }

        tracing::debug!(
            "Displaced {} vertices (field: {:?}, wireframe: {})",
            pristine.len(),
            inputs.field,
            self.wireframe
        );
        self.applied = Some(inputs);
        true
    }
}

/// Scale pristine positions by per-vertex samples.
///
/// Positions are treated as one flat `[x0, y0, z0, x1, ...]` buffer and
/// vertex `i` scales the three components starting at offset `3i + 1`:
/// its own y and z and the x of vertex `i + 1`. Vertex 0's x stays
/// pristine and the last vertex's third component falls off the buffer.
fn displace_positions(positions: &mut [[f32; 3]], pristine: &[[f32; 3]], scales: &[f32]) {
    let count = positions.len().min(pristine.len()).min(scales.len());
    if count == 0 {
        return;
    }
    positions[0][0] = pristine[0][0];
    for i in 0..count {
        let s = 1.0 + scales[i];
        positions[i][1] = pristine[i][1] * s;
        positions[i][2] = pristine[i][2] * s;
        if i + 1 < count {
            positions[i + 1][0] = pristine[i + 1][0] * s;
        }
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    fn ramp_field() -> HeightField {
        let (w, h) = (16, 8);
        let data = (0..w * h).map(|i| (i % w) as f32 / w as f32 * 0.1).collect();
        HeightField::new(w, h, data).unwrap()
    }

    #[test]
    fn test_tier_vertex_counts() {
        let mut engine = DisplacementEngine::new();
        for quality in [Quality::Low, Quality::Medium, Quality::High, Quality::Ultra] {
            engine.update(quality, false, None);
            let geometry = engine.geometry().read();
            let w = quality.width_segments() as usize;
            let h = quality.height_segments() as usize;
            assert_eq!(geometry.vertex_count(), (w + 1) * (h + 1));
            assert_eq!(geometry.uvs().len(), geometry.vertex_count());
        }
    }

    #[test]
    fn test_displace_is_idempotent() {
        let mut engine = DisplacementEngine::new();
        let field = ramp_field();
        assert!(engine.update(Quality::Low, false, Some(&field)));
        let first = engine.geometry().read().positions().to_vec();
        engine.geometry().write().take_dirty();

        assert!(!engine.update(Quality::Low, false, Some(&field)));
        assert!(!engine.displace(Some(&field)));
        let geometry = engine.geometry().read();
        assert_eq!(geometry.positions(), &first[..]);
        assert!(!geometry.is_dirty());
    }

    #[test]
    fn test_zero_field_restores_pristine() {
        let mut engine = DisplacementEngine::new();
        engine.update(Quality::Low, false, Some(&ramp_field()));
        let pristine = engine.pristine_positions().unwrap().to_vec();
        assert_ne!(engine.geometry().read().positions(), &pristine[..]);

        let zero = HeightField::flat(16, 8).unwrap();
        assert!(engine.update(Quality::Low, false, Some(&zero)));
        assert_eq!(engine.geometry().read().positions(), &pristine[..]);
    }

    #[test]
    fn test_missing_field_is_zero_scale() {
        let mut engine = DisplacementEngine::new();
        engine.update(Quality::Low, false, Some(&ramp_field()));
        assert!(engine.update(Quality::Low, false, None));
        let pristine = engine.pristine_positions().unwrap().to_vec();
        assert_eq!(engine.geometry().read().positions(), &pristine[..]);
    }

    #[test]
    fn test_new_field_identity_triggers_pass() {
        let mut engine = DisplacementEngine::new();
        let a = HeightField::flat(4, 4).unwrap();
        let b = HeightField::flat(4, 4).unwrap();
        assert!(engine.update(Quality::Low, false, Some(&a)));
        assert!(engine.update(Quality::Low, false, Some(&b)));
    }

    #[test]
    fn test_tier_change_recaptures_pristine() {
        let mut engine = DisplacementEngine::new();
        engine.update(Quality::Low, false, None);
        assert_eq!(engine.pristine_positions().unwrap().len(), 101 * 51);
        engine.update(Quality::High, false, None);
        assert_eq!(engine.pristine_positions().unwrap().len(), 401 * 201);
    }

    #[test]
    fn test_tiny_field_does_not_panic() {
        let mut engine = DisplacementEngine::new();
        let field = HeightField::new(1, 1, vec![0.5]).unwrap();
        assert!(engine.update(Quality::Low, false, Some(&field)));
        let geometry = engine.geometry().read();
        let pristine = engine.pristine_positions().unwrap();
        assert_relative_eq!(geometry.positions()[10][1], pristine[10][1] * 1.5);
    }

    #[test]
    fn test_wireframe_generates_barycentric() {
        let mut engine = DisplacementEngine::new();
        assert!(engine.update(Quality::Low, true, Some(&ramp_field())));
        {
            let geometry = engine.geometry().read();
            assert!(geometry.barycentric().is_some());
            assert_eq!(geometry.vertex_count(), geometry.triangle_count() * 3);
        }
        assert_eq!(engine.pristine_positions().unwrap().len(), 101 * 51);

        // Turning wireframe off restores the indexed sphere
        assert!(engine.update(Quality::Low, false, None));
        let geometry = engine.geometry().read();
        assert!(geometry.barycentric().is_none());
        assert_eq!(geometry.vertex_count(), 101 * 51);
    }

    #[test]
    fn test_offset_pattern() {
        let pristine = vec![[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]];
        let mut positions = pristine.clone();
        displace_positions(&mut positions, &pristine, &[1.0, 0.5]);
        assert_eq!(positions[0], [1.0, 4.0, 6.0]);
        assert_eq!(positions[1], [8.0, 7.5, 9.0]);
    }

    #[test]
    fn test_displacement_updates_bounds() {
        let mut engine = DisplacementEngine::new();
        let field = HeightField::new(1, 1, vec![1.0]).unwrap();
        engine.update(Quality::Low, false, Some(&field));
        let bbox = engine.geometry().read().bounding_box();
        assert_relative_eq!(bbox.max.y, 2.0, epsilon = 1e-4);
    }
}
