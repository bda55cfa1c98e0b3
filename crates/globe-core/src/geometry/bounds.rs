//! Axis-aligned bounding volume of a geometry

use glam::Vec3;

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    /// Minimum corner of the bounding box.
    pub min: Vec3,
    /// Maximum corner of the bounding box.
    pub max: Vec3,
}

impl BoundingBox {
    /// Creates an empty (inverted) bounding box.
    pub fn empty() -> Self {
        Self {
            min: Vec3::splat(f32::INFINITY),
            max: Vec3::splat(f32::NEG_INFINITY),
        }
    }

    /// Creates a bounding box that contains all given points.
    pub fn from_points(points: impl IntoIterator<Item = Vec3>) -> Self {
        let mut bbox = Self::empty();
        for point in points {
            bbox = bbox.expand_to_include(point);
        }
        bbox
    }

    /// Returns a new bounding box expanded to include the given point.
    pub fn expand_to_include(&self, point: Vec3) -> BoundingBox {
        BoundingBox {
            min: self.min.min(point),
            max: self.max.max(point),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_points() {
        let bbox = BoundingBox::from_points([
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(-2.0, 3.0, 0.5),
            Vec3::new(0.0, -1.0, -4.0),
        ]);
        assert_eq!(bbox.min, Vec3::new(-2.0, -1.0, -4.0));
        assert_eq!(bbox.max, Vec3::new(1.0, 3.0, 0.5));
    }

    #[test]
    fn test_empty_is_inverted() {
        let bbox = BoundingBox::from_points(std::iter::empty());
        assert_eq!(bbox, BoundingBox::empty());
        assert!(bbox.min.x > bbox.max.x);
    }
}
