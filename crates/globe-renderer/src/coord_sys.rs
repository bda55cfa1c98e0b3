//! Globe coordinate system: radius, displacement data, camera and scene root

use std::sync::Arc;

use globe_core::{HeightField, HeightFieldError};

use crate::camera::{Camera, SharedCamera};
use crate::scene::Scene;

/// One 8-bit channel of a decoded height texture
#[derive(Debug, Clone, PartialEq)]
pub struct HeightImage {
    /// Pixel bytes, row-major
    pub pixels: Vec<u8>,
    /// Width in pixels
    pub width: usize,
    /// Height in pixels
    pub height: usize,
    /// Bytes per pixel; the first byte of each pixel is sampled
    pub stride: usize,
}

/// Coordinate system a globe view renders into.
///
/// Displacement data is either a ready-made [`HeightField`] or a height
/// image whose field is rebuilt whenever the displacement scale changes.
#[derive(Debug)]
pub struct GlobeCoordinateSystem {
    /// Globe radius in world units
    pub radius: f32,
    height_field: Option<Arc<HeightField>>,
    height_image: Option<HeightImage>,
    /// Scale the current field was built with, if built from the image
    image_scale: Option<f32>,
    /// Camera driven by the view control
    pub camera: SharedCamera,
    /// Scene root
    pub scene: Scene,
}

impl GlobeCoordinateSystem {
    /// Create a coordinate system with no displacement data
    pub fn new(radius: f32) -> Self {
        Self {
            radius,
            height_field: None,
            height_image: None,
            image_scale: None,
            camera: Camera::new().shared(),
            scene: Scene::new(),
        }
    }

    /// Replace the displacement data with a prepared field
    pub fn set_height_field(&mut self, field: Option<HeightField>) {
        self.height_image = None;
        self.image_scale = None;
        self.height_field = field.map(Arc::new);
    }

    /// Use a height image as displacement source. The field is built on the
    /// next [`apply_displacement_scale`](Self::apply_displacement_scale).
    pub fn set_height_image(&mut self, image: Option<HeightImage>) {
        self.height_field = None;
        self.image_scale = None;
        self.height_image = image;
    }

    /// Rebuild the field from the height image when `scale` differs from
    /// the one it was built with. Returns whether a new field was built.
    /// Prepared fields are left untouched.
    pub fn apply_displacement_scale(&mut self, scale: f32) -> Result<bool, HeightFieldError> {
        let Some(image) = &self.height_image else {
            return Ok(false);
        };
        if self.image_scale == Some(scale) {
            return Ok(false);
        }
        let field =
            HeightField::from_image_channel(&image.pixels, image.width, image.height, image.stride, scale)?;
        tracing::debug!(
            "Built {}x{} height field at scale {}",
            field.width(),
            field.height(),
            scale
        );
        self.height_field = Some(Arc::new(field));
        self.image_scale = Some(scale);
        Ok(true)
    }

    /// Current displacement data
    pub fn height_field(&self) -> Option<&HeightField> {
        self.height_field.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_height_field_replacement() {
        let mut coord_sys = GlobeCoordinateSystem::new(100.0);
        assert!(coord_sys.height_field().is_none());

        let field = HeightField::flat(4, 2).unwrap();
        let generation = field.generation();
        coord_sys.set_height_field(Some(field));
        assert_eq!(coord_sys.height_field().map(|f| f.generation()), Some(generation));

        coord_sys.set_height_field(None);
        assert!(coord_sys.height_field().is_none());
    }

    #[test]
    fn test_height_image_rebuilds_on_scale_change() {
        let mut coord_sys = GlobeCoordinateSystem::new(100.0);
        coord_sys.set_height_image(Some(HeightImage {
            pixels: vec![0, 255, 51, 102],
            width: 2,
            height: 2,
            stride: 1,
        }));
        assert!(coord_sys.height_field().is_none());

        assert_eq!(coord_sys.apply_displacement_scale(0.5), Ok(true));
        let first = coord_sys.height_field().map(|f| f.generation());
        assert_eq!(coord_sys.height_field().unwrap().sample(1, 0), 0.5);

        assert_eq!(coord_sys.apply_displacement_scale(0.5), Ok(false));
        assert_eq!(coord_sys.height_field().map(|f| f.generation()), first);

        assert_eq!(coord_sys.apply_displacement_scale(2.0), Ok(true));
        assert_eq!(coord_sys.height_field().unwrap().sample(1, 0), 2.0);
        assert_ne!(coord_sys.height_field().map(|f| f.generation()), first);
    }

    #[test]
    fn test_bad_height_image_is_rejected() {
        let mut coord_sys = GlobeCoordinateSystem::new(100.0);
        coord_sys.set_height_image(Some(HeightImage {
            pixels: vec![0; 3],
            width: 2,
            height: 2,
            stride: 1,
        }));
        assert!(coord_sys.apply_displacement_scale(1.0).is_err());
        assert!(coord_sys.height_field().is_none());
    }

    #[test]
    fn test_prepared_field_ignores_scale() {
        let mut coord_sys = GlobeCoordinateSystem::new(100.0);
        coord_sys.set_height_field(Some(HeightField::flat(2, 2).unwrap()));
        assert_eq!(coord_sys.apply_displacement_scale(3.0), Ok(false));
        assert!(coord_sys.height_field().is_some());
    }
}
