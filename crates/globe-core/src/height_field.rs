//! Displacement grid sampled by the globe's UV coordinates

use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

static NEXT_GENERATION: AtomicU64 = AtomicU64::new(1);

fn next_generation() -> u64 {
    NEXT_GENERATION.fetch_add(1, Ordering::Relaxed)
}

/// Errors raised when building a height field
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum HeightFieldError {
    #[error("height field must have non-zero dimensions, got {width}x{height}")]
    Empty { width: usize, height: usize },
    #[error("height field data has {actual} samples, expected {expected} ({width}x{height})")]
    DimensionMismatch {
        width: usize,
        height: usize,
        expected: usize,
        actual: usize,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct HeightFieldData {
    width: usize,
    height: usize,
    data: Vec<f32>,
}

/// Row-major grid of scalar displacement values.
///
/// Every constructed field carries a generation number that identifies it;
/// two fields with equal samples still compare as different inputs.
#[derive(Debug, Clone, PartialEq)]
pub struct HeightField {
    width: usize,
    height: usize,
    data: Vec<f32>,
    generation: u64,
}

impl HeightField {
    /// Create a height field, validating that `data.len() == width * height`
    pub fn new(width: usize, height: usize, data: Vec<f32>) -> Result<Self, HeightFieldError> {
        if width == 0 || height == 0 {
            return Err(HeightFieldError::Empty { width, height });
        }
        let expected = width * height;
        if data.len() != expected {
            return Err(HeightFieldError::DimensionMismatch {
                width,
                height,
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            data,
            generation: next_generation(),
        })
    }

    /// Create a field where every sample is zero
    pub fn flat(width: usize, height: usize) -> Result<Self, HeightFieldError> {
        Self::new(width, height, vec![0.0; width * height])
    }

    /// Build a field from one 8-bit channel of an image.
    ///
    /// `stride` is the number of bytes per pixel and the channel read is the
    /// first byte of each pixel. Samples are `value / 255 * scale`.
    pub fn from_image_channel(
        pixels: &[u8],
        width: usize,
        height: usize,
        stride: usize,
        scale: f32,
    ) -> Result<Self, HeightFieldError> {
        let stride = stride.max(1);
        let data: Vec<f32> = pixels
            .chunks(stride)
            .take(width * height)
            .map(|px| px[0] as f32 / 255.0 * scale)
            .collect();
        Self::new(width, height, data)
    }

    /// Grid width (columns)
    pub fn width(&self) -> usize {
        self.width
    }

    /// Grid height (rows)
    pub fn height(&self) -> usize {
        self.height
    }

    /// Raw samples in row-major order
    pub fn data(&self) -> &[f32] {
        &self.data
    }

    /// Identity of this field for change detection
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Sample at `(col, row)`, clamped to the grid
    pub fn sample(&self, col: usize, row: usize) -> f32 {
        let col = col.min(self.width - 1);
        let row = row.min(self.height - 1);
        self.data[row * self.width + col]
    }

    /// Nearest sample for a texture coordinate.
    ///
    /// `col = round(u * (width - 1))`, `row = round(v * (height - 1))`.
    /// Coordinates outside `[0, 1]` and NaN are clamped onto the grid edge.
    pub fn sample_uv(&self, u: f32, v: f32) -> f32 {
        let col = grid_index(u, self.width);
        let row = grid_index(v, self.height);
        self.sample(col, row)
    }
}

fn grid_index(t: f32, size: usize) -> usize {
    let scaled = (t * (size - 1) as f32).round();
    if scaled.is_nan() || scaled <= 0.0 {
        0
    } else {
        (scaled as usize).min(size - 1)
    }
}

impl Serialize for HeightField {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        HeightFieldData {
            width: self.width,
            height: self.height,
            data: self.data.clone(),
        }
        .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for HeightField {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = HeightFieldData::deserialize(deserializer)?;
        HeightField::new(raw.width, raw.height, raw.data).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_mismatched_length() {
        let err = HeightField::new(3, 2, vec![0.0; 5]).unwrap_err();
        assert_eq!(
            err,
            HeightFieldError::DimensionMismatch {
                width: 3,
                height: 2,
                expected: 6,
                actual: 5
            }
        );
        assert!(matches!(
            HeightField::new(0, 2, vec![]),
            Err(HeightFieldError::Empty { .. })
        ));
    }

    #[test]
    fn test_sample_uv_row_major() {
        // 3 columns, 2 rows
        let field = HeightField::new(3, 2, vec![0.0, 1.0, 2.0, 3.0, 4.0, 5.0]).unwrap();
        assert_eq!(field.sample_uv(0.0, 0.0), 0.0);
        assert_eq!(field.sample_uv(0.5, 0.0), 1.0);
        assert_eq!(field.sample_uv(1.0, 0.0), 2.0);
        assert_eq!(field.sample_uv(1.0, 1.0), 5.0);
        assert_eq!(field.sample_uv(0.0, 1.0), 3.0);
    }

    #[test]
    fn test_sample_uv_clamps_out_of_range() {
        let field = HeightField::new(2, 2, vec![1.0, 2.0, 3.0, 4.0]).unwrap();
        assert_eq!(field.sample_uv(1.7, 3.0), 4.0);
        assert_eq!(field.sample_uv(-0.5, -2.0), 1.0);
        assert_eq!(field.sample_uv(f32::NAN, 1.0), 3.0);
    }

    #[test]
    fn test_single_sample_field() {
        let field = HeightField::new(1, 1, vec![0.25]).unwrap();
        assert_eq!(field.sample_uv(0.3, 0.9), 0.25);
    }

    #[test]
    fn test_generation_is_unique() {
        let a = HeightField::flat(2, 2).unwrap();
        let b = HeightField::flat(2, 2).unwrap();
        assert_ne!(a.generation(), b.generation());
        assert_eq!(a.clone().generation(), a.generation());
    }

    #[test]
    fn test_from_image_channel() {
        // RGBA pixels, red channel is read
        let pixels = [255, 0, 0, 255, 0, 9, 9, 255, 51, 1, 1, 1, 102, 2, 2, 2];
        let field = HeightField::from_image_channel(&pixels, 2, 2, 4, 2.0).unwrap();
        let expected = [2.0, 0.0, 0.4, 0.8];
        for (got, want) in field.data().iter().zip(expected) {
            approx::assert_relative_eq!(*got, want, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_deserialize_validates() {
        let ok: HeightField =
            serde_json::from_str(r#"{"width":2,"height":1,"data":[0.1,0.2]}"#).unwrap();
        assert_eq!(ok.width(), 2);
        let bad: Result<HeightField, _> =
            serde_json::from_str(r#"{"width":2,"height":2,"data":[0.1]}"#);
        assert!(bad.is_err());
    }
}
