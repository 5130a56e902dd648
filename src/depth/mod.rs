/// Depth map analysis
///
/// Estimates how non-planar a captured scene is near the subject by sampling
/// a fixed constellation of points in the depth map and reporting the
/// weighted standard deviation of those depths.
pub mod sampling;
pub mod variability;

pub use sampling::{ResolvedSample, SampleSet, WeightedSample};
pub use variability::{
    estimate_variability, estimate_variability_with, weighted_stats, DepthVariability,
    UnavailableReason, WeightedStats,
};

use crate::errors::CaptureError;
use image::{DynamicImage, ImageBuffer, Luma};
use std::ops::Deref;

/// Read-only access to a single-channel floating point depth grid
pub trait DepthSource {
    fn width(&self) -> u32;
    fn height(&self) -> u32;

    /// Depth at `(x, y)`; callers guarantee the coordinate is in bounds
    fn depth_at(&self, x: u32, y: u32) -> f32;

    fn is_empty(&self) -> bool {
        self.width() == 0 || self.height() == 0
    }
}

/// Dense row-major depth map
#[derive(Debug, Clone, PartialEq)]
pub struct DepthMap {
    width: u32,
    height: u32,
    data: Vec<f32>,
}

impl DepthMap {
    pub fn new(width: u32, height: u32, data: Vec<f32>) -> Result<Self, CaptureError> {
        let expected = (width as usize).checked_mul(height as usize).ok_or_else(|| {
            CaptureError::InvalidDepthMap(format!(
                "{}x{} map is too large to address",
                width, height
            ))
        })?;
        if data.len() != expected {
            return Err(CaptureError::InvalidDepthMap(format!(
                "{}x{} map needs {} samples, got {}",
                width,
                height,
                expected,
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Map filled with a single depth value.
    ///
    /// Panics if `width * height` overflows `usize`; use [`DepthMap::new`]
    /// for untrusted dimensions.
    pub fn filled(width: u32, height: u32, depth: f32) -> Self {
        let len = (width as usize)
            .checked_mul(height as usize)
            .unwrap_or(usize::MAX);
        Self {
            width,
            height,
            data: vec![depth; len],
        }
    }

    pub fn from_luma32f(buffer: ImageBuffer<Luma<f32>, Vec<f32>>) -> Self {
        let (width, height) = buffer.dimensions();
        Self {
            width,
            height,
            data: buffer.into_raw(),
        }
    }

    /// Convert a decoded depth image into a map.
    ///
    /// Integer encodings are normalized to `[0, 1]` by the image crate; only
    /// float images carry device-native units.
    pub fn from_image(image: &DynamicImage) -> Self {
        Self::from_luma32f(image.to_luma32f())
    }

    pub fn get(&self, x: u32, y: u32) -> Option<f32> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.data
            .get(y as usize * self.width as usize + x as usize)
            .copied()
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }
}

impl DepthSource for DepthMap {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn depth_at(&self, x: u32, y: u32) -> f32 {
        self.data[y as usize * self.width as usize + x as usize]
    }
}

impl<C> DepthSource for ImageBuffer<Luma<f32>, C>
where
    C: Deref<Target = [f32]>,
{
    fn width(&self) -> u32 {
        self.dimensions().0
    }

    fn height(&self) -> u32 {
        self.dimensions().1
    }

    fn depth_at(&self, x: u32, y: u32) -> f32 {
        self.get_pixel(x, y).0[0]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_wrong_length() {
        let err = DepthMap::new(4, 4, vec![0.0; 15]).unwrap_err();
        assert!(err.to_string().contains("needs 16 samples, got 15"));
    }

    #[test]
    fn test_new_rejects_unaddressable_dimensions() {
        let err = DepthMap::new(u32::MAX, u32::MAX, Vec::new()).unwrap_err();
        assert!(matches!(err, CaptureError::InvalidDepthMap(_)));
    }

    #[cfg(target_pointer_width = "32")]
    #[test]
    fn test_new_reports_overflow_on_32_bit() {
        let err = DepthMap::new(u32::MAX, 2, Vec::new()).unwrap_err();
        assert!(err.to_string().contains("too large to address"));
    }

    #[test]
    fn test_zero_area_map_is_empty() {
        let map = DepthMap::new(0, 1, Vec::new()).unwrap();
        assert!(map.is_empty());
        assert_eq!(map.get(0, 0), None);
    }

    #[test]
    fn test_row_major_indexing() {
        let map = DepthMap::new(3, 2, vec![0.0, 1.0, 2.0, 3.0, 4.0, 5.0]).unwrap();
        assert_eq!(map.get(2, 0), Some(2.0));
        assert_eq!(map.get(0, 1), Some(3.0));
        assert_eq!(map.depth_at(1, 1), 4.0);
        assert_eq!(map.get(3, 0), None);
    }

    #[test]
    fn test_image_buffer_source_matches_map() {
        let buffer = ImageBuffer::from_fn(4, 3, |x, y| Luma([(x + y * 4) as f32]));
        assert_eq!(DepthSource::width(&buffer), 4);
        assert_eq!(DepthSource::depth_at(&buffer, 3, 2), 11.0);

        let map = DepthMap::from_luma32f(buffer);
        assert_eq!(map.get(3, 2), Some(11.0));
    }
}
