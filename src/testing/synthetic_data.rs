//! Synthetic captures for offline testing
//!
//! Depth maps with known variability and small encoded photos, so the
//! capture pipeline can be exercised without camera hardware.

use crate::capture::CapturedPhotoData;
use crate::depth::DepthMap;
use crate::types::Metadata;
use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, RgbImage};

/// Depth map with the same depth everywhere
pub fn uniform_depth_map(width: u32, height: u32, depth: f32) -> DepthMap {
    DepthMap::filled(width, height, depth)
}

/// Background depth with a raised block in the middle.
///
/// The block spans `[3/8, 5/8)` of each axis: it covers the center sample of
/// the canonical constellation and, for maps at least 6 pixels on each side,
/// none of the quadrant midpoints.
pub fn center_block_depth_map(width: u32, height: u32, center: f32, background: f32) -> DepthMap {
    let in_block = |v: u32, extent: u32| {
        let (v, extent) = (v as u64, extent as u64);
        8 * v >= 3 * extent && 8 * v < 5 * extent
    };

    let data = (0..height)
        .flat_map(|y| (0..width).map(move |x| (x, y)))
        .map(|(x, y)| {
            if in_block(x, width) && in_block(y, height) {
                center
            } else {
                background
            }
        })
        .collect();

    DepthMap::new(width, height, data).unwrap_or_else(|_| DepthMap::filled(width, height, background))
}

/// Depth increasing linearly from `near` at the left edge to `far` at the right
pub fn horizontal_gradient_depth_map(width: u32, height: u32, near: f32, far: f32) -> DepthMap {
    let step = if width > 1 {
        (far - near) / (width - 1) as f32
    } else {
        0.0
    };

    let row: Vec<f32> = (0..width).map(|x| near + step * x as f32).collect();
    let data = row.repeat(height as usize);

    DepthMap::new(width, height, data).unwrap_or_else(|_| DepthMap::filled(width, height, near))
}

/// Encode a gradient test pattern as a baseline JPEG
pub fn synthetic_jpeg(width: u32, height: u32) -> Vec<u8> {
    let image = RgbImage::from_fn(width, height, |x, y| {
        image::Rgb([(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8])
    });

    let mut encoded = Vec::new();
    let encoder = JpegEncoder::new_with_quality(&mut encoded, 90);
    if let Err(e) = DynamicImage::ImageRgb8(image).write_with_encoder(encoder) {
        log::error!("Failed to encode synthetic JPEG: {}", e);
    }
    encoded
}

/// Metadata dictionary carrying only an orientation tag
pub fn synthetic_metadata(orientation: i64) -> Metadata {
    let mut metadata = Metadata::new();
    metadata.insert("Orientation".to_string(), orientation.into());
    metadata
}

/// A complete synthetic capture: JPEG photo, orientation tag and optional depth
pub fn synthetic_capture(
    width: u32,
    height: u32,
    orientation: i64,
    depth: Option<DepthMap>,
) -> CapturedPhotoData {
    let photo = CapturedPhotoData::new(synthetic_jpeg(width, height))
        .with_metadata(synthetic_metadata(orientation));
    match depth {
        Some(depth) => photo.with_depth_map(depth),
        None => photo,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::depth::SampleSet;

    #[test]
    fn test_center_block_covers_only_center_sample() {
        for size in [6u32, 7, 9, 16, 33, 640] {
            let map = center_block_depth_map(size, size, 100.0, 0.0);
            let depths: Vec<f32> = SampleSet::canonical()
                .sample(&map)
                .iter()
                .map(|s| s.depth)
                .collect();
            assert_eq!(depths, vec![100.0, 0.0, 0.0, 0.0, 0.0], "size {}", size);
        }
    }

    #[test]
    fn test_gradient_endpoints() {
        let map = horizontal_gradient_depth_map(11, 2, 1.0, 2.0);
        assert_eq!(map.get(0, 1), Some(1.0));
        assert!((map.get(10, 0).unwrap() - 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_synthetic_jpeg_decodes() {
        let bytes = synthetic_jpeg(24, 12);
        let decoded = image::load_from_memory(&bytes).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (24, 12));
    }

    #[test]
    fn test_synthetic_capture_carries_orientation() {
        let capture = synthetic_capture(8, 8, 6, None);
        assert_eq!(capture.metadata["Orientation"], 6);
        assert!(capture.depth.is_none());
    }
}
