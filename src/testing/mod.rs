//! Testing utilities for CrabShot
//!
//! Synthetic depth maps and photos for exercising the capture pipeline
//! without camera hardware.

pub mod synthetic_data;

pub use synthetic_data::{
    center_block_depth_map,
    horizontal_gradient_depth_map,
    synthetic_capture,
    synthetic_jpeg,
    synthetic_metadata,
    uniform_depth_map,
};
