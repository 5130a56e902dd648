//! CrabShot: photo capture post-processing
//!
//! Takes a finished capture from a camera framework and shapes the result
//! handed back to the application.
//!
//! # Features
//! - EXIF orientation normalization to rotation class and mirroring
//! - Weighted depth variability from an attached depth map
//! - Photo persistence with unique file names
//! - Owned completion handles for in-flight captures
//! - TOML configuration
//!
//! # Usage
//! ```rust,ignore
//! use crabshot::depth::{estimate_variability, DepthMap};
//! use crabshot::orientation::interpret;
//!
//! let info = interpret(6);
//! let depth = DepthMap::filled(640, 480, 1.5);
//! let variability = estimate_variability(Some(&depth));
//! assert_eq!(variability.value(), Some(0.0));
//! ```
pub mod capture;
pub mod config;
pub mod depth;
pub mod errors;
pub mod invariant_ppt;
pub mod orientation;
pub mod quality;
pub mod types;

// Testing utilities - synthetic data for offline testing
pub mod testing;

// Re-exports for convenience
pub use capture::{CaptureCompletion, CapturedPhoto, CapturedPhotoData, PendingCapture, PhotoProcessor};
pub use config::CrabShotConfig;
pub use depth::{estimate_variability, DepthMap, DepthSource, DepthVariability};
pub use errors::CaptureError;
pub use orientation::{interpret, ExifOrientation, OrientationInfo, RotationClass};
pub use types::{Metadata, PhotoCaptureResult};

/// Initialize logging
pub fn init_logging() {
    let env = env_logger::Env::default().default_filter_or("crabshot=info");
    let _ = env_logger::Builder::from_env(env).try_init();
}

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

/// Get crate information
pub fn get_info() -> CrateInfo {
    CrateInfo {
        name: NAME.to_string(),
        version: VERSION.to_string(),
        description: DESCRIPTION.to_string(),
    }
}

/// Crate information structure
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct CrateInfo {
    pub name: String,
    pub version: String,
    pub description: String,
}
