/// Capture quality signals
///
/// Turns the raw depth variability statistic into a coarse scene depth
/// classification that downstream consumers can act on.
pub mod depth;

pub use depth::{DepthQualityAnalyzer, DepthQualityReport, SceneDepthLevel};
