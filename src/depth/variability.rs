//! Weighted depth variability
//!
//! The statistic is the population-style weighted standard deviation of the
//! sampled depths. It is a proxy for how non-planar the scene is near the
//! subject; a flat wall reads 0.0.

use super::sampling::SampleSet;
use super::DepthSource;
use crate::assert_invariant;
use serde::{Deserialize, Serialize};

/// Why no variability statistic was produced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnavailableReason {
    /// The capture carried no depth data
    NoDepthData,
    /// The depth map has zero width or height
    EmptyDepthMap,
    /// Every sampled depth was NaN or infinite
    NoValidSamples,
}

/// Outcome of a variability estimate.
///
/// `Unavailable` is an expected result, distinct from a measured `0.0`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", content = "value", rename_all = "snake_case")]
pub enum DepthVariability {
    Measured(f32),
    Unavailable(UnavailableReason),
}

impl DepthVariability {
    pub fn value(&self) -> Option<f32> {
        match self {
            DepthVariability::Measured(v) => Some(*v),
            DepthVariability::Unavailable(_) => None,
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, DepthVariability::Measured(_))
    }
}

impl From<DepthVariability> for Option<f32> {
    fn from(variability: DepthVariability) -> Self {
        variability.value()
    }
}

/// Weighted summary of a set of observations
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeightedStats {
    pub mean: f32,
    pub variance: f32,
    pub std_dev: f32,
    pub total_weight: f32,
}

/// Weighted mean, population variance and standard deviation.
///
/// Returns `None` for an empty input or when any weight is non-finite or
/// not strictly positive.
pub fn weighted_stats(observations: &[(f32, f32)]) -> Option<WeightedStats> {
    if observations.is_empty()
        || observations
            .iter()
            .any(|&(_, w)| !(w.is_finite() && w > 0.0))
    {
        return None;
    }

    let total_weight: f32 = observations.iter().map(|&(_, w)| w).sum();

    // Work in offsets from the first observation: identical inputs give
    // offsets of exactly zero, so a flat scene reads exactly 0.0.
    let reference = observations[0].0;
    let mean_offset = observations
        .iter()
        .map(|&(v, w)| (v - reference) * w)
        .sum::<f32>()
        / total_weight;

    let variance = observations
        .iter()
        .map(|&(v, w)| {
            let d = (v - reference) - mean_offset;
            w * d * d
        })
        .sum::<f32>()
        / total_weight;

    Some(WeightedStats {
        mean: reference + mean_offset,
        variance,
        std_dev: variance.sqrt(),
        total_weight,
    })
}

/// Estimate depth variability with the canonical five-point constellation
pub fn estimate_variability<D: DepthSource + ?Sized>(depth: Option<&D>) -> DepthVariability {
    estimate_variability_with(depth, &SampleSet::canonical())
}

/// Estimate depth variability with a caller-supplied sample set
pub fn estimate_variability_with<D: DepthSource + ?Sized>(
    depth: Option<&D>,
    samples: &SampleSet,
) -> DepthVariability {
    let Some(depth) = depth else {
        log::info!("No depth data attached to capture, depth variance unavailable");
        return DepthVariability::Unavailable(UnavailableReason::NoDepthData);
    };

    if depth.is_empty() {
        log::info!(
            "Depth map is {}x{}, depth variance unavailable",
            depth.width(),
            depth.height()
        );
        return DepthVariability::Unavailable(UnavailableReason::EmptyDepthMap);
    }

    let resolved = samples.sample(depth);
    let observations: Vec<(f32, f32)> = resolved
        .iter()
        .filter(|s| s.depth.is_finite())
        .map(|s| (s.depth, s.weight))
        .collect();

    if observations.len() < resolved.len() {
        log::debug!(
            "Skipped {} non-finite depth samples",
            resolved.len() - observations.len()
        );
    }

    if observations.is_empty() {
        log::info!("All sampled depths were invalid, depth variance unavailable");
        return DepthVariability::Unavailable(UnavailableReason::NoValidSamples);
    }

    let stats = weighted_stats(&observations);
    assert_invariant!(
        stats.is_some(),
        "Total sample weight is positive",
        "depth::variability"
    );

    match stats {
        Some(stats) => {
            log::debug!(
                "Depth variability over {} samples: mean={:.4}, std_dev={:.4}",
                observations.len(),
                stats.mean,
                stats.std_dev
            );
            DepthVariability::Measured(stats.std_dev)
        }
        None => DepthVariability::Unavailable(UnavailableReason::NoValidSamples),
    }
}
