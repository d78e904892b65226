//! Spatial downsampling with a minimum inter-point spacing guarantee.
//!
//! Greedy pass over the input: a point is retained only if no already
//! retained point lies within the configured spacing. A k-d tree over
//! the retained set keeps the neighbor check cheap.
//!
//! The input comes from a planar sensor, so the tree indexes the
//! ground-plane coordinates only; spacing on the projection is a lower
//! bound on spacing in 3D.

use kiddo::float::kdtree::KdTree;
use kiddo::SquaredEuclidean;
use serde::Deserialize;

use crate::core::types::Point3D;

/// Configuration for spatial downsampling.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct SpatialDownsamplerConfig {
    /// Minimum spacing between any two retained points, in meters.
    ///
    /// Default: 0.2m
    pub min_spacing: f32,
}

impl Default for SpatialDownsamplerConfig {
    fn default() -> Self {
        Self { min_spacing: 0.2 }
    }
}

/// Spatial downsampler enforcing a minimum inter-point spacing.
///
/// Retention is greedy in input order, so the first point of a dense
/// cluster wins. Output indices are strictly increasing, which lets the
/// caller re-index parallel arrays against the same subset.
#[derive(Debug, Clone)]
pub struct SpatialDownsampler {
    config: SpatialDownsamplerConfig,
}

impl SpatialDownsampler {
    /// Create a new downsampler with the given configuration.
    pub fn new(config: SpatialDownsamplerConfig) -> Self {
        Self { config }
    }

    /// Get the current configuration.
    pub fn config(&self) -> &SpatialDownsamplerConfig {
        &self.config
    }

    /// Select the indices of points to retain.
    pub fn retain_indices(&self, points: &[Point3D]) -> Vec<usize> {
        if self.config.min_spacing <= 0.0 {
            return (0..points.len()).collect();
        }

        let min_spacing_sq = self.config.min_spacing * self.config.min_spacing;
        // Two axes for planar data; the bucket is sized so long runs of
        // identical coordinates on one axis never force a degenerate
        // split.
        let mut tree: KdTree<f32, u64, 2, 256, u32> = KdTree::new();
        let mut retained = Vec::with_capacity(points.len());

        for (i, point) in points.iter().enumerate() {
            let query = [point.x, point.y];
            let close = if retained.is_empty() {
                false
            } else {
                tree.nearest_one::<SquaredEuclidean>(&query).distance < min_spacing_sq
            };

            if !close {
                tree.add(&query, i as u64);
                retained.push(i);
            }
        }

        retained
    }
}

impl Default for SpatialDownsampler {
    fn default() -> Self {
        Self::new(SpatialDownsamplerConfig::default())
    }
}
