//! Scan preprocessing: raw range scan → down-sampled observation.
//!
//! # Pipeline
//!
//! ```text
//! LaserScan → RangeGate → SpatialDownsampler → Observation
//! ```
//!
//! The gate drops beams outside the acceptance window and projects the
//! survivors into sensor-frame 3D points; the downsampler then thins the
//! points so no two retained points lie closer than the configured
//! spacing. Ranges are re-indexed against the retained subset so the
//! output keeps the 1:1 point/range pairing.

mod range_gate;
mod spatial_downsampler;

pub use range_gate::{GatedBeams, RangeGate, RangeGateConfig};
pub use spatial_downsampler::{SpatialDownsampler, SpatialDownsamplerConfig};

use serde::Deserialize;

use crate::core::types::{LaserScan, Observation};

/// Configuration for the preprocessing pipeline.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(default)]
pub struct PreprocessorConfig {
    /// Range gate configuration.
    pub range_gate: RangeGateConfig,
    /// Downsampler configuration.
    pub downsampler: SpatialDownsamplerConfig,
}

/// Complete scan preprocessing pipeline.
#[derive(Debug, Clone)]
pub struct ScanPreprocessor {
    range_gate: RangeGate,
    downsampler: SpatialDownsampler,
}

impl ScanPreprocessor {
    /// Create a new preprocessor with the given configuration.
    pub fn new(config: PreprocessorConfig) -> Self {
        Self {
            range_gate: RangeGate::new(config.range_gate),
            downsampler: SpatialDownsampler::new(config.downsampler),
        }
    }

    /// Process a raw scan into an observation.
    ///
    /// Returns an empty observation when no beam passes the gate;
    /// callers must treat that as "no usable data" and skip the
    /// weighted update for this scan.
    pub fn process(&self, scan: &LaserScan) -> Observation {
        let gated = self.range_gate.apply(scan);

        let kept = self.downsampler.retain_indices(&gated.points);
        let points: Vec<_> = kept.iter().map(|&i| gated.points[i]).collect();
        let ranges: Vec<_> = kept.iter().map(|&i| gated.ranges[i]).collect();

        log::debug!(
            "scan subsampled: {} from {} ({} out of valid range)",
            points.len(),
            gated.points.len(),
            gated.rejected
        );

        Observation::new(points, ranges, scan.frame_id.clone(), scan.timestamp_us)
    }
}

impl Default for ScanPreprocessor {
    fn default() -> Self {
        Self::new(PreprocessorConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::TAU;

    fn room_scan(n: usize) -> LaserScan {
        // Circular room at 5m with mild ripple.
        let ranges = (0..n).map(|i| 5.0 + 0.1 * (i as f32 * 0.1).sin()).collect();
        LaserScan::new(0.0, TAU / n as f32, 0.05, 14.0, ranges, "laser", 1_000)
    }

    #[test]
    fn test_pipeline_reduces_points() {
        let scan = room_scan(720);
        let preprocessor = ScanPreprocessor::default();

        let obs = preprocessor.process(&scan);

        assert!(!obs.is_empty());
        assert!(obs.len() < scan.len());
    }

    #[test]
    fn test_ranges_reindexed_one_to_one() {
        let scan = room_scan(360);
        let preprocessor = ScanPreprocessor::default();

        let obs = preprocessor.process(&scan);

        assert_eq!(obs.points.len(), obs.ranges.len());
        // Every retained pair must be consistent: |point| == range.
        for (point, &range) in obs.points.iter().zip(obs.ranges.iter()) {
            let norm = (point.x * point.x + point.y * point.y).sqrt();
            assert!((norm - range).abs() < 1e-4);
        }
    }

    #[test]
    fn test_retained_ranges_inside_window() {
        let mut scan = room_scan(360);
        scan.ranges[7] = 0.01;
        scan.ranges[100] = 50.0;
        let config = PreprocessorConfig::default();
        let preprocessor = ScanPreprocessor::new(config);

        let obs = preprocessor.process(&scan);

        let lower = config.range_gate.min_range.max(scan.range_min);
        for &range in &obs.ranges {
            assert!(range >= lower);
            assert!(range <= config.range_gate.max_range);
        }
    }

    #[test]
    fn test_spacing_enforced_after_pipeline() {
        let scan = room_scan(1440);
        let config = PreprocessorConfig::default();
        let preprocessor = ScanPreprocessor::new(config);

        let obs = preprocessor.process(&scan);

        for (a, p) in obs.points.iter().enumerate() {
            for q in obs.points.iter().skip(a + 1) {
                assert!(p.distance(q) >= config.downsampler.min_spacing);
            }
        }
    }

    #[test]
    fn test_all_beams_invalid_yields_empty() {
        let scan = LaserScan::new(0.0, 0.01, 0.05, 14.0, vec![0.0; 100], "laser", 5);
        let preprocessor = ScanPreprocessor::default();

        let obs = preprocessor.process(&scan);

        assert!(obs.is_empty());
        assert_eq!(obs.timestamp_us, 5);
    }

    #[test]
    fn test_observation_carries_scan_metadata() {
        let scan = room_scan(90);
        let preprocessor = ScanPreprocessor::default();

        let obs = preprocessor.process(&scan);

        assert_eq!(obs.frame_id, "laser");
        assert_eq!(obs.timestamp_us, 1_000);
    }
}
