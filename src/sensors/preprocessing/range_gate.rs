//! Range gating and beam projection for raw scans.
//!
//! Accepts beams whose range lies inside the configured window and
//! projects each accepted beam to a 3D point in the sensor frame.

use serde::Deserialize;

use crate::core::math::normalize_angle;
use crate::core::types::{LaserScan, Point3D};

/// Configuration for range gating.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct RangeGateConfig {
    /// Minimum acceptable range in meters.
    ///
    /// The effective lower bound is the larger of this and the scan's
    /// declared `range_min` (self-reflections off the airframe).
    /// Default: 0.05m
    pub min_range: f32,

    /// Maximum acceptable range in meters.
    ///
    /// Returns beyond this are unreliable against the occupancy map.
    /// Default: 14.0m
    pub max_range: f32,
}

impl Default for RangeGateConfig {
    fn default() -> Self {
        Self {
            min_range: 0.05,
            max_range: 14.0,
        }
    }
}

/// Output of a gating pass: accepted points, their ranges, and the
/// number of rejected beams (diagnostic only).
#[derive(Debug, Clone)]
pub struct GatedBeams {
    /// Accepted beam endpoints in the sensor frame.
    pub points: Vec<Point3D>,
    /// Range of each accepted beam, same order.
    pub ranges: Vec<f32>,
    /// Beams rejected by the window.
    pub rejected: usize,
}

/// Range gate that converts a raw scan into sensor-frame points.
#[derive(Debug, Clone)]
pub struct RangeGate {
    config: RangeGateConfig,
}

impl RangeGate {
    /// Create a new range gate with the given configuration.
    pub fn new(config: RangeGateConfig) -> Self {
        Self { config }
    }

    /// Get the current configuration.
    pub fn config(&self) -> &RangeGateConfig {
        &self.config
    }

    /// Check a range against the acceptance window for `scan`.
    #[inline]
    pub fn accepts(&self, scan: &LaserScan, range: f32) -> bool {
        let lower = self.config.min_range.max(scan.range_min);
        range.is_finite() && range >= lower && range <= self.config.max_range
    }

    /// Gate and project every beam of a scan.
    ///
    /// Each accepted beam becomes the point obtained by rotating the
    /// unit X vector through the beam's bearing and scaling by its range.
    /// The sensor is planar, so all points land at z = 0 in its frame.
    pub fn apply(&self, scan: &LaserScan) -> GatedBeams {
        let mut points = Vec::with_capacity(scan.len());
        let mut ranges = Vec::with_capacity(scan.len());
        let mut rejected = 0usize;

        for (i, &range) in scan.ranges.iter().enumerate() {
            if self.accepts(scan, range) {
                let bearing = normalize_angle(scan.angle_at(i));
                let (sin_b, cos_b) = bearing.sin_cos();
                points.push(Point3D::new(range * cos_b, range * sin_b, 0.0));
                ranges.push(range);
            } else {
                rejected += 1;
            }
        }

        GatedBeams {
            points,
            ranges,
            rejected,
        }
    }
}

impl Default for RangeGate {
    fn default() -> Self {
        Self::new(RangeGateConfig::default())
    }
}
