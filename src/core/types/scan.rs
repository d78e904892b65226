//! Raw range-scan type.

use serde::{Deserialize, Serialize};

/// A single planar range scan from the vehicle's 2D LiDAR.
///
/// Each measurement is a range value at a bearing computed from
/// `angle_min + index * angle_increment`. The scan carries the sensor
/// frame it was taken in and its acquisition timestamp so downstream
/// consumers can resolve the matching transforms.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LaserScan {
    /// Bearing of the first beam in radians
    pub angle_min: f32,
    /// Angular step between consecutive beams in radians
    pub angle_increment: f32,
    /// Minimum valid range declared by the sensor, in meters
    pub range_min: f32,
    /// Maximum valid range declared by the sensor, in meters
    pub range_max: f32,
    /// Range measurements in meters
    pub ranges: Vec<f32>,
    /// Frame the scan was taken in
    pub frame_id: String,
    /// Acquisition time in microseconds
    pub timestamp_us: u64,
}

impl LaserScan {
    /// Create a new scan.
    pub fn new(
        angle_min: f32,
        angle_increment: f32,
        range_min: f32,
        range_max: f32,
        ranges: Vec<f32>,
        frame_id: impl Into<String>,
        timestamp_us: u64,
    ) -> Self {
        Self {
            angle_min,
            angle_increment,
            range_min,
            range_max,
            ranges,
            frame_id: frame_id.into(),
            timestamp_us,
        }
    }

    /// Bearing of the beam at `index`.
    #[inline]
    pub fn angle_at(&self, index: usize) -> f32 {
        self.angle_min + index as f32 * self.angle_increment
    }

    /// Number of beams.
    #[inline]
    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    /// Whether the scan has no beams.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }
}
