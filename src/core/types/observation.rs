//! Down-sampled observation derived from a raw scan.

use serde::{Deserialize, Serialize};

use super::pose::Point3D;

/// An ordered set of sensor-frame 3D points paired 1:1 with the range
/// values they were projected from.
///
/// Built once per scan by the preprocessor and consumed exactly once by
/// the filter engine's observation model. An empty observation is valid
/// and means the scan produced no usable returns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    /// Points in the sensor's local frame
    pub points: Vec<Point3D>,
    /// Originating range for each point, same order and length
    pub ranges: Vec<f32>,
    /// Frame the points are expressed in
    pub frame_id: String,
    /// Acquisition time of the source scan in microseconds
    pub timestamp_us: u64,
}

impl Observation {
    /// Create an observation. Panics in debug builds if the pairing
    /// invariant is violated.
    pub fn new(
        points: Vec<Point3D>,
        ranges: Vec<f32>,
        frame_id: impl Into<String>,
        timestamp_us: u64,
    ) -> Self {
        debug_assert_eq!(points.len(), ranges.len());
        Self {
            points,
            ranges,
            frame_id: frame_id.into(),
            timestamp_us,
        }
    }

    /// Number of retained points.
    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the observation carries no usable data.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}
