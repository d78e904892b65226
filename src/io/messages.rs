//! Outbound estimate and diagnostic message types.
//!
//! Messages are plain serde structs; the wire format is a 4-byte
//! big-endian length prefix followed by the JSON body.

use serde::{Deserialize, Serialize};

use crate::core::types::{Observation, Point3D, Pose3D};

/// Full pose distribution of the current belief.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoseArrayMessage {
    /// Frame the poses are expressed in (map frame).
    pub frame_id: String,
    /// Timestamp in microseconds.
    pub timestamp_us: u64,
    /// One pose per particle, ordered as the engine reports them.
    pub poses: Vec<Pose3D>,
}

/// Single representative pose of the belief.
///
/// `pose` is the particle at index 0 by convention; `best_state` is the
/// engine's own best estimate. The two may diverge and are published
/// together so consumers can pick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BestPoseMessage {
    /// Frame the poses are expressed in (map frame).
    pub frame_id: String,
    /// Timestamp in microseconds.
    pub timestamp_us: u64,
    /// Particle 0.
    pub pose: Pose3D,
    /// Engine best estimate.
    pub best_state: Pose3D,
}

/// Down-sampled observation, republished for diagnostics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObservationMessage {
    /// Sensor frame of the points.
    pub frame_id: String,
    /// Timestamp of the source scan in microseconds.
    pub timestamp_us: u64,
    /// Retained points.
    pub points: Vec<Point3D>,
    /// Ranges paired 1:1 with the points.
    pub ranges: Vec<f32>,
}

impl ObservationMessage {
    /// Build the diagnostic message from an observation.
    pub fn from_observation(observation: &Observation) -> Self {
        Self {
            frame_id: observation.frame_id.clone(),
            timestamp_us: observation.timestamp_us,
            points: observation.points.clone(),
            ranges: observation.ranges.clone(),
        }
    }
}

/// Destination for published estimates.
///
/// Implementations only transport; they never mutate the belief or the
/// localization state.
pub trait EstimateSink {
    /// Publish the full pose distribution.
    fn publish_pose_array(&mut self, msg: &PoseArrayMessage);

    /// Publish the representative pose.
    fn publish_best_pose(&mut self, msg: &BestPoseMessage);

    /// Publish the down-sampled observation (diagnostic).
    fn publish_observation(&mut self, msg: &ObservationMessage);
}

/// Encode a message as a length-prefixed JSON frame.
pub fn encode_frame<T: Serialize>(msg: &T) -> Option<Vec<u8>> {
    let body = match serde_json::to_vec(msg) {
        Ok(b) => b,
        Err(e) => {
            log::warn!("failed to encode message: {}", e);
            return None;
        }
    };

    let mut frame = Vec::with_capacity(4 + body.len());
    frame.extend_from_slice(&(body.len() as u32).to_be_bytes());
    frame.extend_from_slice(&body);
    Some(frame)
}
