//! Narrow interface to the coordinate-frame transform service.
//!
//! The service owns the time-indexed frame tree; this layer looks up
//! and composes transforms, re-expresses poses across frames, and
//! broadcasts the correction transform. Lookups can fail or time out;
//! every failure here is recoverable by dropping the affected cycle.

use std::time::Duration;

use thiserror::Error;

use crate::core::types::{Pose3D, Timestamped};

/// Errors from the transform service.
#[derive(Debug, Error)]
pub enum FrameError {
    /// The frame chain could not be resolved at the requested time.
    #[error("transform {target} <- {source_frame} unavailable at {time_us}us: {reason}")]
    Unavailable {
        target: String,
        source_frame: String,
        time_us: u64,
        reason: String,
    },

    /// A bounded wait for frame availability elapsed.
    #[error("timed out after {timeout_ms}ms waiting for {target} <- {source_frame}")]
    WaitTimeout {
        target: String,
        source_frame: String,
        timeout_ms: u64,
    },
}

/// A rigid transform between two named frames, valid over a time span.
#[derive(Debug, Clone, PartialEq)]
pub struct StampedTransform {
    /// Frame the transform maps into.
    pub parent_frame: String,
    /// Frame the transform maps from.
    pub child_frame: String,
    /// The rigid transform itself.
    pub transform: Pose3D,
    /// Time the transform was computed for, in microseconds.
    pub stamp_us: u64,
    /// Time after which consumers must no longer extrapolate from it.
    pub expires_us: u64,
}

/// Time-indexed frame lookup, pose re-expression, and broadcast.
pub trait FrameTransforms {
    /// Rigid transform mapping points in `source` into `target` at the
    /// given time.
    fn lookup(&self, target: &str, source: &str, time_us: u64) -> Result<Pose3D, FrameError>;

    /// Re-express a pose given in `source` into `target` at the given
    /// time.
    fn transform_pose(
        &self,
        pose: &Pose3D,
        source: &str,
        target: &str,
        time_us: u64,
    ) -> Result<Pose3D, FrameError>;

    /// Publish a transform to downstream consumers.
    fn broadcast(&self, transform: &StampedTransform);

    /// Block until `target <- source` is resolvable at `time_us`, up to
    /// `timeout`. Returns false on timeout; the caller drops the
    /// message rather than retrying.
    fn wait_for(&self, target: &str, source: &str, time_us: u64, timeout: Duration) -> bool;
}

/// Odometry pose source, resolved against the motion sensor's frame
/// chain at a requested time.
pub trait OdometryProvider {
    /// Odometry pose at `time_us`, or `None` if it cannot be resolved.
    fn odom_pose(&self, time_us: u64) -> Option<Pose3D>;
}

/// Bookkeeping for the most recent odometry pose handed to the filter.
///
/// Written only by the update scheduler; reset on every re-seed.
#[derive(Debug, Clone, Default)]
pub struct OdomTracker {
    last_pose: Option<Timestamped<Pose3D>>,
}

impl OdomTracker {
    /// Create an empty tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// The last recorded odometry pose, if any.
    pub fn last_pose(&self) -> Option<&Timestamped<Pose3D>> {
        self.last_pose.as_ref()
    }

    /// Record the odometry pose for the scan just processed.
    pub fn set_last_pose(&mut self, pose: Timestamped<Pose3D>) {
        self.last_pose = Some(pose);
    }

    /// Forget the reference pose (on re-seed).
    pub fn reset(&mut self) {
        self.last_pose = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tracker_roundtrip() {
        let mut tracker = OdomTracker::new();
        assert!(tracker.last_pose().is_none());

        tracker.set_last_pose(Timestamped::new(Pose3D::identity(), 100));
        assert_eq!(tracker.last_pose().unwrap().timestamp_us, 100);

        tracker.reset();
        assert!(tracker.last_pose().is_none());
    }

    #[test]
    fn test_frame_error_display() {
        let err = FrameError::Unavailable {
            target: "world".into(),
            source_frame: "laser".into(),
            time_us: 5,
            reason: "no data".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("world"));
        assert!(msg.contains("laser"));
    }
}
