//! Pose and correction-transform publishing.
//!
//! Converts the current particle set into a pose-distribution message,
//! publishes a representative pose, and derives the map↔world
//! correction transform from the engine's best estimate. The latest
//! correction is kept behind a shared handle so a timer thread can
//! re-broadcast it with a fresh expiration between fused updates.

use std::sync::{Arc, RwLock};

use serde::Deserialize;

use crate::core::types::Pose3D;
use crate::engine::BeliefEngine;
use crate::frames::{FrameTransforms, StampedTransform};
use crate::io::messages::{BestPoseMessage, EstimateSink, PoseArrayMessage};

/// Reference frame identifiers.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FrameIds {
    /// Fixed map frame the belief is expressed in.
    pub map: String,
    /// Drifting world frame the odometry is expressed in.
    pub world: String,
    /// Vehicle base frame projected to the ground plane.
    pub base_footprint: String,
    /// Vehicle base frame with roll/pitch removed.
    pub base_stabilized: String,
    /// Full vehicle body frame.
    pub base_link: String,
}

impl Default for FrameIds {
    fn default() -> Self {
        Self {
            map: "map".to_string(),
            world: "world".to_string(),
            base_footprint: "base_footprint".to_string(),
            base_stabilized: "base_stabilized".to_string(),
            base_link: "base_link".to_string(),
        }
    }
}

/// Configuration for the publisher.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PublisherConfig {
    /// Frame identifiers.
    pub frames: FrameIds,
    /// How long a broadcast correction stays valid, in microseconds.
    /// Also the re-broadcast period. Default: 1s
    pub transform_tolerance_us: u64,
}

impl Default for PublisherConfig {
    fn default() -> Self {
        Self {
            frames: FrameIds::default(),
            transform_tolerance_us: 1_000_000,
        }
    }
}

/// Shared snapshot of the latest world→map correction.
type CorrectionHandle = Arc<RwLock<Option<Pose3D>>>;

/// Publishes pose estimates and owns the correction transform.
pub struct PosePublisher {
    config: PublisherConfig,
    latest_correction: CorrectionHandle,
    pose_buffer: Vec<Pose3D>,
}

impl PosePublisher {
    /// Create a publisher. No correction exists until the first
    /// successful estimate publish.
    pub fn new(config: PublisherConfig) -> Self {
        Self {
            config,
            latest_correction: Arc::new(RwLock::new(None)),
            pose_buffer: Vec::new(),
        }
    }

    /// Get the current configuration.
    pub fn config(&self) -> &PublisherConfig {
        &self.config
    }

    /// Handle for the periodic re-broadcast task.
    pub fn correction_broadcaster(&self) -> CorrectionBroadcaster {
        CorrectionBroadcaster {
            latest: self.latest_correction.clone(),
            map_frame: self.config.frames.map.clone(),
            world_frame: self.config.frames.world.clone(),
            tolerance_us: self.config.transform_tolerance_us,
        }
    }

    /// Latest world→map correction, if one has been computed.
    pub fn latest_correction(&self) -> Option<Pose3D> {
        *self.latest_correction.read().unwrap()
    }

    /// Publish the pose distribution, the representative pose, and the
    /// correction transform for the belief at `time_us`.
    ///
    /// The pose buffer is resized to the engine's current particle
    /// count on every call. Each output pose depends only on its own
    /// particle, so the fill is a pure per-index map.
    ///
    /// If the frame chain from the base frame to the world frame cannot
    /// be resolved, the publish cycle is aborted and the previously
    /// broadcast correction stays in effect until its own expiration.
    pub fn publish_estimate<E, F>(
        &mut self,
        engine: &E,
        frames: &F,
        sink: &mut dyn EstimateSink,
        time_us: u64,
    ) where
        E: BeliefEngine + ?Sized,
        F: FrameTransforms + ?Sized,
    {
        let n = engine.num_particles();

        self.pose_buffer.clear();
        self.pose_buffer.extend((0..n).map(|i| engine.state(i)));

        sink.publish_pose_array(&PoseArrayMessage {
            frame_id: self.config.frames.map.clone(),
            timestamp_us: time_us,
            poses: self.pose_buffer.clone(),
        });

        if n == 0 {
            log::warn!("belief has no particles, skipping pose and transform publish");
            return;
        }

        let best = engine.best_state();
        sink.publish_best_pose(&BestPoseMessage {
            frame_id: self.config.frames.map.clone(),
            timestamp_us: time_us,
            pose: engine.state(0),
            best_state: best,
        });

        // The best state is the base frame's pose in the map frame.
        // Invert it, re-express that in the world frame, and what comes
        // out is the world→map correction.
        let inverted = best.inverse();
        let world_to_map = match frames.transform_pose(
            &inverted,
            &self.config.frames.base_footprint,
            &self.config.frames.world,
            time_us,
        ) {
            Ok(pose) => pose,
            Err(e) => {
                log::warn!(
                    "failed to subtract world to map transform, keeping previous correction: {}",
                    e
                );
                return;
            }
        };

        *self.latest_correction.write().unwrap() = Some(world_to_map);

        frames.broadcast(&StampedTransform {
            parent_frame: self.config.frames.map.clone(),
            child_frame: self.config.frames.world.clone(),
            transform: world_to_map.inverse(),
            stamp_us: time_us,
            expires_us: time_us + self.config.transform_tolerance_us,
        });
    }
}

/// Re-broadcasts the last computed correction with a fresh expiration.
///
/// Held by the transform timer thread; only reads the shared snapshot,
/// never blocks scan processing.
#[derive(Debug, Clone)]
pub struct CorrectionBroadcaster {
    latest: CorrectionHandle,
    map_frame: String,
    world_frame: String,
    tolerance_us: u64,
}

impl CorrectionBroadcaster {
    /// Broadcast the latest correction as of `now_us`, if one exists.
    pub fn rebroadcast<F: FrameTransforms + ?Sized>(&self, frames: &F, now_us: u64) {
        let snapshot = *self.latest.read().unwrap();
        if let Some(correction) = snapshot {
            frames.broadcast(&StampedTransform {
                parent_frame: self.map_frame.clone(),
                child_frame: self.world_frame.clone(),
                transform: correction.inverse(),
                stamp_us: now_us,
                expires_us: now_us + self.tolerance_us,
            });
        }
    }
}
