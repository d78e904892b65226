//! Motion gate: decides drift-only vs. full weighted update.
//!
//! Full updates score the observation over every particle, so they are
//! only worth running once the vehicle has moved enough that the belief
//! would meaningfully change. Re-weighting on a near-static pose also
//! degrades the weight distribution for no gain.

use serde::Deserialize;

use crate::core::types::Pose3D;

/// Thresholds for the motion gate.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct MotionGateConfig {
    /// Translation magnitude that warrants a weighted update, in
    /// meters. Default: 0.3m
    pub translation_threshold: f32,

    /// Yaw magnitude that warrants a weighted update, in radians.
    /// Default: 0.4rad
    pub rotation_threshold: f32,
}

impl Default for MotionGateConfig {
    fn default() -> Self {
        Self {
            translation_threshold: 0.3,
            rotation_threshold: 0.4,
        }
    }
}

/// Whether the motion between `last_localized` and `current_odom`
/// warrants a full weighted update.
///
/// Measures the relative transform `last⁻¹ ∘ current`; returns true
/// when its translation magnitude or absolute yaw reaches the
/// corresponding threshold (boundary inclusive). Pure function, no
/// side effects.
pub fn exceeds_motion_threshold(
    last_localized: &Pose3D,
    current_odom: &Pose3D,
    config: &MotionGateConfig,
) -> bool {
    let delta = last_localized.relative_to(current_odom);

    delta.translation_norm() >= config.translation_threshold
        || delta.yaw.abs() >= config.rotation_threshold
}
