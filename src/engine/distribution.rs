//! Belief-seed distributions for particle initialization.

use rand::Rng;
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};
use std::f32::consts::PI;

use crate::core::types::Pose3D;

/// Per-axis standard deviations for a Gaussian pose seed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoseStdDev {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub roll: f32,
    pub pitch: f32,
    pub yaw: f32,
}

impl Default for PoseStdDev {
    fn default() -> Self {
        Self {
            x: 0.2,
            y: 0.2,
            z: 0.2,
            roll: 0.2,
            pitch: 0.2,
            yaw: 0.2,
        }
    }
}

/// Axis-aligned bounds of the occupancy map, for uniform seeding.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapBounds {
    pub min_x: f32,
    pub max_x: f32,
    pub min_y: f32,
    pub max_y: f32,
    pub min_z: f32,
    pub max_z: f32,
}

impl Default for MapBounds {
    fn default() -> Self {
        Self {
            min_x: -10.0,
            max_x: 10.0,
            min_y: -10.0,
            max_y: 10.0,
            min_z: 0.0,
            max_z: 5.0,
        }
    }
}

/// Distribution the filter engine draws its entire particle set from
/// on (re-)initialization.
#[derive(Debug, Clone, PartialEq)]
pub enum PoseDistribution {
    /// Gaussian around a supplied pose, independent per axis.
    Gaussian {
        /// Distribution center.
        mean: Pose3D,
        /// Per-axis standard deviations.
        std_dev: PoseStdDev,
    },
    /// Uniform over the map bounds with unconstrained orientation
    /// (global re-localization).
    Uniform {
        /// Known extent of the occupancy map.
        bounds: MapBounds,
    },
}

impl PoseDistribution {
    /// Draw one pose from the distribution.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Pose3D {
        match self {
            PoseDistribution::Gaussian { mean, std_dev } => {
                let axis = |center: f32, sigma: f32, rng: &mut R| {
                    if sigma > 0.0 {
                        // Parameters are finite by construction.
                        Normal::new(center, sigma)
                            .map(|n| n.sample(rng))
                            .unwrap_or(center)
                    } else {
                        center
                    }
                };
                Pose3D::new(
                    axis(mean.x, std_dev.x, rng),
                    axis(mean.y, std_dev.y, rng),
                    axis(mean.z, std_dev.z, rng),
                    axis(mean.roll, std_dev.roll, rng),
                    axis(mean.pitch, std_dev.pitch, rng),
                    axis(mean.yaw, std_dev.yaw, rng),
                )
            }
            PoseDistribution::Uniform { bounds } => Pose3D::new(
                rng.gen_range(bounds.min_x..=bounds.max_x),
                rng.gen_range(bounds.min_y..=bounds.max_y),
                rng.gen_range(bounds.min_z..=bounds.max_z),
                rng.gen_range(-PI..PI),
                rng.gen_range(-PI..PI),
                rng.gen_range(-PI..PI),
            ),
        }
    }
}
