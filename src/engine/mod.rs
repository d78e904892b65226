//! Narrow interface to the external particle-filter engine.
//!
//! The engine owns the particle set, the motion and observation models,
//! importance weighting, and resampling. This layer only drives it:
//! seed the belief from a distribution, run weighted or drift-only
//! steps, and read poses back out for publishing.

mod distribution;

pub use distribution::{MapBounds, PoseDistribution, PoseStdDev};

use crate::core::types::{Observation, Pose3D};

/// Resampling policies the engine supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResamplingMode {
    /// Never resample.
    Never,
    /// Resample on every weighted step.
    Always,
    /// Resample only when the effective particle count falls below half
    /// of the total. Balances resampling noise against weight collapse;
    /// this is what every seeding action selects.
    Neff,
}

/// Interface to the Monte Carlo filter engine.
///
/// Poses returned by [`state`](BeliefEngine::state) are stable within a
/// publish cycle but their order is not meaningful across a resample.
/// `state(0)` and [`best_state`](BeliefEngine::best_state) are distinct
/// engine-defined concepts and may diverge.
pub trait BeliefEngine {
    /// Current particle count. May change between cycles. The count is
    /// chosen by the host when it builds the engine; it is not part of
    /// this crate's configuration.
    fn num_particles(&self) -> usize;

    /// Pose of the particle at `index`. `index < num_particles()`.
    fn state(&self, index: usize) -> Pose3D;

    /// The engine's best-estimate pose for the current belief.
    fn best_state(&self) -> Pose3D;

    /// Replace the entire particle set with draws from `distribution`.
    fn draw_all_from_distribution(&mut self, distribution: &PoseDistribution);

    /// Select the resampling policy for subsequent weighted steps.
    fn set_resampling_mode(&mut self, mode: ResamplingMode);

    /// Reset the engine's internal elapsed-time accounting.
    fn reset_timer(&mut self);

    /// Install the observation for the next weighted step, together
    /// with the rigid transform from the vehicle's base frame to the
    /// sensor frame the points are expressed in.
    fn set_observation(&mut self, observation: Observation, base_to_sensor: Pose3D);

    /// Run one weighted filter step over `dt` seconds: propagate,
    /// re-weight against the installed observation, maybe resample.
    fn filter_step(&mut self, dt: f64);

    /// Propagate the belief through the motion model over `dt` seconds
    /// without re-weighting.
    fn drift_step(&mut self, dt: f64);
}
