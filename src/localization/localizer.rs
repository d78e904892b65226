//! Localization state machine and update scheduler.
//!
//! Owns the belief engine and decides, per incoming scan, whether to
//! run a weighted filter step, a drift-only propagation, or nothing at
//! all. Seeding (pose, configured pose, or global) resets the machine
//! and immediately publishes the fresh belief.

use std::time::Instant;

use serde::Deserialize;

use crate::core::types::{LaserScan, Pose3D, Timestamped};
use crate::engine::{BeliefEngine, MapBounds, PoseDistribution, PoseStdDev, ResamplingMode};
use crate::frames::{FrameTransforms, OdomTracker, OdometryProvider};
use crate::io::messages::{EstimateSink, ObservationMessage};
use crate::localization::motion_gate::{exceeds_motion_threshold, MotionGateConfig};
use crate::localization::publisher::{PosePublisher, PublisherConfig};
use crate::sensors::preprocessing::{PreprocessorConfig, ScanPreprocessor};

/// Configuration for the localizer.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LocalizerConfig {
    /// Motion gate thresholds.
    pub motion_gate: MotionGateConfig,
    /// Scan preprocessing parameters.
    pub preprocessing: PreprocessorConfig,
    /// Publisher and frame parameters.
    pub publisher: PublisherConfig,
    /// Per-axis spread used when seeding around a pose.
    pub seed_std_dev: PoseStdDev,
    /// Map extent used when seeding globally.
    pub map_bounds: MapBounds,
    /// Seed around this pose at startup instead of waiting for an
    /// external seed.
    pub initial_pose: Option<Pose3D>,
    /// When true, estimates go out right after each weighted update;
    /// when false, after every processed scan regardless of outcome.
    /// Default: true
    pub publish_after_update: bool,
}

impl Default for LocalizerConfig {
    fn default() -> Self {
        Self {
            motion_gate: MotionGateConfig::default(),
            preprocessing: PreprocessorConfig::default(),
            publisher: PublisherConfig::default(),
            seed_std_dev: PoseStdDev::default(),
            map_bounds: MapBounds::default(),
            initial_pose: None,
            publish_after_update: true,
        }
    }
}

/// How a scan that reached the filter was consumed.
enum ScanOutcome {
    /// Observation fused in a weighted step.
    Fused,
    /// Belief propagated without re-weighting.
    Drifted,
    /// Scan discarded; scheduling state must not advance.
    Dropped,
}

/// Drives the belief engine from scans, odometry, and seed requests.
///
/// # State
///
/// Three flags govern scheduling. `initialized` flips on the first seed
/// and gates everything. `received_sensor_data` records whether any
/// observation has been fused since the last seed; until it has, the
/// motion gate is bypassed so the first scan after a seed corrects the
/// belief immediately. `first_run` marks the scan right after a seed,
/// which only anchors the odometry reference.
pub struct Localizer<E: BeliefEngine> {
    config: LocalizerConfig,
    engine: E,
    preprocessor: ScanPreprocessor,
    publisher: PosePublisher,
    tracker: OdomTracker,

    initialized: bool,
    received_sensor_data: bool,
    first_run: bool,
    /// Odometry pose at the last weighted update (motion gate reference).
    last_localized_pose: Option<Pose3D>,
    last_scan_time_us: Option<u64>,
    warned_uninitialized: bool,
}

impl<E: BeliefEngine> Localizer<E> {
    /// Create a localizer around an engine. The belief stays
    /// uninitialized until one of the seed methods runs.
    pub fn new(config: LocalizerConfig, engine: E) -> Self {
        let preprocessor = ScanPreprocessor::new(config.preprocessing);
        let publisher = PosePublisher::new(config.publisher.clone());
        Self {
            config,
            engine,
            preprocessor,
            publisher,
            tracker: OdomTracker::new(),
            initialized: false,
            received_sensor_data: false,
            first_run: true,
            last_localized_pose: None,
            last_scan_time_us: None,
            warned_uninitialized: false,
        }
    }

    /// Whether the belief has been seeded.
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Access the engine (for inspection).
    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Publisher owned by this localizer.
    pub fn publisher(&self) -> &PosePublisher {
        &self.publisher
    }

    /// Seed the belief from the configured initial pose, if one is set.
    /// Returns true when a seed happened.
    pub fn seed_from_params<F>(
        &mut self,
        frames: &F,
        sink: &mut dyn EstimateSink,
        now_us: u64,
    ) -> bool
    where
        F: FrameTransforms + ?Sized,
    {
        let Some(pose) = self.config.initial_pose else {
            return false;
        };
        log::info!(
            "seeding belief from configured pose ({:.2}, {:.2}, {:.2}, yaw {:.2})",
            pose.x,
            pose.y,
            pose.z,
            pose.yaw
        );
        let distribution = PoseDistribution::Gaussian {
            mean: pose,
            std_dev: self.config.seed_std_dev,
        };
        self.reseed(&distribution, frames, sink, now_us);
        true
    }

    /// Seed the belief around an externally supplied pose estimate.
    ///
    /// The pose must be expressed in the map frame; a mismatched frame
    /// is used anyway but logged, since a wrong-frame seed is still
    /// recoverable by seeding again.
    pub fn seed_from_pose<F>(
        &mut self,
        pose: Timestamped<Pose3D>,
        frame_id: &str,
        frames: &F,
        sink: &mut dyn EstimateSink,
    ) where
        F: FrameTransforms + ?Sized,
    {
        let map_frame = &self.config.publisher.frames.map;
        if frame_id != map_frame {
            log::warn!(
                "seed pose is in frame '{}', expected '{}'; seeding with it as-is",
                frame_id,
                map_frame
            );
        }
        log::info!(
            "seeding belief around pose ({:.2}, {:.2}, {:.2}, yaw {:.2})",
            pose.data.x,
            pose.data.y,
            pose.data.z,
            pose.data.yaw
        );
        let distribution = PoseDistribution::Gaussian {
            mean: pose.data,
            std_dev: self.config.seed_std_dev,
        };
        self.reseed(&distribution, frames, sink, pose.timestamp_us);
    }

    /// Seed the belief uniformly over the map bounds (global
    /// re-localization, e.g. after a kidnap).
    pub fn seed_global<F>(&mut self, frames: &F, sink: &mut dyn EstimateSink, now_us: u64)
    where
        F: FrameTransforms + ?Sized,
    {
        log::info!("seeding belief globally over map bounds");
        let distribution = PoseDistribution::Uniform {
            bounds: self.config.map_bounds,
        };
        self.reseed(&distribution, frames, sink, now_us);
    }

    fn reseed<F>(
        &mut self,
        distribution: &PoseDistribution,
        frames: &F,
        sink: &mut dyn EstimateSink,
        time_us: u64,
    ) where
        F: FrameTransforms + ?Sized,
    {
        self.engine.draw_all_from_distribution(distribution);
        self.engine.set_resampling_mode(ResamplingMode::Neff);
        self.engine.reset_timer();
        self.tracker.reset();

        self.initialized = true;
        self.received_sensor_data = true;
        self.first_run = true;
        self.last_localized_pose = None;
        self.last_scan_time_us = None;
        self.warned_uninitialized = false;

        // Consumers see the new belief right away rather than after the
        // next motion-gated update.
        self.publisher
            .publish_estimate(&self.engine, frames, sink, time_us);
    }

    /// Process one scan.
    ///
    /// Drops the scan when the belief is uninitialized, when it is
    /// older than the last processed scan, or when no odometry pose can
    /// be resolved at its timestamp. Otherwise runs either a weighted
    /// update (motion gate passed, or no observation fused since the
    /// last seed) or a drift-only propagation over the time since the
    /// previous scan.
    pub fn handle_scan<F, O>(
        &mut self,
        scan: &LaserScan,
        frames: &F,
        odometry: &O,
        sink: &mut dyn EstimateSink,
    ) where
        F: FrameTransforms + ?Sized,
        O: OdometryProvider + ?Sized,
    {
        if !self.initialized {
            if !self.warned_uninitialized {
                log::warn!("belief not initialized yet, dropping scans until a seed arrives");
                self.warned_uninitialized = true;
            }
            return;
        }

        let scan_time = scan.timestamp_us;
        if self.received_sensor_data {
            if let Some(last) = self.last_scan_time_us {
                if scan_time < last {
                    log::warn!(
                        "scan at {}us is older than last processed scan at {}us, dropping",
                        scan_time,
                        last
                    );
                    return;
                }
            }
        }

        let Some(odom_pose) = odometry.odom_pose(scan_time) else {
            log::warn!("no odometry pose at {}us, dropping scan", scan_time);
            return;
        };

        let mut updated = false;
        if self.first_run {
            // Nothing to propagate against yet; just anchor the gate.
            self.last_localized_pose = Some(odom_pose);
            self.first_run = false;
        } else {
            let dt = self
                .tracker
                .last_pose()
                .map(|last| Timestamped::new(odom_pose, scan_time).seconds_since(last))
                .unwrap_or(0.0);

            let gate_passed = match &self.last_localized_pose {
                Some(reference) => {
                    exceeds_motion_threshold(reference, &odom_pose, &self.config.motion_gate)
                }
                None => true,
            };

            if !self.received_sensor_data || gate_passed {
                match self.weighted_update(scan, dt, frames, sink) {
                    ScanOutcome::Fused => {
                        updated = true;
                        self.last_localized_pose = Some(odom_pose);
                        self.received_sensor_data = true;
                    }
                    ScanOutcome::Drifted => {}
                    // A dropped scan leaves the ordering guard and the
                    // dt reference where the last processed scan put
                    // them.
                    ScanOutcome::Dropped => return,
                }
            } else {
                self.engine.drift_step(dt);
            }
        }

        self.tracker
            .set_last_pose(Timestamped::new(odom_pose, scan_time));
        self.last_scan_time_us = Some(scan_time);

        if updated || !self.config.publish_after_update {
            self.publisher
                .publish_estimate(&self.engine, frames, sink, scan_time);
        }
    }

    /// Preprocess and fuse one scan.
    fn weighted_update<F>(
        &mut self,
        scan: &LaserScan,
        dt: f64,
        frames: &F,
        sink: &mut dyn EstimateSink,
    ) -> ScanOutcome
    where
        F: FrameTransforms + ?Sized,
    {
        let observation = self.preprocessor.process(scan);
        if observation.is_empty() {
            log::warn!(
                "no usable beams in scan at {}us, drifting instead",
                scan.timestamp_us
            );
            self.engine.drift_step(dt);
            return ScanOutcome::Drifted;
        }

        let base_frame = &self.config.publisher.frames.base_link;
        let sensor_in_base = match frames.lookup(base_frame, &scan.frame_id, scan.timestamp_us) {
            Ok(t) => t,
            Err(e) => {
                log::warn!("sensor mount transform unavailable, dropping scan: {}", e);
                return ScanOutcome::Dropped;
            }
        };

        sink.publish_observation(&ObservationMessage::from_observation(&observation));

        self.engine
            .set_observation(observation, sensor_in_base.inverse());

        let started = Instant::now();
        self.engine.filter_step(dt);
        log::info!(
            "filter step over {:.3}s of motion took {}ms",
            dt,
            started.elapsed().as_millis()
        );

        ScanOutcome::Fused
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::Observation;
    use crate::frames::{FrameError, StampedTransform};
    use crate::io::messages::{BestPoseMessage, PoseArrayMessage};
    use std::f32::consts::TAU;
    use std::time::Duration;

    #[derive(Debug, Default)]
    struct ScriptedEngine {
        particles: Vec<Pose3D>,
        filter_steps: Vec<f64>,
        drift_steps: Vec<f64>,
        draws: usize,
        timer_resets: usize,
        observations: usize,
        mode: Option<ResamplingMode>,
    }

    impl BeliefEngine for ScriptedEngine {
        fn num_particles(&self) -> usize {
            self.particles.len()
        }
        fn state(&self, index: usize) -> Pose3D {
            self.particles[index]
        }
        fn best_state(&self) -> Pose3D {
            self.particles[0]
        }
        fn draw_all_from_distribution(&mut self, distribution: &PoseDistribution) {
            self.draws += 1;
            let center = match distribution {
                PoseDistribution::Gaussian { mean, .. } => *mean,
                PoseDistribution::Uniform { .. } => Pose3D::identity(),
            };
            self.particles = vec![center; 8];
        }
        fn set_resampling_mode(&mut self, mode: ResamplingMode) {
            self.mode = Some(mode);
        }
        fn reset_timer(&mut self) {
            self.timer_resets += 1;
        }
        fn set_observation(&mut self, _observation: Observation, _base_to_sensor: Pose3D) {
            self.observations += 1;
        }
        fn filter_step(&mut self, dt: f64) {
            self.filter_steps.push(dt);
        }
        fn drift_step(&mut self, dt: f64) {
            self.drift_steps.push(dt);
        }
    }

    /// Identity frame tree.
    struct FlatFrames;

    impl FrameTransforms for FlatFrames {
        fn lookup(&self, _t: &str, _s: &str, _time: u64) -> Result<Pose3D, FrameError> {
            Ok(Pose3D::identity())
        }
        fn transform_pose(
            &self,
            pose: &Pose3D,
            _s: &str,
            _t: &str,
            _time: u64,
        ) -> Result<Pose3D, FrameError> {
            Ok(*pose)
        }
        fn broadcast(&self, _transform: &StampedTransform) {}
        fn wait_for(&self, _t: &str, _s: &str, _time: u64, _timeout: Duration) -> bool {
            true
        }
    }

    /// Identity frame tree whose sensor-mount lookup fails on demand.
    #[derive(Default)]
    struct FlakyFrames {
        fail_lookup: std::cell::Cell<bool>,
    }

    impl FrameTransforms for FlakyFrames {
        fn lookup(&self, target: &str, source: &str, time_us: u64) -> Result<Pose3D, FrameError> {
            if self.fail_lookup.get() {
                return Err(FrameError::Unavailable {
                    target: target.to_string(),
                    source_frame: source.to_string(),
                    time_us,
                    reason: "scripted failure".to_string(),
                });
            }
            Ok(Pose3D::identity())
        }
        fn transform_pose(
            &self,
            pose: &Pose3D,
            _s: &str,
            _t: &str,
            _time: u64,
        ) -> Result<Pose3D, FrameError> {
            Ok(*pose)
        }
        fn broadcast(&self, _transform: &StampedTransform) {}
        fn wait_for(&self, _t: &str, _s: &str, _time: u64, _timeout: Duration) -> bool {
            true
        }
    }

    struct FixedOdom(Option<Pose3D>);

    impl OdometryProvider for FixedOdom {
        fn odom_pose(&self, _time_us: u64) -> Option<Pose3D> {
            self.0
        }
    }

    #[derive(Default)]
    struct CountingSink {
        pose_arrays: Vec<PoseArrayMessage>,
        best_poses: Vec<BestPoseMessage>,
        observations: usize,
    }

    impl EstimateSink for CountingSink {
        fn publish_pose_array(&mut self, msg: &PoseArrayMessage) {
            self.pose_arrays.push(msg.clone());
        }
        fn publish_best_pose(&mut self, msg: &BestPoseMessage) {
            self.best_poses.push(msg.clone());
        }
        fn publish_observation(&mut self, _msg: &ObservationMessage) {
            self.observations += 1;
        }
    }

    fn room_scan(timestamp_us: u64) -> LaserScan {
        let ranges = (0..360).map(|i| 5.0 + 0.1 * (i as f32 * 0.1).sin()).collect();
        LaserScan::new(0.0, TAU / 360.0, 0.05, 14.0, ranges, "laser", timestamp_us)
    }

    fn localizer() -> Localizer<ScriptedEngine> {
        Localizer::new(LocalizerConfig::default(), ScriptedEngine::default())
    }

    #[test]
    fn test_uninitialized_drops_scans() {
        let mut loc = localizer();
        let mut sink = CountingSink::default();

        loc.handle_scan(&room_scan(1_000), &FlatFrames, &FixedOdom(Some(Pose3D::identity())), &mut sink);

        assert_eq!(loc.engine().filter_steps.len(), 0);
        assert_eq!(loc.engine().drift_steps.len(), 0);
        assert!(sink.pose_arrays.is_empty());
    }

    #[test]
    fn test_seed_publishes_immediately_and_sets_neff() {
        let mut loc = localizer();
        let mut sink = CountingSink::default();

        let seed = Pose3D::new(1.0, 2.0, 0.5, 0.0, 0.0, 0.3);
        loc.seed_from_pose(Timestamped::new(seed, 500), "map", &FlatFrames, &mut sink);

        assert!(loc.is_initialized());
        assert_eq!(loc.engine().draws, 1);
        assert_eq!(loc.engine().timer_resets, 1);
        assert_eq!(loc.engine().mode, Some(ResamplingMode::Neff));
        assert_eq!(sink.pose_arrays.len(), 1);
        assert_eq!(sink.pose_arrays[0].poses.len(), 8);
        assert_eq!(sink.best_poses.len(), 1);
        assert_eq!(sink.best_poses[0].timestamp_us, 500);
    }

    #[test]
    fn test_first_scan_after_seed_only_anchors() {
        let mut loc = localizer();
        let mut sink = CountingSink::default();
        loc.seed_from_pose(
            Timestamped::new(Pose3D::identity(), 0),
            "map",
            &FlatFrames,
            &mut sink,
        );

        loc.handle_scan(&room_scan(1_000), &FlatFrames, &FixedOdom(Some(Pose3D::identity())), &mut sink);

        assert!(loc.engine().filter_steps.is_empty());
        assert!(loc.engine().drift_steps.is_empty());
    }

    #[test]
    fn test_small_motion_drifts_large_motion_updates() {
        let mut loc = localizer();
        let mut sink = CountingSink::default();
        loc.seed_from_pose(
            Timestamped::new(Pose3D::identity(), 0),
            "map",
            &FlatFrames,
            &mut sink,
        );

        // Anchor, then fuse once so received_sensor_data stops bypassing
        // the gate reference.
        loc.handle_scan(&room_scan(100_000), &FlatFrames, &FixedOdom(Some(Pose3D::identity())), &mut sink);
        loc.handle_scan(
            &room_scan(200_000),
            &FlatFrames,
            &FixedOdom(Some(Pose3D::new(0.5, 0.0, 0.0, 0.0, 0.0, 0.0))),
            &mut sink,
        );
        assert_eq!(loc.engine().filter_steps.len(), 1);
        assert!((loc.engine().filter_steps[0] - 0.1).abs() < 1e-9);

        // Barely any further motion: drift only.
        loc.handle_scan(
            &room_scan(300_000),
            &FlatFrames,
            &FixedOdom(Some(Pose3D::new(0.55, 0.0, 0.0, 0.0, 0.0, 0.0))),
            &mut sink,
        );
        assert_eq!(loc.engine().filter_steps.len(), 1);
        assert_eq!(loc.engine().drift_steps.len(), 1);

        // Pure rotation past the threshold: weighted update again.
        loc.handle_scan(
            &room_scan(400_000),
            &FlatFrames,
            &FixedOdom(Some(Pose3D::new(0.55, 0.0, 0.0, 0.0, 0.0, 0.5))),
            &mut sink,
        );
        assert_eq!(loc.engine().filter_steps.len(), 2);
    }

    #[test]
    fn test_out_of_order_scan_dropped() {
        let mut loc = localizer();
        let mut sink = CountingSink::default();
        loc.seed_from_pose(
            Timestamped::new(Pose3D::identity(), 0),
            "map",
            &FlatFrames,
            &mut sink,
        );
        let odom = FixedOdom(Some(Pose3D::identity()));

        loc.handle_scan(&room_scan(500_000), &FlatFrames, &odom, &mut sink);
        loc.handle_scan(&room_scan(400_000), &FlatFrames, &odom, &mut sink);

        assert!(loc.engine().filter_steps.is_empty());
        assert!(loc.engine().drift_steps.is_empty());
    }

    #[test]
    fn test_missing_odometry_drops_scan() {
        let mut loc = localizer();
        let mut sink = CountingSink::default();
        loc.seed_from_pose(
            Timestamped::new(Pose3D::identity(), 0),
            "map",
            &FlatFrames,
            &mut sink,
        );

        loc.handle_scan(&room_scan(1_000), &FlatFrames, &FixedOdom(None), &mut sink);

        assert!(loc.engine().filter_steps.is_empty());
        // The dropped scan must not advance the ordering guard.
        loc.handle_scan(
            &room_scan(500),
            &FlatFrames,
            &FixedOdom(Some(Pose3D::identity())),
            &mut sink,
        );
        assert!(loc.engine().filter_steps.is_empty());
        assert!(loc.engine().drift_steps.is_empty());
    }

    #[test]
    fn test_empty_observation_falls_back_to_drift() {
        let mut loc = localizer();
        let mut sink = CountingSink::default();
        loc.seed_from_pose(
            Timestamped::new(Pose3D::identity(), 0),
            "map",
            &FlatFrames,
            &mut sink,
        );

        loc.handle_scan(
            &room_scan(100_000),
            &FlatFrames,
            &FixedOdom(Some(Pose3D::identity())),
            &mut sink,
        );
        // Gate passes, but every beam is below the window.
        let dark = LaserScan::new(0.0, 0.01, 0.05, 14.0, vec![0.0; 90], "laser", 200_000);
        loc.handle_scan(
            &dark,
            &FlatFrames,
            &FixedOdom(Some(Pose3D::new(1.0, 0.0, 0.0, 0.0, 0.0, 0.0))),
            &mut sink,
        );

        assert!(loc.engine().filter_steps.is_empty());
        assert_eq!(loc.engine().drift_steps.len(), 1);
        assert_eq!(loc.engine().observations, 0);
    }

    #[test]
    fn test_mount_failure_leaves_caches_untouched() {
        let frames = FlakyFrames::default();
        let mut loc = localizer();
        let mut sink = CountingSink::default();
        let moved = FixedOdom(Some(Pose3D::new(0.5, 0.0, 0.0, 0.0, 0.0, 0.0)));
        loc.seed_from_pose(
            Timestamped::new(Pose3D::identity(), 0),
            "map",
            &frames,
            &mut sink,
        );
        loc.handle_scan(
            &room_scan(100_000),
            &frames,
            &FixedOdom(Some(Pose3D::identity())),
            &mut sink,
        );

        // Mount lookup fails: the scan is discarded outright.
        frames.fail_lookup.set(true);
        loc.handle_scan(&room_scan(200_000), &frames, &moved, &mut sink);
        assert!(loc.engine().filter_steps.is_empty());

        // A scan newer than the last *processed* one must still go
        // through, with dt measured from that processed scan.
        frames.fail_lookup.set(false);
        loc.handle_scan(&room_scan(150_000), &frames, &moved, &mut sink);
        assert_eq!(loc.engine().filter_steps.len(), 1);
        assert!((loc.engine().filter_steps[0] - 0.05).abs() < 1e-9);
    }

    #[test]
    fn test_mount_failure_suppresses_publish() {
        let config = LocalizerConfig {
            publish_after_update: false,
            ..LocalizerConfig::default()
        };
        let frames = FlakyFrames::default();
        let mut loc = Localizer::new(config, ScriptedEngine::default());
        let mut sink = CountingSink::default();
        loc.seed_from_pose(
            Timestamped::new(Pose3D::identity(), 0),
            "map",
            &frames,
            &mut sink,
        );
        loc.handle_scan(
            &room_scan(100_000),
            &frames,
            &FixedOdom(Some(Pose3D::identity())),
            &mut sink,
        );
        assert_eq!(sink.pose_arrays.len(), 2);

        // Even in publish-every-scan mode a discarded scan is silent.
        frames.fail_lookup.set(true);
        loc.handle_scan(
            &room_scan(200_000),
            &frames,
            &FixedOdom(Some(Pose3D::new(0.5, 0.0, 0.0, 0.0, 0.0, 0.0))),
            &mut sink,
        );
        assert_eq!(sink.pose_arrays.len(), 2);
    }

    #[test]
    fn test_reseed_resets_gate_reference() {
        let mut loc = localizer();
        let mut sink = CountingSink::default();
        let moved = FixedOdom(Some(Pose3D::new(0.5, 0.0, 0.0, 0.0, 0.0, 0.0)));
        loc.seed_from_pose(
            Timestamped::new(Pose3D::identity(), 0),
            "map",
            &FlatFrames,
            &mut sink,
        );
        loc.handle_scan(
            &room_scan(100_000),
            &FlatFrames,
            &FixedOdom(Some(Pose3D::identity())),
            &mut sink,
        );
        loc.handle_scan(&room_scan(200_000), &FlatFrames, &moved, &mut sink);
        assert_eq!(loc.engine().filter_steps.len(), 1);

        // Re-seed: the gate reference re-anchors on the current odometry
        // pose, so the same pose no longer triggers an update.
        loc.seed_global(&FlatFrames, &mut sink, 300_000);
        loc.handle_scan(&room_scan(400_000), &FlatFrames, &moved, &mut sink);
        loc.handle_scan(&room_scan(500_000), &FlatFrames, &moved, &mut sink);
        assert_eq!(loc.engine().filter_steps.len(), 1);
        assert_eq!(loc.engine().drift_steps.len(), 1);
        assert_eq!(loc.engine().draws, 2);

        // Motion relative to the new anchor triggers again.
        loc.handle_scan(
            &room_scan(600_000),
            &FlatFrames,
            &FixedOdom(Some(Pose3D::new(0.9, 0.0, 0.0, 0.0, 0.0, 0.0))),
            &mut sink,
        );
        assert_eq!(loc.engine().filter_steps.len(), 2);
    }

    #[test]
    fn test_seed_from_params_when_configured() {
        let config = LocalizerConfig {
            initial_pose: Some(Pose3D::new(2.0, 3.0, 1.0, 0.0, 0.0, 0.0)),
            ..LocalizerConfig::default()
        };
        let mut loc = Localizer::new(config, ScriptedEngine::default());
        let mut sink = CountingSink::default();

        assert!(loc.seed_from_params(&FlatFrames, &mut sink, 10));
        assert!(loc.is_initialized());

        let mut unseeded = localizer();
        assert!(!unseeded.seed_from_params(&FlatFrames, &mut sink, 10));
        assert!(!unseeded.is_initialized());
    }

    #[test]
    fn test_publish_every_scan_mode() {
        let config = LocalizerConfig {
            publish_after_update: false,
            ..LocalizerConfig::default()
        };
        let mut loc = Localizer::new(config, ScriptedEngine::default());
        let mut sink = CountingSink::default();
        let odom = FixedOdom(Some(Pose3D::identity()));
        loc.seed_from_pose(
            Timestamped::new(Pose3D::identity(), 0),
            "map",
            &FlatFrames,
            &mut sink,
        );
        assert_eq!(sink.pose_arrays.len(), 1);

        // Anchor scan publishes too in this mode.
        loc.handle_scan(&room_scan(100_000), &FlatFrames, &odom, &mut sink);
        assert_eq!(sink.pose_arrays.len(), 2);
    }
}
