//! Localization thread.
//!
//! Event-driven intake over two crossbeam channels: scans from the
//! sensor transport and seed commands from the operator surface. Each
//! scan first goes through a bounded wait for the world frame to become
//! resolvable at its timestamp; a scan whose frames never resolve is
//! dropped, never retried.
//!
//! This thread never blocks on publishing. Estimates leave through the
//! sink, which drops on a slow consumer.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam_channel::{select, Receiver, Sender};

use crate::core::now_us;
use crate::core::types::{LaserScan, Pose3D, Timestamped};
use crate::engine::BeliefEngine;
use crate::frames::{FrameTransforms, OdometryProvider};
use crate::io::messages::EstimateSink;
use crate::localization::{CorrectionBroadcaster, Localizer, LocalizerConfig};

/// Commands the localization thread accepts at runtime.
#[derive(Debug, Clone)]
pub enum LocalizationCommand {
    /// Re-seed the belief around a pose (map frame expected).
    SeedPose {
        pose: Timestamped<Pose3D>,
        frame_id: String,
    },
    /// Re-seed the belief uniformly over the map bounds.
    SeedGlobal,
    /// Re-seed the belief from the configured initial pose, if any.
    SeedFromParams,
}

/// Sender half for seed commands.
pub type CommandSender = Sender<LocalizationCommand>;
/// Receiver half for seed commands.
pub type CommandReceiver = Receiver<LocalizationCommand>;
/// Sender half for incoming scans.
pub type ScanSender = Sender<LaserScan>;
/// Receiver half for incoming scans.
pub type ScanReceiver = Receiver<LaserScan>;

/// Configuration for the localization thread.
#[derive(Debug, Clone)]
pub struct LocalizationThreadConfig {
    /// Localizer configuration.
    pub localizer: LocalizerConfig,
    /// Upper bound on the per-scan wait for frame availability.
    /// Default: 500ms
    pub transform_wait_ms: u64,
}

impl Default for LocalizationThreadConfig {
    fn default() -> Self {
        Self {
            localizer: LocalizerConfig::default(),
            transform_wait_ms: 500,
        }
    }
}

/// Localization thread handle.
pub struct LocalizationThread {
    handle: JoinHandle<()>,
}

impl LocalizationThread {
    /// Spawn the localization thread.
    ///
    /// Also returns the correction broadcaster so the transform thread
    /// can re-publish the latest correction between scans.
    pub fn spawn<E, F, O, S>(
        config: LocalizationThreadConfig,
        engine: E,
        frames: Arc<F>,
        odometry: Arc<O>,
        sink: S,
        scan_rx: ScanReceiver,
        command_rx: CommandReceiver,
        running: Arc<AtomicBool>,
    ) -> (Self, CorrectionBroadcaster)
    where
        E: BeliefEngine + Send + 'static,
        F: FrameTransforms + Send + Sync + 'static,
        O: OdometryProvider + Send + Sync + 'static,
        S: EstimateSink + Send + 'static,
    {
        let world_frame = config.localizer.publisher.frames.world.clone();
        let map_frame = config.localizer.publisher.frames.map.clone();
        let transform_wait = Duration::from_millis(config.transform_wait_ms);
        let localizer = Localizer::new(config.localizer, engine);
        let broadcaster = localizer.publisher().correction_broadcaster();

        let handle = thread::Builder::new()
            .name("localization".into())
            .spawn(move || {
                run_loop(
                    localizer,
                    world_frame,
                    map_frame,
                    transform_wait,
                    frames,
                    odometry,
                    sink,
                    scan_rx,
                    command_rx,
                    running,
                );
            })
            .expect("Failed to spawn localization thread");

        (Self { handle }, broadcaster)
    }

    /// Wait for thread to finish.
    pub fn join(self) -> thread::Result<()> {
        self.handle.join()
    }
}

fn run_loop<E, F, O, S>(
    mut localizer: Localizer<E>,
    world_frame: String,
    map_frame: String,
    transform_wait: Duration,
    frames: Arc<F>,
    odometry: Arc<O>,
    mut sink: S,
    scan_rx: ScanReceiver,
    command_rx: CommandReceiver,
    running: Arc<AtomicBool>,
) where
    E: BeliefEngine + Send + 'static,
    F: FrameTransforms + Send + Sync + 'static,
    O: OdometryProvider + Send + Sync + 'static,
    S: EstimateSink + Send + 'static,
{
    log::info!("Localization thread starting");

    if localizer.seed_from_params(frames.as_ref(), &mut sink, now_us()) {
        log::info!("Belief seeded from configured initial pose");
    } else {
        log::info!("No initial pose configured, waiting for a seed command");
    }

    while running.load(Ordering::Relaxed) {
        select! {
            recv(scan_rx) -> result => {
                if let Ok(scan) = result {
                    if frames.wait_for(&world_frame, &scan.frame_id, scan.timestamp_us, transform_wait) {
                        localizer.handle_scan(&scan, frames.as_ref(), odometry.as_ref(), &mut sink);
                    } else {
                        log::warn!(
                            "{} <- {} not resolvable within {}ms, dropping scan at {}us",
                            world_frame,
                            scan.frame_id,
                            transform_wait.as_millis(),
                            scan.timestamp_us
                        );
                    }
                }
            }
            recv(command_rx) -> result => {
                if let Ok(command) = result {
                    match command {
                        LocalizationCommand::SeedPose { pose, frame_id } => {
                            if frames.wait_for(&map_frame, &frame_id, pose.timestamp_us, transform_wait) {
                                localizer.seed_from_pose(pose, &frame_id, frames.as_ref(), &mut sink);
                            } else {
                                log::warn!(
                                    "{} <- {} not resolvable within {}ms, dropping seed pose",
                                    map_frame,
                                    frame_id,
                                    transform_wait.as_millis()
                                );
                            }
                        }
                        LocalizationCommand::SeedGlobal => {
                            localizer.seed_global(frames.as_ref(), &mut sink, now_us());
                        }
                        LocalizationCommand::SeedFromParams => {
                            if !localizer.seed_from_params(frames.as_ref(), &mut sink, now_us()) {
                                log::warn!("Seed-from-parameters requested but no initial pose is configured");
                            }
                        }
                    }
                }
            }
            // Timeout to allow checking the running flag
            default(Duration::from_millis(10)) => {}
        }
    }

    log::info!("Localization thread shutting down");
}
