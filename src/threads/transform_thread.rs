//! Transform timer thread.
//!
//! The correction transform expires a fixed tolerance after its stamp.
//! Between weighted updates this thread re-broadcasts the latest
//! correction with a fresh expiration so downstream consumers always
//! hold a valid map-to-world transform, even when the vehicle hovers
//! and no update runs for a while.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam_channel::{select, tick};

use crate::core::now_us;
use crate::frames::FrameTransforms;
use crate::localization::CorrectionBroadcaster;

/// Transform timer thread handle.
pub struct TransformThread {
    handle: JoinHandle<()>,
}

impl TransformThread {
    /// Spawn the transform timer thread.
    ///
    /// `period` should be comfortably shorter than the correction's
    /// expiration tolerance so consumers never see a gap.
    pub fn spawn<F>(
        broadcaster: CorrectionBroadcaster,
        frames: Arc<F>,
        period: Duration,
        running: Arc<AtomicBool>,
    ) -> Self
    where
        F: FrameTransforms + Send + Sync + 'static,
    {
        let handle = thread::Builder::new()
            .name("transform".into())
            .spawn(move || {
                run_loop(broadcaster, frames, period, running);
            })
            .expect("Failed to spawn transform thread");

        Self { handle }
    }

    /// Wait for thread to finish.
    pub fn join(self) -> thread::Result<()> {
        self.handle.join()
    }
}

fn run_loop<F>(
    broadcaster: CorrectionBroadcaster,
    frames: Arc<F>,
    period: Duration,
    running: Arc<AtomicBool>,
) where
    F: FrameTransforms + Send + Sync + 'static,
{
    log::info!(
        "Transform thread starting ({}ms re-broadcast period)",
        period.as_millis()
    );

    let ticker = tick(period);
    while running.load(Ordering::Relaxed) {
        select! {
            recv(ticker) -> _ => {
                broadcaster.rebroadcast(frames.as_ref(), now_us());
            }
            // Timeout to allow checking the running flag
            default(Duration::from_millis(10)) => {}
        }
    }

    log::info!("Transform thread shutting down");
}
