//! Localization orchestration: motion gating, update scheduling, and
//! estimate publishing around the belief engine.

pub mod localizer;
pub mod motion_gate;
pub mod publisher;

pub use localizer::{Localizer, LocalizerConfig};
pub use motion_gate::{exceeds_motion_threshold, MotionGateConfig};
pub use publisher::{CorrectionBroadcaster, FrameIds, PosePublisher, PublisherConfig};
