//! GarudaLoc - Monte Carlo localization orchestration for aerial vehicles
//!
//! # Architecture
//!
//! The crate is organized into logical layers:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │                    threads/                         │  ← Worker threads
//! └─────────────────────────────────────────────────────┘
//!                          │
//! ┌─────────────────────────────────────────────────────┐
//! │                      io/                            │  ← Infrastructure
//! │              (messages, udp_sink)                   │
//! └─────────────────────────────────────────────────────┘
//!                          │
//! ┌─────────────────────────────────────────────────────┐
//! │                 localization/                       │  ← Orchestration
//! │        (localizer, motion_gate, publisher)          │
//! └─────────────────────────────────────────────────────┘
//!                          │
//! ┌─────────────────────────────────────────────────────┐
//! │              engine/      frames/                   │  ← External seams
//! │     (belief engine, distributions, transforms)      │
//! └─────────────────────────────────────────────────────┘
//!                          │
//! ┌─────────────────────────────────────────────────────┐
//! │                   sensors/                          │  ← Sensor processing
//! │                (preprocessing)                      │
//! └─────────────────────────────────────────────────────┘
//!                          │
//! ┌─────────────────────────────────────────────────────┐
//! │                     core/                           │  ← Foundation
//! │                (types, math)                        │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! # Pipeline
//!
//! Range scans are gated and spatially down-sampled into observations,
//! then the update scheduler decides per scan: weighted filter step
//! when the vehicle has moved past the motion thresholds (or nothing
//! has been fused since the last seed), drift-only propagation
//! otherwise. After a weighted step the publisher emits the particle
//! poses, a representative pose, and the map-to-world correction
//! transform; a timer thread keeps re-broadcasting that correction so
//! it never expires while the vehicle hovers.
//!
//! The particle filter itself lives behind [`engine::BeliefEngine`],
//! and the platform's transform service behind
//! [`frames::FrameTransforms`]. Everything in this crate drives those
//! seams; it owns no particles and no frame tree.

// ============================================================================
// Layer 1: Core foundation (no internal deps)
// ============================================================================
pub mod core;

// ============================================================================
// Layer 2: Sensor processing (depends on core)
// ============================================================================
pub mod sensors;

// ============================================================================
// Layer 3: External seams (depend on core)
// ============================================================================
pub mod engine;
pub mod frames;

// ============================================================================
// Layer 4: I/O infrastructure (depends on core)
// ============================================================================
pub mod io;

// ============================================================================
// Layer 5: Orchestration (depends on all lower layers)
// ============================================================================
pub mod localization;

// ============================================================================
// Layer 6: Worker threads and configuration
// ============================================================================
pub mod config;
pub mod threads;

// ============================================================================
// Convenience re-exports (flat namespace for common use)
// ============================================================================

// Core types
pub use crate::core::math;
pub use crate::core::types::{LaserScan, Observation, Point3D, Pose3D, Timestamped};

// Sensors - Preprocessing
pub use sensors::preprocessing::{
    PreprocessorConfig, RangeGate, RangeGateConfig, ScanPreprocessor, SpatialDownsampler,
    SpatialDownsamplerConfig,
};

// Engine seam
pub use engine::{BeliefEngine, MapBounds, PoseDistribution, PoseStdDev, ResamplingMode};

// Frame seam
pub use frames::{FrameError, FrameTransforms, OdomTracker, OdometryProvider, StampedTransform};

// Localization
pub use localization::{
    exceeds_motion_threshold, CorrectionBroadcaster, FrameIds, Localizer, LocalizerConfig,
    MotionGateConfig, PosePublisher, PublisherConfig,
};

// I/O
pub use io::{
    BestPoseMessage, EstimateSink, ObservationMessage, PoseArrayMessage, UdpEstimateSink,
    UdpSinkError,
};

// Configuration and threads
pub use config::{Config, OutputConfig, ThreadsConfig};
pub use threads::{
    LocalizationCommand, LocalizationThread, LocalizationThreadConfig, TransformThread,
};
