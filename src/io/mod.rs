//! I/O infrastructure: message types and publish sinks.

pub mod messages;
pub mod udp_sink;

pub use messages::{
    encode_frame, BestPoseMessage, EstimateSink, ObservationMessage, PoseArrayMessage,
};
pub use udp_sink::{UdpEstimateSink, UdpSinkError};
