//! UDP estimate sink.
//!
//! Sends length-prefixed JSON frames to a fixed target address. Send
//! failures are logged and dropped; the localization loop never blocks
//! on a slow or absent consumer.

use std::net::UdpSocket;

use serde::Serialize;
use thiserror::Error;

use super::messages::{
    encode_frame, BestPoseMessage, EstimateSink, ObservationMessage, PoseArrayMessage,
};

/// Errors from creating the UDP sink.
#[derive(Debug, Error)]
pub enum UdpSinkError {
    /// Could not bind the local socket.
    #[error("failed to bind UDP socket: {0}")]
    Bind(#[source] std::io::Error),

    /// Target address did not resolve.
    #[error("failed to connect UDP socket to {addr}: {source}")]
    Connect {
        addr: String,
        #[source]
        source: std::io::Error,
    },
}

/// Estimate sink publishing over UDP.
pub struct UdpEstimateSink {
    socket: UdpSocket,
    target: String,
}

impl UdpEstimateSink {
    /// Create a sink sending to `target` ("host:port").
    pub fn new(target: &str) -> Result<Self, UdpSinkError> {
        let socket = UdpSocket::bind("0.0.0.0:0").map_err(UdpSinkError::Bind)?;
        socket
            .connect(target)
            .map_err(|source| UdpSinkError::Connect {
                addr: target.to_string(),
                source,
            })?;
        Ok(Self {
            socket,
            target: target.to_string(),
        })
    }

    fn send<T: Serialize>(&self, msg: &T) {
        if let Some(frame) = encode_frame(msg) {
            if let Err(e) = self.socket.send(&frame) {
                log::debug!("UDP send to {} failed: {}", self.target, e);
            }
        }
    }
}

impl EstimateSink for UdpEstimateSink {
    fn publish_pose_array(&mut self, msg: &PoseArrayMessage) {
        self.send(msg);
    }

    fn publish_best_pose(&mut self, msg: &BestPoseMessage) {
        self.send(msg);
    }

    fn publish_observation(&mut self, msg: &ObservationMessage) {
        self.send(msg);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::Pose3D;

    #[test]
    fn test_sink_creation_and_send() {
        // Receiver socket so the datagram has somewhere to go.
        let receiver = UdpSocket::bind("127.0.0.1:0").unwrap();
        let addr = receiver.local_addr().unwrap();

        let mut sink = UdpEstimateSink::new(&addr.to_string()).unwrap();
        sink.publish_best_pose(&BestPoseMessage {
            frame_id: "map".into(),
            timestamp_us: 1,
            pose: Pose3D::identity(),
            best_state: Pose3D::identity(),
        });

        let mut buf = [0u8; 4096];
        let (n, _) = receiver.recv_from(&mut buf).unwrap();
        let len = u32::from_be_bytes([buf[0], buf[1], buf[2], buf[3]]) as usize;
        assert_eq!(len, n - 4);
    }
}
