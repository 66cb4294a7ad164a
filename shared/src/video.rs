//! Video frame message sent over the camera channel

use prost::Message;

/// One captured camera frame
///
/// `frame_number` starts at 1 and restarts for every streaming session.
/// The pixel buffer is opaque to the transport; only the capture source and
/// the viewer interpret it.
#[derive(Clone, PartialEq, Message)]
pub struct VideoFrame {
    #[prost(uint64, tag = "1")]
    pub frame_number: u64,

    #[prost(uint64, tag = "2")]
    pub timestamp_ms: u64,

    #[prost(uint32, tag = "3")]
    pub width: u32,

    #[prost(uint32, tag = "4")]
    pub height: u32,

    #[prost(bytes = "vec", tag = "5")]
    pub data: Vec<u8>,
}

impl VideoFrame {
    /// Create a frame with the given pixel buffer
    pub fn new(frame_number: u64, width: u32, height: u32, data: Vec<u8>) -> Self {
        Self {
            frame_number,
            timestamp_ms: crate::now_ms(),
            width,
            height,
            data,
        }
    }
}
