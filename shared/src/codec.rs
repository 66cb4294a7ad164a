//! Length-prefixed codec for the camera stream
//!
//! All frames are framed as:
//! ```text
//! [ 4 bytes: length (u32, big-endian) ][ N bytes: VideoFrame ]
//! ```
//!
//! The prefix width is fixed rather than platform-word-sized so the format
//! is identical across architectures. The receiver must buffer exactly the
//! declared length before decoding the payload.

use bytes::{Buf, BufMut, Bytes, BytesMut};
use prost::Message;
use thiserror::Error;

use crate::VideoFrame;

/// Maximum frame size (16 MB) to prevent memory exhaustion
pub const MAX_FRAME_SIZE: u32 = 16 * 1024 * 1024;

/// Errors that can occur during encoding/decoding
#[derive(Error, Debug)]
pub enum CodecError {
    #[error("Frame too large: {0} bytes (max: {MAX_FRAME_SIZE})")]
    FrameTooLarge(usize),

    #[error("Invalid frame length prefix: {0}")]
    InvalidLength(u32),

    #[error("Frame decode error: {0}")]
    DecodeError(#[from] prost::DecodeError),

    #[error("Frame encode error: {0}")]
    EncodeError(#[from] prost::EncodeError),
}

/// Encode a VideoFrame into a length-prefixed byte buffer
pub fn encode(frame: &VideoFrame) -> Result<Bytes, CodecError> {
    let msg_len = frame.encoded_len();

    if msg_len > MAX_FRAME_SIZE as usize {
        return Err(CodecError::FrameTooLarge(msg_len));
    }

    let mut buf = BytesMut::with_capacity(4 + msg_len);

    // Length prefix (big-endian u32), then the frame bytes
    buf.put_u32(msg_len as u32);
    frame.encode(&mut buf)?;

    Ok(buf.freeze())
}

/// Try to decode a length-prefixed VideoFrame from a buffer
///
/// Returns:
/// - `Ok(Some(frame))` if a complete frame was decoded
/// - `Ok(None)` if more data is needed
/// - `Err(...)` if the data is invalid
pub fn decode(buf: &mut BytesMut) -> Result<Option<VideoFrame>, CodecError> {
    // Need at least 4 bytes for the length prefix
    if buf.len() < 4 {
        return Ok(None);
    }

    // Peek at the length prefix without consuming
    let msg_len = u32::from_be_bytes([buf[0], buf[1], buf[2], buf[3]]);

    if msg_len > MAX_FRAME_SIZE {
        return Err(CodecError::InvalidLength(msg_len));
    }

    let total_len = 4 + msg_len as usize;

    // No payload may be interpreted before it has fully arrived
    if buf.len() < total_len {
        return Ok(None);
    }

    buf.advance(4);
    let msg_bytes = buf.split_to(msg_len as usize);

    let frame = VideoFrame::decode(msg_bytes)?;

    Ok(Some(frame))
}

/// Decoder state machine for streaming reads
///
/// The transport may deliver fewer bytes than requested per read, so callers
/// feed whatever arrives and drain complete frames as they become available.
#[derive(Debug, Default)]
pub struct FrameDecoder {
    /// Partial frame data being accumulated
    buffer: BytesMut,
}

impl FrameDecoder {
    /// Create a new frame decoder
    pub fn new() -> Self {
        Self {
            buffer: BytesMut::with_capacity(4096),
        }
    }

    /// Add data to the decoder buffer
    pub fn extend(&mut self, data: &[u8]) {
        self.buffer.extend_from_slice(data);
    }

    /// Try to decode the next frame from the buffer
    ///
    /// Call this repeatedly until it returns `Ok(None)` to drain all complete frames
    pub fn decode_next(&mut self) -> Result<Option<VideoFrame>, CodecError> {
        decode(&mut self.buffer)
    }
}
