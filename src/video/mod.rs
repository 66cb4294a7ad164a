//! Camera capture and frame streaming
//!
//! This module handles:
//! - The capture source abstraction and the synthetic test pattern
//! - Serving length-prefixed frames to one connected viewer at a time

mod capture;
mod streamer;

pub use capture::{FrameSource, SyntheticSource};
pub use streamer::FrameStreamer;
