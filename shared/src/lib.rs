//! Shared wire formats for the drone link
//!
//! This crate provides the command wire format, the video frame codec and the
//! flight state machine shared by the commander and the drone simulator.

pub mod codec;
pub mod command;
pub mod state_machine;
pub mod video;

use std::time::{SystemTime, UNIX_EPOCH};

pub use command::{Command, CommandError, CommandFrame};
pub use state_machine::{Direction, Dispatch, FlightState, FlightStateMachine};
pub use video::VideoFrame;

/// Get current timestamp in milliseconds since Unix epoch
pub fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

/// Network parameters for the system
pub mod net {
    /// UDP port the drone listens on for command datagrams
    pub const COMMAND_PORT: u16 = 5556;

    /// TCP port the drone serves camera frames on
    pub const VIDEO_PORT: u16 = 9090;

    /// Largest command datagram the receiver will read
    pub const MAX_DATAGRAM: usize = 1024;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_now_ms_advances() {
        let a = now_ms();
        let b = now_ms();
        assert!(b >= a);
        assert!(a > 0);
    }
}
