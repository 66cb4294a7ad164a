//! Capture source abstraction
//!
//! Real camera access is a wrapped device call outside this crate's scope;
//! the simulator ships a synthetic pattern generator behind the same trait.

use airlink_shared::VideoFrame;
use anyhow::Result;
use async_trait::async_trait;
use tokio::time::{interval, Duration, Interval, MissedTickBehavior};

/// A source of camera frames
///
/// One source is exclusively owned by one streaming session and dropped on
/// every exit path, which releases the underlying device.
#[async_trait]
pub trait FrameSource: Send {
    /// Produce the next frame, waiting for one to become available
    async fn next_frame(&mut self) -> Result<VideoFrame>;
}

/// Synthetic capture source producing a moving grayscale gradient
pub struct SyntheticSource {
    width: u32,
    height: u32,
    frame_number: u64,
    ticker: Interval,
}

impl SyntheticSource {
    /// Frame pacing, roughly 30 fps
    const FRAME_INTERVAL: Duration = Duration::from_millis(33);

    pub fn new(width: u32, height: u32) -> Self {
        let mut ticker = interval(Self::FRAME_INTERVAL);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        Self {
            width,
            height,
            frame_number: 0,
            ticker,
        }
    }

    /// 320x240, enough to exercise the transport without flooding it
    pub fn default_resolution() -> Self {
        Self::new(320, 240)
    }

    fn render(&self) -> Vec<u8> {
        let mut data = Vec::with_capacity((self.width * self.height) as usize);
        for y in 0..self.height {
            for x in 0..self.width {
                // Diagonal gradient shifted by frame number so the picture moves
                data.push((x + y + self.frame_number as u32) as u8);
            }
        }
        data
    }
}

#[async_trait]
impl FrameSource for SyntheticSource {
    async fn next_frame(&mut self) -> Result<VideoFrame> {
        self.ticker.tick().await;
        self.frame_number += 1;
        Ok(VideoFrame::new(
            self.frame_number,
            self.width,
            self.height,
            self.render(),
        ))
    }
}
