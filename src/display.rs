//! Simulated vehicle position
//!
//! The display collaborator never shares state with the dispatcher; it only
//! consumes explicit position-update events from a channel.

use airlink_shared::Direction;
use tokio::sync::mpsc;
use tracing::info;

/// Distance moved per directional command
const STEP: i64 = 10;

/// Tracks the simulated vehicle's on-screen position
#[derive(Debug, Default)]
pub struct SimulatedVehicle {
    x: i64,
    y: i64,
}

impl SimulatedVehicle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current coordinates
    pub fn position(&self) -> (i64, i64) {
        (self.x, self.y)
    }

    /// Apply one movement and report it
    pub fn apply(&mut self, direction: Direction) {
        match direction {
            Direction::Up => {
                self.y += STEP;
                info!("Drone goes up");
            }
            Direction::Down => {
                self.y -= STEP;
                info!("Drone goes down");
            }
            Direction::Right => {
                self.x += STEP;
                info!("Drone moves right");
            }
            Direction::Left => {
                self.x -= STEP;
                info!("Drone moves left");
            }
        }
        info!("Drone position: ({}, {})", self.x, self.y);
    }

    /// Consume position updates until the dispatcher goes away
    pub async fn run(mut self, mut events: mpsc::Receiver<Direction>) {
        while let Some(direction) = events.recv().await {
            self.apply(direction);
        }
    }
}
