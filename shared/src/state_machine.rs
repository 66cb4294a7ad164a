//! Flight State Machine
//!
//! The drone is either on the ground or in the air. Directional commands
//! only produce movement while airborne; takeoff and land are idempotent.

use crate::Command;

/// The two flight states gating directional movement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlightState {
    Grounded,
    Airborne,
}

/// Direction of a movement command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Right,
    Left,
}

/// Result of applying one command to the state machine
///
/// Side effects belong to the dispatcher; the machine only reports what
/// should happen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatch {
    /// Flight state is now `to`; `from == to` for re-asserted takeoff/land
    StateChanged { from: FlightState, to: FlightState },
    /// Movement accepted, exactly one position update should be emitted
    Moved(Direction),
    /// Directional command ignored because the drone is on the ground
    IgnoredGrounded(Direction),
    /// A camera streaming session was requested; flight state is untouched
    StreamRequested,
}

/// The flight state machine owned by the receiver's dispatcher
#[derive(Debug)]
pub struct FlightStateMachine {
    state: FlightState,
}

impl Default for FlightStateMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl FlightStateMachine {
    /// Create a new state machine on the ground
    pub fn new() -> Self {
        Self {
            state: FlightState::Grounded,
        }
    }

    /// Get current flight state
    pub fn state(&self) -> FlightState {
        self.state
    }

    /// Apply one decoded command and return the transition outcome
    pub fn apply(&mut self, command: Command) -> Dispatch {
        match command {
            Command::TakeOff => {
                let from = self.state;
                self.state = FlightState::Airborne;
                Dispatch::StateChanged {
                    from,
                    to: self.state,
                }
            }
            Command::Land => {
                let from = self.state;
                self.state = FlightState::Grounded;
                Dispatch::StateChanged {
                    from,
                    to: self.state,
                }
            }
            Command::CameraOn => Dispatch::StreamRequested,
            Command::MoveUp => self.try_move(Direction::Up),
            Command::MoveDown => self.try_move(Direction::Down),
            Command::MoveRight => self.try_move(Direction::Right),
            Command::MoveLeft => self.try_move(Direction::Left),
        }
    }

    fn try_move(&self, direction: Direction) -> Dispatch {
        match self.state {
            FlightState::Airborne => Dispatch::Moved(direction),
            FlightState::Grounded => Dispatch::IgnoredGrounded(direction),
        }
    }
}
