//! Command dispatch loop
//!
//! One UDP socket, one unbounded blocking receive loop. Each datagram is
//! decoded and applied to the flight state machine in arrival order; side
//! effects leave through channels so the loop itself never stalls on the
//! display or the streamer.

use airlink_shared::{net, CommandFrame, Direction, Dispatch, FlightState, FlightStateMachine};
use anyhow::Result;
use std::net::SocketAddr;
use tokio::net::UdpSocket;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Receives command datagrams and drives the flight state machine
pub struct CommandDispatcher {
    socket: UdpSocket,
    fsm: FlightStateMachine,
    position_tx: mpsc::Sender<Direction>,
    stream_tx: mpsc::Sender<()>,
}

impl CommandDispatcher {
    /// Bind the command socket
    pub async fn bind(
        addr: SocketAddr,
        position_tx: mpsc::Sender<Direction>,
        stream_tx: mpsc::Sender<()>,
    ) -> Result<Self> {
        let socket = UdpSocket::bind(addr).await?;
        Ok(Self {
            socket,
            fsm: FlightStateMachine::new(),
            position_tx,
            stream_tx,
        })
    }

    /// The bound address of the command socket
    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.socket.local_addr()?)
    }

    /// Run the receive loop; never returns except on channel shutdown
    pub async fn run(mut self) {
        let mut buf = vec![0u8; net::MAX_DATAGRAM];

        loop {
            let (len, peer) = match self.socket.recv_from(&mut buf).await {
                Ok(received) => received,
                Err(e) => {
                    // Transient receive failures never terminate the loop
                    warn!("Command receive error: {}", e);
                    continue;
                }
            };

            if !self.handle_datagram(&buf[..len], peer).await {
                break;
            }
        }
    }

    /// Decode and apply one datagram; returns false when the display
    /// collaborator is gone and the loop should stop
    async fn handle_datagram(&mut self, datagram: &[u8], peer: SocketAddr) -> bool {
        let frame = match CommandFrame::decode(datagram) {
            Ok(frame) => frame,
            Err(e) => {
                warn!("Bad command from {}: {}", peer, e);
                return true;
            }
        };

        debug!(
            "Received payload [{}] seq={} from {}",
            frame.command.opcode(),
            frame.sequence,
            peer
        );

        match self.fsm.apply(frame.command) {
            Dispatch::StateChanged { from, to } => {
                match (from, to) {
                    (FlightState::Grounded, FlightState::Airborne) => info!("Drone takes off"),
                    (FlightState::Airborne, FlightState::Grounded) => info!("Drone lands"),
                    _ => debug!("Flight state re-asserted: {:?}", to),
                }
                true
            }
            Dispatch::Moved(direction) => {
                if self.position_tx.send(direction).await.is_err() {
                    warn!("Display collaborator closed, stopping dispatch");
                    return false;
                }
                true
            }
            Dispatch::IgnoredGrounded(_) => {
                warn!("Drone is not in the air. Please take off first.");
                true
            }
            Dispatch::StreamRequested => {
                info!("Turn on camera");
                if self.stream_tx.try_send(()).is_err() {
                    // Streamer already armed or mid-session, nothing to do
                    debug!("Camera trigger dropped, streamer already active");
                }
                true
            }
        }
    }
}
