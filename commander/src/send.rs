//! One-shot UDP command sends
//!
//! Every send opens a fresh ephemeral socket, fires one datagram at the
//! drone and closes the socket. There is no acknowledgement and no retry.

use airlink_shared::{Command, CommandFrame};
use anyhow::Result;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::net::UdpSocket;
use tracing::info;

/// Sends encoded command datagrams to a fixed destination
pub struct CommandSender {
    dest: SocketAddr,
    sequence: AtomicU64,
}

impl CommandSender {
    pub fn new(dest: SocketAddr) -> Self {
        Self {
            dest,
            sequence: AtomicU64::new(0),
        }
    }

    /// Encode and transmit one command datagram
    ///
    /// The sequence counter is advisory telemetry; the receiver acts on the
    /// opcode alone.
    pub async fn send(&self, command: Command) -> Result<()> {
        let sequence = self.sequence.fetch_add(1, Ordering::SeqCst);
        let payload = CommandFrame::new(sequence, command).encode();

        let socket = UdpSocket::bind("0.0.0.0:0").await?;
        socket.send_to(payload.as_bytes(), self.dest).await?;

        info!("Payload sent successfully: {}", payload.trim_end());
        Ok(())
    }
}
