//! Frame streamer
//!
//! Server role of the camera channel. The listener is bound at startup; the
//! first camera-on trigger arms it, after which it serves one session at a
//! time: accept a viewer, open a fresh capture source, push length-prefixed
//! frames until the connection or the capture fails, release both, listen
//! again. Sessions are never resumable; a new session restarts frame
//! numbering from scratch.

use super::capture::{FrameSource, SyntheticSource};
use airlink_shared::codec;
use anyhow::Result;
use std::net::SocketAddr;
use tokio::io::AsyncWriteExt;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Streams camera frames to one connected viewer at a time
pub struct FrameStreamer {
    listener: TcpListener,
    trigger: mpsc::Receiver<()>,
}

impl FrameStreamer {
    /// Bind the camera listener
    pub async fn bind(addr: SocketAddr, trigger: mpsc::Receiver<()>) -> Result<Self> {
        let listener = TcpListener::bind(addr).await?;
        Ok(Self { listener, trigger })
    }

    /// The bound address of the camera listener
    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Serve streaming sessions until the trigger channel closes
    pub async fn run(mut self) {
        // Nothing is served before the first camera-on command arrives
        if self.trigger.recv().await.is_none() {
            return;
        }
        info!("Camera armed, waiting for a viewer");

        loop {
            // Extra camera-on commands while armed are meaningless
            while self.trigger.try_recv().is_ok() {
                debug!("Camera already armed, trigger ignored");
            }

            let (stream, peer) = match self.listener.accept().await {
                Ok(accepted) => accepted,
                Err(e) => {
                    warn!("Camera accept error: {}", e);
                    continue;
                }
            };
            info!("Viewer connected: {}", peer);

            // One capture source per session, released when the session ends
            let mut source = SyntheticSource::default_resolution();
            match serve_session(stream, &mut source).await {
                Ok(()) => info!("Viewer disconnected: {}", peer),
                Err(e) => warn!("Streaming session ended: {}", e),
            }
            info!("Camera listening for a new viewer");
        }
    }
}

/// Push frames to one viewer until the connection or the capture fails
async fn serve_session<S: FrameSource>(mut stream: TcpStream, source: &mut S) -> Result<()> {
    loop {
        let frame = source.next_frame().await?;
        let encoded = codec::encode(&frame)?;
        stream.write_all(&encoded).await?;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use airlink_shared::codec::FrameDecoder;
    use airlink_shared::VideoFrame;
    use anyhow::anyhow;
    use async_trait::async_trait;
    use std::net::Ipv4Addr;
    use std::time::Duration;
    use tokio::io::AsyncReadExt;
    use tokio::time::timeout;

    struct FailingSource;

    #[async_trait]
    impl FrameSource for FailingSource {
        async fn next_frame(&mut self) -> Result<VideoFrame> {
            Err(anyhow!("capture device unavailable"))
        }
    }

    async fn spawn_streamer() -> (SocketAddr, mpsc::Sender<()>) {
        let (trigger_tx, trigger_rx) = mpsc::channel(1);
        let addr = SocketAddr::from((Ipv4Addr::LOCALHOST, 0));
        let streamer = FrameStreamer::bind(addr, trigger_rx)
            .await
            .expect("bind failed");
        let local = streamer.local_addr().expect("no local addr");
        tokio::spawn(streamer.run());
        (local, trigger_tx)
    }

    async fn read_first_frame(stream: &mut TcpStream) -> VideoFrame {
        let mut decoder = FrameDecoder::new();
        let mut buf = vec![0u8; 4096];

        loop {
            if let Some(frame) = decoder.decode_next().expect("decode error") {
                return frame;
            }
            let n = timeout(Duration::from_secs(5), stream.read(&mut buf))
                .await
                .expect("read timed out")
                .expect("read failed");
            assert!(n > 0, "peer closed before a full frame arrived");
            decoder.extend(&buf[..n]);
        }
    }

    #[tokio::test]
    async fn test_streams_frames_after_trigger() {
        let (addr, trigger) = spawn_streamer().await;
        trigger.send(()).await.expect("trigger failed");

        let mut viewer = TcpStream::connect(addr).await.expect("connect failed");
        let frame = read_first_frame(&mut viewer).await;

        assert_eq!(frame.frame_number, 1);
        assert_eq!(frame.data.len(), (frame.width * frame.height) as usize);
    }

    #[tokio::test]
    async fn test_session_isolation_on_reconnect() {
        let (addr, trigger) = spawn_streamer().await;
        trigger.send(()).await.expect("trigger failed");

        // First session: read a frame, then kill the connection so the
        // streamer's next write fails
        let mut first_viewer = TcpStream::connect(addr).await.expect("connect failed");
        let frame = read_first_frame(&mut first_viewer).await;
        assert_eq!(frame.frame_number, 1);
        drop(first_viewer);

        // Second session on the same listener: fresh source, numbering
        // restarts from scratch
        let mut second_viewer = TcpStream::connect(addr).await.expect("reconnect failed");
        let frame = read_first_frame(&mut second_viewer).await;
        assert_eq!(frame.frame_number, 1);
    }

    #[tokio::test]
    async fn test_no_frames_before_trigger() {
        let (addr, trigger) = spawn_streamer().await;

        // The listener is bound but unarmed: the connection sits in the
        // backlog and nothing is written
        let mut viewer = TcpStream::connect(addr).await.expect("connect failed");
        let mut buf = [0u8; 16];
        let result = timeout(Duration::from_millis(300), viewer.read(&mut buf)).await;
        assert!(result.is_err(), "no bytes may arrive before camera-on");

        // Arming serves the queued connection
        trigger.send(()).await.expect("trigger failed");
        let frame = read_first_frame(&mut viewer).await;
        assert_eq!(frame.frame_number, 1);
    }

    #[tokio::test]
    async fn test_capture_failure_ends_session() {
        let listener = TcpListener::bind((Ipv4Addr::LOCALHOST, 0))
            .await
            .expect("bind failed");
        let addr = listener.local_addr().expect("no local addr");

        let client = tokio::spawn(async move {
            let mut stream = TcpStream::connect(addr).await.expect("connect failed");
            let mut buf = [0u8; 16];
            // Server closes without writing anything
            let n = stream.read(&mut buf).await.expect("read failed");
            assert_eq!(n, 0);
        });

        let (stream, _) = listener.accept().await.expect("accept failed");
        let mut source = FailingSource;
        let result = serve_session(stream, &mut source).await;
        assert!(result.is_err());

        client.await.expect("client panicked");
    }
}
