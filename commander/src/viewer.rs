//! Frame viewer
//!
//! Client role of the camera channel. Connects once, accumulates reads until
//! each declared frame length is satisfied, reports every frame, and stops on
//! Ctrl-C or when the drone closes the stream. No reconnect.

use airlink_shared::codec::FrameDecoder;
use airlink_shared::VideoFrame;
use anyhow::Result;
use std::net::SocketAddr;
use tokio::io::AsyncReadExt;
use tokio::net::TcpStream;
use tracing::info;

/// Receives and displays the camera stream
pub struct FrameViewer {
    stream: TcpStream,
    decoder: FrameDecoder,
    read_buf: Vec<u8>,
}

impl FrameViewer {
    /// Connect to the drone's camera channel
    pub async fn connect(addr: SocketAddr) -> Result<Self> {
        let stream = TcpStream::connect(addr).await?;
        Ok(Self {
            stream,
            decoder: FrameDecoder::new(),
            read_buf: vec![0u8; 4096],
        })
    }

    /// Read the next complete frame
    ///
    /// Returns `None` when the drone closes the connection.
    pub async fn next_frame(&mut self) -> Result<Option<VideoFrame>> {
        loop {
            if let Some(frame) = self.decoder.decode_next()? {
                return Ok(Some(frame));
            }

            // The transport may deliver fewer bytes than a frame per read;
            // keep accumulating until one decodes
            let n = self.stream.read(&mut self.read_buf).await?;
            if n == 0 {
                return Ok(None);
            }
            self.decoder.extend(&self.read_buf[..n]);
        }
    }

    /// Display frames until Ctrl-C or the drone closes the stream
    pub async fn run(mut self) -> Result<()> {
        loop {
            tokio::select! {
                _ = tokio::signal::ctrl_c() => {
                    info!("Closing camera view");
                    return Ok(());
                }
                frame = self.next_frame() => {
                    match frame? {
                        Some(frame) => display(&frame),
                        None => {
                            info!("Drone closed the camera stream");
                            return Ok(());
                        }
                    }
                }
            }
        }
    }
}

fn display(frame: &VideoFrame) {
    info!(
        "Frame {}: {}x{}, {} bytes",
        frame.frame_number,
        frame.width,
        frame.height,
        frame.data.len()
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use airlink_shared::codec;
    use std::net::Ipv4Addr;
    use std::time::Duration;
    use tokio::io::AsyncWriteExt;
    use tokio::net::TcpListener;
    use tokio::time::timeout;

    #[tokio::test]
    async fn test_reads_frames_split_across_chunks() {
        let listener = TcpListener::bind((Ipv4Addr::LOCALHOST, 0))
            .await
            .expect("bind failed");
        let addr = listener.local_addr().expect("no local addr");

        let server = tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.expect("accept failed");

            let first = codec::encode(&VideoFrame::new(1, 4, 4, vec![1; 16])).expect("encode");
            let second = codec::encode(&VideoFrame::new(2, 4, 4, vec![2; 16])).expect("encode");

            // Deliver both frames 3 bytes at a time
            let mut wire = first.to_vec();
            wire.extend_from_slice(&second);
            for chunk in wire.chunks(3) {
                stream.write_all(chunk).await.expect("write failed");
                stream.flush().await.expect("flush failed");
            }
            // Server closes the stream after the second frame
        });

        let mut viewer = FrameViewer::connect(addr).await.expect("connect failed");

        let first = timeout(Duration::from_secs(5), viewer.next_frame())
            .await
            .expect("timed out")
            .expect("read error")
            .expect("stream closed early");
        assert_eq!(first.frame_number, 1);
        assert_eq!(first.data, vec![1; 16]);

        let second = timeout(Duration::from_secs(5), viewer.next_frame())
            .await
            .expect("timed out")
            .expect("read error")
            .expect("stream closed early");
        assert_eq!(second.frame_number, 2);

        // Peer close surfaces as a clean end of stream
        let end = timeout(Duration::from_secs(5), viewer.next_frame())
            .await
            .expect("timed out")
            .expect("read error");
        assert!(end.is_none());

        server.await.expect("server panicked");
    }
}
