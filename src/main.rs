mod dispatch;
mod display;
mod services;
mod video;

use airlink_shared::net;
use dispatch::CommandDispatcher;
use display::SimulatedVehicle;
use std::net::{Ipv4Addr, SocketAddr};
use tokio::sync::mpsc;
use video::FrameStreamer;

use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();

    info!("Drone simulator starting");

    // Auxiliary services are best-effort; the simulator runs without them
    services::start_services().await;

    let (position_tx, position_rx) = mpsc::channel(32);
    let (stream_tx, stream_rx) = mpsc::channel(1);

    let video_addr = SocketAddr::from((Ipv4Addr::UNSPECIFIED, net::VIDEO_PORT));
    let streamer = FrameStreamer::bind(video_addr, stream_rx).await?;
    info!("Camera channel listening on {}", video_addr);
    tokio::spawn(streamer.run());

    tokio::spawn(SimulatedVehicle::new().run(position_rx));

    let command_addr = SocketAddr::from((Ipv4Addr::UNSPECIFIED, net::COMMAND_PORT));
    let dispatcher = CommandDispatcher::bind(command_addr, position_tx, stream_tx).await?;
    info!("Ready for receiving instructions on {}", command_addr);

    dispatcher.run().await;

    Ok(())
}
