mod send;
mod viewer;

use airlink_shared::{net, Command};
use clap::{Parser, Subcommand};
use send::CommandSender;
use std::net::{IpAddr, SocketAddr};
use viewer::FrameViewer;

use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Remote control for the drone simulator
#[derive(Parser)]
#[command(name = "commander", version, about = "Send control commands to the drone")]
struct Cli {
    /// Drone IP address
    drone_ip: IpAddr,

    #[command(subcommand)]
    action: Action,
}

#[derive(Subcommand)]
enum Action {
    /// Move the drone up
    Up,
    /// Move the drone down
    Down,
    /// Move the drone right
    Right,
    /// Move the drone left
    Left,
    /// Take off
    Takeoff,
    /// Land
    Land,
    /// Turn on the camera and view the stream
    Camera,
}

impl Action {
    fn command(&self) -> Command {
        match self {
            Action::Up => Command::MoveUp,
            Action::Down => Command::MoveDown,
            Action::Right => Command::MoveRight,
            Action::Left => Command::MoveLeft,
            Action::Takeoff => Command::TakeOff,
            Action::Land => Command::Land,
            Action::Camera => Command::CameraOn,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();

    let cli = Cli::parse();
    let command = cli.action.command();

    let sender = CommandSender::new(SocketAddr::from((cli.drone_ip, net::COMMAND_PORT)));

    // A lost command stays lost: the link is best-effort and never retried
    if let Err(e) = sender.send(command).await {
        error!("Error: {}", e);
        return Ok(());
    }

    if command == Command::CameraOn {
        let video_addr = SocketAddr::from((cli.drone_ip, net::VIDEO_PORT));
        info!("Connecting to camera stream at {}", video_addr);

        match FrameViewer::connect(video_addr).await {
            Ok(viewer) => {
                if let Err(e) = viewer.run().await {
                    error!("Viewer error: {}", e);
                }
            }
            Err(e) => error!("Could not connect to camera stream: {}", e),
        }
    }

    Ok(())
}
