//! Auxiliary system services started at boot
//!
//! The drone exposes file-transfer and remote-access services next to the
//! control link. Startup is best-effort: a missing or failing unit is
//! logged and the simulator keeps running.

use tokio::process::Command;
use tracing::{info, warn};

const SERVICES: [&str; 2] = ["vsftpd", "ssh"];

/// Start the FTP and SSH services, logging failures without aborting
pub async fn start_services() {
    for service in SERVICES {
        match Command::new("systemctl").args(["start", service]).status().await {
            Ok(status) if status.success() => {
                info!("{} service started successfully", service);
            }
            Ok(status) => {
                warn!("{} service failed to start: {}", service, status);
            }
            Err(e) => {
                warn!("Could not start {} service: {}", service, e);
            }
        }
    }
}
