//! `stackctl app` actions: the application service.

use anyhow::Result;
use clap::Subcommand;

use crate::backend::Compose;

/// Compose service name of the application container.
pub const SERVICE: &str = "app";

#[derive(Debug, Subcommand)]
pub enum AppAction {
    /// Start the application service
    Start,
    /// Stop the application service
    Stop,
    /// Stop then start the application service
    Restart,
    /// Follow the application service logs
    Logs,
    /// Open a bash shell inside the running container
    Bash,
    /// Open a Python shell with the data model preloaded
    Shell,
}

pub fn run(action: &AppAction, backend: &Compose) -> Result<()> {
    match action {
        AppAction::Start => backend.up(Some(SERVICE)),
        AppAction::Stop => backend.stop(Some(SERVICE)),
        AppAction::Restart => backend.stop_then_start(Some(SERVICE)),
        AppAction::Logs => backend.logs_follow(Some(SERVICE)),
        AppAction::Bash => backend.attach(SERVICE, &["bash"]),
        AppAction::Shell => {
            backend.attach(SERVICE, &["python", "-i", "-c", "from models import *"])
        }
    }
}
