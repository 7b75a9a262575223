//! `stackctl compose` actions: stack-wide lifecycle.

use anyhow::Result;
use clap::Subcommand;

use crate::backend::Compose;

#[derive(Debug, Subcommand)]
pub enum ComposeAction {
    /// Start all services in the background
    Start,
    /// Stop all services
    Stop,
    /// Stop then start all services
    Restart,
    /// Stop all services and remove containers and volumes
    Remove,
    /// Build the service images
    Build,
    /// Follow the logs of all services
    Logs,
}

pub fn run(action: &ComposeAction, backend: &Compose) -> Result<()> {
    match action {
        ComposeAction::Start => backend.up(None),
        ComposeAction::Stop => backend.stop(None),
        ComposeAction::Restart => backend.stop_then_start(None),
        ComposeAction::Remove => backend.down_volumes(),
        ComposeAction::Build => backend.build(),
        ComposeAction::Logs => backend.logs_follow(None),
    }
}
