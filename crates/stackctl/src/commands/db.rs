//! `stackctl db` actions: the database service.

use anyhow::Result;
use clap::Subcommand;

use crate::backend::Compose;

/// Compose service name of the database container.
pub const SERVICE: &str = "db";

#[derive(Debug, Subcommand)]
pub enum DbAction {
    /// Start the database service
    Start,
    /// Stop the database service
    Stop,
    /// Stop then start the database service
    Restart,
    /// Follow the database service logs
    Logs,
    /// Open a mysql client session as the administrative user
    Mysql,
    /// Run pending database migrations (not implemented)
    Upgrade,
}

pub fn run(action: &DbAction, backend: &Compose) -> Result<()> {
    match action {
        DbAction::Start => backend.up(Some(SERVICE)),
        DbAction::Stop => backend.stop(Some(SERVICE)),
        DbAction::Restart => backend.stop_then_start(Some(SERVICE)),
        DbAction::Logs => backend.logs_follow(Some(SERVICE)),
        DbAction::Mysql => backend.attach(
            SERVICE,
            // The root password only exists inside the container, so the
            // client has to be launched through a shell there.
            &["sh", "-c", r#"exec mysql -uroot -p"$MYSQL_ROOT_PASSWORD""#],
        ),
        DbAction::Upgrade => {
            // Permanent stub: reports success and never touches the backend.
            println!("Upgrading database...");
            println!("Not implemented yet!!!");
            Ok(())
        }
    }
}
