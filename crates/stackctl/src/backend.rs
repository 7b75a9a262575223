//! Invocation layer for the `docker compose` backend.
//!
//! Every lifecycle action in this tool resolves to one fixed backend
//! invocation assembled here. Nothing is retried and no output is
//! captured; the backend writes straight to the invoking terminal.

use std::{ffi::OsString, path::PathBuf, process::Command};

use anyhow::{Context, Result};
use console::style;
use tracing::{debug, warn};

use crate::config::Settings;

/// Non-zero exit of a delegated backend call. The status crosses the
/// core/backend boundary unmodified and becomes the process exit code.
#[derive(Debug, thiserror::Error)]
#[error("docker compose exited with status {code}")]
pub struct BackendExit {
    pub code: i32,
}

/// Handle on the compose backend for the stack's project.
pub struct Compose {
    program: OsString,
    compose_file: Option<PathBuf>,
}

impl Compose {
    pub fn new(settings: &Settings) -> Self {
        Self {
            program: settings.program.clone(),
            compose_file: settings.compose_file.clone(),
        }
    }

    /// Start the given service, or the whole stack, in the background.
    pub fn up(&self, service: Option<&str>) -> Result<()> {
        println!("{} Starting {}...", style("→").cyan(), label(service));
        self.run(&with_service(&["up", "-d"], service))
    }

    /// Stop the given service, or the whole stack.
    pub fn stop(&self, service: Option<&str>) -> Result<()> {
        println!("{} Stopping {}...", style("→").cyan(), label(service));
        self.run(&with_service(&["stop"], service))
    }

    /// Stop followed by start, with start attempted even when stop fails.
    /// The start half's result is the one reported.
    pub fn stop_then_start(&self, service: Option<&str>) -> Result<()> {
        if let Err(err) = self.stop(service) {
            warn!(error = %err, "stop failed; attempting start anyway");
        }
        self.up(service)
    }

    /// Stop the stack and remove its containers and named volumes.
    pub fn down_volumes(&self) -> Result<()> {
        println!(
            "{} Removing containers and volumes...",
            style("→").cyan()
        );
        self.run(&["down", "--volumes"])
    }

    /// Build the service images.
    pub fn build(&self) -> Result<()> {
        println!("{} Building images...", style("→").cyan());
        self.run(&["build"])
    }

    /// Follow the logs of the given service, or of the whole stack.
    pub fn logs_follow(&self, service: Option<&str>) -> Result<()> {
        self.run(&with_service(&["logs", "--follow"], service))
    }

    /// Attach the invoking terminal to an interactive process inside a
    /// running service. Blocks until that session ends.
    pub fn attach(&self, service: &str, command: &[&str]) -> Result<()> {
        let mut args = vec!["exec", service];
        args.extend_from_slice(command);
        self.run(&args)
    }

    fn run(&self, args: &[&str]) -> Result<()> {
        let mut cmd = Command::new(&self.program);
        cmd.arg("compose");
        if let Some(file) = &self.compose_file {
            cmd.arg("--file").arg(file);
        }
        cmd.args(args);

        debug!(command = ?cmd, "invoking backend");
        let status = cmd
            .status()
            .with_context(|| format!("failed to run {}", self.program.to_string_lossy()))?;

        if !status.success() {
            let code = status.code().unwrap_or(1);
            return Err(BackendExit { code }.into());
        }
        Ok(())
    }
}

fn with_service<'a>(args: &[&'a str], service: Option<&'a str>) -> Vec<&'a str> {
    let mut out = args.to_vec();
    if let Some(service) = service {
        out.push(service);
    }
    out
}

fn label(service: Option<&str>) -> &str {
    service.unwrap_or("stack")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeStack;

    #[test]
    fn test_up_targets_one_service() -> Result<()> {
        // Arrange
        let stack = FakeStack::install(None, 0)?;
        let backend = stack.backend();

        // Act
        backend.up(Some("app"))?;

        // Assert
        assert_eq!(stack.invocations(), vec!["compose up -d app".to_owned()]);
        Ok(())
    }

    #[test]
    fn test_compose_file_override_is_forwarded() -> Result<()> {
        // Arrange
        let stack = FakeStack::install(None, 0)?;
        let mut settings = stack.settings();
        settings.compose_file = Some("deploy/docker-compose.yml".into());
        let backend = Compose::new(&settings);

        // Act
        backend.build()?;

        // Assert
        assert_eq!(
            stack.invocations(),
            vec!["compose --file deploy/docker-compose.yml build".to_owned()]
        );
        Ok(())
    }

    #[test]
    fn test_backend_status_is_surfaced_unchanged() -> Result<()> {
        // Arrange
        let stack = FakeStack::install(Some("stop"), 7)?;
        let backend = stack.backend();

        // Act
        let err = backend.stop(None).expect_err("expected backend failure");

        // Assert
        let exit = err
            .downcast_ref::<BackendExit>()
            .expect("expected BackendExit");
        assert_eq!(exit.code, 7);
        Ok(())
    }

    #[test]
    fn test_restart_attempts_start_after_failed_stop() -> Result<()> {
        // Arrange
        let stack = FakeStack::install(Some("stop"), 7)?;
        let backend = stack.backend();

        // Act
        let result = backend.stop_then_start(Some("app"));

        // Assert
        assert!(result.is_ok());
        assert_eq!(
            stack.invocations(),
            vec!["compose stop app".to_owned(), "compose up -d app".to_owned()]
        );
        Ok(())
    }

    #[test]
    fn test_restart_runs_stop_then_start_in_order() -> Result<()> {
        // Arrange
        let stack = FakeStack::install(None, 0)?;
        let backend = stack.backend();

        // Act
        backend.stop_then_start(None)?;

        // Assert
        assert_eq!(
            stack.invocations(),
            vec!["compose stop".to_owned(), "compose up -d".to_owned()]
        );
        Ok(())
    }

    #[test]
    fn test_attach_wraps_exec_on_the_service() -> Result<()> {
        // Arrange
        let stack = FakeStack::install(None, 0)?;
        let backend = stack.backend();

        // Act
        backend.attach("app", &["bash"])?;

        // Assert
        assert_eq!(stack.invocations(), vec!["compose exec app bash".to_owned()]);
        Ok(())
    }
}
