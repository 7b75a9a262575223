//! Environment-derived settings for the compose backend.

use std::{env, ffi::OsString, path::PathBuf};

/// Overrides the container tool binary (defaults to `docker`).
pub const DOCKER_ENV: &str = "STACKCTL_DOCKER";

/// Overrides the compose file passed to every backend invocation.
pub const COMPOSE_FILE_ENV: &str = "STACKCTL_COMPOSE_FILE";

/// Resolved backend settings. The compose file itself is deployment
/// configuration owned elsewhere; it is handed to the backend verbatim,
/// never parsed here.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Container tool program, invoked as `<program> compose ...`.
    pub program: OsString,

    /// Compose file override, forwarded as `--file` when set.
    pub compose_file: Option<PathBuf>,
}

impl Settings {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var_os(key))
    }

    fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<OsString>,
    {
        Self {
            program: lookup(DOCKER_ENV).unwrap_or_else(|| OsString::from("docker")),
            compose_file: lookup(COMPOSE_FILE_ENV).map(PathBuf::from),
        }
    }
}
