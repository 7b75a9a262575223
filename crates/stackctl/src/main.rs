//! Developer dispatcher for the dockerized web stack.
//!
//! Usage:
//! ```bash
//! stackctl compose start   # Bring up app, proxy and db together
//! stackctl compose logs    # Follow logs for the whole stack
//! stackctl app shell       # Python shell with the data model preloaded
//! stackctl app bash        # Shell inside the app container
//! stackctl db mysql        # mysql client as the admin user
//! stackctl help            # Full grammar
//! ```
//!
//! All real work is delegated to `docker compose` against the stack's
//! compose file; this tool only routes verbs and actions.

use std::process::ExitCode;

use anyhow::Result;
use clap::{
    CommandFactory, Parser, Subcommand,
    error::{ContextKind, ContextValue, ErrorKind},
};
use clap_complete::Shell;
use console::style;
use tracing_subscriber::{EnvFilter, filter::LevelFilter};

mod backend;
mod commands;
mod complete;
mod config;

use backend::{BackendExit, Compose};

#[derive(Debug, Parser)]
#[command(name = "stackctl", version)]
#[command(about = "Manage the dockerized development stack")]
#[command(after_help = "See docs/DEPLOYMENT.md for the compose file and image recipes.")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Manage the whole stack (app, proxy and db together)
    Compose {
        #[command(subcommand)]
        action: commands::compose::ComposeAction,
    },

    /// Manage the application service
    App {
        #[command(subcommand)]
        action: commands::app::AppAction,
    },

    /// Manage the database service
    Db {
        #[command(subcommand)]
        action: commands::db::DbAction,
    },

    /// Emit a static completion script for the given shell
    #[command(hide = true)]
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },

    /// Completion callback: print candidates for the word at the given index
    #[command(hide = true)]
    Complete {
        /// Index of the word being completed
        index: usize,

        /// Words typed so far, including the program name
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        words: Vec<String>,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::WARN.into())
                .from_env_lossy(),
        )
        .init();

    let backend = Compose::new(&config::Settings::from_env());
    let argv: Vec<String> = std::env::args().collect();
    ExitCode::from(run(&argv, &backend))
}

fn run(argv: &[String], backend: &Compose) -> u8 {
    let cli = match Cli::try_parse_from(argv) {
        Ok(cli) => cli,
        Err(err) => return report_parse_error(&err, argv),
    };

    match dispatch(&cli.command, backend) {
        Ok(()) => 0,
        Err(err) => report_failure(&err),
    }
}

fn dispatch(command: &Command, backend: &Compose) -> Result<()> {
    match command {
        Command::Compose { action } => commands::compose::run(action, backend),
        Command::App { action } => commands::app::run(action, backend),
        Command::Db { action } => commands::db::run(action, backend),
        Command::Completions { shell } => {
            complete::print_script(*shell);
            Ok(())
        }
        Command::Complete { index, words } => {
            complete::print_candidates(words, *index);
            Ok(())
        }
    }
}

fn report_parse_error(err: &clap::Error, argv: &[String]) -> u8 {
    match err.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
            print!("{err}");
            0
        }
        ErrorKind::InvalidSubcommand
        | ErrorKind::MissingSubcommand
        | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => {
            print_usage(argv, err);
            1
        }
        _ => {
            // Flag-level mistakes keep clap's own rendering.
            print!("{err}");
            1
        }
    }
}

/// Routing failures keep the relevant usage fragment on stdout so the
/// invocation is immediately retriable.
fn print_usage(argv: &[String], err: &clap::Error) {
    let mut root = Cli::command();
    root.build();

    if let Some(verb) = argv.get(1) {
        if let Some(group) = root.find_subcommand_mut(verb) {
            // A missing action falls through here too, with an empty name.
            println!("{}", unknown_action_line(err));
            print!("{}", group.render_help());
            return;
        }
        println!("Unknown command: {verb}");
    }
    print!("{}", root.render_help());
}

fn unknown_action_line(err: &clap::Error) -> String {
    format!(
        "Unknown action: {}",
        invalid_subcommand(err).unwrap_or_default()
    )
}

fn invalid_subcommand(err: &clap::Error) -> Option<String> {
    if let Some(ContextValue::String(name)) = err.get(ContextKind::InvalidSubcommand) {
        Some(name.clone())
    } else {
        None
    }
}

fn report_failure(err: &anyhow::Error) -> u8 {
    if let Some(exit) = err.downcast_ref::<BackendExit>() {
        // The backend already wrote its own diagnostics to the terminal.
        return u8::try_from(exit.code).unwrap_or(1);
    }
    eprintln!("{} {err:#}", style("✗").red().bold());
    1
}

#[cfg(test)]
pub(crate) mod testing {
    use std::{
        fs,
        path::PathBuf,
        sync::atomic::{AtomicU64, Ordering},
        time::{SystemTime, UNIX_EPOCH},
    };

    use crate::{backend::Compose, config::Settings};

    /// A temp dir holding a fake `docker` that appends each invocation's
    /// argv (space-joined, minus the program name) to `invocations.txt`.
    /// Invocations containing `fail_on` exit with `fail_code`; everything
    /// else exits 0.
    pub(crate) struct FakeStack {
        dir: PathBuf,
    }

    impl FakeStack {
        pub(crate) fn install(fail_on: Option<&str>, fail_code: i32) -> anyhow::Result<Self> {
            static COUNTER: AtomicU64 = AtomicU64::new(0);
            let unique = COUNTER.fetch_add(1, Ordering::Relaxed);

            let nanos = SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .unwrap_or_default()
                .as_nanos();
            let mut dir = std::env::temp_dir();
            dir.push(format!(
                "stackctl-test-{nanos}-{}-{unique}",
                std::process::id()
            ));
            fs::create_dir_all(&dir)?;

            let record = dir.join("invocations.txt");
            let guard = match fail_on {
                Some(pattern) => format!("case \"$*\" in *\"{pattern}\"*) exit {fail_code};; esac\n"),
                None => String::new(),
            };
            let script = format!(
                "#!/bin/sh\nprintf '%s\\n' \"$*\" >> \"{}\"\n{guard}exit 0\n",
                record.display()
            );

            let script_path = dir.join("docker");
            fs::write(&script_path, script)?;

            #[cfg(unix)]
            {
                use std::os::unix::fs::PermissionsExt;

                let mut permissions = fs::metadata(&script_path)?.permissions();
                permissions.set_mode(0o755);
                fs::set_permissions(&script_path, permissions)?;
            }

            Ok(Self { dir })
        }

        pub(crate) fn settings(&self) -> Settings {
            Settings {
                program: self.dir.join("docker").into_os_string(),
                compose_file: None,
            }
        }

        pub(crate) fn backend(&self) -> Compose {
            Compose::new(&self.settings())
        }

        pub(crate) fn invocations(&self) -> Vec<String> {
            fs::read_to_string(self.dir.join("invocations.txt"))
                .map(|text| text.lines().map(str::to_owned).collect())
                .unwrap_or_default()
        }
    }

    impl Drop for FakeStack {
        fn drop(&mut self) {
            let _ = fs::remove_dir_all(&self.dir);
        }
    }
}
