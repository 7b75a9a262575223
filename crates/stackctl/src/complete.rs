//! Context-sensitive completion candidates.
//!
//! Candidates come from the same clap grammar the router parses, so the
//! two entry points cannot drift apart. Nothing here executes an action.

use clap::CommandFactory;
use clap_complete::{Generator, generate};

use crate::Cli;

/// Candidate set for the word at `index`, given the words typed so far
/// (including the program name at index 0). Index 1 completes the verb,
/// index 2 the matched verb's action; the grammar is two levels deep, so
/// any other index has no candidates.
pub fn candidates(words: &[String], index: usize) -> Vec<String> {
    match index {
        1 => verbs(),
        2 => words.get(1).map(|verb| actions(verb)).unwrap_or_default(),
        _ => Vec::new(),
    }
}

/// Prints one candidate per line, the callback protocol the emitted
/// completion wrappers consume.
pub fn print_candidates(words: &[String], index: usize) {
    for candidate in candidates(words, index) {
        println!("{candidate}");
    }
}

/// Emits a static completion script for `shell` on stdout.
pub fn print_script<G: Generator>(shell: G) {
    let mut command = Cli::command();
    let name = command.get_name().to_string();
    generate(shell, &mut command, name, &mut std::io::stdout());
}

fn verbs() -> Vec<String> {
    let mut command = Cli::command();
    command.build();
    command
        .get_subcommands()
        .filter(|sub| !sub.is_hide_set())
        .map(|sub| sub.get_name().to_owned())
        .collect()
}

fn actions(verb: &str) -> Vec<String> {
    // Only the three service groups have a second level; the help verb
    // and anything unknown complete to nothing.
    match verb {
        "compose" | "app" | "db" => {
            let mut command = Cli::command();
            command.build();
            command
                .find_subcommand(verb)
                .map(|group| {
                    group
                        .get_subcommands()
                        .filter(|sub| !sub.is_hide_set() && sub.get_name() != "help")
                        .map(|sub| sub.get_name().to_owned())
                        .collect()
                })
                .unwrap_or_default()
        }
        _ => Vec::new(),
    }
}
