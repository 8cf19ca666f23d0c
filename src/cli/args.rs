//! CLI argument definitions using clap
//!
//! Commands:
//! - hydrate run --schema <file> --input <file|-> [--settings <file>]
//! - hydrate inspect --schema <file>
//! - hydrate list --schema-dir <dir>

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// hydrate - type-directed hydration of untyped JSON input
#[derive(Parser, Debug)]
#[command(name = "hydrate")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Hydrate a JSON input document against a schema document
    Run {
        /// Path to the schema document
        #[arg(long)]
        schema: PathBuf,

        /// Path to the JSON input, `-` for stdin
        #[arg(long, default_value = "-")]
        input: PathBuf,

        /// Path to a JSON settings file, layered over HYDRATE_* variables
        #[arg(long)]
        settings: Option<PathBuf>,

        /// Hydrate as an authenticated actor
        #[arg(long)]
        authenticated: bool,

        /// Ability granted to the actor (repeatable, implies --authenticated)
        #[arg(long = "ability")]
        abilities: Vec<String>,
    },

    /// Print the field descriptors of a schema document
    Inspect {
        /// Path to the schema document
        #[arg(long)]
        schema: PathBuf,
    },

    /// List the schemas of a directory of schema documents
    List {
        /// Directory of `*.json` schema documents
        #[arg(long, default_value = "./schemas")]
        schema_dir: PathBuf,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_defaults_to_stdin() {
        let cli = Cli::parse_from(["hydrate", "run", "--schema", "post.json"]);
        match cli.command {
            Command::Run {
                input,
                authenticated,
                abilities,
                ..
            } => {
                assert_eq!(input, PathBuf::from("-"));
                assert!(!authenticated);
                assert!(abilities.is_empty());
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_repeated_abilities() {
        let cli = Cli::parse_from([
            "hydrate", "run", "--schema", "post.json", "--ability", "publish", "--ability", "feature",
        ]);
        match cli.command {
            Command::Run { abilities, .. } => assert_eq!(abilities, ["publish", "feature"]),
            other => panic!("unexpected command {:?}", other),
        }
    }
}
