//! CLI module
//!
//! Provides command-line interface for:
//! - run: hydrate a JSON document against a schema document
//! - inspect: print the descriptors of a schema document
//! - list: list the schemas of a schema directory

mod args;
mod commands;
mod errors;
mod io;

pub use args::{Cli, Command};
pub use commands::{hydrate, inspect, list, run, run_command};
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{read_input, write_error, write_hydrated, write_response};
