//! `hydrate` binary
//!
//! Commands live in `hydrate::cli`; the binary only maps a failure to a
//! stderr line and exit code 1.

use hydrate::cli;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}
