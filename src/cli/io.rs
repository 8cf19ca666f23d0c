//! JSON I/O handling for CLI
//!
//! - Input: one JSON document from a file or stdin
//! - Output: one JSON object per command on stdout
//! - Logs go to stderr, so stdout stays machine-readable

use std::fs;
use std::io::{self, Read, Write};
use std::path::Path;

use serde_json::{json, Value};

use crate::hydrator::HydratedObject;

use super::errors::{CliError, CliResult};

/// Reads a whole input document; `-` reads stdin.
pub fn read_input(path: &Path) -> CliResult<String> {
    let content = if path == Path::new("-") {
        let mut buffer = String::new();
        io::stdin().lock().read_to_string(&mut buffer)?;
        buffer
    } else {
        fs::read_to_string(path).map_err(|e| {
            CliError::io_error(format!("Failed to read {}: {}", path.display(), e))
        })?
    };

    if content.trim().is_empty() {
        return Err(CliError::io_error("Empty input"));
    }
    Ok(content)
}

/// Write a success response to stdout
pub fn write_response(data: Value) -> CliResult<()> {
    write_line(&json!({
        "status": "ok",
        "data": data
    }))
}

/// Write a hydrated object with the names of the explicitly supplied fields
pub fn write_hydrated(object: &HydratedObject) -> CliResult<()> {
    write_line(&json!({
        "status": "ok",
        "data": object.to_json(),
        "filled": object.presence().iter().collect::<Vec<_>>()
    }))
}

/// Write an error response to stdout
pub fn write_error(code: &str, message: &str) -> CliResult<()> {
    write_line(&json!({
        "status": "error",
        "code": code,
        "message": message
    }))
}

fn write_line(response: &Value) -> CliResult<()> {
    let mut stdout = io::stdout();
    serde_json::to_writer(&mut stdout, response)?;
    writeln!(stdout)?;
    stdout.flush()?;

    Ok(())
}
