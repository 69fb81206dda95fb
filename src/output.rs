//! Output formatting for CLI query results.

use anyhow::Result;
use serde::Serialize;
use std::io::Write;
use tracing::debug;

/// Serializes `value` as JSON, compact or indented.
pub fn render<T: Serialize>(value: &T, pretty: bool) -> Result<String> {
    let json = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    Ok(json)
}

/// Writes `value` as a single JSON document followed by a newline.
pub fn write_json<W: Write, T: Serialize>(mut out: W, value: &T, pretty: bool) -> Result<()> {
    let json = render(value, pretty)?;
    debug!(bytes = json.len(), "Writing JSON output");
    out.write_all(json.as_bytes())?;
    out.write_all(b"\n")?;
    out.flush()?;
    Ok(())
}

/// Prints `value` as JSON on stdout.
pub fn print_json<T: Serialize>(value: &T, pretty: bool) -> Result<()> {
    write_json(std::io::stdout().lock(), value, pretty)
}
