//! Shared helper functions for CLI commands.

use std::io::{self, Write};

use anyhow::Context;
use yomu::{Metadata, Source};

/// Resolve a command-line input. `-` reads the document from stdin.
pub fn open_source(input: &str) -> anyhow::Result<Source<'static>> {
    if input == "-" {
        return Ok(Source::from_reader(io::stdin()));
    }
    Source::classify(input).with_context(|| format!("Cannot read {}", input))
}

/// Print metadata as `key: value` lines, or as a JSON object.
pub fn print_metadata(metadata: &Metadata, json: bool) -> anyhow::Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    if json {
        serde_json::to_writer_pretty(&mut out, metadata)?;
        writeln!(out)?;
    } else {
        for (key, value) in metadata {
            writeln!(out, "{}: {}", key, value)?;
        }
    }
    Ok(())
}
