//! Turning engine output into results.

use crate::metadata::Metadata;

use super::{Extracted, ExtractionMode};

/// Strip the single trailing newline the engine terminates text with.
pub fn parse_text(output: &str) -> &str {
    let output = output.strip_suffix('\n').unwrap_or(output);
    output.strip_suffix('\r').unwrap_or(output)
}

/// Decode captured stdout and shape it for the requested mode.
pub fn parse_output(mode: ExtractionMode, stdout: &[u8]) -> Extracted {
    let output = String::from_utf8_lossy(stdout);
    match mode {
        ExtractionMode::Text => Extracted::Text(parse_text(&output).to_string()),
        ExtractionMode::Html => Extracted::Html(parse_text(&output).to_string()),
        ExtractionMode::Metadata => Extracted::Metadata(Metadata::parse(&output)),
    }
}
