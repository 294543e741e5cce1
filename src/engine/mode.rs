//! What kind of output to ask the engine for.

use std::fmt;
use std::str::FromStr;

/// Output requested from the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExtractionMode {
    /// Plain text.
    Text,
    /// XHTML markup.
    Html,
    /// `key: value` metadata lines.
    Metadata,
}

impl ExtractionMode {
    /// Command-line switch selecting this output.
    pub fn flag(&self) -> &'static str {
        match self {
            ExtractionMode::Text => "-t",
            ExtractionMode::Html => "-h",
            ExtractionMode::Metadata => "-m",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ExtractionMode::Text => "text",
            ExtractionMode::Html => "html",
            ExtractionMode::Metadata => "metadata",
        }
    }
}

impl FromStr for ExtractionMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "txt" => Ok(ExtractionMode::Text),
            "html" | "xhtml" => Ok(ExtractionMode::Html),
            "metadata" | "meta" => Ok(ExtractionMode::Metadata),
            other => Err(format!("unknown extraction mode: {}", other)),
        }
    }
}

impl fmt::Display for ExtractionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
