//! Extraction through the Tika engine.
//!
//! Each extraction is one `java -jar tika-app.jar` run:
//! - path and URI sources are passed as the final argument and opened by the
//!   engine itself
//! - stream sources are read fully and written to the engine's stdin
//!
//! The engine's stdout is captured whole and parsed according to the
//! [`ExtractionMode`]. Nothing is cached between runs.

mod async_process;
mod command;
mod mode;
mod parse;
mod process;

use std::ffi::OsStr;
use std::path::PathBuf;

use tracing::debug;

use crate::config::ExtractorConfig;
use crate::error::Result;
use crate::metadata::Metadata;
use crate::runtime;
use crate::source::{read_stream, Input, Source};

pub use command::{Invocation, Target};
pub use mode::ExtractionMode;
pub use parse::parse_text;

/// Parsed engine output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extracted {
    Text(String),
    Html(String),
    Metadata(Metadata),
}

impl Extracted {
    /// Text or markup, if this is not metadata.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Extracted::Text(s) | Extracted::Html(s) => Some(s),
            Extracted::Metadata(_) => None,
        }
    }

    pub fn into_text(self) -> Option<String> {
        match self {
            Extracted::Text(s) | Extracted::Html(s) => Some(s),
            Extracted::Metadata(_) => None,
        }
    }

    pub fn into_metadata(self) -> Option<Metadata> {
        match self {
            Extracted::Metadata(m) => Some(m),
            _ => None,
        }
    }
}

/// Runs the engine for a source.
#[derive(Debug, Clone, Default)]
pub struct Extractor {
    config: ExtractorConfig,
}

impl Extractor {
    pub fn new(config: ExtractorConfig) -> Self {
        Self { config }
    }

    /// Extractor configured from defaults and environment variables.
    pub fn from_env() -> Self {
        Self::new(ExtractorConfig::default())
    }

    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    /// The Java launcher to use right now.
    ///
    /// Resolved on every call so changes to `JAVA_HOME` take effect
    /// immediately.
    pub fn java(&self) -> PathBuf {
        let home = self
            .config
            .java_home
            .clone()
            .or_else(runtime::java_home_from_env);
        runtime::java_command(home.as_deref())
    }

    /// Build the command line for one run.
    pub fn invocation<'d>(&self, mode: ExtractionMode, target: Target<'d>) -> Invocation<'d> {
        Invocation::build(self.java(), &self.config, mode, target)
    }

    /// Run one extraction. A stream source is read to its end.
    pub fn extract(&self, source: &mut Source<'_>, mode: ExtractionMode) -> Result<Extracted> {
        debug!("Extracting {} from {}", mode, source.describe());
        let stdout = match source {
            Source::Path(path) => self.run(mode, Target::Location(path.as_os_str()))?,
            Source::Uri(uri) => self.run(mode, Target::Location(OsStr::new(uri.as_str())))?,
            Source::Stream(reader) => {
                let data = read_stream(reader.as_mut())?;
                self.run(mode, Target::Stdin(&data))?
            }
        };
        Ok(parse::parse_output(mode, &stdout))
    }

    /// Run one extraction over in-memory document bytes.
    pub fn extract_bytes(&self, data: &[u8], mode: ExtractionMode) -> Result<Extracted> {
        debug!("Extracting {} from {} bytes", mode, data.len());
        let stdout = self.run(mode, Target::Stdin(data))?;
        Ok(parse::parse_output(mode, &stdout))
    }

    /// Async variant of [`Extractor::extract`].
    ///
    /// Stream sources are read on the calling task before the engine starts.
    pub async fn extract_async(
        &self,
        source: &mut Source<'_>,
        mode: ExtractionMode,
    ) -> Result<Extracted> {
        debug!("Extracting {} from {}", mode, source.describe());
        let timeout = self.config.timeout();
        let stdout = match source {
            Source::Path(path) => {
                let invocation = self.invocation(mode, Target::Location(path.as_os_str()));
                async_process::run(&invocation, timeout).await?
            }
            Source::Uri(uri) => {
                let invocation = self.invocation(mode, Target::Location(OsStr::new(uri.as_str())));
                async_process::run(&invocation, timeout).await?
            }
            Source::Stream(reader) => {
                let data = read_stream(reader.as_mut())?;
                let invocation = self.invocation(mode, Target::Stdin(&data));
                async_process::run(&invocation, timeout).await?
            }
        };
        Ok(parse::parse_output(mode, &stdout))
    }

    pub fn text(&self, source: &mut Source<'_>) -> Result<String> {
        let extracted = self.extract(source, ExtractionMode::Text)?;
        Ok(extracted.into_text().unwrap_or_default())
    }

    pub fn html(&self, source: &mut Source<'_>) -> Result<String> {
        let extracted = self.extract(source, ExtractionMode::Html)?;
        Ok(extracted.into_text().unwrap_or_default())
    }

    pub fn metadata(&self, source: &mut Source<'_>) -> Result<Metadata> {
        let extracted = self.extract(source, ExtractionMode::Metadata)?;
        Ok(extracted.into_metadata().unwrap_or_default())
    }

    /// One-shot extraction: classify the input, then extract once.
    ///
    /// Raw bytes are treated as an in-memory stream.
    pub fn read<'a>(&self, mode: ExtractionMode, input: impl Into<Input<'a>>) -> Result<Extracted> {
        match input.into() {
            Input::Bytes(data) => self.extract_bytes(&data, mode),
            input => self.extract(&mut Source::classify(input)?, mode),
        }
    }

    fn run(&self, mode: ExtractionMode, target: Target<'_>) -> Result<Vec<u8>> {
        let invocation = self.invocation(mode, target);
        process::run(&invocation, self.config.timeout())
    }
}
