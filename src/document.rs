//! A document handle bound to one source.

use std::path::Path;

use mime_guess::mime::Mime;

use crate::engine::{Extracted, ExtractionMode, Extractor};
use crate::error::Result;
use crate::metadata::Metadata;
use crate::source::{read_stream, Input, Source};

/// One document, readable as text, HTML or metadata.
///
/// Every accessor runs the engine again; results are not cached. For stream
/// sources the bytes are drained from the caller's handle on first use and
/// kept, so later accessors see the same document. The handle is never closed.
pub struct Document<'a> {
    source: Source<'a>,
    extractor: Extractor,
    buffered: Option<Vec<u8>>,
}

impl<'a> Document<'a> {
    /// Classify `input` and bind it to an extractor configured from the environment.
    pub fn new(input: impl Into<Input<'a>>) -> Result<Self> {
        Self::with_extractor(input, Extractor::from_env())
    }

    pub fn with_extractor(input: impl Into<Input<'a>>, extractor: Extractor) -> Result<Self> {
        Ok(Self::from_source(Source::classify(input)?, extractor))
    }

    pub fn from_source(source: Source<'a>, extractor: Extractor) -> Self {
        Self {
            source,
            extractor,
            buffered: None,
        }
    }

    pub fn source(&self) -> &Source<'a> {
        &self.source
    }

    pub fn is_path(&self) -> bool {
        self.source.is_path()
    }

    pub fn is_uri(&self) -> bool {
        self.source.is_uri()
    }

    pub fn is_stream(&self) -> bool {
        self.source.is_stream()
    }

    pub fn text(&mut self) -> Result<String> {
        let extracted = self.extract(ExtractionMode::Text)?;
        Ok(extracted.into_text().unwrap_or_default())
    }

    pub fn html(&mut self) -> Result<String> {
        let extracted = self.extract(ExtractionMode::Html)?;
        Ok(extracted.into_text().unwrap_or_default())
    }

    pub fn metadata(&mut self) -> Result<Metadata> {
        let extracted = self.extract(ExtractionMode::Metadata)?;
        Ok(extracted.into_metadata().unwrap_or_default())
    }

    /// MIME type reported by the engine, or guessed from the file extension.
    pub fn mimetype(&mut self) -> Result<Option<Mime>> {
        let reported = self.metadata()?.mime_type();
        Ok(reported.or_else(|| guess_mime(&self.source)))
    }

    pub fn extract(&mut self, mode: ExtractionMode) -> Result<Extracted> {
        match &mut self.source {
            Source::Stream(reader) => {
                if self.buffered.is_none() {
                    self.buffered = Some(read_stream(reader.as_mut())?);
                }
                let data = self.buffered.as_deref().unwrap_or_default();
                self.extractor.extract_bytes(data, mode)
            }
            source => self.extractor.extract(source, mode),
        }
    }
}

/// Guess a MIME type from the extension of a path or URI. Streams have none.
pub fn guess_mime(source: &Source<'_>) -> Option<Mime> {
    match source {
        Source::Path(path) => guess_from_path(path),
        Source::Uri(uri) => guess_from_path(Path::new(uri.path())),
        Source::Stream(_) => None,
    }
}

fn guess_from_path(path: &Path) -> Option<Mime> {
    mime_guess::from_path(path).first()
}
