//! Yomu - read text and metadata from office documents, PDFs and more.
//!
//! Parsing is delegated to Apache Tika (`tika-app.jar`), run as a Java
//! subprocess. A document can come from a local path, a remote URI, or any
//! open byte stream.
//!
//! ```no_run
//! use yomu::Document;
//!
//! let mut doc = Document::new("test/samples/sample.pages")?;
//! assert!(doc.is_path());
//! println!("{}", doc.text()?);
//! println!("{:?}", doc.metadata()?.content_type());
//! # Ok::<(), yomu::YomuError>(())
//! ```

pub mod config;
pub mod document;
pub mod engine;
pub mod error;
pub mod metadata;
pub mod runtime;
pub mod source;

pub use config::{ConfigError, ExtractorConfig};
pub use document::Document;
pub use engine::{Extracted, ExtractionMode, Extractor};
pub use error::{Result, YomuError};
pub use metadata::Metadata;
pub use source::{Input, Source};

/// One-shot extraction with an environment-configured [`Extractor`].
///
/// Raw bytes (`&[u8]`, `Vec<u8>`) are fed to the engine as a stream; strings
/// are classified as a path or URI first.
pub fn read<'a>(mode: ExtractionMode, input: impl Into<Input<'a>>) -> Result<Extracted> {
    Extractor::from_env().read(mode, input)
}
