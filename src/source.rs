//! Source classification.
//!
//! Every extraction starts from exactly one of three kinds of input:
//! - a path to a readable file on the local filesystem
//! - a remote URI, fetched by the engine itself
//! - an open byte stream, fed to the engine over stdin
//!
//! [`Source::classify`] performs the classification once, up front. The result
//! never changes afterwards.

use std::borrow::Cow;
use std::fmt;
use std::fs::{self, File};
use std::io::{self, Cursor, Read};
use std::path::{Path, PathBuf};

use url::Url;

use crate::error::{Result, YomuError};

/// Something a caller can hand to [`Source::classify`].
pub enum Input<'a> {
    /// A path or a URI; the filesystem is checked first.
    Str(String),
    /// A filesystem path. Never interpreted as a URI.
    Path(PathBuf),
    /// An open readable handle. Ownership stays with the caller when a
    /// `&mut` reference is passed.
    Reader(Box<dyn Read + Send + 'a>),
    /// Raw document bytes, read as an in-memory stream.
    Bytes(Vec<u8>),
}

impl<'a> Input<'a> {
    /// Wrap any readable handle.
    pub fn reader<R: Read + Send + 'a>(reader: R) -> Self {
        Input::Reader(Box::new(reader))
    }
}

impl From<&str> for Input<'_> {
    fn from(s: &str) -> Self {
        Input::Str(s.to_string())
    }
}

impl From<String> for Input<'_> {
    fn from(s: String) -> Self {
        Input::Str(s)
    }
}

impl From<&Path> for Input<'_> {
    fn from(p: &Path) -> Self {
        Input::Path(p.to_path_buf())
    }
}

impl From<PathBuf> for Input<'_> {
    fn from(p: PathBuf) -> Self {
        Input::Path(p)
    }
}

impl From<&[u8]> for Input<'_> {
    fn from(bytes: &[u8]) -> Self {
        Input::Bytes(bytes.to_vec())
    }
}

impl From<Vec<u8>> for Input<'_> {
    fn from(bytes: Vec<u8>) -> Self {
        Input::Bytes(bytes)
    }
}

impl From<Cow<'_, [u8]>> for Input<'_> {
    fn from(bytes: Cow<'_, [u8]>) -> Self {
        Input::Bytes(bytes.into_owned())
    }
}

/// A classified document source.
pub enum Source<'a> {
    /// A readable file. The engine opens it itself.
    Path(PathBuf),
    /// A remote document. The engine fetches it itself.
    Uri(Url),
    /// An open stream whose bytes are piped to the engine.
    Stream(Box<dyn Read + Send + 'a>),
}

impl<'a> Source<'a> {
    /// Classify an input into exactly one source kind.
    pub fn classify(input: impl Into<Input<'a>>) -> Result<Self> {
        match input.into() {
            Input::Str(s) => classify_str(s),
            Input::Path(path) => match fs::metadata(&path) {
                Ok(meta) => readable_file(path, meta),
                Err(source) => Err(YomuError::FileNotFound { path, source }),
            },
            Input::Reader(reader) => Ok(Source::Stream(reader)),
            Input::Bytes(bytes) => Ok(Source::Stream(Box::new(Cursor::new(bytes)))),
        }
    }

    /// Build a stream source from any readable handle.
    pub fn from_reader<R: Read + Send + 'a>(reader: R) -> Self {
        Source::Stream(Box::new(reader))
    }

    pub fn is_path(&self) -> bool {
        matches!(self, Source::Path(_))
    }

    pub fn is_uri(&self) -> bool {
        matches!(self, Source::Uri(_))
    }

    pub fn is_stream(&self) -> bool {
        matches!(self, Source::Stream(_))
    }

    /// Short description for log lines. Stream contents are never included.
    pub fn describe(&self) -> String {
        match self {
            Source::Path(path) => format!("path {}", path.display()),
            Source::Uri(uri) => format!("uri {}", uri),
            Source::Stream(_) => "stream".to_string(),
        }
    }
}

impl fmt::Debug for Source<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::Path(path) => f.debug_tuple("Path").field(path).finish(),
            Source::Uri(uri) => f.debug_tuple("Uri").field(&uri.as_str()).finish(),
            Source::Stream(_) => f.write_str("Stream(..)"),
        }
    }
}

fn classify_str<'a>(s: String) -> Result<Source<'a>> {
    if s.trim().is_empty() {
        return Err(YomuError::InvalidSource("empty path or URI".to_string()));
    }
    if s.contains('\0') {
        return Err(YomuError::InvalidSource(
            "path or URI contains a NUL byte".to_string(),
        ));
    }

    // Existing files win over URI parsing, so "c:/docs/a.doc" stays a path.
    let not_found = match fs::metadata(&s) {
        Ok(meta) => return readable_file(PathBuf::from(s), meta),
        Err(e) => e,
    };

    if let Some(uri) = parse_uri(&s) {
        return Ok(Source::Uri(uri));
    }

    Err(YomuError::FileNotFound {
        path: PathBuf::from(s),
        source: not_found,
    })
}

fn readable_file<'a>(path: PathBuf, meta: fs::Metadata) -> Result<Source<'a>> {
    if !meta.is_file() {
        return Err(YomuError::InvalidSource(format!(
            "{} is not a regular file",
            path.display()
        )));
    }
    match File::open(&path) {
        Ok(_) => Ok(Source::Path(path)),
        Err(source) => Err(YomuError::FileNotFound { path, source }),
    }
}

/// Accept absolute, hierarchical URIs such as `http://host/doc.docx`.
///
/// Single-letter schemes are drive letters, not URIs.
fn parse_uri(s: &str) -> Option<Url> {
    let uri = Url::parse(s).ok()?;
    (uri.scheme().len() > 1 && !uri.cannot_be_a_base()).then_some(uri)
}

/// Drain a stream into memory.
pub(crate) fn read_stream(reader: &mut (dyn Read + Send + '_)) -> io::Result<Vec<u8>> {
    let mut data = Vec::new();
    reader.read_to_end(&mut data)?;
    Ok(data)
}
