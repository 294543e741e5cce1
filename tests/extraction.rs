//! End-to-end extraction against a stand-in engine.

#![cfg(unix)]

mod common;

use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::time::{Duration, Instant};

use common::{fixture, SENTENCE};
use yomu::{Document, Extracted, ExtractionMode, Extractor, Input, Source, YomuError};

#[test]
fn test_path_reads_text_and_metadata() {
    let fx = fixture();
    let path = fx.sample("sample.pages");

    let mut doc = Document::with_extractor(path.to_str().unwrap(), fx.extractor()).unwrap();
    assert!(doc.is_path());
    assert!(!doc.is_uri());
    assert!(!doc.is_stream());

    let text = doc.text().unwrap();
    assert!(text.contains(SENTENCE));
    assert_eq!(text, SENTENCE, "single trailing newline is stripped");

    let metadata = doc.metadata().unwrap();
    assert_eq!(metadata.get("Content-Type"), Some("application/vnd.apple.pages"));
    assert_eq!(metadata.get("X-Yomu-Input"), Some("path"));
    assert_eq!(
        metadata.get("X-Yomu-Jar"),
        Some(fx.jar().to_str().unwrap())
    );
}

#[test]
fn test_metadata_key_with_colon() {
    let fx = fixture();
    let mut doc = Document::with_extractor(fx.sample("sample.pages"), fx.extractor()).unwrap();

    let metadata = doc.metadata().unwrap();
    assert_eq!(metadata.get("dc:title"), Some("problem: test"));
    assert!(!metadata.contains_key("not a metadata line"));
}

#[test]
fn test_path_with_spaces() {
    let fx = fixture();
    let path = fx.sample("sample filename with spaces.pages");

    let mut doc = Document::with_extractor(path.to_str().unwrap(), fx.extractor()).unwrap();
    assert!(doc.is_path());
    assert!(doc.text().unwrap().contains(SENTENCE));
}

#[test]
fn test_uri_is_passed_to_engine() {
    let fx = fixture();
    let uri = "http://svn.apache.org/repos/asf/poi/trunk/test-data/document/sample.docx";

    let mut doc = Document::with_extractor(uri, fx.extractor()).unwrap();
    assert!(doc.is_uri());
    assert!(!doc.is_path());
    assert!(!doc.is_stream());

    assert_eq!(doc.text().unwrap(), format!("remote document at {}", uri));
    assert_eq!(doc.metadata().unwrap().get("X-Yomu-Input"), Some("uri"));
}

#[test]
fn test_stream_is_piped_and_left_open() {
    let fx = fixture();
    let mut file = File::open(fx.sample("sample.pages")).unwrap();

    {
        let mut doc = Document::with_extractor(Input::reader(&mut file), fx.extractor()).unwrap();
        assert!(doc.is_stream());
        assert!(!doc.is_path());
        assert!(!doc.is_uri());

        assert!(doc.text().unwrap().contains(SENTENCE));

        // A second accessor sees the same document.
        let metadata = doc.metadata().unwrap();
        assert_eq!(metadata.get("Content-Type"), Some("application/vnd.apple.pages"));
        assert_eq!(metadata.get("X-Yomu-Input"), Some("stdin"));
        assert_eq!(metadata.get("Content-Length"), Some("45"));
    }

    // The handle still belongs to us and is still usable.
    file.seek(SeekFrom::Start(0)).unwrap();
    let mut contents = String::new();
    file.read_to_string(&mut contents).unwrap();
    assert_eq!(contents, SENTENCE);
}

#[test]
fn test_raw_source_stream_is_consumed() {
    let fx = fixture();
    let extractor = fx.extractor();
    let mut source = Source::classify(SENTENCE.as_bytes()).unwrap();

    assert_eq!(extractor.text(&mut source).unwrap(), SENTENCE);
    assert_eq!(extractor.text(&mut source).unwrap(), "");
}

#[test]
fn test_read_bytes() {
    let fx = fixture();
    let data = std::fs::read(fx.sample("sample.pages")).unwrap();
    let extractor = fx.extractor();

    let text = extractor.read(ExtractionMode::Text, data.as_slice()).unwrap();
    assert!(text.as_text().unwrap().contains(SENTENCE));

    let metadata = extractor
        .read(ExtractionMode::Metadata, data)
        .unwrap()
        .into_metadata()
        .unwrap();
    assert_eq!(&metadata["Content-Type"], "application/vnd.apple.pages");
    assert_eq!(metadata.get("X-Yomu-Input"), Some("stdin"));
}

#[test]
fn test_read_path_input() {
    let fx = fixture();
    let extracted = fx
        .extractor()
        .read(ExtractionMode::Html, fx.sample("sample.pages"))
        .unwrap();
    assert_eq!(
        extracted,
        Extracted::Html(format!("<html><body><p>{}</p></body></html>", SENTENCE))
    );
}

#[test]
fn test_mimetype() {
    let fx = fixture();
    let mut doc = Document::with_extractor(fx.sample("sample.pages"), fx.extractor()).unwrap();
    let mime = doc.mimetype().unwrap().unwrap();
    assert_eq!(mime.essence_str(), "application/vnd.apple.pages");
}

#[test]
fn test_engine_failure_discards_output() {
    let fx = fixture();
    let mut doc = Document::with_extractor(fx.sample("broken.doc"), fx.extractor()).unwrap();

    match doc.text().unwrap_err() {
        YomuError::EngineExecution { code, stderr, .. } => {
            assert_eq!(code, Some(1));
            assert!(stderr.contains("TikaException"), "{}", stderr);
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[test]
fn test_missing_runtime() {
    let fx = fixture();
    let config = fx.config().with_java_home(fx.root().join("no-such-jdk"));
    let mut doc = Document::with_extractor(fx.sample("sample.pages"), Extractor::new(config)).unwrap();

    let err = doc.text().unwrap_err();
    assert!(matches!(err, YomuError::EngineLaunch { .. }), "{:?}", err);
    assert!(err.is_not_found());
}

#[test]
fn test_timeout() {
    let fx = fixture();
    let extractor = Extractor::new(fx.config().with_timeout(Duration::from_secs(1)));

    let err = extractor.read(ExtractionMode::Text, &b"SLEEP"[..]).unwrap_err();
    assert!(matches!(err, YomuError::Timeout { .. }), "{:?}", err);
}

#[test]
fn test_timeout_reaches_forked_children() {
    let fx = fixture();
    let extractor = Extractor::new(fx.config().with_timeout(Duration::from_millis(500)));

    let started = Instant::now();
    let err = extractor.read(ExtractionMode::Text, &b"STALL"[..]).unwrap_err();
    assert!(matches!(err, YomuError::Timeout { .. }), "{:?}", err);
    assert!(started.elapsed() < Duration::from_secs(3), "{:?}", started.elapsed());
}

#[tokio::test]
async fn test_async_timeout_reaches_forked_children() {
    let fx = fixture();
    let extractor = Extractor::new(fx.config().with_timeout(Duration::from_millis(500)));

    let started = Instant::now();
    let mut source = Source::classify(&b"STALL"[..]).unwrap();
    let err = extractor
        .extract_async(&mut source, ExtractionMode::Metadata)
        .await
        .unwrap_err();
    assert!(matches!(err, YomuError::Timeout { .. }), "{:?}", err);
    assert!(started.elapsed() < Duration::from_secs(3), "{:?}", started.elapsed());
}

#[test]
fn test_missing_file_never_reaches_engine() {
    let fx = fixture();
    let err = Document::with_extractor("test/sample/missing.pages", fx.extractor())
        .err()
        .unwrap();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_async_extraction() {
    let fx = fixture();
    let extractor = fx.extractor();

    let mut source = Source::classify(fx.sample("sample.pages")).unwrap();
    let text = extractor
        .extract_async(&mut source, ExtractionMode::Text)
        .await
        .unwrap();
    assert_eq!(text.as_text(), Some(SENTENCE));

    let mut source = Source::classify(SENTENCE.as_bytes()).unwrap();
    let metadata = extractor
        .extract_async(&mut source, ExtractionMode::Metadata)
        .await
        .unwrap()
        .into_metadata()
        .unwrap();
    assert_eq!(metadata.get("X-Yomu-Input"), Some("stdin"));
    assert_eq!(metadata.get("dc:title"), Some("problem: test"));
}

#[tokio::test]
async fn test_async_failure() {
    let fx = fixture();
    let mut source = Source::classify(fx.sample("broken.doc")).unwrap();
    let err = fx
        .extractor()
        .extract_async(&mut source, ExtractionMode::Metadata)
        .await
        .unwrap_err();
    assert!(matches!(err, YomuError::EngineExecution { code: Some(1), .. }));
}
