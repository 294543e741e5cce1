//! Shared fixtures: a stand-in engine and sample documents.
//!
//! The engine is a shell script installed as `<tmp>/jdk/bin/java`. It accepts
//! the same command line as `java -jar tika-app.jar`, reads the document from
//! its path/URI argument or stdin, and answers in Tika's output formats.
//! Documents containing `FAIL` make it exit non-zero. `SLEEP` makes it hang
//! itself; `STALL` makes it wait on a forked child that holds its pipes.

#![allow(dead_code)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use tempfile::TempDir;
use yomu::{Extractor, ExtractorConfig};

pub const SENTENCE: &str = "The quick brown fox jumped over the lazy cat.";

const FAKE_ENGINE: &str = r#"#!/bin/sh
while [ "$#" -gt 0 ] && [ "$1" != "-jar" ]; do shift; done
jar="$2"
mode="$3"
shift 3

if [ "$#" -gt 0 ]; then
  case "$1" in
    *://*) kind="uri"; content="remote document at $1" ;;
    *) kind="path"; content="$(cat "$1")" || exit 66 ;;
  esac
else
  kind="stdin"
  content="$(cat)"
fi

case "$content" in
  *FAIL*) echo "org.apache.tika.exception.TikaException: cannot parse" >&2; exit 1 ;;
  *SLEEP*) exec sleep 5 ;;
  *STALL*) sleep 5; exit 0 ;;
esac

case "$mode" in
  -t) printf '%s\n' "$content" ;;
  -h) printf '<html><body><p>%s</p></body></html>\n' "$content" ;;
  -m)
    printf 'Content-Type: application/vnd.apple.pages\n'
    printf 'dc:title: problem: test\n'
    printf 'X-Parsed-By: org.apache.tika.parser.DefaultParser\n'
    printf 'not a metadata line\n'
    printf 'Content-Length: %s\n' "${#content}"
    printf 'X-Yomu-Input: %s\n' "$kind"
    printf 'X-Yomu-Jar: %s\n' "$jar"
    ;;
  *) echo "unknown switch $mode" >&2; exit 2 ;;
esac
"#;

pub struct Fixture {
    dir: TempDir,
}

impl Fixture {
    fn create() -> Self {
        let dir = tempfile::tempdir().expect("create fixture dir");
        install_engine(&dir.path().join("jdk"));

        let samples = dir.path().join("samples");
        fs::create_dir_all(&samples).unwrap();
        fs::write(samples.join("sample.pages"), SENTENCE).unwrap();
        fs::write(samples.join("sample filename with spaces.pages"), SENTENCE).unwrap();
        fs::write(samples.join("broken.doc"), "FAIL").unwrap();
        fs::write(dir.path().join("tika-app.jar"), b"").unwrap();

        Self { dir }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn java_home(&self) -> PathBuf {
        self.dir.path().join("jdk")
    }

    pub fn jar(&self) -> PathBuf {
        self.dir.path().join("tika-app.jar")
    }

    pub fn sample(&self, name: &str) -> PathBuf {
        self.dir.path().join("samples").join(name)
    }

    pub fn config(&self) -> ExtractorConfig {
        ExtractorConfig::base_default()
            .with_java_home(self.java_home())
            .with_jar_path(self.jar())
    }

    pub fn extractor(&self) -> Extractor {
        Extractor::new(self.config())
    }
}

/// Write the engine script under `<java_home>/bin/java`.
pub fn install_engine(java_home: &Path) {
    let bin = java_home.join("bin");
    fs::create_dir_all(&bin).unwrap();
    let java = bin.join("java");
    fs::write(&java, FAKE_ENGINE).unwrap();
    fs::set_permissions(&java, fs::Permissions::from_mode(0o755)).unwrap();
}

/// The shared fixture. Every test that spawns a process must call this first,
/// so the script is never exec'd while another thread still holds it open for
/// writing.
pub fn fixture() -> &'static Fixture {
    static FIXTURE: OnceLock<Fixture> = OnceLock::new();
    FIXTURE.get_or_init(Fixture::create)
}
