//! Locating the Java runtime that hosts the engine.

use std::env;
use std::path::{Path, PathBuf};

/// Environment variable naming the Java installation root.
pub const JAVA_HOME_VAR: &str = "JAVA_HOME";

/// Name of the Java launcher.
pub const JAVA_BINARY: &str = "java";

/// Resolve the Java launcher for a given installation root.
///
/// With a root the launcher is `<root>/bin/java`; without one the bare name is
/// returned and resolved through `PATH` at spawn time.
pub fn java_command(java_home: Option<&Path>) -> PathBuf {
    match java_home {
        Some(home) if !home.as_os_str().is_empty() => home.join("bin").join(JAVA_BINARY),
        _ => PathBuf::from(JAVA_BINARY),
    }
}

/// Read `JAVA_HOME` from the environment. An empty value counts as unset.
///
/// Not cached: each extraction looks the variable up again.
pub fn java_home_from_env() -> Option<PathBuf> {
    env::var_os(JAVA_HOME_VAR)
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
}

/// Find an executable: bare names through `PATH`, anything else by existence.
pub fn locate(program: &Path) -> Option<PathBuf> {
    if program.components().count() == 1 {
        which::which(program).ok()
    } else if program.is_file() {
        Some(program.to_path_buf())
    } else {
        None
    }
}
