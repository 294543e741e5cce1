//! Building the engine command line.

use std::ffi::{OsStr, OsString};
use std::fmt;
use std::path::{Path, PathBuf};

use crate::config::ExtractorConfig;

use super::ExtractionMode;

/// Where the engine reads the document from.
#[derive(Debug, Clone, Copy)]
pub enum Target<'d> {
    /// A path or URI passed as the final argument.
    Location(&'d OsStr),
    /// Document bytes written to the engine's stdin.
    Stdin(&'d [u8]),
}

/// A fully resolved engine invocation:
/// `<java> [java options] -jar <jar> <flag> [<path-or-uri>]`.
#[derive(Debug, Clone)]
pub struct Invocation<'d> {
    pub program: PathBuf,
    pub args: Vec<OsString>,
    pub stdin: Option<&'d [u8]>,
}

impl<'d> Invocation<'d> {
    pub fn build(
        java: PathBuf,
        config: &ExtractorConfig,
        mode: ExtractionMode,
        target: Target<'d>,
    ) -> Self {
        let mut args: Vec<OsString> = config.java_options.iter().map(OsString::from).collect();
        args.push("-jar".into());
        args.push(config.jar_path.clone().into_os_string());
        args.push(mode.flag().into());

        let stdin = match target {
            Target::Location(location) => {
                args.push(location.to_os_string());
                None
            }
            Target::Stdin(data) => Some(data),
        };

        Self {
            program: java,
            args,
            stdin,
        }
    }

    pub fn program(&self) -> &Path {
        &self.program
    }
}

impl fmt::Display for Invocation<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program.display())?;
        for arg in &self.args {
            write!(f, " {}", arg.to_string_lossy())?;
        }
        if let Some(data) = self.stdin {
            write!(f, " < ({} bytes)", data.len())?;
        }
        Ok(())
    }
}
