//! Async engine runner on tokio. Same contract as the blocking runner,
//! including the process group kill on timeout.

use std::process::Stdio;
use std::time::Duration;

use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{debug, warn};

use crate::error::{Result, YomuError};

use super::command::Invocation;
#[cfg(unix)]
use super::process::kill_group;
use super::process::{execution_error, launch_error, stdin_mode};

/// Run the engine to completion and return its stdout.
///
/// Dropping the returned future kills the engine.
pub async fn run(invocation: &Invocation<'_>, timeout: Option<Duration>) -> Result<Vec<u8>> {
    let program = invocation.program();
    debug!("Running {}", invocation);

    let mut command = Command::new(program);
    command
        .args(&invocation.args)
        .stdin(stdin_mode(invocation))
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);
    if timeout.is_some() {
        isolate(&mut command);
    }
    let mut child = command
        .spawn()
        .map_err(|source| launch_error(program, source))?;
    let pid = child.id();

    let stdin = child.stdin.take();
    let data = invocation.stdin;

    let write = async move {
        if let (Some(mut pipe), Some(data)) = (stdin, data) {
            pipe.write_all(data).await?;
            pipe.shutdown().await?;
        }
        Ok::<_, std::io::Error>(())
    };
    let session = async { tokio::join!(write, child.wait_with_output()) };

    let (written, output) = match timeout {
        Some(limit) => match tokio::time::timeout(limit, session).await {
            Ok(finished) => finished,
            Err(_) => {
                warn!("{} timed out after {:?}, killing it", program.display(), limit);
                kill_isolated(pid);
                return Err(YomuError::Timeout {
                    program: program.to_path_buf(),
                    after: limit,
                });
            }
        },
        None => session.await,
    };

    let output = output?;
    if !output.status.success() {
        return Err(execution_error(program, output.status.code(), &output.stderr));
    }

    if let Err(e) = written {
        if e.kind() != std::io::ErrorKind::BrokenPipe {
            return Err(e.into());
        }
        debug!("Engine closed stdin early: {}", e);
    }

    debug!("Engine wrote {} bytes", output.stdout.len());
    Ok(output.stdout)
}

#[cfg(unix)]
fn isolate(command: &mut Command) {
    command.process_group(0);
}

#[cfg(not(unix))]
fn isolate(_command: &mut Command) {}

/// The timed-out future has already dropped (and killed) the engine itself;
/// this takes down anything it forked.
#[cfg(unix)]
fn kill_isolated(pid: Option<u32>) {
    if let Some(pid) = pid {
        kill_group(pid);
    }
}

#[cfg(not(unix))]
fn kill_isolated(_pid: Option<u32>) {}
