//! Blocking engine runner.
//!
//! stdin is fed from its own thread while stdout and stderr are drained on two
//! more, so the engine can interleave reading and writing without either side
//! stalling on a full pipe.
//!
//! With a timeout armed the engine leads its own process group, and expiry
//! kills the whole group. Launchers that fork the JVM instead of exec'ing it
//! would otherwise keep the pipes open and hold the call past its deadline.

use std::io::{self, Read, Write};
#[cfg(unix)]
use std::os::unix::process::CommandExt;
use std::path::Path;
use std::process::{Child, ChildStdin, Command, ExitStatus, Stdio};
use std::thread::{self, ScopedJoinHandle};
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use crate::error::{Result, YomuError};

use super::command::Invocation;

/// How often to check on the engine while a timeout is armed.
const POLL_INTERVAL: Duration = Duration::from_millis(25);

/// Lines of stderr kept in execution errors.
const STDERR_LINES: usize = 5;

/// Run the engine to completion and return its stdout.
pub fn run(invocation: &Invocation<'_>, timeout: Option<Duration>) -> Result<Vec<u8>> {
    let program = invocation.program();
    debug!("Running {}", invocation);

    let mut command = Command::new(program);
    command
        .args(&invocation.args)
        .stdin(stdin_mode(invocation))
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());
    if timeout.is_some() {
        isolate(&mut command);
    }
    let mut child = command
        .spawn()
        .map_err(|source| launch_error(program, source))?;

    let stdin = child.stdin.take();
    let stdout = child.stdout.take();
    let stderr = child.stderr.take();
    let data = invocation.stdin;

    let (status, stdout, stderr, written) = thread::scope(|scope| {
        let writer = scope.spawn(move || feed(stdin, data));
        let out_reader = scope.spawn(move || drain(stdout));
        let err_reader = scope.spawn(move || drain(stderr));

        let status = wait(&mut child, program, timeout);
        (status, join(out_reader), join(err_reader), join(writer))
    });

    let status = status?;
    if !status.success() {
        let stderr = stderr.unwrap_or_default();
        return Err(execution_error(program, status.code(), &stderr));
    }

    if let Err(e) = written {
        if e.kind() != io::ErrorKind::BrokenPipe {
            return Err(e.into());
        }
        debug!("Engine closed stdin early: {}", e);
    }

    let stdout = stdout?;
    debug!("Engine wrote {} bytes", stdout.len());
    Ok(stdout)
}

pub(super) fn stdin_mode(invocation: &Invocation<'_>) -> Stdio {
    if invocation.stdin.is_some() {
        Stdio::piped()
    } else {
        Stdio::null()
    }
}

pub(super) fn launch_error(program: &Path, source: io::Error) -> YomuError {
    if source.kind() == io::ErrorKind::NotFound {
        warn!(
            "{} not found (install Java or set JAVA_HOME)",
            program.display()
        );
    }
    YomuError::EngineLaunch {
        program: program.to_path_buf(),
        source,
    }
}

pub(super) fn execution_error(program: &Path, code: Option<i32>, stderr: &[u8]) -> YomuError {
    let stderr = String::from_utf8_lossy(stderr);
    let summary = stderr
        .lines()
        .filter(|line| !line.trim().is_empty())
        .take(STDERR_LINES)
        .collect::<Vec<_>>()
        .join("\n");
    warn!("{} exited with {:?}: {}", program.display(), code, summary);
    YomuError::EngineExecution {
        program: program.to_path_buf(),
        code,
        stderr: summary,
    }
}

/// Write the whole document, then drop the pipe to signal end of input.
fn feed(pipe: Option<ChildStdin>, data: Option<&[u8]>) -> io::Result<()> {
    if let (Some(mut pipe), Some(data)) = (pipe, data) {
        pipe.write_all(data)?;
        pipe.flush()?;
    }
    Ok(())
}

fn drain<R: Read>(pipe: Option<R>) -> io::Result<Vec<u8>> {
    let mut buf = Vec::new();
    if let Some(mut pipe) = pipe {
        pipe.read_to_end(&mut buf)?;
    }
    Ok(buf)
}

fn join<T>(handle: ScopedJoinHandle<'_, io::Result<T>>) -> io::Result<T> {
    handle
        .join()
        .unwrap_or_else(|_| Err(io::Error::other("engine pipe thread panicked")))
}

fn wait(child: &mut Child, program: &Path, timeout: Option<Duration>) -> Result<ExitStatus> {
    let Some(limit) = timeout else {
        return Ok(child.wait()?);
    };

    let started = Instant::now();
    loop {
        match child.try_wait() {
            Ok(Some(status)) => return Ok(status),
            Ok(None) if started.elapsed() >= limit => {
                warn!("{} timed out after {:?}, killing it", program.display(), limit);
                kill(child);
                return Err(YomuError::Timeout {
                    program: program.to_path_buf(),
                    after: limit,
                });
            }
            Ok(None) => thread::sleep(POLL_INTERVAL),
            Err(e) => {
                kill(child);
                return Err(e.into());
            }
        }
    }
}

#[cfg(unix)]
fn isolate(command: &mut Command) {
    command.process_group(0);
}

#[cfg(not(unix))]
fn isolate(_command: &mut Command) {}

/// Kill the engine's process group. Only valid for engines spawned with
/// [`isolate`], whose pid is also their group id.
#[cfg(unix)]
pub(super) fn kill_group(pid: u32) {
    let Ok(pgid) = libc::pid_t::try_from(pid) else {
        return;
    };
    if unsafe { libc::kill(-pgid, libc::SIGKILL) } != 0 {
        debug!(
            "Failed to kill engine process group {}: {}",
            pgid,
            io::Error::last_os_error()
        );
    }
}

fn kill(child: &mut Child) {
    #[cfg(unix)]
    kill_group(child.id());
    if let Err(e) = child.kill() {
        debug!("Failed to kill engine: {}", e);
    }
    let _ = child.wait();
}
