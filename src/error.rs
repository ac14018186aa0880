use std::io;

use nix::errno::Errno;
use nix::sys::signal::Signal;
use nix::unistd::Pid;
use thiserror::Error;

/// Everything that can go wrong in the fixture. All of it is fatal.
#[derive(Debug, Error)]
pub enum FixtureError {
    #[error("failed to write to stdout: {0}")]
    Write(#[source] io::Error),

    #[error("failed to flush stdout before fork: {0}")]
    Flush(#[source] io::Error),

    #[error("fork failed: {0}")]
    Fork(#[source] Errno),

    #[error("waitpid failed: {0}")]
    Wait(#[source] Errno),

    #[error("waitpid returned pid {actual:?}, expected {expected}")]
    PidMismatch { expected: Pid, actual: Option<Pid> },

    #[error("child {pid} exited with status {code}")]
    ChildExited { pid: Pid, code: i32 },

    #[error("child {pid} was killed by {signal}")]
    ChildSignaled { pid: Pid, signal: Signal },

    #[error("child {pid} reported an unexpected wait status")]
    UnexpectedStatus { pid: Pid },

    #[error("failed to spawn worker thread: {0}")]
    Spawn(#[source] io::Error),

    #[error("worker thread panicked")]
    Join,
}
