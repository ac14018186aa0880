//! Fork step
//!
//! The parent flushes stdout, forks, and waits for exactly that child. The
//! child prints its greeting and leaves through `_exit` so it never runs the
//! parent's remaining steps or its exit handlers.

use std::io::{self, Write};

use log::debug;
use nix::sys::wait::{waitpid, WaitStatus};
use nix::unistd::{fork, ForkResult, Pid};

use crate::{greetings, FixtureError};

/// Exit code the child reports. Always 0 unless the `fault-injection`
/// feature is on and `HELLO_CHILD_EXIT_CODE` overrides it.
#[cfg(not(feature = "fault-injection"))]
fn child_exit_code() -> i32 {
    0
}

#[cfg(feature = "fault-injection")]
fn child_exit_code() -> i32 {
    std::env::var("HELLO_CHILD_EXIT_CODE")
        .ok()
        .and_then(|code| code.parse().ok())
        .unwrap_or(0)
}

pub fn fork_step() -> Result<(), FixtureError> {
    let exit_code = child_exit_code();

    // Anything still buffered would otherwise be written twice.
    io::stdout().flush().map_err(FixtureError::Flush)?;

    // SAFETY: the fixture is single-threaded here; the thread step only runs
    // after the child has been reaped, and the child only writes and exits.
    match unsafe { fork() }.map_err(FixtureError::Fork)? {
        ForkResult::Child => child_main(exit_code),
        ForkResult::Parent { child } => {
            debug!("forked child {}", child);
            reap(child)
        }
    }
}

fn child_main(exit_code: i32) -> ! {
    let mut stdout = io::stdout().lock();
    let status = match writeln!(stdout, "{}", greetings::FORK).and_then(|_| stdout.flush()) {
        Ok(()) => exit_code,
        Err(_) => 1,
    };
    _exit(status)
}

/// Leave the process without running exit handlers or unwinding.
fn _exit(status: i32) -> ! {
    // SAFETY: `_exit` is async-signal-safe and never returns.
    unsafe { libc::_exit(status) }
}

/// Wait for `child` and insist that it exited normally with status 0.
pub fn reap(child: Pid) -> Result<(), FixtureError> {
    let status = waitpid(child, None).map_err(FixtureError::Wait)?;
    debug!("waitpid({}) -> {:?}", child, status);

    if status.pid() != Some(child) {
        return Err(FixtureError::PidMismatch {
            expected: child,
            actual: status.pid(),
        });
    }

    match status {
        WaitStatus::Exited(_, 0) => Ok(()),
        WaitStatus::Exited(pid, code) => Err(FixtureError::ChildExited { pid, code }),
        WaitStatus::Signaled(pid, signal, _) => Err(FixtureError::ChildSignaled { pid, signal }),
        _ => Err(FixtureError::UnexpectedStatus { pid: child }),
    }
}
