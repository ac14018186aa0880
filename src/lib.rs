//! Hello fixture
//!
//! A tiny program for external tracers and debuggers to attach to. It prints a
//! greeting and, depending on its flags, forks a child and joins a worker
//! thread, each of which prints its own greeting. Any failure along the way is
//! fatal: the binary aborts so the harness sees it.

use std::io::{self, Write};

use log::debug;

mod error;
mod flags;
mod fork;
#[cfg(feature = "thread")]
mod worker;

pub use error::FixtureError;
pub use flags::Flags;
pub use fork::{fork_step, reap};
#[cfg(feature = "thread")]
pub use worker::thread_step;

/// Lines printed by the fixture, without the trailing newline
pub mod greetings {
    pub const WORLD: &str = "Hello, World!";
    pub const FORK: &str = "Hello, Fork!";
    pub const THREAD: &str = "Hello, Thread!";
}

/// Run every step the flags ask for, in order.
///
/// Only the parent returns from here; a forked child exits inside
/// [`fork_step`].
pub fn run(flags: Flags) -> Result<(), FixtureError> {
    debug!("running with {:?}", flags);

    writeln!(io::stdout(), "{}", greetings::WORLD).map_err(FixtureError::Write)?;

    if flags.fork {
        fork_step()?;
    }

    #[cfg(feature = "thread")]
    if flags.thread {
        thread_step()?;
    }

    debug!("all steps complete");
    Ok(())
}
