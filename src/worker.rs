//! Thread step: one worker that prints its greeting, joined before returning

use std::io::{self, Write};
use std::thread;

use log::debug;

use crate::{greetings, FixtureError};

pub fn thread_step() -> Result<(), FixtureError> {
    let handle = thread::Builder::new()
        .name("hello-thread".into())
        .spawn(|| writeln!(io::stdout(), "{}", greetings::THREAD))
        .map_err(FixtureError::Spawn)?;
    debug!("spawned worker {:?}", handle.thread().id());

    handle
        .join()
        .map_err(|_| FixtureError::Join)?
        .map_err(FixtureError::Write)?;
    debug!("worker joined");
    Ok(())
}
