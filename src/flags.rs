//! Command-line flag scanning
//!
//! The fixture does not reject anything: harnesses pass arbitrary extra
//! arguments and expect them to be ignored. Every argument, including the
//! program name, is compared against the known flags.

use std::ffi::OsStr;

pub const FORK_FLAG: &str = "--fork";
pub const THREAD_FLAG: &str = "--thread";

/// Which optional steps to run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Flags {
    pub fork: bool,
    pub thread: bool,
}

impl Flags {
    /// Scan the current process arguments.
    pub fn from_env() -> Self {
        Self::from_args(std::env::args_os())
    }

    /// Scan an argument list. `--thread` is only honored when thread support
    /// is compiled in.
    pub fn from_args<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let mut flags = Flags::default();
        for arg in args {
            let arg = arg.as_ref();
            if arg == FORK_FLAG {
                flags.fork = true;
            }
            if cfg!(feature = "thread") && arg == THREAD_FLAG {
                flags.thread = true;
            }
        }
        flags
    }
}
