//! Hello fixture runner
//!
//! Launches the `hello` fixture the way an external tracer's test suite does:
//! with the requested flags plus arbitrary extra arguments. Captures its
//! output and checks it byte for byte.

use std::ffi::OsString;
use std::os::unix::process::ExitStatusExt;
use std::path::Path;
use std::process::{Command, Output, Stdio};

use anyhow::{Context, Result};
use log::debug;

/// Lines the fixture prints, newline included
pub mod greetings {
    pub const HELLO_WORLD: &str = "Hello, World!\n";
    pub const HELLO_FORK: &str = "Hello, Fork!\n";
    pub const HELLO_THREAD: &str = "Hello, Thread!\n";
}

pub const FORK_FLAG: &str = "--fork";
pub const THREAD_FLAG: &str = "--thread";

/// What to ask the fixture to do
#[derive(Debug, Clone)]
pub struct Request {
    pub fork: bool,
    pub thread: bool,
    pub extra_args: Vec<OsString>,
    /// Whether the fixture under test was built with thread support. A
    /// fixture without it ignores `--thread`.
    pub thread_support: bool,
}

impl Default for Request {
    fn default() -> Self {
        Self {
            fork: false,
            thread: false,
            extra_args: Vec::new(),
            thread_support: true,
        }
    }
}

impl Request {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn thread_support(mut self, supported: bool) -> Self {
        self.thread_support = supported;
        self
    }

    pub fn fork(mut self) -> Self {
        self.fork = true;
        self
    }

    pub fn thread(mut self) -> Self {
        self.thread = true;
        self
    }

    pub fn arg(mut self, arg: impl Into<OsString>) -> Self {
        self.extra_args.push(arg.into());
        self
    }

    /// Arguments passed to the fixture: the flags first, then the extras.
    pub fn args(&self) -> Vec<OsString> {
        let mut args = Vec::with_capacity(self.extra_args.len() + 2);
        if self.fork {
            args.push(OsString::from(FORK_FLAG));
        }
        if self.thread {
            args.push(OsString::from(THREAD_FLAG));
        }
        args.extend(self.extra_args.iter().cloned());
        args
    }

    /// True if the fixture will see `flag` anywhere in its arguments
    fn passes(&self, flag: &str) -> bool {
        self.args().iter().any(|arg| arg == flag)
    }

    /// Exact stdout a healthy fixture produces for this request. The fixture
    /// scans every argument, so flags hidden among the extras count too.
    pub fn expected_stdout(&self) -> String {
        let mut exp = String::from(greetings::HELLO_WORLD);
        if self.passes(FORK_FLAG) {
            exp.push_str(greetings::HELLO_FORK);
        }
        if self.thread_support && self.passes(THREAD_FLAG) {
            exp.push_str(greetings::HELLO_THREAD);
        }
        exp
    }
}

/// Result of one fixture run
pub struct FixtureRun {
    pub output: Output,
}

impl FixtureRun {
    /// Get stdout as a string
    pub fn stdout_str(&self) -> String {
        String::from_utf8_lossy(&self.output.stdout).into_owned()
    }

    /// Get stderr as a string
    pub fn stderr_str(&self) -> String {
        String::from_utf8_lossy(&self.output.stderr).into_owned()
    }

    pub fn exit_code(&self) -> Option<i32> {
        self.output.status.code()
    }

    /// True if the fixture died from SIGABRT, i.e. it hit a fatal failure
    pub fn aborted(&self) -> bool {
        self.output.status.signal() == Some(libc::SIGABRT)
    }

    /// Count occurrences of a pattern in stdout
    pub fn count_pattern(&self, pattern: &str) -> usize {
        self.stdout_str().matches(pattern).count()
    }

    /// Assert that a pattern appears exactly N times
    pub fn assert_count(&self, pattern: &str, expected: usize) {
        let actual = self.count_pattern(pattern);
        assert_eq!(
            actual, expected,
            "expected {} occurrences of '{}', found {} in:\n{}",
            expected, pattern, actual, self.stdout_str()
        );
    }
}

/// Run the fixture at `exe` and capture everything it prints.
///
/// Only fails if the process could not be started; judging the output is
/// left to [`verify`].
pub fn run_fixture(exe: &Path, request: &Request) -> Result<FixtureRun> {
    let args = request.args();
    debug!("running {} with {:?}", exe.display(), args);

    let output = Command::new(exe)
        .args(&args)
        .stdin(Stdio::null())
        .output()
        .with_context(|| format!("Failed to spawn fixture {}", exe.display()))?;

    debug!("fixture finished: {:?}", output.status);
    Ok(FixtureRun { output })
}

/// Check a run against what the request should have produced
pub fn verify(run: &FixtureRun, request: &Request) -> Result<()> {
    if run.aborted() {
        anyhow::bail!(
            "Fixture aborted (fatal fixture failure)\nSTDOUT:\n{}\nSTDERR:\n{}",
            run.stdout_str(),
            run.stderr_str()
        );
    }

    let expected = request.expected_stdout();
    if run.output.stdout != expected.as_bytes() {
        anyhow::bail!(
            "Unexpected fixture output\nEXPECTED:\n{}\nACTUAL:\n{}",
            expected,
            run.stdout_str()
        );
    }

    if !run.output.status.success() {
        anyhow::bail!(
            "Fixture failed with exit code: {:?}\nSTDERR:\n{}",
            run.exit_code(),
            run.stderr_str()
        );
    }

    Ok(())
}

/// Convenience wrapper: run, then verify
pub fn run_and_verify(exe: &Path, request: &Request) -> Result<FixtureRun> {
    let run = run_fixture(exe, request)?;
    verify(&run, request)?;
    Ok(run)
}
