//! End-to-end checks of the `hello` binary
//!
//! Each test launches the real fixture the way an external harness would and
//! compares stdout byte for byte.

use std::os::fd::{FromRawFd, OwnedFd};
use std::os::unix::process::ExitStatusExt;
use std::path::Path;
use std::process::{Command, Stdio};

use fixture_runner::{run_and_verify, FixtureRun, Request};
#[cfg(feature = "fault-injection")]
use fixture_runner::verify;
use pretty_assertions::assert_eq;

fn hello() -> &'static Path {
    Path::new(env!("CARGO_BIN_EXE_hello"))
}

/// Tell the harness whether this build of the fixture knows `--thread`.
fn request() -> Request {
    Request::new().thread_support(cfg!(feature = "thread"))
}

fn check(request: Request) -> FixtureRun {
    match run_and_verify(hello(), &request) {
        Ok(run) => run,
        Err(e) => panic!("fixture check failed for {:?}: {:#}", request, e),
    }
}

#[test]
fn no_flags_prints_world_only() {
    let run = check(request());
    assert_eq!(run.stdout_str(), "Hello, World!\n");
    assert_eq!(run.exit_code(), Some(0));
}

#[test]
fn fork_prints_child_greeting() {
    let run = check(request().fork());
    assert_eq!(run.stdout_str(), "Hello, World!\nHello, Fork!\n");
    run.assert_count("Hello, Fork!", 1);
}

#[cfg(feature = "thread")]
#[test]
fn thread_prints_worker_greeting() {
    let run = check(request().thread());
    assert_eq!(run.stdout_str(), "Hello, World!\nHello, Thread!\n");
}

#[cfg(feature = "thread")]
#[test]
fn fork_then_thread_in_order() {
    let run = check(request().fork().thread());
    assert_eq!(
        run.stdout_str(),
        "Hello, World!\nHello, Fork!\nHello, Thread!\n"
    );
}

#[cfg(not(feature = "thread"))]
#[test]
fn thread_flag_ignored_without_support() {
    let run = check(request().thread());
    assert_eq!(run.stdout_str(), "Hello, World!\n");
}

#[test]
fn unknown_flags_are_ignored() {
    let run = check(request().arg("--bogus").arg("-x").arg("--forks"));
    assert_eq!(run.stdout_str(), "Hello, World!\n");
}

#[test]
fn extra_words_are_ignored() {
    check(request().arg("foo").arg("bar").arg("baz"));
    check(request().fork().arg("quzzy").arg("xyux"));
}

#[test]
fn long_argument_is_ignored() {
    check(request().arg("A".repeat(2000)));
}

#[test]
fn flag_order_and_repetition_do_not_matter() {
    let run = check(request().arg("--fork").arg("foo").arg("--fork"));
    assert_eq!(run.stdout_str(), "Hello, World!\nHello, Fork!\n");
}

#[test]
fn runs_through_symlink() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let link = dir.path().join("hello2");
    std::os::unix::fs::symlink(hello(), &link).expect("create symlink");

    let run = run_and_verify(&link, &request().fork()).expect("fixture via symlink");
    assert_eq!(run.stdout_str(), "Hello, World!\nHello, Fork!\n");
}

#[test]
fn logging_stays_on_stderr() {
    let output = Command::new(hello())
        .arg("--fork")
        .env("RUST_LOG", "debug")
        .output()
        .expect("spawn fixture");

    assert!(output.status.success());
    assert_eq!(
        String::from_utf8_lossy(&output.stdout),
        "Hello, World!\nHello, Fork!\n"
    );
    assert!(String::from_utf8_lossy(&output.stderr).contains("forked child"));
}

#[test]
fn silent_by_default() {
    let run = check(request().fork());
    assert_eq!(run.stderr_str(), "");
}

#[cfg(feature = "fault-injection")]
#[test]
fn failing_child_aborts_parent() {
    let run = Command::new(hello())
        .arg("--fork")
        .env("HELLO_CHILD_EXIT_CODE", "3")
        .output()
        .expect("spawn fixture");
    let run = FixtureRun { output: run };

    assert!(run.aborted(), "status: {:?}", run.output.status);
    assert_eq!(run.stdout_str(), "Hello, World!\nHello, Fork!\n");
    assert!(verify(&run, &request().fork()).is_err());
}

#[cfg(feature = "fault-injection")]
#[test]
fn clean_child_passes_with_fault_injection_built_in() {
    check(request().fork());
}

#[test]
fn write_failure_aborts() {
    // Hand the fixture a pipe nobody reads from, so its first write fails.
    let mut fds = [0; 2];
    assert_eq!(unsafe { libc::pipe(fds.as_mut_ptr()) }, 0);
    let read_end = unsafe { OwnedFd::from_raw_fd(fds[0]) };
    let write_end = unsafe { OwnedFd::from_raw_fd(fds[1]) };
    drop(read_end);

    let status = Command::new(hello())
        .stdout(Stdio::from(write_end))
        .status()
        .expect("spawn fixture");

    assert_eq!(status.signal(), Some(libc::SIGABRT), "status: {:?}", status);
}
