//! `hello`: print a greeting, optionally from a forked child and a thread too.
//!
//! Usage: hello [--fork] [--thread] [anything else is ignored]

use env_logger::Env;
use hello_fixture::{run, Flags};

fn main() {
    // Logging goes to stderr and stays off unless RUST_LOG asks for it, so a
    // harness sees exactly the greetings.
    env_logger::Builder::from_env(Env::default().default_filter_or("off")).init();

    if let Err(e) = run(Flags::from_env()) {
        log::error!("fixture failure: {}", e);
        std::process::abort();
    }
}
