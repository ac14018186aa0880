//! CLI for manual fixture runs
//!
//! Usage: cargo run -p fixture-runner --bin runner -- --fork --thread foo bar

use std::ffi::OsString;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use env_logger::Env;
use fixture_runner::{greetings, run_and_verify, Request};

/// Run the hello fixture and check its output.
#[derive(Parser)]
struct Cli {
    /// Fixture executable [default: `hello` next to this binary]
    #[arg(long)]
    exe: Option<PathBuf>,

    /// Ask the fixture to fork a child
    #[arg(long)]
    fork: bool,

    /// Ask the fixture to spawn and join a thread
    #[arg(long)]
    thread: bool,

    /// The fixture was built without thread support and ignores `--thread`
    #[arg(long)]
    no_thread_support: bool,

    /// Extra arguments passed through to the fixture
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    args: Vec<OsString>,
}

fn default_exe() -> Result<PathBuf> {
    let runner = std::env::current_exe().context("Failed to locate runner executable")?;
    let dir = runner
        .parent()
        .context("Runner executable has no parent directory")?;
    Ok(dir.join("hello"))
}

fn main() {
    env_logger::Builder::from_env(Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let exe = match cli.exe {
        Some(exe) => exe,
        None => match default_exe() {
            Ok(exe) => exe,
            Err(e) => {
                eprintln!("❌ {:#}", e);
                std::process::exit(1);
            }
        },
    };

    let request = Request {
        fork: cli.fork,
        thread: cli.thread,
        extra_args: cli.args,
        thread_support: !cli.no_thread_support,
    };

    println!("🚀 Running fixture: {} {:?}", exe.display(), request.args());

    match run_and_verify(&exe, &request) {
        Ok(run) => {
            println!("✅ Fixture output matched");
            for greeting in [greetings::HELLO_WORLD, greetings::HELLO_FORK, greetings::HELLO_THREAD] {
                let count = run.count_pattern(greeting);
                if count > 0 {
                    println!("✅ Found {:?} x{}", greeting.trim_end(), count);
                }
            }
        }
        Err(e) => {
            eprintln!("❌ Fixture check failed: {:#}", e);
            std::process::exit(1);
        }
    }
}
