//! `bl`: store reusable snippets and stacks, then add them to any project.
//!
//! Exit codes:
//! - 0: success
//! - 1: error
//! - 2: cancelled by the user

mod cli;
mod commands;
mod prompt;

use crate::cli::Cli;
use boiler_library::error::ErrorKind;
use clap::Parser;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match commands::run(cli.command, cli.config.as_deref()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) if *err == ErrorKind::UserCancelled => {
            eprintln!("Cancelled");
            ExitCode::from(2)
        },
        Err(err) => {
            eprintln!("Error: {}", *err);
            if cli.verbose > 0 {
                eprintln!("{err:?}");
            }
            ExitCode::FAILURE
        },
    }
}

/// `RUST_LOG` wins; otherwise each `-v` raises the level one step from `warn`.
fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).with_writer(std::io::stderr).init();
}
