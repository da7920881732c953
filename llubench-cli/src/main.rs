//! ## llubench
//! **Linked-list traversal micro-benchmark**
//!
//! Drives a set of growing linked lists through repeated full traversals to
//! approximate the cache and TLB behaviour of pointer-chasing programs such
//! as Health. Progress and the final allocation count go to stdout; logs go
//! to stderr.

use std::io;
use std::process::ExitCode;

use clap::{CommandFactory, Parser};
use llubench_telemetry::EventLogger;
use tracing::error;

mod commands;
mod error;

use commands::Cli;

fn main() -> ExitCode {
    EventLogger::init();
    let cli = Cli::parse();

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match commands::run_benchmark(&cli, &mut out) {
        Ok(_) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err}");
            if err.is_usage() {
                let _ = Cli::command().write_help(&mut io::stderr());
            }
            ExitCode::from(err.exit_code())
        }
    }
}
