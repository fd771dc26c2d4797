//! Thin entry point: parse arguments, initialize logging, delegate to the
//! library crate, and turn errors into a process exit code.

use std::process::ExitCode;

use clap::Parser;
use empdb_server::config::Args;

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();

    match empdb_server::run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{err:#}");
            ExitCode::FAILURE
        }
    }
}
