//! wext - build and package browser extensions per target browser.
//!
//! Entry point: parse arguments, initialize logging, dispatch the command,
//! and print the failing error chain (stage name included) on stderr.

use std::process::ExitCode;

use clap::Parser;
use wext_cli::{cli, commands, logger};

#[tokio::main]
async fn main() -> ExitCode {
    let args = cli::Cli::parse();
    logger::init_logger(args.verbose, args.quiet, args.no_color);

    let result = match args.command {
        cli::Command::Build(build_args) => commands::build_execute(build_args).await,
        cli::Command::Watch(watch_args) => commands::watch_execute(watch_args).await,
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            let mut source = std::error::Error::source(&err);
            while let Some(cause) = source {
                eprintln!("  caused by: {cause}");
                source = cause.source();
            }
            ExitCode::FAILURE
        }
    }
}
