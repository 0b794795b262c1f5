use std::process::ExitCode;

use clap::Parser;
use quarry::cli::{Arguments, ExitStatus, logger::init_logger};

fn main() -> ExitCode {
    let args = Arguments::parse();
    init_logger(args.verbose());

    match quarry::cli::run_cli(args) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Error: {:#}", err);
            ExitStatus::Error.into()
        }
    }
}
