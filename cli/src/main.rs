use std::process;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;

use reqpipe_cli::logging::init_logger;
use reqpipe_cli::{execute, Args, Completion, UreqTransport};

fn main() -> Result<()> {
    let args = Args::parse();
    init_logger(args.verbose).context("failed to initialize logger")?;

    let mut transport = UreqTransport::new(args.timeout.map(Duration::from_secs));

    match execute(&args, &mut transport) {
        Ok(Completion {
            status,
            exit_as_return_code: true,
        }) => process::exit(i32::from(status)),
        Ok(_) => Ok(()),
        Err(failure) if failure.exit_as_return_code => {
            println!("{:#}", failure.error);
            process::exit(i32::from(failure.status))
        }
        Err(failure) => Err(failure.error),
    }
}
