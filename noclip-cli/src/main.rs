use std::{io, process::ExitCode};

use clap::Parser;
use noclip_cli::{args::Cli, commands, UsageError};

fn main() -> ExitCode {
    let cli = Cli::parse();

    match commands::run(cli, &mut io::stdout()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("Error: {:#}", error);

            if error.downcast_ref::<UsageError>().is_some() {
                ExitCode::from(2)
            } else {
                ExitCode::FAILURE
            }
        }
    }
}
