use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use dotlink_cli::cli::{Cli, Command};
use dotlink_cli::commands;
use dotlink_cli::logging::{self, Logger};

fn main() -> Result<()> {
    let _ = enable_ansi_support::enable_ansi_support();
    let args = Cli::parse();
    let command = args.selected_command();

    if command == Command::Version {
        commands::version::run();
        return Ok(());
    }

    logging::init_subscriber(args.verbose, command.name());
    let log = Arc::new(Logger::new(command.name()));

    match command {
        Command::Install => commands::install::run(&args.global, &log),
        Command::Status => commands::status::run(&args.global, &log),
        Command::Version => Ok(()),
    }
}
