//! `ezdeps` binary: parse arguments, set up logging, dispatch.
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;

use ezdeps_cli::cli::{Cli, Command};
use ezdeps_cli::commands;
use ezdeps_cli::logging::{self, Logger};

fn main() -> ExitCode {
    let _ = enable_ansi_support::enable_ansi_support();
    let args = Cli::parse();
    let command = args.selected_command();

    if command == Command::Version {
        commands::version::run();
        return ExitCode::SUCCESS;
    }

    logging::init_subscriber(args.verbose, command.name());
    let log = Arc::new(Logger::new(command.name()));

    let result = match command {
        Command::Sync => commands::sync::run(&args.global, &log, false),
        Command::ForceExtract => commands::sync::run(&args.global, &log, true),
        Command::Update => commands::update::run(&args.global, &log),
        Command::Clean => commands::clean::run(&args.global, &log),
        Command::Version => Ok(()),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log.error(&format!("{e:#}"));
            ExitCode::FAILURE
        }
    }
}
