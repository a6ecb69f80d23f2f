//! Repack CLI - converts trees of cbr/cbz comic archives into cbz files.

mod cli;
mod error;
mod logging;
mod output;
mod progress;
mod run;

use clap::Parser;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = cli::Cli::parse();

    if cli.no_color {
        console::set_colors_enabled(false);
        console::set_colors_enabled_stderr(false);
    }

    let formatter = output::create_formatter(cli.json, cli.verbosity);

    let target = if cli.json {
        logging::LogTarget::Stderr
    } else {
        logging::LogTarget::Stdout
    };
    if let Err(err) = logging::init(cli.verbosity, !cli.no_color, target) {
        formatter.format_error(&err);
        return ExitCode::FAILURE;
    }

    match run::execute(&cli, &*formatter) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            formatter.format_error(&err);
            ExitCode::FAILURE
        }
    }
}
