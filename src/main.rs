//! Main application entry point and high-level flow coordination.
//!
//! Parses the command line and hands off to the library:
//!
//! - `args`: Command-line argument parsing and help/version display
//! - `commands`: One-shot commands (`list`, `times`, `help`) and simulation setup
//! - `Vaktul`: The live countdown, run with the real or a simulated clock
//!
//! Errors from any of these are logged with their full context chain before
//! the process exits with a failure status.

use anyhow::{Context, Result};

use vaktul::args::{self, CliAction, GlobalOptions, ParsedArgs};
use vaktul::commands;
use vaktul::config::{self, Config};
use vaktul::constants::EXIT_FAILURE;
use vaktul::logger::{Log, LoggerGuard};
use vaktul::{
    Vaktul, log_end, log_error, log_error_exit, log_indented, log_pipe, log_version,
};

fn main() {
    if let Err(e) = run() {
        log_error_exit!("{e}");
        for cause in e.chain().skip(1) {
            log_indented!("Caused by: {cause}");
        }
        log_end!();
        std::process::exit(EXIT_FAILURE);
    }
}

fn run() -> Result<()> {
    let parsed_args = ParsedArgs::from_env();

    match parsed_args.action {
        CliAction::ShowVersion => {
            args::display_version_info();
            Ok(())
        }
        CliAction::ShowHelp => {
            args::display_help();
            Ok(())
        }
        CliAction::ShowHelpDueToError { reason } => {
            args::display_help();
            log_pipe!();
            log_error!("{reason}");
            log_end!();
            std::process::exit(EXIT_FAILURE);
        }
        CliAction::Help { command } => commands::help::run_help_command(command.as_deref()),
        CliAction::List { options } => {
            let _log_guard = prepare(&options)?;
            commands::list::handle_list_command(&options)
        }
        CliAction::Times { options, date } => {
            let _log_guard = prepare(&options)?;
            commands::times::handle_times_command(&options, date.as_deref())
        }
        CliAction::Run { options } => {
            let _log_guard = prepare(&options)?;
            Vaktul::new(options).run()
        }
        CliAction::Simulate {
            options,
            start_time,
            end_time,
            multiplier,
        } => {
            let _log_guard = prepare(&options)?;

            if !options.json {
                log_version!();
            }
            // The time zone decides how the start and end times are read
            let zone = Config::load()?.display_zone()?;
            let clock = commands::simulate::handle_simulate_command(
                &start_time,
                &end_time,
                multiplier,
                zone,
            )?;

            Vaktul::new(options)
                .with_clock(clock)
                .without_headers()
                .run()
        }
    }
}

/// Apply the global options that must take effect before anything is loaded.
fn prepare(options: &GlobalOptions) -> Result<Option<LoggerGuard>> {
    config::set_config_dir(options.config_dir.clone())?;

    if options.json {
        Log::set_enabled(false);
    }

    match options.log_file.as_deref() {
        Some(path) => {
            let guard = Log::start_file_logging(path)
                .with_context(|| format!("Failed to start logging to {path}"))?;
            Ok(Some(guard))
        }
        None => Ok(None),
    }
}
