//! Command-line argument parsing and processing.
//!
//! Arguments are parsed by hand into a [`CliAction`]. Global options may
//! appear before or after the command; `--help` and `--version` take
//! precedence over everything else, and anything unrecognised turns into
//! [`CliAction::ShowHelpDueToError`].

use crate::constants::DEFAULT_SIMULATION_MULTIPLIER;

/// Options shared by every action that loads configuration.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GlobalOptions {
    pub debug_enabled: bool,
    pub config_dir: Option<String>,
    /// Location to use instead of the configured one
    pub city: Option<String>,
    /// Print JSON lines instead of the terminal display
    pub json: bool,
    /// Write log output to this file instead of the terminal
    pub log_file: Option<String>,
}

/// Represents the parsed command-line arguments and their intended actions.
#[derive(Debug, PartialEq)]
pub enum CliAction {
    /// Run the live countdown
    Run { options: GlobalOptions },
    /// Run the live countdown on a simulated clock
    Simulate {
        options: GlobalOptions,
        start_time: String,
        end_time: String,
        /// Simulated seconds per real second, 0 for fast-forward
        multiplier: f64,
    },
    /// Print the location registry
    List { options: GlobalOptions },
    /// Print the solar instants and boundaries for one date
    Times {
        options: GlobalOptions,
        /// `YYYY-MM-DD`, today when absent
        date: Option<String>,
    },
    /// Detailed help for a command, or general help
    Help { command: Option<String> },
    /// Display help information and exit
    ShowHelp,
    /// Display version information and exit
    ShowVersion,
    /// Show help due to invalid arguments and exit
    ShowHelpDueToError { reason: String },
}

/// Result of parsing command-line arguments.
pub struct ParsedArgs {
    pub action: CliAction,
}

enum Command {
    Run,
    List,
    Times,
    Help,
}

fn error(reason: impl Into<String>) -> ParsedArgs {
    ParsedArgs {
        action: CliAction::ShowHelpDueToError {
            reason: reason.into(),
        },
    }
}

impl ParsedArgs {
    /// Parse command-line arguments into a structured result.
    ///
    /// The first item is the program name and is skipped.
    pub fn parse<I, S>(args: I) -> ParsedArgs
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let args: Vec<String> = args
            .into_iter()
            .skip(1)
            .map(|s| s.as_ref().to_string())
            .collect();

        // Version first, then help, regardless of position
        if args
            .iter()
            .any(|arg| matches!(arg.as_str(), "--version" | "-V" | "-v"))
        {
            return ParsedArgs {
                action: CliAction::ShowVersion,
            };
        }
        if args.iter().any(|arg| matches!(arg.as_str(), "--help" | "-h")) {
            return ParsedArgs {
                action: CliAction::ShowHelp,
            };
        }

        let mut options = GlobalOptions::default();
        let mut command: Option<Command> = None;
        let mut positionals: Vec<String> = Vec::new();
        let mut date: Option<String> = None;
        let mut simulate: Option<(String, String, f64)> = None;

        let mut iter = args.into_iter().peekable();
        while let Some(arg) = iter.next() {
            match arg.as_str() {
                "--debug" | "-d" => options.debug_enabled = true,
                "--json" | "-j" => options.json = true,
                "--config" | "-c" | "--city" | "--log" | "--date" => {
                    let Some(value) = iter.next() else {
                        return error(format!("{arg} requires a value"));
                    };
                    match arg.as_str() {
                        "--config" | "-c" => options.config_dir = Some(value),
                        "--city" => options.city = Some(value),
                        "--log" => options.log_file = Some(value),
                        _ => date = Some(value),
                    }
                }
                "--simulate" | "-S" => {
                    let (Some(start), Some(end)) = (iter.next(), iter.next()) else {
                        return error("--simulate requires a start and an end time");
                    };
                    let multiplier = match iter.peek().map(|next| next.parse::<f64>()) {
                        Some(Ok(value)) if value >= 0.0 && value.is_finite() => {
                            iter.next();
                            value
                        }
                        Some(Ok(_)) => {
                            return error("The simulation multiplier must be zero or positive");
                        }
                        _ => DEFAULT_SIMULATION_MULTIPLIER,
                    };
                    simulate = Some((start, end, multiplier));
                }
                flag if flag.starts_with('-') => {
                    return error(format!("Unknown option: {flag}"));
                }
                word if command.is_none() => {
                    command = Some(match word {
                        "list" | "l" => Command::List,
                        "times" | "t" => Command::Times,
                        "help" => Command::Help,
                        _ => return error(format!("Unknown command: {word}")),
                    });
                }
                other => positionals.push(other.to_string()),
            }
        }

        let command = command.unwrap_or(Command::Run);

        if date.is_some() && !matches!(command, Command::Times) {
            return error("--date is only valid with the 'times' command");
        }
        if simulate.is_some() && !matches!(command, Command::Run) {
            return error("--simulate cannot be combined with a command");
        }

        let action = match command {
            Command::Help => {
                if positionals.len() > 1 {
                    return error("help takes at most one command name");
                }
                CliAction::Help {
                    command: positionals.pop(),
                }
            }
            _ if !positionals.is_empty() => {
                return error(format!("Unexpected argument: {}", positionals[0]));
            }
            Command::List => CliAction::List { options },
            Command::Times => CliAction::Times { options, date },
            Command::Run => match simulate {
                Some((start_time, end_time, multiplier)) => CliAction::Simulate {
                    options,
                    start_time,
                    end_time,
                    multiplier,
                },
                None => CliAction::Run { options },
            },
        };

        ParsedArgs { action }
    }

    /// Convenience method to parse from std::env::args()
    pub fn from_env() -> ParsedArgs {
        Self::parse(std::env::args())
    }
}

/// Displays version information using custom logging style.
pub fn display_version_info() {
    log_version!();
    log_decorated!(env!("CARGO_PKG_DESCRIPTION"));
    log_end!();
}

/// Displays custom help message using logger methods.
pub fn display_help() {
    log_version!();
    log_block_start!(env!("CARGO_PKG_DESCRIPTION"));
    log_block_start!("Usage:");
    log_indented!("vaktul [OPTIONS] [COMMAND]");
    log_block_start!("Options:");
    log_indented!("-c, --config <dir>     Use custom configuration directory");
    log_indented!("    --city <name>      Start with this location");
    log_indented!("-d, --debug            Show the solar calculation details");
    log_indented!("-h, --help             Print help information");
    log_indented!("-j, --json             Print one JSON object per tick");
    log_indented!("    --log <file>       Write log output to a file");
    log_indented!("-S, --simulate         Run with simulated time");
    log_indented!("                       Usage: --simulate <start> <end> [multiplier]");
    log_indented!("-V, --version          Print version information");
    log_block_start!("Commands:");
    log_indented!("list, l                List the configured locations");
    log_indented!("times, t [--date D]    Print the times for one date");
    log_indented!("help [COMMAND]         Show detailed help for a command");
    log_block_start!("While running:");
    log_indented!("Type a location name and press Enter to switch, or 'q' to quit");
    log_end!();
}
