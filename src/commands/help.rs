//! Help command implementation for vaktul.
//!
//! Dispatches `vaktul help [COMMAND]` to the detailed help of a command, or
//! shows the general command overview.

use anyhow::Result;

/// Run the help command (dispatcher)
///
/// # Arguments
/// * `command` - Optional command name to get help for (None = general help)
pub fn run_help_command(command: Option<&str>) -> Result<()> {
    match command {
        None => display_general_help(),
        Some("list") | Some("l") => super::list::display_help(),
        Some("times") | Some("t") => super::times::display_help(),
        Some("simulate") | Some("--simulate") | Some("S") => super::simulate::display_help(),
        Some("help") => display_help_help(),
        Some(unknown) => {
            log_pipe!();
            log_warning!("Unknown command: {unknown}");
            display_general_help();
        }
    }
    Ok(())
}

/// Display general help focused on commands (for the help command)
fn display_general_help() {
    log_version!();
    log_block_start!("Available Commands:");
    log_indented!("(none)             Run the live sahur and iftar countdown");
    log_indented!("list, l            List the configured locations");
    log_indented!("times, t           Print the times for one date");
    log_indented!("help [COMMAND]     Show detailed help for a command");
    log_pipe!();
    log_info!("Use 'vaktul help <command>' to see detailed help for a specific command.");
    log_indented!("Use 'vaktul --help' to see all options and general usage.");
    log_end!();
}

/// Display help for the help command itself
fn display_help_help() {
    log_version!();
    log_block_start!("help - Display help information");
    log_block_start!("Usage: vaktul help [COMMAND]");
    log_block_start!("Arguments:");
    log_indented!("COMMAND  Optional command to get help for");
    log_indented!("         If omitted, shows general help");
    log_block_start!("Examples:");
    log_indented!("vaktul help times");
    log_indented!("vaktul help simulate");
    log_end!();
}
