//! Implementation of the `list` command.

use anyhow::Result;

use super::Session;
use crate::args::GlobalOptions;

/// Print every location in the registry, marking the one selected at startup.
pub fn handle_list_command(options: &GlobalOptions) -> Result<()> {
    let session = Session::prepare(options)?;

    if options.json {
        let locations: Vec<_> = session.registry.iter().collect();
        println!("{}", serde_json::to_string_pretty(&locations)?);
        return Ok(());
    }

    log_version!();
    log_block_start!("Locations ({}):", session.registry.len());
    for location in session.registry.iter() {
        let marker = if location.name() == session.location.name() {
            "*"
        } else {
            " "
        };
        log_indented!(
            "{marker} {:<12} {}",
            location.name(),
            location.coordinates_display()
        );
    }
    log_pipe!();
    log_info!("* marks the location used at startup");
    log_end!();
    Ok(())
}

/// Display detailed help for the list command
pub fn display_help() {
    log_version!();
    log_block_start!("list - List the configured locations");
    log_block_start!("Usage: vaktul list [--json] [--city NAME]");
    log_block_start!("Description:");
    log_indented!("Prints every location from the configuration with its coordinates.");
    log_indented!("Without [[locations]] entries the built-in registry is listed.");
    log_end!();
}
