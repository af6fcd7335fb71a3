//! Application coordinator for the live countdown.
//!
//! Handles everything that has to exist before the loop can start:
//! configuration, the starting location, signal handlers, the terminal input
//! reader and the output sink. The `Vaktul` builder supports the two startup
//! contexts:
//! - Normal startup: `Vaktul::new(options).run()`
//! - Simulation: `Vaktul::new(options).with_clock(clock).without_headers().run()`

use anyhow::Result;
use chrono::TimeZone;
use std::fmt::Display;
use std::io::BufReader;
use std::sync::Arc;

use crate::args::GlobalOptions;
use crate::commands::Session;
use crate::core::output::{JsonSink, ReportSink, TerminalSink};
use crate::core::{Core, CoreParams};
use crate::logger::Log;
use crate::signals::{setup_signal_handler, spawn_input_reader};
use crate::time_source::TimeSource;

/// Builder for configuring and running the live countdown.
///
/// # Examples
///
/// ```no_run
/// use vaktul::Vaktul;
/// use vaktul::args::GlobalOptions;
///
/// # fn main() -> anyhow::Result<()> {
/// Vaktul::new(GlobalOptions::default()).run()?;
/// # Ok(())
/// # }
/// ```
pub struct Vaktul {
    options: GlobalOptions,
    clock: Option<Arc<dyn TimeSource>>,
    show_headers: bool,
}

impl Vaktul {
    /// Create a new runner with defaults matching normal run
    pub fn new(options: GlobalOptions) -> Self {
        Self {
            options,
            clock: None,
            show_headers: true,
        }
    }

    /// Read time from `clock` instead of the global time source
    pub fn with_clock(mut self, clock: Arc<dyn TimeSource>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Skip header display (headers already shown by the caller)
    pub fn without_headers(mut self) -> Self {
        self.show_headers = false;
        self
    }

    /// Execute the live countdown until shutdown.
    pub fn run(self) -> Result<()> {
        // JSON output must not be mixed with log lines
        if self.options.json {
            Log::set_enabled(false);
        }

        if self.show_headers {
            log_version!();
            if self.options.debug_enabled {
                log_pipe!();
                log_debug!("Debug mode enabled - showing solar calculation details");
            }
        }

        let session = Session::prepare(&self.options)?;
        session.config.log_config();

        let signal_state = setup_signal_handler()?;
        spawn_input_reader(
            BufReader::new(std::io::stdin()),
            signal_state.signal_sender.clone(),
        );
        log_block_start!("Type a location name and press Enter to switch, 'q' to quit");

        let clock = self.clock.unwrap_or_else(crate::time_source::global);
        let sink: Box<dyn ReportSink> = if self.options.json {
            Box::new(JsonSink::new(std::io::stdout()))
        } else {
            Box::new(TerminalSink::new(std::io::stdout()))
        };

        let debug_enabled = self.options.debug_enabled;
        let Session {
            registry,
            location,
            zone,
            ..
        } = session;

        crate::with_display_zone!(zone, |tz| {
            run_core(CoreParams {
                zone: tz,
                clock,
                registry,
                initial_location: location,
                signal_state,
                sink,
                debug_enabled,
            })
        })
    }
}

fn run_core<Z>(params: CoreParams<Z>) -> Result<()>
where
    Z: TimeZone,
    Z::Offset: Display,
{
    Core::new(params).execute().map(|_| ())
}
