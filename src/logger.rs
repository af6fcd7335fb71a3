//! Structured logging system with visual formatting.
//!
//! This module provides a logging system designed for vaktul's visual output style.
//! It includes different log levels and special formatting functions for creating
//! visually appealing, structured output with Unicode box drawing characters.
//!
//! The logger supports runtime enable/disable functionality for quiet operation
//! during automated processes or testing.

use std::io::Write;
use std::path::PathBuf;
use std::sync::OnceLock;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{Sender, channel};

// Use an AtomicBool instead of thread_local for thread safety
static LOGGING_ENABLED: AtomicBool = AtomicBool::new(true);

// Display timezone for simulation timestamps
static DISPLAY_TIMEZONE: OnceLock<chrono_tz::Tz> = OnceLock::new();

// Channel for routing output to file when --log is active
static LOG_CHANNEL: OnceLock<Option<Sender<LogMessage>>> = OnceLock::new();

enum LogMessage {
    Formatted(String),
    Shutdown,
}

/// Main logging interface providing structured output formatting.
///
/// ## Logging Conventions
///
/// To maintain a consistent and readable log output, adhere to the following conventions
/// when using the visual formatting macros:
///
/// - **`log_block_start!`**:
///   - **Purpose**: Always use this to initiate a new, distinct conceptual block of log information,
///     especially for major state changes or significant events (e.g., "Location selected",
///     "Loading configuration", "Schedule recalculated").
///   - **Output**: Prepends an empty pipe `┃` for spacing from any previous log, then prints `┣ message`.
///   - **Usage**: Subsequent related messages within this conceptual block should typically use
///     `log_decorated!` or `log_indented!`.
///
/// - **`log_decorated!`**:
///   - **Purpose**: For logging messages that are part of an existing block started by `log_block_start!`,
///     or for simple, single-line status messages that don't warrant a full block but still fit the pipe structure.
///   - **Output**: Prints `┣ message`.
///   - **Context**: If this message is a continuation of a `log_block_start!`, it will appear visually connected.
///
/// - **`log_indented!`**:
///   - **Purpose**: For nested data or detailed sub-items that belong to a parent message
///     (often logged with `log_block_start!` or `log_decorated!`). Useful for listing configuration items,
///     multi-part details, etc.
///   - **Output**: Prints `┃   message` (pipe, three spaces, then message).
///
/// - **`log_pipe!`**:
///   - **Purpose**: Used explicitly to insert a single, empty, prefixed line (`┃`) for vertical spacing.
///   - **Usage**: Its primary use-case is to create visual separation to initiate a block *before* using
///     `log_warning!`, `log_error!`, `log_info!`, `log_debug!`, or logging
///     an `anyhow` error message.
///     Avoid using it if it might lead to double pipes or unnecessary empty lines before a `log_block_start!`
///     (which already provides top spacing) or `log_end!`. *Not for use at the end of a block.
///
/// - **`log_version!`**:
///   - **Purpose**: Prints the application startup header. Typically called once at the beginning.
///   - **Output**: `┏ vaktul vX.Y.Z ━━╸`.
///
/// - **`log_end!`**:
///   - **Purpose**: Prints the final log termination marker. Called once at shutdown.
///   - **Output**: `╹`.
///
/// - **`log_info!`, `log_warning!`, `log_error!`, `log_debug!`**:
///   - **Purpose**: These are standard semantic logging macros. They use a `[LEVEL]` prefix
///     (e.g., `[INFO]`, `[WARNING]`, `[ERROR]`) and do not use the box-drawing characters.
///   - **Usage**: Use them for their semantic meaning when a message doesn't fit the structured
///     box-drawing style or when a specific log level prefix is more appropriate.
///     If they begin a new conceptual block of information that is *not* part of the primary
///     box-drawing flow, they ought to begin with a `log_pipe!`.
pub struct Log;

impl Log {
    /// Enable or disable logging temporarily.
    ///
    /// This is useful for quiet operation during automated processes
    /// or testing where log output would interfere with results.
    pub fn set_enabled(enabled: bool) {
        LOGGING_ENABLED.store(enabled, Ordering::SeqCst);
    }

    /// Check if logging is currently enabled.
    pub fn is_enabled() -> bool {
        LOGGING_ENABLED.load(Ordering::SeqCst)
    }

    /// Set a named timezone for simulation timestamps.
    /// Without one, timestamps are shown in host local time.
    pub fn set_display_timezone(tz: chrono_tz::Tz) {
        let _ = DISPLAY_TIMEZONE.set(tz);
    }

    /// Start file logging to the specified path.
    pub fn start_file_logging(file_path: impl Into<PathBuf>) -> anyhow::Result<LoggerGuard> {
        let file_path = file_path.into();
        let (tx, rx) = channel();

        // Install the channel
        LOG_CHANNEL
            .set(Some(tx.clone()))
            .map_err(|_| anyhow::anyhow!("Logger channel already initialized"))?;

        // Spawn logger thread
        let handle = std::thread::spawn(move || {
            let mut file = std::fs::File::create(&file_path)?;

            loop {
                match rx.recv() {
                    Ok(LogMessage::Formatted(text)) => {
                        file.write_all(text.as_bytes())?;
                    }
                    Ok(LogMessage::Shutdown) | Err(_) => {
                        file.flush()?;
                        break;
                    }
                }
            }

            Ok::<(), anyhow::Error>(())
        });

        Ok(LoggerGuard {
            tx,
            handle: Some(handle),
        })
    }

    // # Helper Functions

    /// Get timestamp prefix for simulation mode.
    /// Shows the simulated clock as [HH:MM:SS] so that log lines can be placed
    /// on the simulated timeline. Returns empty string if not in simulation mode.
    /// Public for macro access.
    pub fn get_timestamp_prefix() -> String {
        // Check this without initializing the time source
        if crate::time_source::is_initialized() && crate::time_source::is_simulated() {
            let now = crate::time_source::now();
            let clock = match DISPLAY_TIMEZONE.get() {
                Some(tz) => now.with_timezone(tz).format("%H:%M:%S").to_string(),
                None => now
                    .with_timezone(&chrono::Local)
                    .format("%H:%M:%S")
                    .to_string(),
            };
            format!("[{clock}] ")
        } else {
            String::new()
        }
    }
}

/// Guard for file logging that ensures clean shutdown.
pub struct LoggerGuard {
    tx: Sender<LogMessage>,
    handle: Option<std::thread::JoinHandle<anyhow::Result<()>>>,
}

impl Drop for LoggerGuard {
    fn drop(&mut self) {
        let _ = self.tx.send(LogMessage::Shutdown);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
        // LOG_CHANNEL stays set; OnceLock can only be set once per process
    }
}

/// Remove `ESC [ ... m` color sequences so file logs stay plain text.
fn strip_ansi_codes(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(start) = rest.find("\x1b[") {
        result.push_str(&rest[..start]);
        let sequence = &rest[start + 2..];
        rest = match sequence.find('m') {
            Some(end) => &sequence[end + 1..],
            None => "",
        };
    }

    result.push_str(rest);
    result
}

// Public function that routes output (needed by macros)
pub fn write_output(text: &str) {
    // Send to file logger thread - strip ANSI codes for clean file output
    if let Some(Some(tx)) = LOG_CHANNEL.get()
        && tx
            .send(LogMessage::Formatted(strip_ansi_codes(text)))
            .is_ok()
    {
        return;
    }

    // Normal output with colors, also used once the file logger has shut down
    print!("{text}");
    let _ = std::io::stdout().flush();
}

// # Logging Macros

/// Format a message and emit it with a line template.
///
/// `$layout` receives the timestamp prefix and the rendered message, in that order.
#[doc(hidden)]
#[macro_export]
macro_rules! __log_emit {
    ($layout:literal, $($arg:tt)+) => {{
        use $crate::logger::Log;
        if Log::is_enabled() {
            let prefix = Log::get_timestamp_prefix();
            let message = $crate::__log_message!($($arg)+);
            $crate::logger::write_output(&format!($layout, prefix, message));
        }
    }};
}

/// Render macro arguments: a format literal with arguments, or any Display expression.
#[doc(hidden)]
#[macro_export]
macro_rules! __log_message {
    ($fmt:literal $($arg:tt)*) => {
        format!($fmt $($arg)*)
    };
    ($expr:expr) => {
        format!("{}", $expr)
    };
}

/// Log a decorated message, typically as part of an existing block or for standalone emphasis.
#[macro_export]
macro_rules! log_decorated {
    ($($arg:tt)+) => {
        $crate::__log_emit!("{}┣ {}\n", $($arg)+)
    };
}

/// Log an indented message for sub-items or details within a block.
#[macro_export]
macro_rules! log_indented {
    ($($arg:tt)+) => {
        $crate::__log_emit!("{}┃   {}\n", $($arg)+)
    };
}

/// Log a block start message, initiating a new conceptual block of information.
#[macro_export]
macro_rules! log_block_start {
    ($($arg:tt)+) => {{
        $crate::log_pipe!();
        $crate::__log_emit!("{}┣ {}\n", $($arg)+)
    }};
}

/// Log a visual pipe separator for vertical spacing.
#[macro_export]
macro_rules! log_pipe {
    () => {
        $crate::__log_emit!("{}┃{}\n", "")
    };
}

/// Log the application version header.
#[macro_export]
macro_rules! log_version {
    () => {
        $crate::__log_emit!("{}┏ vaktul v{} ━━╸\n", env!("CARGO_PKG_VERSION"))
    };
}

/// Log the final termination marker.
#[macro_export]
macro_rules! log_end {
    () => {
        $crate::__log_emit!("{}╹{}\n", "")
    };
}

/// Log a warning message with pipe prefix and yellow-colored text.
#[macro_export]
macro_rules! log_warning {
    ($($arg:tt)+) => {
        $crate::__log_emit!("{}┣[\x1b[33mWARNING\x1b[0m] {}\n", $($arg)+)
    };
}

/// Log an error message with pipe prefix and red-colored text.
#[macro_export]
macro_rules! log_error {
    ($($arg:tt)+) => {
        $crate::__log_emit!("{}┣[\x1b[31mERROR\x1b[0m] {}\n", $($arg)+)
    };
}

/// Log an error that ends the current flow, closing the block with a corner.
#[macro_export]
macro_rules! log_error_exit {
    ($($arg:tt)+) => {{
        $crate::log_pipe!();
        $crate::__log_emit!("{}┗[\x1b[31mERROR\x1b[0m] {}\n", $($arg)+)
    }};
}

/// Log an informational message with pipe prefix and green-colored text.
#[macro_export]
macro_rules! log_info {
    ($($arg:tt)+) => {
        $crate::__log_emit!("{}┣[\x1b[32mINFO\x1b[0m] {}\n", $($arg)+)
    };
}

/// Log a debug/operational message with pipe prefix and green-colored text.
#[macro_export]
macro_rules! log_debug {
    ($($arg:tt)+) => {
        $crate::__log_emit!("{}┣[\x1b[32mDEBUG\x1b[0m] {}\n", $($arg)+)
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_ansi_codes() {
        assert_eq!(strip_ansi_codes("┣[\x1b[33mWARNING\x1b[0m] late"), "┣[WARNING] late");
        assert_eq!(strip_ansi_codes("plain"), "plain");
    }

    #[test]
    fn test_message_rendering() {
        let city = "Oslo";
        assert_eq!(__log_message!("Selected {city}"), "Selected Oslo");
        assert_eq!(__log_message!("{} + {}", 1, 2), "1 + 2");
        assert_eq!(__log_message!(city), "Oslo");
    }
}
