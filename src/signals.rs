//! Signal handling and terminal input for the live countdown.
//!
//! Shutdown signals and location changes typed on the terminal arrive on
//! separate threads. Both are turned into [`SignalMessage`]s on one channel
//! that the main loop drains between ticks.

use anyhow::{Context, Result};
use signal_hook::{
    consts::signal::{SIGHUP, SIGINT, SIGTERM},
    iterator::Signals,
};
use std::io::BufRead;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{Receiver, Sender, channel};
use std::sync::Arc;
use std::thread;

/// Unified message type for everything that can interrupt the tick loop
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignalMessage {
    /// Stop the loop (SIGTERM, SIGINT, SIGHUP, or `q` typed on the terminal)
    Shutdown,
    /// Switch to the named location
    SelectLocation(String),
}

/// Signal handling state shared between threads
pub struct SignalState {
    /// Atomic flag indicating if the application should keep running
    pub running: Arc<AtomicBool>,
    /// Channel receiver for signal messages
    pub signal_receiver: Receiver<SignalMessage>,
    /// Channel sender for signal messages, cloned by input threads
    pub signal_sender: Sender<SignalMessage>,
}

impl SignalState {
    /// State with no OS signal handlers attached, for tests and embedding.
    pub fn detached() -> Self {
        let (signal_sender, signal_receiver) = channel();
        Self {
            running: Arc::new(AtomicBool::new(true)),
            signal_receiver,
            signal_sender,
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }
}

/// Register handlers for SIGINT, SIGTERM and SIGHUP.
///
/// The first signal clears the running flag and sends a shutdown message so
/// that a loop blocked on the channel wakes up immediately.
pub fn setup_signal_handler() -> Result<SignalState> {
    let state = SignalState::detached();

    let mut signals =
        Signals::new([SIGINT, SIGTERM, SIGHUP]).context("failed to register signal handlers")?;

    let running = Arc::clone(&state.running);
    let sender = state.signal_sender.clone();

    thread::spawn(move || {
        if let Some(sig) = signals.forever().next() {
            let name = match sig {
                SIGINT => "SIGINT",
                SIGTERM => "SIGTERM",
                _ => "SIGHUP",
            };
            log_pipe!();
            log_info!("Received {name}, shutting down");
            running.store(false, Ordering::SeqCst);
            let _ = sender.send(SignalMessage::Shutdown);
        }
    });

    Ok(state)
}

/// Turn one line of terminal input into a message, ignoring blank lines.
pub fn parse_input_line(line: &str) -> Option<SignalMessage> {
    let trimmed = line.trim();
    match trimmed {
        "" => None,
        "q" | "quit" | "exit" => Some(SignalMessage::Shutdown),
        name => Some(SignalMessage::SelectLocation(name.to_string())),
    }
}

/// Read location names from `input` until it closes, forwarding each one.
///
/// Runs on its own thread; the thread ends when the input closes or the
/// receiving side of the channel is dropped. Closed input sends nothing, so a
/// detached stdin such as `/dev/null` leaves the loop running.
pub fn spawn_input_reader<R>(input: R, sender: Sender<SignalMessage>) -> thread::JoinHandle<()>
where
    R: BufRead + Send + 'static,
{
    thread::spawn(move || {
        for line in input.lines() {
            let Ok(line) = line else { break };
            if let Some(message) = parse_input_line(&line)
                && sender.send(message).is_err()
            {
                return;
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_parse_input_line() {
        assert_eq!(parse_input_line("   \n"), None);
        assert_eq!(
            parse_input_line(" Oslo\n"),
            Some(SignalMessage::SelectLocation("Oslo".to_string()))
        );
        assert_eq!(parse_input_line("quit"), Some(SignalMessage::Shutdown));
    }

    #[test]
    fn test_input_reader_forwards_lines_in_order() {
        let state = SignalState::detached();
        let input = Cursor::new("Oslo\n\nSkien\nq\n");

        spawn_input_reader(input, state.signal_sender.clone())
            .join()
            .unwrap();

        let received: Vec<_> = state.signal_receiver.try_iter().collect();
        assert_eq!(
            received,
            vec![
                SignalMessage::SelectLocation("Oslo".to_string()),
                SignalMessage::SelectLocation("Skien".to_string()),
                SignalMessage::Shutdown,
            ]
        );
    }

    #[test]
    fn test_input_reader_ignores_end_of_input() {
        let state = SignalState::detached();
        let input = Cursor::new("Oslo\n");

        spawn_input_reader(input, state.signal_sender.clone())
            .join()
            .unwrap();

        let received: Vec<_> = state.signal_receiver.try_iter().collect();
        assert_eq!(
            received,
            vec![SignalMessage::SelectLocation("Oslo".to_string())]
        );

        let empty = Cursor::new("");
        spawn_input_reader(empty, state.signal_sender.clone())
            .join()
            .unwrap();
        assert!(state.signal_receiver.try_recv().is_err());
    }
}
