//! # Vaktul Library
//!
//! Internal library for the vaktul binary application.
//!
//! This library exists to enable testing of the schedule internals and keeps
//! CLI dispatch (main.rs) separate from application logic.
//!
//! ## Architecture
//!
//! - **Entry Point**: `Vaktul` builder sets up resources and runs the live countdown
//! - **Core Logic**: `core` module contains the tick loop and report presentation
//! - **Schedule**: `schedule` derives sahur/iftar boundaries and counts down to them
//! - **Geographic**: `geo` computes night end and sunset and holds the location registry
//! - **Configuration**: `config` module for TOML-based settings
//! - **Commands**: `commands` module for one-shot CLI commands (list, times, help)
//! - **Infrastructure**: Time sources, signal handling and logging

// Import macros from logger module for use in all submodules
#[macro_use]
pub mod logger;

pub mod args;
pub mod commands;
pub mod config;
pub mod constants;
pub mod core;
pub mod error;
pub mod geo;
pub mod schedule;
pub mod signals;
pub mod time_source;
mod vaktul;

pub use error::ScheduleError;
pub use geo::{Location, LocationRegistry};
pub use schedule::{ScheduleEngine, TickOutcome, TickReport};
pub use vaktul::Vaktul;
