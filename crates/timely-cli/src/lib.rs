//! Terminal working time tracker.
//!
//! This crate provides the CLI entry point and the interactive session around
//! the `timely-core` ledger.

pub mod app;
mod cli;
mod config;
pub mod logging;
pub mod startup;
pub mod tui;
mod view;

pub use app::{App, KeyAction};
pub use cli::Cli;
pub use config::Config;
pub use startup::{StartupProbe, platform_probe, spawn_probe};
pub use tui::{Session, TuiError};
