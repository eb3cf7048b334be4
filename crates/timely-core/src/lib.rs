//! Core domain logic for the working time tracker.
//!
//! This crate contains the fundamental types and logic for:
//! - Ledger: the sorted clock-in/clock-out timestamps and their paired sums
//! - Parsing: compact user-entered times such as `730`, `7:30` or `14`
//! - Formatting: `HH:MM` rendering of durations and times of day
//! - Summary: totals, overtime and projected finish against a daily target

pub mod format;
mod ledger;
pub mod parse;
mod summary;

pub use format::{format_duration, format_time};
pub use ledger::Ledger;
pub use parse::{InvalidFormat, parse_clock, parse_target, parse_time, parse_time_on};
pub use summary::Summary;
