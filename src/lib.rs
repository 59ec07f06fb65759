//! `listing-price` library crate.
//!
//! The binary (`lp`) is a thin wrapper around this library so that:
//!
//! - inference is testable without spawning processes or a terminal
//! - the TUI and the one-shot CLI share one scoring path
//! - code stays easy to navigate as the project grows

pub mod app;
pub mod cli;
pub mod data;
pub mod domain;
pub mod error;
pub mod geo;
pub mod io;
pub mod logging;
pub mod math;
pub mod models;
pub mod report;
pub mod tui;

#[cfg(test)]
pub(crate) mod test_support;
