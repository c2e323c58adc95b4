//! Command-line surface: argument parsing, per-command handlers and
//! terminal output helpers.

pub mod cli;
pub mod ui;
