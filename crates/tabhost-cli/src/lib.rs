//! Command implementations for the `tabhost` binary.

use clap::ValueEnum;

pub mod commands;

/// How command results are written to stdout
#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum OutputFormat {
    Pretty,
    Json,
    Table,
}
