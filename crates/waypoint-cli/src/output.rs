//! Output format selection shared by every subcommand.

use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::Serialize;

/// How subcommands print their results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable lines.
    #[default]
    Text,
    /// A single pretty-printed JSON document.
    Json,
}

/// Render `value` as pretty JSON.
pub fn to_json<T: Serialize>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).context("failed to serialize output")
}

pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", to_json(value)?);
    Ok(())
}

/// Format a route weight, spelling out the unreachable sentinel.
pub fn format_weight(weight: f64) -> String {
    if weight.is_finite() {
        format!("{weight:.3}")
    } else {
        "unreachable".to_string()
    }
}
