//! Waypoint CLI library.
//!
//! Argument types, subcommand handlers and output helpers for the
//! `waypoint-cli` binary. Every subcommand works on a seeded synthetic grid
//! so runs are reproducible without any map data on disk.

pub mod args;
pub mod commands;
pub mod output;
