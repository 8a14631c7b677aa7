//! CLI module for the iosrec tool.
//!
//! This module provides the command-line interface for validating task
//! documents, running them against a device configuration and inspecting
//! the supported resources.

mod commands;
mod output;

pub use commands::{Cli, Commands, OutputFormat};
pub use output::OutputFormatter;
