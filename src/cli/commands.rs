//! CLI command definitions.
//!
//! This module defines all CLI commands and their arguments using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::resources::ResourceKind;

/// iosrec - Cisco IOS L2VPN and VLAN configuration reconciler.
#[derive(Parser, Debug)]
#[command(name = "iosrec")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the task document.
    #[arg(short, long, global = true, env = "IOSREC_DOCUMENT")]
    pub document: Option<PathBuf>,

    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format (text, json).
    #[arg(long, global = true, default_value = "text")]
    pub output: OutputFormat,

    /// Emit logs as JSON lines.
    #[arg(long, global = true)]
    pub log_json: bool,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Validate the task document and its config.
    Validate {
        /// Show all warnings, not just errors.
        #[arg(short, long)]
        warnings: bool,
    },

    /// Execute the document's state and print the resulting commands.
    Run {
        /// Device running configuration; absent means an empty device.
        #[arg(long, env = "IOSREC_RUNNING_CONFIG")]
        running_config: Option<PathBuf>,
    },

    /// Parse device configuration text into structured config.
    Parse {
        /// Resource whose section is parsed.
        #[arg(short, long)]
        resource: ResourceKind,

        /// File holding the device configuration.
        file: PathBuf,
    },

    /// List supported resources.
    Resources,
}

/// Output format options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output.
    #[default]
    Text,
    /// JSON output for scripting.
    Json,
}

impl Cli {
    /// Parses CLI arguments from the command line.
    #[must_use]
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
