//! CLI module for Newscaster.

pub mod commands;
mod output;
pub mod preflight;

pub use output::Output;

use crate::briefing::{BriefingDuration, HostPairId, Timeframe};
use clap::{Args, Parser, Subcommand};

/// Newscaster - AI-produced two-host news briefings
///
/// Searches recent news on your topics, writes a script for two hosts and
/// records it as a WAV file.
#[derive(Parser, Debug)]
#[command(name = "newscaster")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v for info, -vv for debug, -vvv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Produce a briefing and save it as a WAV file
    Produce(ProduceArgs),

    /// List the available host pairings
    Hosts,

    /// Start HTTP API server
    Serve {
        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Port to bind to
        #[arg(short, long, default_value = "3000")]
        port: u16,
    },

    /// Check configuration and API access
    Doctor,

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Args, Debug)]
pub struct ProduceArgs {
    /// Topics to cover (up to five)
    #[arg(required = true)]
    pub topics: Vec<String>,

    /// Publication to prefer (repeatable)
    #[arg(long = "publication")]
    pub publications: Vec<String>,

    /// Briefing length (short, medium, long)
    #[arg(short, long)]
    pub duration: Option<BriefingDuration>,

    /// How far back to search (hour, day, week)
    #[arg(short, long)]
    pub timeframe: Option<Timeframe>,

    /// Host pairing (morning-show, news-desk, deep-dive)
    #[arg(long = "host")]
    pub host_pair: Option<HostPairId>,

    /// Output WAV file (defaults to the configured output directory)
    #[arg(short, long)]
    pub output: Option<String>,

    /// Print the script after recording
    #[arg(long)]
    pub script: bool,
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Open configuration file in editor
    Edit,

    /// Show configuration file path
    Path,
}
