//! CLI interface for Focus Sort
//!
//! This module provides the command-line interface using clap's derive API.
//! It defines all commands and global flags.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::store::SoundType;

/// Focus Sort
///
/// Turns a goal into a short list of tasks and lets you sort them into
/// focus buckets, from a terminal or through the HTTP endpoint.
#[derive(Parser, Debug)]
#[command(name = "focus-sort")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Set log level (error, warn, info, debug, trace)
    #[arg(long, global = true, value_name = "LEVEL")]
    pub log: Option<String>,

    /// Specify alternate configuration file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the task generation endpoint
    Serve {
        /// Bind host (overrides server.host)
        #[arg(long)]
        host: Option<String>,

        /// Bind port (overrides server.port)
        #[arg(long)]
        port: Option<u16>,
    },

    /// Generate tasks for a goal and print them
    Generate {
        /// The goal to break down
        goal: String,

        /// Use a running endpoint instead of generating in-process
        #[arg(long, value_name = "URL")]
        server: Option<String>,
    },

    /// Play a sorting round in the terminal
    Play {
        /// The goal to break down
        goal: String,

        /// Use a running endpoint instead of generating in-process
        #[arg(long, value_name = "URL")]
        server: Option<String>,
    },

    /// Show recent scores
    History {
        /// Clear the score history
        #[arg(long)]
        clear: bool,
    },

    /// Manage sound settings
    Settings {
        #[command(subcommand)]
        action: SettingsAction,
    },

    /// Show configuration and generation status
    Doctor,
}

/// Sound settings actions
#[derive(Subcommand, Debug)]
pub enum SettingsAction {
    /// Show current settings
    Show,

    /// Change settings
    Set {
        /// Sound type (sine, square, triangle, sawtooth, chime, pop)
        #[arg(long, value_name = "TYPE")]
        sound: Option<SoundType>,

        /// Volume between 0 and 1
        #[arg(long)]
        volume: Option<f64>,

        /// Vibrate on drop (true or false)
        #[arg(long)]
        vibrate: Option<bool>,
    },
}
