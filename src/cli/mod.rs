//! Command-line interface for taskflow
//!
//! This module defines the CLI structure using clap derive macros.
//! Each subcommand is defined in its own submodule.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};

use crate::config::Config;
use crate::error::Result;
use crate::seed::Seed;

mod init;
mod session;
mod view;

/// TaskFlow - an in-memory task board
///
/// Tasks with categories, priorities and due dates, backed by stores that
/// simulate network latency.
#[derive(Parser, Debug)]
#[command(name = "taskflow")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the config file (defaults to ./.taskflow.toml)
    #[arg(long, global = true, env = "TASKFLOW_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Skip the simulated store latency
    #[arg(long, global = true)]
    pub no_latency: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Write a default config file
    Init {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },

    /// Print the board: visible tasks, progress and category counts
    View {
        /// JSON seed file (defaults to a built-in demo board)
        #[arg(long)]
        seed: Option<PathBuf>,

        /// Category tab to show ("all" for every category)
        #[arg(long, default_value = "all")]
        category: String,

        /// Case-insensitive title search
        #[arg(long, default_value = "")]
        search: String,

        /// Sort mode: date, priority, alphabetical, created
        #[arg(long)]
        sort: Option<String>,

        /// Reference time for due-date flags (YYYY-MM-DD or RFC 3339)
        #[arg(long)]
        now: Option<String>,
    },

    /// Serve JSON requests from stdin against one live board
    Session {
        /// JSON seed file (defaults to a built-in demo board)
        #[arg(long)]
        seed: Option<PathBuf>,
    },
}

impl Cli {
    /// Execute the CLI command
    pub async fn run(self) -> Result<()> {
        match self.command {
            Commands::Init { force } => init::run(self.config, force, self.json, self.quiet),
            Commands::View {
                seed,
                category,
                search,
                sort,
                now,
            } => {
                let config = load_config(self.config.as_deref(), self.no_latency)?;
                view::run(view::ViewOptions {
                    config,
                    seed,
                    category,
                    search,
                    sort,
                    now,
                    json: self.json,
                    quiet: self.quiet,
                })
                .await
            }
            Commands::Session { seed } => {
                let config = load_config(self.config.as_deref(), self.no_latency)?;
                session::run(session::SessionOptions { config, seed }).await
            }
        }
    }
}

fn load_config(path: Option<&Path>, no_latency: bool) -> Result<Config> {
    let mut config = match path {
        Some(path) => Config::load(path)?,
        None => Config::load_from_dir(&std::env::current_dir()?)?,
    };
    if no_latency {
        config.store.latency.enabled = false;
    }
    Ok(config)
}

fn load_seed(path: Option<&Path>, now: DateTime<Utc>) -> Result<Seed> {
    match path {
        Some(path) => Seed::load(path),
        None => Ok(Seed::builtin(now)),
    }
}
