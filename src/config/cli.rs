//! Command-line argument definitions for `swarm-e2e`.

use camino::Utf8PathBuf;
use clap::{Parser, Subcommand};

/// Command-line interface for `swarm-e2e`.
#[derive(Debug, Parser)]
#[command(name = "swarm-e2e")]
#[command(
    author,
    version,
    about = "Helpers for end-to-end tests against a swarm-mode container engine"
)]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,

    /// Path to configuration file.
    #[arg(long, global = true)]
    pub config: Option<Utf8PathBuf>,

    /// Container engine socket path or URL.
    #[arg(long, global = true)]
    pub engine_socket: Option<String>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Remove every service labelled as a test service.
    Clean,

    /// List the running tasks of a service.
    Tasks(TasksArgs),

    /// Wait until a service runs the expected number of tasks.
    Wait(WaitArgs),
}

/// Arguments for the `tasks` subcommand.
#[derive(Debug, Parser)]
pub struct TasksArgs {
    /// Service ID or name.
    #[arg(required = true)]
    pub service: String,
}

/// Arguments for the `wait` subcommand.
#[derive(Debug, Parser)]
pub struct WaitArgs {
    /// Service ID or name.
    #[arg(required = true)]
    pub service: String,

    /// Number of running tasks to wait for.
    #[arg(long, required = true)]
    pub replicas: usize,

    /// Seconds to wait before giving up.
    #[arg(long)]
    pub timeout_secs: Option<u64>,

    /// Milliseconds between checks.
    #[arg(long)]
    pub interval_ms: Option<u64>,
}
