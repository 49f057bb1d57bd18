//! Configuration for the swarm end-to-end harness.
//!
//! Values are merged with `ortho_config`, lowest precedence first: defaults,
//! the configuration file, `SWARM_E2E_*` environment variables, then
//! command-line flags.
//!
//! The configuration file is discovered at `~/.config/swarm-e2e/config.toml`
//! or `.swarm-e2e.toml`, unless `--config` or `SWARM_E2E_CONFIG_PATH` names
//! one explicitly.
//!
//! # Example Configuration
//!
//! ```toml
//! engine_socket = "tcp://swarm-manager:2375"
//! image = "nginx:alpine"
//!
//! [poll]
//! interval_ms = 250
//! timeout_secs = 120
//! ```

mod cli;
mod loader;
mod types;

#[cfg(test)]
mod tests;

pub use cli::{Cli, Commands, TasksArgs, WaitArgs};
pub use loader::{env_var_names, load_config};
pub use types::{HarnessConfig, PollConfig};
