//! Configuration data types.

use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::{Deserialize, Serialize};

use crate::converge::ConvergencePoller;
use crate::error::Result;
use crate::swarm::DEFAULT_IMAGE;

/// Default delay between convergence probes.
const DEFAULT_INTERVAL_MS: u64 = 500;

/// Default time allowed for a service to converge.
const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Convergence polling settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct PollConfig {
    /// Milliseconds between probe attempts.
    pub interval_ms: u64,

    /// Seconds to wait before giving up.
    pub timeout_secs: u64,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval_ms: DEFAULT_INTERVAL_MS,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl PollConfig {
    /// Return the probe interval.
    #[must_use]
    pub const fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    /// Return the convergence timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Build a poller using the configured interval.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` when `interval_ms` is zero.
    pub fn poller(&self) -> Result<ConvergencePoller> {
        ConvergencePoller::new(self.interval())
    }
}

/// Root harness configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize, OrthoConfig)]
#[ortho_config(
    prefix = "SWARM_E2E",
    discovery(
        app_name = "swarm-e2e",
        env_var = "SWARM_E2E_CONFIG_PATH",
        config_file_name = "config.toml",
        dotfile_name = ".swarm-e2e.toml",
        config_cli_long = "config",
        config_cli_visible = true,
    )
)]
pub struct HarnessConfig {
    /// Engine socket path or URL. Unset means environment fallback.
    pub engine_socket: Option<String>,

    /// Image for canned test services.
    pub image: Option<String>,

    /// Convergence polling settings.
    #[serde(default)]
    #[ortho_config(skip_cli)]
    pub poll: PollConfig,
}

impl HarnessConfig {
    /// Return the configured image, or the default when unset or blank.
    #[must_use]
    pub fn image_or_default(&self) -> &str {
        self.image
            .as_deref()
            .map(str::trim)
            .filter(|image| !image.is_empty())
            .unwrap_or(DEFAULT_IMAGE)
    }
}
