//! Connecting to the engine under test and checking that it answers.

use std::time::Duration;

use bollard::Docker;
use tracing::{debug, info};

use super::error_classification::classify_connection_error;
use super::socket::{Endpoint, SocketResolver};
use crate::error::{EngineError, HarnessError};

/// Connection timeout for engine API calls.
const CONNECTION_TIMEOUT_SECS: u64 = 120;

/// Timeout for the health-check ping.
const HEALTH_CHECK_TIMEOUT_SECS: u64 = 10;

/// Connects to a Docker-compatible engine.
pub struct EngineConnector;

impl EngineConnector {
    /// Connect to the engine at `socket`.
    ///
    /// Accepts `unix://` and `npipe://` URIs, `tcp://` endpoints (connected
    /// over plain HTTP), `http://` and `https://` URLs, and bare socket paths.
    /// No request is sent; use [`Self::health_check_async`] to confirm the
    /// engine is reachable.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::SocketNotFound` or `EngineError::PermissionDenied`
    /// when a local socket cannot be opened, and
    /// `EngineError::ConnectionFailed` for any other client error.
    pub fn connect(socket: &str) -> Result<Docker, HarnessError> {
        let endpoint = Endpoint::parse(socket);
        debug!(?endpoint, "connecting to engine");

        let connected = match &endpoint {
            Endpoint::Socket(uri) => Docker::connect_with_socket(
                uri,
                CONNECTION_TIMEOUT_SECS,
                bollard::API_DEFAULT_VERSION,
            )
            .map_err(|error| classify_connection_error(&error, uri)),
            Endpoint::Http(url) => Docker::connect_with_http(
                url,
                CONNECTION_TIMEOUT_SECS,
                bollard::API_DEFAULT_VERSION,
            )
            .map_err(|error| EngineError::ConnectionFailed {
                message: error.to_string(),
            }),
        };

        connected.map_err(HarnessError::from)
    }

    /// Connect to the endpoint chosen by `resolver`, preferring `configured`.
    ///
    /// # Errors
    ///
    /// As for [`Self::connect`].
    pub fn connect_with_fallback<E: mockable::Env>(
        configured: Option<&str>,
        resolver: &SocketResolver<'_, E>,
    ) -> Result<Docker, HarnessError> {
        Self::connect(&resolver.resolve(configured))
    }

    /// Ping the engine, giving up after ten seconds.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::HealthCheckTimeout` when the ping does not
    /// answer in time and `EngineError::HealthCheckFailed` when the engine
    /// answers with an error.
    pub async fn health_check_async(docker: &Docker) -> Result<(), HarnessError> {
        let limit = Duration::from_secs(HEALTH_CHECK_TIMEOUT_SECS);

        let response = tokio::time::timeout(limit, docker.ping())
            .await
            .map_err(|_elapsed| EngineError::HealthCheckTimeout {
                seconds: HEALTH_CHECK_TIMEOUT_SECS,
            })?;

        response.map_err(|error| EngineError::HealthCheckFailed {
            message: error.to_string(),
        })?;
        Ok(())
    }

    /// Connect to `socket` and confirm the engine answers a ping.
    ///
    /// # Errors
    ///
    /// Any error from [`Self::connect`] or [`Self::health_check_async`].
    pub async fn connect_and_verify_async(socket: &str) -> Result<Docker, HarnessError> {
        let docker = Self::connect(socket)?;
        Self::health_check_async(&docker).await?;
        info!(socket, "engine is reachable");
        Ok(docker)
    }
}
