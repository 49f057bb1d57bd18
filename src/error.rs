//! Semantic error types for the swarm end-to-end harness.
//!
//! Each concern gets its own `thiserror` enum so callers can match on the
//! condition they care about. [`HarnessError`] aggregates them for helpers
//! that touch more than one concern, and `eyre::Report` is reserved for the
//! binary boundary.
//!
//! [`ConvergeError`] stands apart: it is generic over the probe's failure
//! type so the poller can wrap whatever the caller's probe reports.

use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;

/// Errors that can occur during configuration loading and validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be parsed.
    #[error("failed to parse configuration file: {message}")]
    ParseError {
        /// A description of the parse error.
        message: String,
    },

    /// A required configuration value is missing.
    #[error("missing required configuration: {field}")]
    MissingRequired {
        /// The name of the missing field.
        field: String,
    },

    /// A configuration value failed validation.
    #[error("invalid configuration value for '{field}': {reason}")]
    InvalidValue {
        /// The name of the invalid field.
        field: String,
        /// The reason the value is invalid.
        reason: String,
    },

    /// The `OrthoConfig` library returned an error while merging layers.
    #[error("configuration loading failed: {0}")]
    OrthoConfig(Arc<ortho_config::OrthoError>),
}

/// Errors that can occur while connecting to the engine under test.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Failed to connect to the container engine.
    #[error("failed to connect to container engine: {message}")]
    ConnectionFailed {
        /// A description of the connection failure.
        message: String,
    },

    /// The engine socket was not found.
    #[error("container engine socket not found: {path}")]
    SocketNotFound {
        /// The path where the socket was expected.
        path: PathBuf,
    },

    /// Permission denied when accessing the engine socket.
    #[error("permission denied accessing container socket: {path}")]
    PermissionDenied {
        /// The path to the socket.
        path: PathBuf,
    },

    /// The engine answered the ping with an error.
    #[error("container engine health check failed: {message}")]
    HealthCheckFailed {
        /// A description of the health check failure.
        message: String,
    },

    /// The engine did not answer the ping in time.
    #[error("container engine health check timed out after {seconds} seconds")]
    HealthCheckTimeout {
        /// The timeout duration in seconds.
        seconds: u64,
    },
}

/// Errors reported by the swarm service and task helpers.
#[derive(Debug, Error)]
pub enum SwarmError {
    /// Listing services failed.
    #[error("failed to list services: {message}")]
    ServiceListFailed {
        /// A description of the listing failure.
        message: String,
    },

    /// Creating a service failed.
    #[error("failed to create service '{name}': {message}")]
    ServiceCreateFailed {
        /// The requested service name.
        name: String,
        /// A description of the creation failure.
        message: String,
    },

    /// Listing the tasks of a service failed.
    #[error("failed to list tasks for service '{service_id}': {message}")]
    TaskListFailed {
        /// The ID of the service whose tasks were requested.
        service_id: String,
        /// A description of the listing failure.
        message: String,
    },

    /// Some labelled services survived a cleanup sweep.
    #[error("cleanup left {failed} of {total} test services behind: {first_message}")]
    CleanupIncomplete {
        /// Number of services that could not be removed.
        failed: usize,
        /// Number of labelled services found by the sweep.
        total: usize,
        /// The first removal failure, for diagnosis.
        first_message: String,
    },

    /// A service does not yet run the expected number of tasks.
    #[error("service '{service_id}' has {running} of {expected} tasks running")]
    ReplicasPending {
        /// The ID of the observed service.
        service_id: String,
        /// The replica count being waited for.
        expected: usize,
        /// The number of tasks observed in the running state.
        running: usize,
    },
}

/// Failure of a convergence poll.
///
/// The poller never recovers from probe failures itself. It keeps the most
/// recent one and surfaces it once the deadline fires.
#[derive(Debug, Error)]
pub enum ConvergeError<E> {
    /// The deadline fired after at least one probe attempt failed.
    #[error("failed to converge after {attempts} attempts: {source}")]
    Exhausted {
        /// Number of probe invocations that completed.
        attempts: usize,
        /// The failure reported by the most recent probe invocation.
        source: E,
    },

    /// The deadline fired before any probe attempt completed.
    #[error("failed to converge: no attempt completed before the deadline")]
    NoAttempt,
}

impl<E> ConvergeError<E> {
    /// Return the last probe failure, if any attempt completed.
    #[must_use]
    pub const fn last_error(&self) -> Option<&E> {
        match self {
            Self::Exhausted { source, .. } => Some(source),
            Self::NoAttempt => None,
        }
    }

    /// Return the number of probe invocations that completed.
    #[must_use]
    pub const fn attempts(&self) -> usize {
        match self {
            Self::Exhausted { attempts, .. } => *attempts,
            Self::NoAttempt => 0,
        }
    }

    /// Consume the error and return the last probe failure, if any.
    #[must_use]
    pub fn into_last_error(self) -> Option<E> {
        match self {
            Self::Exhausted { source, .. } => Some(source),
            Self::NoAttempt => None,
        }
    }
}

/// Top-level error type for the harness.
///
/// Helpers that span configuration, engine access and swarm calls return this
/// type. The binary converts it to `eyre::Report` at the boundary.
#[derive(Debug, Error)]
pub enum HarnessError {
    /// An error occurred during configuration.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// An error occurred while reaching the engine.
    #[error(transparent)]
    Engine(#[from] EngineError),

    /// An error occurred in a swarm helper.
    #[error(transparent)]
    Swarm(#[from] SwarmError),
}

/// A specialised `Result` type for harness operations.
pub type Result<T> = std::result::Result<T, HarnessError>;
