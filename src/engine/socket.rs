//! Engine endpoint resolution.
//!
//! The endpoint for the engine under test comes from, in order: an explicit
//! value (CLI flag, config file or `SWARM_E2E_ENGINE_SOCKET`), the
//! `DOCKER_HOST`, `CONTAINER_HOST` and `PODMAN_HOST` environment variables,
//! and finally the platform default socket.

/// Environment variables consulted after explicit configuration.
const FALLBACK_ENV_VARS: &[&str] = &["DOCKER_HOST", "CONTAINER_HOST", "PODMAN_HOST"];

#[cfg(unix)]
const DEFAULT_SOCKET: &str = "unix:///var/run/docker.sock";

#[cfg(windows)]
const DEFAULT_SOCKET: &str = "npipe:////./pipe/docker_engine";

/// Resolves the engine endpoint from configuration and the environment.
///
/// Environment access goes through `mockable::Env` so resolution can be
/// tested without touching the process environment.
pub struct SocketResolver<'a, E: mockable::Env> {
    env: &'a E,
}

impl<'a, E: mockable::Env> SocketResolver<'a, E> {
    /// Create a resolver reading from `env`.
    #[must_use]
    pub const fn new(env: &'a E) -> Self {
        Self { env }
    }

    /// Return the first non-empty fallback environment variable.
    #[must_use]
    pub fn resolve_from_env(&self) -> Option<String> {
        FALLBACK_ENV_VARS
            .iter()
            .filter_map(|var_name| self.env.string(var_name))
            .find(|value| !value.is_empty())
    }

    /// Return the platform default endpoint.
    #[must_use]
    pub const fn default_socket() -> &'static str {
        DEFAULT_SOCKET
    }

    /// Resolve the endpoint, preferring a non-empty `configured` value.
    #[must_use]
    pub fn resolve(&self, configured: Option<&str>) -> String {
        configured
            .filter(|socket| !socket.is_empty())
            .map(String::from)
            .or_else(|| self.resolve_from_env())
            .unwrap_or_else(|| String::from(DEFAULT_SOCKET))
    }
}

/// A resolved endpoint, normalised for the engine client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) enum Endpoint {
    /// Unix socket or Windows named pipe URI.
    Socket(String),
    /// HTTP or HTTPS URL. `tcp://` endpoints are rewritten to `http://`.
    Http(String),
}

impl Endpoint {
    /// Normalise a user-supplied endpoint.
    ///
    /// Bare paths beginning with `\\` or `//` are treated as named pipes and
    /// every other bare path as a Unix socket. Detection is syntactic, not
    /// platform-based.
    pub(super) fn parse(socket: &str) -> Self {
        if socket.starts_with("unix://") || socket.starts_with("npipe://") {
            return Self::Socket(String::from(socket));
        }

        if let Some(rest) = socket.strip_prefix("tcp://") {
            return Self::Http(format!("http://{rest}"));
        }

        if socket.starts_with("http://") || socket.starts_with("https://") {
            return Self::Http(String::from(socket));
        }

        if socket.starts_with("\\\\") || socket.starts_with("//") {
            Self::Socket(format!("npipe://{socket}"))
        } else {
            Self::Socket(format!("unix://{socket}"))
        }
    }
}
