//! Classification of engine client connection failures.
//!
//! Low-level `bollard` errors are mapped onto `EngineError` variants so a
//! misconfigured test environment produces an actionable message.

use std::io::ErrorKind;
use std::path::Path;

use crate::error::EngineError;

/// Extract the filesystem path from a `unix://` or `npipe://` URI.
pub(super) fn socket_path(socket_uri: &str) -> Option<&Path> {
    socket_uri
        .strip_prefix("unix://")
        .or_else(|| socket_uri.strip_prefix("npipe://"))
        .map(Path::new)
}

/// Map a `bollard` connection error onto the most specific `EngineError`.
pub(super) fn classify_connection_error(
    error: &bollard::errors::Error,
    socket_uri: &str,
) -> EngineError {
    let path = socket_path(socket_uri);

    let kind = match error {
        bollard::errors::Error::SocketNotFoundError(_) => Some(ErrorKind::NotFound),
        bollard::errors::Error::IOError { err } => {
            Some(io_error_kind_in_chain(err).unwrap_or_else(|| err.kind()))
        }
        _ => io_error_kind_in_chain(error),
    };

    match (kind, path) {
        (Some(ErrorKind::NotFound), Some(socket)) => EngineError::SocketNotFound {
            path: socket.to_path_buf(),
        },
        (Some(ErrorKind::PermissionDenied), Some(socket)) => EngineError::PermissionDenied {
            path: socket.to_path_buf(),
        },
        _ => EngineError::ConnectionFailed {
            message: error.to_string(),
        },
    }
}

/// Walk the source chain of `error` looking for an `io::Error`.
fn io_error_kind_in_chain(error: &dyn std::error::Error) -> Option<ErrorKind> {
    let mut current = error.source();
    while let Some(cause) = current {
        if let Some(io_error) = cause.downcast_ref::<std::io::Error>() {
            return Some(io_error.kind());
        }
        current = cause.source();
    }
    None
}
