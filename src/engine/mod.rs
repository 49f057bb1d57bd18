//! Access to the container engine under test.
//!
//! The endpoint is chosen from, highest priority first:
//!
//! 1. `--engine-socket` on the command line
//! 2. `engine_socket` in the config file
//! 3. `SWARM_E2E_ENGINE_SOCKET`
//! 4. `DOCKER_HOST`, then `CONTAINER_HOST`, then `PODMAN_HOST`
//! 5. the platform default socket
//!
//! Steps 1 to 3 are merged by the config loader; [`SocketResolver`] handles
//! the rest.

mod connector;
mod error_classification;
mod socket;

pub use connector::EngineConnector;
pub use socket::SocketResolver;
