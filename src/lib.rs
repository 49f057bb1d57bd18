//! Test-support helpers for end-to-end tests against a swarm-mode engine.
//!
//! The crate wraps a handful of swarm calls (creating labelled test
//! services, sweeping them up afterwards, listing their tasks) and provides
//! [`converge::ConvergencePoller`], which retries a probe on a fixed interval
//! until it succeeds or a deadline fires. Orchestration itself is left to the
//! engine under test.
//!
//! # Modules
//!
//! - [`config`]: Layered configuration (CLI > env > file > defaults)
//! - [`converge`]: Fixed-interval polling for eventual consistency
//! - [`engine`]: Engine endpoint resolution, connection and health check
//! - [`error`]: Semantic error types
//! - [`swarm`]: Service and task helpers

pub mod config;
pub mod converge;
pub mod engine;
pub mod error;
pub mod swarm;
