//! Swarm service and task helpers for end-to-end tests.
//!
//! These helpers are thin wrappers over the engine's swarm endpoints. Every
//! service they create carries the [`E2E_SERVICE_LABEL`] label, so a test run
//! can sweep up after itself (or after a previous, aborted run) with
//! [`clean_test_services`].
//!
//! Engine access goes through the [`SwarmClient`] trait, implemented for
//! `bollard::Docker`, so the helpers can be exercised without a live swarm.

mod cleanup;
mod service;
mod tasks;

use std::collections::HashMap;

use bollard::Docker;
use bollard::errors::Error as BollardError;
use bollard::models::{Service, ServiceCreateResponse, ServiceSpec, Task};
use bollard::query_parameters::{ListServicesOptions, ListTasksOptions};
use futures_util::future::BoxFuture;

pub use cleanup::{CleanupReport, RemovalFailure, clean_test_services};
pub use service::{CannedService, DEFAULT_IMAGE, canned_service_spec, create_service};
pub use tasks::{running_task_count, service_tasks, wait_for_running_tasks};

/// Label attached to every service created by the harness.
pub const E2E_SERVICE_LABEL: &str = "e2etesting";

/// Boxed future type returned by [`SwarmClient`] implementors.
pub type SwarmFuture<'a, T> = BoxFuture<'a, Result<T, BollardError>>;

/// Behaviour required from the engine client by the swarm helpers.
///
/// This abstraction keeps service and task logic testable without a running
/// swarm manager.
pub trait SwarmClient {
    /// List services matching `options`.
    fn list_services(&self, options: ListServicesOptions) -> SwarmFuture<'_, Vec<Service>>;

    /// Create a service from `spec`.
    fn create_service(&self, spec: ServiceSpec) -> SwarmFuture<'_, ServiceCreateResponse>;

    /// Remove the service with the given ID or name.
    fn remove_service(&self, service_id: &str) -> SwarmFuture<'_, ()>;

    /// List tasks matching `options`.
    fn list_tasks(&self, options: ListTasksOptions) -> SwarmFuture<'_, Vec<Task>>;
}

impl SwarmClient for Docker {
    fn list_services(&self, options: ListServicesOptions) -> SwarmFuture<'_, Vec<Service>> {
        Box::pin(async move { Self::list_services(self, Some(options)).await })
    }

    fn create_service(&self, spec: ServiceSpec) -> SwarmFuture<'_, ServiceCreateResponse> {
        Box::pin(async move { Self::create_service(self, spec, None).await })
    }

    fn remove_service(&self, service_id: &str) -> SwarmFuture<'_, ()> {
        let service_id_owned = String::from(service_id);
        Box::pin(async move { Self::delete_service(self, &service_id_owned).await })
    }

    fn list_tasks(&self, options: ListTasksOptions) -> SwarmFuture<'_, Vec<Task>> {
        Box::pin(async move { Self::list_tasks(self, Some(options)).await })
    }
}

/// Build an engine filter map from `(key, value)` pairs.
fn filters(pairs: &[(&str, &str)]) -> HashMap<String, Vec<String>> {
    let mut map: HashMap<String, Vec<String>> = HashMap::new();
    for &(key, value) in pairs {
        map.entry(String::from(key))
            .or_default()
            .push(String::from(value));
    }
    map
}

#[cfg(test)]
mod tests;
