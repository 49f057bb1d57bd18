//! Unit tests for the swarm helpers.
//!
//! This module contains tests organised into:
//! - [`service_tests`] - Canned specs and service creation
//! - [`cleanup_tests`] - Label-filtered cleanup sweeps
//! - [`task_tests`] - Task listing and replica convergence


use bollard::errors::Error as BollardError;
use bollard::models::{Service, ServiceCreateResponse, ServiceSpec, Task, TaskState, TaskStatus};
use bollard::query_parameters::{ListServicesOptions, ListTasksOptions};
use mockall::mock;
use rstest::fixture;

use super::{SwarmClient, SwarmFuture};

mock! {
    #[derive(Debug)]
    Swarm {}

    impl SwarmClient for Swarm {
        fn list_services(&self, options: ListServicesOptions) -> SwarmFuture<'_, Vec<Service>>;
        fn create_service(&self, spec: ServiceSpec) -> SwarmFuture<'_, ServiceCreateResponse>;
        fn remove_service(&self, service_id: &str) -> SwarmFuture<'_, ()>;
        fn list_tasks(&self, options: ListTasksOptions) -> SwarmFuture<'_, Vec<Task>>;
    }
}

type RuntimeFixture = std::io::Result<tokio::runtime::Runtime>;
type TestResult = Result<(), Box<dyn std::error::Error>>;

#[fixture]
fn runtime() -> RuntimeFixture {
    tokio::runtime::Runtime::new()
}

/// Fixture providing a current-thread runtime with a paused clock.
#[fixture]
fn paused_runtime() -> RuntimeFixture {
    tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .start_paused(true)
        .build()
}

fn service_with_id(id: &str) -> Service {
    Service {
        id: Some(String::from(id)),
        ..Service::default()
    }
}

fn task_in_state(id: &str, state: TaskState) -> Task {
    Task {
        id: Some(String::from(id)),
        status: Some(TaskStatus {
            state: Some(state),
            ..TaskStatus::default()
        }),
        ..Task::default()
    }
}

fn server_error(message: &str) -> BollardError {
    BollardError::DockerResponseServerError {
        status_code: 500,
        message: String::from(message),
    }
}

/// Return the single value recorded under `key` in an engine filter map.
fn filter_values<'a>(
    filters: Option<&'a std::collections::HashMap<String, Vec<String>>>,
    key: &str,
) -> Option<&'a [String]> {
    filters.and_then(|map| map.get(key)).map(Vec::as_slice)
}
