//! Task listing and replica convergence.
//!
//! A service reports its desired replica count straight away, but its tasks
//! reach the `running` state some time later. These helpers list a service's
//! tasks by desired state, count those actually observed running, and poll
//! with a [`ConvergencePoller`] until the count matches.
//!
//! Each poll attempt fails with `SwarmError::ReplicasPending` (or the listing
//! error), and the last such failure is what a timed-out wait reports.

use std::time::Duration;

use bollard::models::{Task, TaskState};
use bollard::query_parameters::ListTasksOptions;
use tracing::info;

use super::{SwarmClient, filters};
use crate::converge::ConvergencePoller;
use crate::error::{ConvergeError, HarnessError, SwarmError};

/// Return the tasks the orchestrator wants running for `service_id`.
///
/// Tasks are filtered by desired state, so a task that is still starting (or
/// has just failed and is about to be replaced) is included.
///
/// # Errors
///
/// Returns `SwarmError::TaskListFailed` when the engine rejects the request.
pub async fn service_tasks<C: SwarmClient>(
    client: &C,
    service_id: &str,
) -> Result<Vec<Task>, HarnessError> {
    let options = ListTasksOptions {
        filters: Some(filters(&[
            ("desired-state", "running"),
            ("service", service_id),
        ])),
        ..ListTasksOptions::default()
    };

    client.list_tasks(options).await.map_err(|error| {
        HarnessError::from(SwarmError::TaskListFailed {
            service_id: String::from(service_id),
            message: error.to_string(),
        })
    })
}

/// Count the tasks whose observed state is `running`.
#[must_use]
pub fn running_task_count(tasks: &[Task]) -> usize {
    tasks
        .iter()
        .filter(|task| {
            task.status
                .as_ref()
                .is_some_and(|status| matches!(status.state, Some(TaskState::RUNNING)))
        })
        .count()
}

/// Wait until `service_id` runs exactly `replicas` tasks.
///
/// Polls [`service_tasks`] with `poller` until the running count matches or
/// `timeout` elapses.
///
/// # Errors
///
/// Returns `ConvergeError::Exhausted` wrapping the last observation (a
/// `SwarmError::ReplicasPending` or a listing failure) when the service does
/// not converge in time.
pub async fn wait_for_running_tasks<C: SwarmClient>(
    client: &C,
    service_id: &str,
    replicas: usize,
    poller: &ConvergencePoller,
    timeout: Duration,
) -> Result<(), ConvergeError<HarnessError>> {
    info!(service_id, replicas, ?timeout, "waiting for service tasks");
    poller
        .wait_for(timeout, || check_running_tasks(client, service_id, replicas))
        .await
}

async fn check_running_tasks<C: SwarmClient>(
    client: &C,
    service_id: &str,
    expected: usize,
) -> Result<(), HarnessError> {
    let tasks = service_tasks(client, service_id).await?;
    let running = running_task_count(&tasks);
    if running == expected {
        return Ok(());
    }

    Err(HarnessError::from(SwarmError::ReplicasPending {
        service_id: String::from(service_id),
        expected,
        running,
    }))
}
