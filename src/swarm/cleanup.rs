//! Label-based removal of test services.
//!
//! Every service built by [`super::CannedService`] carries the
//! [`E2E_SERVICE_LABEL`] label. [`clean_test_services`] lists services by that
//! label and removes each one, so a sweep also catches services left behind
//! by an earlier run that aborted before its own cleanup.
//!
//! # Partial failures
//!
//! A removal can fail while the rest succeed (a service mid-update, or one
//! already removed by a concurrent sweep). The sweep keeps going and records
//! each failure in a [`CleanupReport`]. Callers that treat leftovers as fatal
//! call [`CleanupReport::into_result`]; callers that only want best-effort
//! cleanup can inspect [`CleanupReport::failures`] and carry on. Only a
//! failure to list the labelled services aborts the sweep.

use bollard::query_parameters::ListServicesOptions;
use tracing::{debug, info, warn};

use super::{E2E_SERVICE_LABEL, SwarmClient, filters};
use crate::error::{HarnessError, SwarmError};

/// A labelled service that could not be removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemovalFailure {
    /// The ID of the service that survived the sweep.
    pub service_id: String,
    /// The engine's description of the failure.
    pub message: String,
}

/// Outcome of a cleanup sweep.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CleanupReport {
    removed: Vec<String>,
    failures: Vec<RemovalFailure>,
}

impl CleanupReport {
    /// Return the IDs of the services that were removed.
    #[must_use]
    pub fn removed(&self) -> &[String] {
        &self.removed
    }

    /// Return the services that could not be removed.
    #[must_use]
    pub fn failures(&self) -> &[RemovalFailure] {
        &self.failures
    }

    /// Return whether every labelled service was removed.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    /// Turn leftover services into an error.
    ///
    /// # Errors
    ///
    /// Returns `SwarmError::CleanupIncomplete` when any removal failed.
    pub fn into_result(self) -> Result<Vec<String>, HarnessError> {
        let Some(first) = self.failures.first() else {
            return Ok(self.removed);
        };

        Err(HarnessError::from(SwarmError::CleanupIncomplete {
            failed: self.failures.len(),
            total: self.failures.len() + self.removed.len(),
            first_message: format!("{}: {}", first.service_id, first.message),
        }))
    }
}

/// Remove every service labelled [`E2E_SERVICE_LABEL`].
///
/// A failed removal does not stop the sweep; it is recorded in the returned
/// report so the remaining services still get removed.
///
/// # Errors
///
/// Returns `SwarmError::ServiceListFailed` when the labelled services cannot
/// be listed.
pub async fn clean_test_services<C: SwarmClient>(client: &C) -> Result<CleanupReport, HarnessError> {
    let options = ListServicesOptions {
        filters: Some(filters(&[("label", E2E_SERVICE_LABEL)])),
        ..ListServicesOptions::default()
    };

    let services = client.list_services(options).await.map_err(|error| {
        HarnessError::from(SwarmError::ServiceListFailed {
            message: error.to_string(),
        })
    })?;

    let mut report = CleanupReport::default();
    for service in services {
        let Some(service_id) = service.id else {
            warn!("skipping labelled service without an ID");
            continue;
        };

        match client.remove_service(&service_id).await {
            Ok(()) => {
                debug!(%service_id, "removed test service");
                report.removed.push(service_id);
            }
            Err(error) => {
                warn!(%service_id, %error, "failed to remove test service");
                report.failures.push(RemovalFailure {
                    service_id,
                    message: error.to_string(),
                });
            }
        }
    }

    info!(
        removed = report.removed.len(),
        failed = report.failures.len(),
        "test service cleanup finished"
    );
    Ok(report)
}
