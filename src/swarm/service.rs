//! Canned service specs and service creation.
//!
//! [`CannedService`] describes the minimal replicated service end-to-end
//! tests need: a name, a replica count, an image and labels. Its
//! [`CannedService::spec`] always includes the cleanup label, which extra
//! labels cannot override.

use std::collections::{BTreeMap, HashMap};

use bollard::models::{
    ServiceSpec, ServiceSpecMode, ServiceSpecModeReplicated, TaskSpec, TaskSpecContainerSpec,
};
use tracing::info;

use super::{E2E_SERVICE_LABEL, SwarmClient};
use crate::config::HarnessConfig;
use crate::error::{ConfigError, HarnessError, SwarmError};

/// Image used by canned services unless overridden.
pub const DEFAULT_IMAGE: &str = "nginx";

/// A replicated test service, labelled for cleanup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CannedService {
    name: String,
    replicas: u32,
    image: String,
    labels: BTreeMap<String, String>,
}

impl CannedService {
    /// Describe a replicated service running [`DEFAULT_IMAGE`].
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingRequired` when `name` is empty or
    /// whitespace-only.
    pub fn new(name: impl Into<String>, replicas: u32) -> Result<Self, HarnessError> {
        let name_value = name.into();
        let trimmed = name_value.trim();
        if trimmed.is_empty() {
            return Err(HarnessError::from(ConfigError::MissingRequired {
                field: String::from("service name"),
            }));
        }

        Ok(Self {
            name: String::from(trimmed),
            replicas,
            image: String::from(DEFAULT_IMAGE),
            labels: BTreeMap::new(),
        })
    }

    /// Describe a replicated service running the image from `config`.
    ///
    /// Falls back to [`DEFAULT_IMAGE`] when the configuration leaves the
    /// image unset or blank.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingRequired` when `name` is blank.
    pub fn from_config(
        config: &HarnessConfig,
        name: impl Into<String>,
        replicas: u32,
    ) -> Result<Self, HarnessError> {
        Self::new(name, replicas).map(|service| service.with_image(config.image_or_default()))
    }

    /// Run `image` instead of the default. Blank values are ignored.
    #[must_use]
    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        let image_value = image.into();
        if !image_value.trim().is_empty() {
            self.image = image_value;
        }
        self
    }

    /// Attach an extra label. The cleanup label cannot be overridden.
    #[must_use]
    pub fn with_label(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let key_value = key.into();
        if key_value != E2E_SERVICE_LABEL {
            self.labels.insert(key_value, value.into());
        }
        self
    }

    /// Return the service name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Return the requested replica count.
    #[must_use]
    pub const fn replicas(&self) -> u32 {
        self.replicas
    }

    /// Return the container image.
    #[must_use]
    pub fn image(&self) -> &str {
        &self.image
    }

    /// Build the engine service spec.
    #[must_use]
    pub fn spec(&self) -> ServiceSpec {
        let mut labels: HashMap<String, String> = self
            .labels
            .iter()
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();
        labels.insert(String::from(E2E_SERVICE_LABEL), String::from("true"));

        ServiceSpec {
            name: Some(self.name.clone()),
            labels: Some(labels),
            task_template: Some(TaskSpec {
                container_spec: Some(TaskSpecContainerSpec {
                    image: Some(self.image.clone()),
                    ..TaskSpecContainerSpec::default()
                }),
                ..TaskSpec::default()
            }),
            mode: Some(ServiceSpecMode {
                replicated: Some(ServiceSpecModeReplicated {
                    replicas: Some(i64::from(self.replicas)),
                }),
                ..ServiceSpecMode::default()
            }),
            ..ServiceSpec::default()
        }
    }
}

/// Return a ready-to-go labelled service spec with `name` and `replicas`.
///
/// # Errors
///
/// Returns `ConfigError::MissingRequired` when `name` is blank.
pub fn canned_service_spec(
    name: impl Into<String>,
    replicas: u32,
) -> Result<ServiceSpec, HarnessError> {
    CannedService::new(name, replicas).map(|service| service.spec())
}

/// Create a service and return the engine-assigned ID.
///
/// # Errors
///
/// Returns `SwarmError::ServiceCreateFailed` when the engine rejects the spec
/// or answers without a service ID.
pub async fn create_service<C: SwarmClient>(
    client: &C,
    spec: ServiceSpec,
) -> Result<String, HarnessError> {
    let name = spec.name.clone().unwrap_or_default();

    let response = client.create_service(spec).await.map_err(|error| {
        HarnessError::from(SwarmError::ServiceCreateFailed {
            name: name.clone(),
            message: error.to_string(),
        })
    })?;

    let service_id = response.id.ok_or_else(|| {
        HarnessError::from(SwarmError::ServiceCreateFailed {
            name: name.clone(),
            message: String::from("engine returned no service ID"),
        })
    })?;

    info!(%service_id, service_name = %name, "created test service");
    Ok(service_id)
}
