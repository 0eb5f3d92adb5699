//! Azure DevOps Provider implementation
//!
//! Project create goes through the asynchronous operation API; read, update,
//! and delete are synchronous calls.

use std::collections::HashMap;
use std::sync::Arc;

use azdo_core::provider::{ErrorKind, ProviderError, ProviderResult};
use azdo_core::resource::{Resource, ResourceId, State, Value};
use log::{info, warn};

use crate::client::{AggregatedClient, ProjectVisibility};
use crate::config::ProviderConfig;
use crate::error::{ProjectError, ProjectResult};
use crate::mapper::{ProjectConfig, ProjectState, VersionControl, expand_project, flatten_project};
use crate::operation::{Sleeper, TokioSleeper, create_with_polling};
use crate::project::get_project;
use crate::schemas::{
    DESCRIPTION, PROCESS_TEMPLATE_ID, PROJECT_NAME, PROJECT_RESOURCE_TYPE, VERSION_CONTROL,
    VISIBILITY, WORK_ITEM_TEMPLATE, project_schema,
};

/// Azure DevOps Provider
pub struct AzureDevOpsProvider {
    clients: AggregatedClient,
    config: ProviderConfig,
    sleeper: Arc<dyn Sleeper>,
}

impl AzureDevOpsProvider {
    pub fn new(clients: AggregatedClient, config: ProviderConfig) -> Self {
        Self {
            clients,
            config,
            sleeper: Arc::new(TokioSleeper),
        }
    }

    /// Replace the delay used between operation polls
    pub fn with_sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        self.sleeper = sleeper;
        self
    }

    // =========================================================================
    // Project Operations
    // =========================================================================

    /// Create a project and return its state as read back from the service
    pub async fn create_project(&self, config: &ProjectConfig) -> ProjectResult<ProjectState> {
        let project = expand_project(self.clients.core.as_ref(), config).await?;

        let operation = create_with_polling(
            &self.clients,
            &project,
            &self.config.create_poll,
            self.sleeper.as_ref(),
        )
        .await?;

        // The operation does not always report the new id; the name is unique.
        let id = operation.resource_id.as_deref().unwrap_or("");
        let state = self.read_project(id, &config.name).await?;
        info!(
            "created project {} ({})",
            config.name,
            state.id.as_deref().unwrap_or("unknown id")
        );
        Ok(state)
    }

    /// Read a project by id, or by name when no id is known
    pub async fn read_project(&self, id: &str, name: &str) -> ProjectResult<ProjectState> {
        let project = get_project(self.clients.core.as_ref(), id, name).await?;
        flatten_project(self.clients.core.as_ref(), &project).await
    }

    /// Update a project in place
    pub async fn update_project(&self, id: &str, config: &ProjectConfig) -> ProjectResult<()> {
        let mut project = expand_project(self.clients.core.as_ref(), config).await?;
        project.id = Some(id.to_string());

        self.clients.core.update_project(id, &project).await?;
        info!("updated project {} ({})", config.name, id);
        Ok(())
    }

    pub async fn delete_project(&self, id: &str) -> ProjectResult<()> {
        self.clients.core.delete_project(id).await?;
        info!("deleted project {}", id);
        Ok(())
    }

    // =========================================================================
    // Resource Operations
    // =========================================================================

    /// Read a resource, reporting a missing project as `State::not_found`
    pub async fn read_resource(
        &self,
        resource: &Resource,
        identifier: Option<&str>,
    ) -> ProviderResult<State> {
        ensure_project_type(&resource.id)?;
        let name = resource.get_string(PROJECT_NAME).unwrap_or("");

        match self.read_project(identifier.unwrap_or(""), name).await {
            Ok(state) => Ok(to_state(resource.id.clone(), &state)),
            Err(e) if e.is_not_found() => {
                warn!(
                    "project {}.{} no longer exists",
                    resource.id.resource_type, resource.id.name
                );
                Ok(State::not_found(resource.id.clone()))
            }
            Err(e) => Err(provider_error(e, &resource.id)),
        }
    }

    pub async fn create_resource(&self, resource: Resource) -> ProviderResult<State> {
        let config = declared_config(&resource)?;
        let state = self
            .create_project(&config)
            .await
            .map_err(|e| {
                // A miss on the read-back follows a successful create, so the
                // project is not absent from the driver's point of view.
                let err = provider_error(e, &resource.id);
                if err.is_not_found() {
                    err.with_kind(ErrorKind::Remote)
                } else {
                    err
                }
            })?;
        Ok(to_state(resource.id, &state))
    }

    pub async fn update_resource(
        &self,
        id: ResourceId,
        identifier: &str,
        from: &State,
        to: Resource,
    ) -> ProviderResult<State> {
        let config = declared_config(&to)?;

        if from.exists {
            let desired = project_schema().with_defaults(&to.attributes);
            let forced = project_schema().force_new_changes(&from.attributes, &desired);
            if !forced.is_empty() {
                return Err(ProviderError::validation(format!(
                    "Update not supported for {}, delete and recreate",
                    forced.join(", ")
                ))
                .for_resource(id));
            }
        }

        self.update_project(identifier, &config)
            .await
            .map_err(|e| provider_error(e, &id))?;

        let state = self
            .read_project(identifier, &config.name)
            .await
            .map_err(|e| provider_error(e, &id))?;
        Ok(to_state(id, &state))
    }

    pub async fn delete_resource(&self, id: &ResourceId, identifier: &str) -> ProviderResult<()> {
        ensure_project_type(id)?;
        self.delete_project(identifier)
            .await
            .map_err(|e| provider_error(e, id))
    }
}

// =============================================================================
// Attribute Conversion
// =============================================================================

fn ensure_project_type(id: &ResourceId) -> ProviderResult<()> {
    if id.resource_type == PROJECT_RESOURCE_TYPE {
        Ok(())
    } else {
        Err(ProviderError::validation(format!(
            "Unknown resource type: {}",
            id.resource_type
        ))
        .for_resource(id.clone()))
    }
}

/// Validate declared attributes and convert them into a `ProjectConfig`
pub fn declared_config(resource: &Resource) -> ProviderResult<ProjectConfig> {
    ensure_project_type(&resource.id)?;

    let schema = project_schema();
    let attributes = schema.with_defaults(&resource.attributes);
    if let Err(errors) = schema.validate(&attributes) {
        let messages: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
        return Err(ProviderError::validation(messages.join("; ")).for_resource(resource.id.clone()));
    }

    project_config(&attributes).map_err(|e| provider_error(e, &resource.id))
}

fn project_config(attributes: &HashMap<String, Value>) -> ProjectResult<ProjectConfig> {
    Ok(ProjectConfig {
        name: required_string(attributes, PROJECT_NAME)?.to_string(),
        description: attributes
            .get(DESCRIPTION)
            .and_then(Value::as_str)
            .map(str::to_string),
        visibility: required_string(attributes, VISIBILITY)?
            .parse::<ProjectVisibility>()
            .map_err(|m| ProjectError::invalid_attribute(VISIBILITY, m))?,
        version_control: required_string(attributes, VERSION_CONTROL)?
            .parse::<VersionControl>()
            .map_err(|m| ProjectError::invalid_attribute(VERSION_CONTROL, m))?,
        work_item_template: required_string(attributes, WORK_ITEM_TEMPLATE)?.to_string(),
    })
}

fn required_string<'a>(attributes: &'a HashMap<String, Value>, name: &str) -> ProjectResult<&'a str> {
    attributes
        .get(name)
        .and_then(Value::as_str)
        .ok_or_else(|| ProjectError::invalid_attribute(name, "expected a string"))
}

/// Convert observed project state into resource attributes
pub fn state_attributes(state: &ProjectState) -> HashMap<String, Value> {
    let config = &state.config;
    let mut attributes = HashMap::from([
        (PROJECT_NAME.to_string(), Value::from(config.name.as_str())),
        (VISIBILITY.to_string(), Value::from(config.visibility.as_str())),
        (
            VERSION_CONTROL.to_string(),
            Value::from(config.version_control.as_str()),
        ),
        (
            WORK_ITEM_TEMPLATE.to_string(),
            Value::from(config.work_item_template.as_str()),
        ),
        (
            PROCESS_TEMPLATE_ID.to_string(),
            Value::from(state.process_template_id.as_str()),
        ),
    ]);
    if let Some(description) = &config.description {
        attributes.insert(DESCRIPTION.to_string(), Value::from(description.as_str()));
    }
    attributes
}

fn to_state(id: ResourceId, state: &ProjectState) -> State {
    let existing = State::existing(id, state_attributes(state));
    match &state.id {
        Some(identifier) => existing.with_identifier(identifier.as_str()),
        None => existing,
    }
}

fn provider_error(err: ProjectError, id: &ResourceId) -> ProviderError {
    let kind = match &err {
        ProjectError::NotFound(_) => ErrorKind::NotFound,
        ProjectError::ReferenceNotFound { .. } | ProjectError::InvalidAttribute { .. } => {
            ErrorKind::Validation
        }
        _ => ErrorKind::Remote,
    };
    ProviderError::new(err.to_string())
        .with_kind(kind)
        .for_resource(id.clone())
        .with_cause(err)
}
