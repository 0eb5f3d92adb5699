//! Azure DevOps Provider
//!
//! Manages Azure DevOps projects. Project creation is asynchronous on the
//! service side: the create call returns an operation handle that is polled
//! until the project exists.
//!
//! ## Module Structure
//!
//! - `client` - Remote client traits and wire types
//! - `config` - Provider block configuration
//! - `error` - Project error taxonomy
//! - `mapper` - Declared configuration <-> `TeamProject` conversion
//! - `operation` - Create submission and operation polling
//! - `project` - Project lookup by id or name
//! - `provider` - AzureDevOpsProvider implementation
//! - `schemas` - Resource schemas

pub mod client;
pub mod config;
pub mod error;
pub mod mapper;
pub mod operation;
pub mod project;
pub mod provider;
pub mod schemas;

#[cfg(test)]
mod mock;

// Re-export main types
pub use client::{AggregatedClient, ClientError, CoreClient, OperationsClient, ProcessCatalog};
pub use config::ProviderConfig;
pub use error::{ProjectError, ProjectResult};
pub use mapper::{ProjectConfig, ProjectState, VersionControl};
pub use operation::{PollPolicy, Sleeper, TokioSleeper};
pub use provider::AzureDevOpsProvider;

use azdo_core::provider::{BoxFuture, Provider, ProviderResult, ResourceType};
use azdo_core::resource::{Resource, ResourceId, State};

use schemas::ProjectType;

// =============================================================================
// Provider Trait Implementation
// =============================================================================

impl Provider for AzureDevOpsProvider {
    fn name(&self) -> &'static str {
        "azuredevops"
    }

    fn resource_types(&self) -> Vec<Box<dyn ResourceType>> {
        vec![Box::new(ProjectType)]
    }

    fn read(
        &self,
        resource: &Resource,
        identifier: Option<&str>,
    ) -> BoxFuture<'_, ProviderResult<State>> {
        let resource = resource.clone();
        let identifier = identifier.map(|s| s.to_string());
        Box::pin(async move {
            self.read_resource(&resource, identifier.as_deref())
                .await
        })
    }

    fn create(&self, resource: &Resource) -> BoxFuture<'_, ProviderResult<State>> {
        let resource = resource.clone();
        Box::pin(async move { self.create_resource(resource).await })
    }

    fn update(
        &self,
        id: &ResourceId,
        identifier: &str,
        from: &State,
        to: &Resource,
    ) -> BoxFuture<'_, ProviderResult<State>> {
        let id = id.clone();
        let identifier = identifier.to_string();
        let from = from.clone();
        let to = to.clone();
        Box::pin(async move { self.update_resource(id, &identifier, &from, to).await })
    }

    fn delete(&self, id: &ResourceId, identifier: &str) -> BoxFuture<'_, ProviderResult<()>> {
        let id = id.clone();
        let identifier = identifier.to_string();
        Box::pin(async move { self.delete_resource(&id, &identifier).await })
    }
}
