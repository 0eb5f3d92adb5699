//! Remote client collaborators and their wire types
//!
//! The HTTP client itself lives outside this crate. These traits describe the
//! calls the project resource makes, using the service's REST shapes
//! (camelCase JSON) for the values that cross the boundary.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failure reported by a remote client call
///
/// Displays exactly the message produced by the client so callers see the
/// underlying cause unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ClientError {
    pub message: String,
}

impl ClientError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Project visibility
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ProjectVisibility {
    Private,
    Public,
}

impl ProjectVisibility {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectVisibility::Private => "private",
            ProjectVisibility::Public => "public",
        }
    }
}

impl fmt::Display for ProjectVisibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ProjectVisibility {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "private" => Ok(ProjectVisibility::Private),
            "public" => Ok(ProjectVisibility::Public),
            other => Err(format!(
                "unknown visibility '{}', expected private or public",
                other
            )),
        }
    }
}

/// A project as the service represents it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamProject {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub visibility: ProjectVisibility,
    /// Capability group -> key -> value
    #[serde(default)]
    pub capabilities: HashMap<String, HashMap<String, String>>,
}

/// A process template (work item process) available in the organization
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Process {
    pub id: String,
    pub name: String,
}

/// Handle to an in-flight asynchronous operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationReference {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// Status of an asynchronous operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OperationStatus {
    #[serde(rename = "notSet", alias = "queued")]
    NotStarted,
    InProgress,
    Succeeded,
    Failed,
    Cancelled,
}

impl OperationStatus {
    /// No further polling is meaningful once a terminal status is observed
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            OperationStatus::Succeeded | OperationStatus::Failed | OperationStatus::Cancelled
        )
    }

    pub fn is_success(&self) -> bool {
        *self == OperationStatus::Succeeded
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OperationStatus::NotStarted => "notSet",
            OperationStatus::InProgress => "inProgress",
            OperationStatus::Succeeded => "succeeded",
            OperationStatus::Failed => "failed",
            OperationStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for OperationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Snapshot of an asynchronous operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Operation {
    pub id: String,
    pub status: OperationStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result_message: Option<String>,
    /// Id of the resource the operation acted on, when the service reports it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_id: Option<String>,
}

/// Key used to look a project up
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ProjectKey {
    Id(String),
    Name(String),
}

impl fmt::Display for ProjectKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProjectKey::Id(id) => write!(f, "id={}", id),
            ProjectKey::Name(name) => write!(f, "name={}", name),
        }
    }
}

/// Optional data to include when reading a project
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GetProjectOptions {
    pub include_capabilities: bool,
    pub include_history: bool,
}

/// Lookup of process templates, used to resolve template names and ids
#[async_trait]
pub trait ProcessCatalog: Send + Sync {
    /// All process templates available in the organization
    async fn list_processes(&self) -> Result<Vec<Process>, ClientError>;

    /// A single process template, `None` if the id is unknown
    async fn get_process_by_id(&self, id: &str) -> Result<Option<Process>, ClientError>;
}

/// Project calls of the core area API
#[async_trait]
pub trait CoreClient: ProcessCatalog {
    /// Queue creation of a project, returning a handle to the operation
    async fn queue_create_project(
        &self,
        project: &TeamProject,
    ) -> Result<OperationReference, ClientError>;

    /// Read a project, `None` if it does not exist
    async fn get_project(
        &self,
        key: &ProjectKey,
        options: GetProjectOptions,
    ) -> Result<Option<TeamProject>, ClientError>;

    async fn update_project(&self, id: &str, project: &TeamProject) -> Result<(), ClientError>;

    async fn delete_project(&self, id: &str) -> Result<(), ClientError>;
}

/// Status calls of the operations area API
#[async_trait]
pub trait OperationsClient: Send + Sync {
    async fn get_operation(&self, operation_id: &str) -> Result<Operation, ClientError>;
}

/// The set of clients a provider instance talks to
#[derive(Clone)]
pub struct AggregatedClient {
    pub core: Arc<dyn CoreClient>,
    pub operations: Arc<dyn OperationsClient>,
}

impl AggregatedClient {
    pub fn new(core: Arc<dyn CoreClient>, operations: Arc<dyn OperationsClient>) -> Self {
        Self { core, operations }
    }
}
