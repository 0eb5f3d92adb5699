//! Error types for project operations

use thiserror::Error;

use crate::client::{ClientError, OperationStatus};

/// Errors raised while creating, reading, or mapping a project
#[derive(Debug, Error)]
pub enum ProjectError {
    /// The create request was rejected before an operation handle existed
    #[error(transparent)]
    Submit(ClientError),

    /// Checking the status of an operation failed
    #[error(transparent)]
    StatusQuery(ClientError),

    /// The operation completed without succeeding
    #[error("Operation finished with status {status}{}", detail(message))]
    OperationFailed {
        status: OperationStatus,
        message: Option<String>,
    },

    /// The operation was still running when the poll budget ran out
    #[error("Operation {operation_id} did not complete after {polls} status checks")]
    Timeout { operation_id: String, polls: u32 },

    /// A name or id reference could not be resolved against the service
    #[error("{kind} '{value}' not found")]
    ReferenceNotFound { kind: &'static str, value: String },

    /// The project does not exist
    #[error("Project not found ({0})")]
    NotFound(String),

    /// The project returned by the service lacks a capability entry
    #[error("Project is missing capability {group}.{key}")]
    MissingCapability {
        group: &'static str,
        key: &'static str,
    },

    /// A declared attribute could not be converted
    #[error("Invalid value for '{name}': {message}")]
    InvalidAttribute { name: String, message: String },

    /// Any other remote call failure
    #[error(transparent)]
    Client(#[from] ClientError),
}

fn detail(message: &Option<String>) -> String {
    match message {
        Some(m) => format!(": {}", m),
        None => String::new(),
    }
}

impl ProjectError {
    pub fn invalid_attribute(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidAttribute {
            name: name.into(),
            message: message.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ProjectError::NotFound(_))
    }
}

pub type ProjectResult<T> = Result<T, ProjectError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn submit_and_status_errors_are_transparent() {
        let err = ProjectError::Submit(ClientError::new("QueueCreateProject() Failed"));
        assert_eq!(err.to_string(), "QueueCreateProject() Failed");

        let err = ProjectError::StatusQuery(ClientError::new("GetOperation() failed"));
        assert_eq!(err.to_string(), "GetOperation() failed");
    }

    #[test]
    fn operation_failed_names_the_status() {
        let err = ProjectError::OperationFailed {
            status: OperationStatus::Cancelled,
            message: None,
        };
        assert_eq!(err.to_string(), "Operation finished with status cancelled");

        let err = ProjectError::OperationFailed {
            status: OperationStatus::Failed,
            message: Some("TF200019: project name in use".to_string()),
        };
        assert_eq!(
            err.to_string(),
            "Operation finished with status failed: TF200019: project name in use"
        );
    }

    #[test]
    fn reference_not_found_names_the_value() {
        let err = ProjectError::ReferenceNotFound {
            kind: "process template",
            value: "Agil".to_string(),
        };
        assert_eq!(err.to_string(), "process template 'Agil' not found");
        assert!(!err.is_not_found());
        assert!(ProjectError::NotFound("name=x".to_string()).is_not_found());
    }
}
