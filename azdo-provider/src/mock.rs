//! Scripted client collaborators for unit tests

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use crate::client::{
    ClientError, CoreClient, GetProjectOptions, Operation, OperationReference, OperationStatus,
    OperationsClient, Process, ProcessCatalog, ProjectKey, ProjectVisibility, TeamProject,
};
use crate::mapper::{ProjectConfig, VersionControl};
use crate::operation::Sleeper;

/// Calls observed by `MockCoreClient`, in order
#[derive(Debug, Clone, PartialEq)]
pub enum CoreCall {
    ListProcesses,
    GetProcessById(String),
    QueueCreateProject(TeamProject),
    GetProject(ProjectKey, GetProjectOptions),
    UpdateProject(String, TeamProject),
    DeleteProject(String),
}

pub struct MockCoreClient {
    processes: Vec<Process>,
    create_error: Option<ClientError>,
    operation_id: String,
    store_created: bool,
    projects: Mutex<Vec<TeamProject>>,
    calls: Mutex<Vec<CoreCall>>,
}

impl MockCoreClient {
    pub fn new(processes: Vec<Process>) -> Self {
        Self {
            processes,
            create_error: None,
            operation_id: "op-1".to_string(),
            store_created: true,
            projects: Mutex::new(Vec::new()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn failing_create(mut self, message: &str) -> Self {
        self.create_error = Some(ClientError::new(message));
        self
    }

    /// Accept create submissions without the project becoming readable
    pub fn not_storing_created(mut self) -> Self {
        self.store_created = false;
        self
    }

    pub fn with_project(self, project: TeamProject) -> Self {
        self.projects.lock().unwrap().push(project);
        self
    }

    pub fn calls(&self) -> Vec<CoreCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn projects(&self) -> Vec<TeamProject> {
        self.projects.lock().unwrap().clone()
    }

    fn record(&self, call: CoreCall) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl ProcessCatalog for MockCoreClient {
    async fn list_processes(&self) -> Result<Vec<Process>, ClientError> {
        self.record(CoreCall::ListProcesses);
        Ok(self.processes.clone())
    }

    async fn get_process_by_id(&self, id: &str) -> Result<Option<Process>, ClientError> {
        self.record(CoreCall::GetProcessById(id.to_string()));
        Ok(self.processes.iter().find(|p| p.id == id).cloned())
    }
}

#[async_trait]
impl CoreClient for MockCoreClient {
    async fn queue_create_project(
        &self,
        project: &TeamProject,
    ) -> Result<OperationReference, ClientError> {
        self.record(CoreCall::QueueCreateProject(project.clone()));
        if let Some(err) = &self.create_error {
            return Err(err.clone());
        }

        if self.store_created {
            let mut created = project.clone();
            created.id = Some(format!("id-{}", project.name));
            self.projects.lock().unwrap().push(created);
        }

        Ok(OperationReference {
            id: self.operation_id.clone(),
            url: None,
        })
    }

    async fn get_project(
        &self,
        key: &ProjectKey,
        options: GetProjectOptions,
    ) -> Result<Option<TeamProject>, ClientError> {
        self.record(CoreCall::GetProject(key.clone(), options));
        let projects = self.projects.lock().unwrap();
        let found = projects.iter().find(|p| match key {
            ProjectKey::Id(id) => p.id.as_deref() == Some(id.as_str()),
            ProjectKey::Name(name) => &p.name == name,
        });
        Ok(found.cloned())
    }

    async fn update_project(&self, id: &str, project: &TeamProject) -> Result<(), ClientError> {
        self.record(CoreCall::UpdateProject(id.to_string(), project.clone()));
        let mut projects = self.projects.lock().unwrap();
        match projects.iter_mut().find(|p| p.id.as_deref() == Some(id)) {
            Some(existing) => {
                *existing = project.clone();
                Ok(())
            }
            None => Err(ClientError::new(format!("project {} does not exist", id))),
        }
    }

    async fn delete_project(&self, id: &str) -> Result<(), ClientError> {
        self.record(CoreCall::DeleteProject(id.to_string()));
        let mut projects = self.projects.lock().unwrap();
        let before = projects.len();
        projects.retain(|p| p.id.as_deref() != Some(id));
        if projects.len() == before {
            Err(ClientError::new(format!("project {} does not exist", id)))
        } else {
            Ok(())
        }
    }
}

/// Replays scripted status responses, then repeats `fallback` if set
pub struct MockOperationsClient {
    responses: Mutex<VecDeque<Result<Operation, ClientError>>>,
    fallback: Option<OperationStatus>,
    resource_id: Option<String>,
    calls: Mutex<Vec<String>>,
}

impl MockOperationsClient {
    pub fn with_statuses(statuses: &[OperationStatus]) -> Self {
        Self {
            responses: Mutex::new(statuses.iter().map(|s| Ok(operation(*s))).collect()),
            fallback: None,
            resource_id: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn always(status: OperationStatus) -> Self {
        let mut client = Self::with_statuses(&[]);
        client.fallback = Some(status);
        client
    }

    pub fn failing(message: &str) -> Self {
        let client = Self::with_statuses(&[]);
        client
            .responses
            .lock()
            .unwrap()
            .push_back(Err(ClientError::new(message)));
        client
    }

    /// Report `id` as the operation's target resource on success
    pub fn reporting_resource(mut self, id: &str) -> Self {
        self.resource_id = Some(id.to_string());
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl OperationsClient for MockOperationsClient {
    async fn get_operation(&self, operation_id: &str) -> Result<Operation, ClientError> {
        self.calls.lock().unwrap().push(operation_id.to_string());
        let next = self.responses.lock().unwrap().pop_front();
        let mut result = match (next, self.fallback) {
            (Some(result), _) => result,
            (None, Some(status)) => Ok(operation(status)),
            (None, None) => Err(ClientError::new("unexpected GetOperation() call")),
        };
        if let Ok(op) = &mut result {
            op.id = operation_id.to_string();
            if op.status.is_success() {
                op.resource_id = self.resource_id.clone();
            }
        }
        result
    }
}

fn operation(status: OperationStatus) -> Operation {
    Operation {
        id: String::new(),
        status,
        result_message: None,
        resource_id: None,
    }
}

/// Records requested delays instead of sleeping
#[derive(Default)]
pub struct RecordingSleeper {
    sleeps: Mutex<Vec<Duration>>,
}

impl RecordingSleeper {
    pub fn sleeps(&self) -> Vec<Duration> {
        self.sleeps.lock().unwrap().clone()
    }
}

#[async_trait]
impl Sleeper for RecordingSleeper {
    async fn sleep(&self, duration: Duration) {
        self.sleeps.lock().unwrap().push(duration);
    }
}

pub fn agile_catalog() -> Vec<Process> {
    vec![
        Process {
            id: "T1".to_string(),
            name: "Agile".to_string(),
        },
        Process {
            id: "T2".to_string(),
            name: "Scrum".to_string(),
        },
    ]
}

pub fn sample_config() -> ProjectConfig {
    ProjectConfig {
        name: "Proj1".to_string(),
        description: Some("d".to_string()),
        visibility: ProjectVisibility::Private,
        version_control: VersionControl::Git,
        work_item_template: "Agile".to_string(),
    }
}

pub fn sample_project(id: &str) -> TeamProject {
    TeamProject {
        id: Some(id.to_string()),
        name: "Proj1".to_string(),
        description: Some("d".to_string()),
        visibility: ProjectVisibility::Private,
        capabilities: HashMap::from([
            (
                "versioncontrol".to_string(),
                HashMap::from([("sourceControlType".to_string(), "Git".to_string())]),
            ),
            (
                "processTemplate".to_string(),
                HashMap::from([("templateTypeId".to_string(), "T1".to_string())]),
            ),
        ]),
    }
}

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}
