//! Mapping between declared project configuration and `TeamProject`
//!
//! The service multiplexes two unrelated settings into the project's
//! capability map: the version control system and the process template id.
//! Declared configuration names the template rather than carrying its id.
//! `expand_project` and `flatten_project` are exact inverses as long as the
//! template is present in the catalog:
//!
//! ```text
//! flatten_project(expand_project(c)).config == c
//! ```

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use log::debug;

use crate::client::{ProcessCatalog, ProjectVisibility, TeamProject};
use crate::error::{ProjectError, ProjectResult};

pub const VERSION_CONTROL_CAPABILITY: &str = "versioncontrol";
pub const SOURCE_CONTROL_TYPE_KEY: &str = "sourceControlType";
pub const PROCESS_TEMPLATE_CAPABILITY: &str = "processTemplate";
pub const TEMPLATE_TYPE_ID_KEY: &str = "templateTypeId";

const PROCESS_TEMPLATE: &str = "process template";

/// Version control system of a project
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VersionControl {
    Git,
    Tfvc,
}

impl VersionControl {
    pub fn as_str(&self) -> &'static str {
        match self {
            VersionControl::Git => "Git",
            VersionControl::Tfvc => "Tfvc",
        }
    }
}

impl fmt::Display for VersionControl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VersionControl {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Git" => Ok(VersionControl::Git),
            "Tfvc" => Ok(VersionControl::Tfvc),
            other => Err(format!(
                "unknown version control '{}', expected Git or Tfvc",
                other
            )),
        }
    }
}

/// Declared configuration of a project
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectConfig {
    pub name: String,
    pub description: Option<String>,
    pub visibility: ProjectVisibility,
    pub version_control: VersionControl,
    /// Process template name (e.g., "Agile")
    pub work_item_template: String,
}

/// Observed project: declared fields plus values assigned by the service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectState {
    pub id: Option<String>,
    pub process_template_id: String,
    pub config: ProjectConfig,
}

/// Typed view of the capability entries the provider manages
#[derive(Debug, Clone, PartialEq, Eq)]
struct ProjectCapabilities {
    version_control: VersionControl,
    process_template_id: String,
}

impl ProjectCapabilities {
    fn into_wire(self) -> HashMap<String, HashMap<String, String>> {
        HashMap::from([
            (
                VERSION_CONTROL_CAPABILITY.to_string(),
                HashMap::from([(
                    SOURCE_CONTROL_TYPE_KEY.to_string(),
                    self.version_control.as_str().to_string(),
                )]),
            ),
            (
                PROCESS_TEMPLATE_CAPABILITY.to_string(),
                HashMap::from([(TEMPLATE_TYPE_ID_KEY.to_string(), self.process_template_id)]),
            ),
        ])
    }

    fn from_wire(capabilities: &HashMap<String, HashMap<String, String>>) -> ProjectResult<Self> {
        let version_control = capability(
            capabilities,
            VERSION_CONTROL_CAPABILITY,
            SOURCE_CONTROL_TYPE_KEY,
        )?
        .parse::<VersionControl>()
        .map_err(|message| ProjectError::invalid_attribute("version_control", message))?;

        let process_template_id = capability(
            capabilities,
            PROCESS_TEMPLATE_CAPABILITY,
            TEMPLATE_TYPE_ID_KEY,
        )?
        .to_string();

        Ok(Self {
            version_control,
            process_template_id,
        })
    }
}

fn capability<'a>(
    capabilities: &'a HashMap<String, HashMap<String, String>>,
    group: &'static str,
    key: &'static str,
) -> ProjectResult<&'a str> {
    capabilities
        .get(group)
        .and_then(|entries| entries.get(key))
        .map(String::as_str)
        .ok_or(ProjectError::MissingCapability { group, key })
}

/// Resolve a process template name to its id (exact, case-sensitive match)
pub async fn resolve_template_id<C>(catalog: &C, template_name: &str) -> ProjectResult<String>
where
    C: ProcessCatalog + ?Sized,
{
    catalog
        .list_processes()
        .await?
        .into_iter()
        .find(|process| process.name == template_name)
        .map(|process| process.id)
        .ok_or_else(|| ProjectError::ReferenceNotFound {
            kind: PROCESS_TEMPLATE,
            value: template_name.to_string(),
        })
}

/// Resolve a process template id back to its name
pub async fn resolve_template_name<C>(catalog: &C, template_id: &str) -> ProjectResult<String>
where
    C: ProcessCatalog + ?Sized,
{
    catalog
        .get_process_by_id(template_id)
        .await?
        .map(|process| process.name)
        .ok_or_else(|| ProjectError::ReferenceNotFound {
            kind: PROCESS_TEMPLATE,
            value: template_id.to_string(),
        })
}

/// Build the project the service expects on create/update
///
/// The returned project has no id; callers updating an existing project set it.
pub async fn expand_project<C>(catalog: &C, config: &ProjectConfig) -> ProjectResult<TeamProject>
where
    C: ProcessCatalog + ?Sized,
{
    let process_template_id = resolve_template_id(catalog, &config.work_item_template).await?;
    debug!(
        "resolved process template {} to {}",
        config.work_item_template, process_template_id
    );

    let capabilities = ProjectCapabilities {
        version_control: config.version_control,
        process_template_id,
    };

    Ok(TeamProject {
        id: None,
        name: config.name.clone(),
        description: config.description.clone(),
        visibility: config.visibility,
        capabilities: capabilities.into_wire(),
    })
}

/// Convert a project read from the service into declared fields
pub async fn flatten_project<C>(catalog: &C, project: &TeamProject) -> ProjectResult<ProjectState>
where
    C: ProcessCatalog + ?Sized,
{
    let capabilities = ProjectCapabilities::from_wire(&project.capabilities)?;
    let work_item_template =
        resolve_template_name(catalog, &capabilities.process_template_id).await?;

    Ok(ProjectState {
        id: project.id.clone(),
        process_template_id: capabilities.process_template_id,
        config: ProjectConfig {
            name: project.name.clone(),
            description: project.description.clone(),
            visibility: project.visibility,
            version_control: capabilities.version_control,
            work_item_template,
        },
    })
}
