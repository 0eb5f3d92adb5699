//! Project lookups
//!
//! Reads accept either the project id or its name. After creation the id is
//! what the driver stores; imports may only know the name.

use log::debug;

use crate::client::{CoreClient, GetProjectOptions, ProjectKey, TeamProject};
use crate::error::{ProjectError, ProjectResult};

/// Options used for every project read: full capabilities, no history
pub const READ_OPTIONS: GetProjectOptions = GetProjectOptions {
    include_capabilities: true,
    include_history: false,
};

/// Choose the lookup key: the id when known, otherwise the name
pub fn project_key(id: &str, name: &str) -> Option<ProjectKey> {
    if !id.is_empty() {
        Some(ProjectKey::Id(id.to_string()))
    } else if !name.is_empty() {
        Some(ProjectKey::Name(name.to_string()))
    } else {
        None
    }
}

/// Fetch a project by id, falling back to name
///
/// A missing project is reported as `ProjectError::NotFound`.
pub async fn get_project<C>(core: &C, id: &str, name: &str) -> ProjectResult<TeamProject>
where
    C: CoreClient + ?Sized,
{
    let key = project_key(id, name)
        .ok_or_else(|| ProjectError::NotFound("no id or name to look up".to_string()))?;

    debug!("reading project {}", key);

    core.get_project(&key, READ_OPTIONS)
        .await?
        .ok_or_else(|| ProjectError::NotFound(key.to_string()))
}
