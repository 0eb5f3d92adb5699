//! Resource schemas for the Azure DevOps provider

use azdo_core::provider::ResourceType;
use azdo_core::resource::Value;
use azdo_core::schema::{AttributeSchema, AttributeType, ResourceSchema, types};

pub const PROJECT_RESOURCE_TYPE: &str = "project";

pub const PROJECT_NAME: &str = "project_name";
pub const DESCRIPTION: &str = "description";
pub const VISIBILITY: &str = "visibility";
pub const VERSION_CONTROL: &str = "version_control";
pub const WORK_ITEM_TEMPLATE: &str = "work_item_template";
pub const PROCESS_TEMPLATE_ID: &str = "process_template_id";

/// Schema of the `project` resource
pub fn project_schema() -> ResourceSchema {
    ResourceSchema::new(PROJECT_RESOURCE_TYPE)
        .with_description("An Azure DevOps project")
        .attribute(
            AttributeSchema::new(PROJECT_NAME, types::non_empty_string())
                .required()
                .force_new()
                .with_description("Project name, unique within the organization"),
        )
        .attribute(AttributeSchema::new(DESCRIPTION, AttributeType::String))
        .attribute(
            AttributeSchema::new(VISIBILITY, types::enumeration(&["private", "public"]))
                .with_default(Value::from("private")),
        )
        .attribute(
            AttributeSchema::new(VERSION_CONTROL, types::enumeration(&["Git", "Tfvc"]))
                .with_default(Value::from("Git")),
        )
        .attribute(
            AttributeSchema::new(WORK_ITEM_TEMPLATE, types::non_empty_string())
                .with_default(Value::from("Agile"))
                .with_description("Name of the process template, e.g. Agile, Scrum, Basic"),
        )
        .attribute(
            AttributeSchema::new(PROCESS_TEMPLATE_ID, AttributeType::String)
                .computed()
                .with_description("Id of the process template (read-only)"),
        )
}

pub struct ProjectType;

impl ResourceType for ProjectType {
    fn name(&self) -> &'static str {
        PROJECT_RESOURCE_TYPE
    }

    fn schema(&self) -> ResourceSchema {
        project_schema()
    }
}
