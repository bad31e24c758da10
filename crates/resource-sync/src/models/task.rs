//! Task entity

use serde::{Deserialize, Serialize};

use crate::error::ValidationErrors;
use crate::form::{FieldReader, FieldSpec, FieldWidget, FormFields};
use crate::kind::ResourceKind;
use crate::resource::Resource;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Task {
    pub id: u32,
    pub todo: String,
    pub completed: bool,
    pub user_id: u32,
}

/// Create/update payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskDraft {
    pub todo: String,
    pub completed: bool,
    pub user_id: u32,
}

/// `Resource` binding for tasks
pub struct Tasks;

impl Resource for Tasks {
    const KIND: ResourceKind = ResourceKind::Task;
    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::new("todo", "Todo Body", FieldWidget::TextArea).required("Todo body is required."),
        FieldSpec::new("userId", "User ID", FieldWidget::Number).required("User ID is required."),
    ];

    type Entity = Task;
    type Draft = TaskDraft;

    fn entity_id(entity: &Task) -> u32 {
        entity.id
    }

    fn title(entity: &Task) -> String {
        entity.todo.clone()
    }

    fn to_form_fields(entity: &Task) -> FormFields {
        FormFields::new()
            .with("todo", entity.todo.as_str())
            .with("userId", entity.user_id.to_string())
    }

    fn from_form_fields(fields: &FormFields, previous: Option<&Task>) -> Result<TaskDraft, ValidationErrors> {
        let mut reader = FieldReader::new(fields, Self::FIELDS);
        let draft = TaskDraft {
            todo: reader.text("todo"),
            user_id: reader.number("userId"),
            completed: previous.is_some_and(|task| task.completed),
        };
        reader.finish(draft)
    }
}
