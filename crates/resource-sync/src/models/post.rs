//! Post entity

use serde::{Deserialize, Serialize};

use crate::error::ValidationErrors;
use crate::form::{FieldReader, FieldSpec, FieldWidget, FormFields};
use crate::kind::ResourceKind;
use crate::resource::Resource;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reactions {
    pub likes: u32,
    pub dislikes: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Post {
    pub id: u32,
    pub title: String,
    pub body: String,
    pub tags: Vec<String>,
    pub reactions: Reactions,
    pub views: u32,
    pub user_id: u32,
}

/// Create/update payload; `reactions` and `views` are server-managed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostDraft {
    pub title: String,
    pub body: String,
    pub tags: Vec<String>,
    pub reactions: Reactions,
    pub views: u32,
    pub user_id: u32,
}

/// `Resource` binding for posts
pub struct Posts;

impl Resource for Posts {
    const KIND: ResourceKind = ResourceKind::Post;
    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::new("userId", "User ID", FieldWidget::Number).required("User ID is required."),
        FieldSpec::new("title", "Post Title", FieldWidget::Text).required("Post Title is required."),
        FieldSpec::new("body", "Post Body", FieldWidget::TextArea).required("Post Body is required."),
        FieldSpec::new("tags", "Post Tags", FieldWidget::List).required("Post Tags is required."),
    ];

    type Entity = Post;
    type Draft = PostDraft;

    fn entity_id(entity: &Post) -> u32 {
        entity.id
    }

    fn title(entity: &Post) -> String {
        entity.title.clone()
    }

    fn detail_rows(entity: &Post) -> Vec<(&'static str, String)> {
        vec![
            ("Views", entity.views.to_string()),
            (
                "Reactions",
                format!("{} likes, {} dislikes", entity.reactions.likes, entity.reactions.dislikes),
            ),
        ]
    }

    fn to_form_fields(entity: &Post) -> FormFields {
        let mut fields = FormFields::new()
            .with("userId", entity.user_id.to_string())
            .with("title", entity.title.as_str())
            .with("body", entity.body.as_str());
        fields.set_list("tags", &entity.tags);
        fields
    }

    fn from_form_fields(fields: &FormFields, previous: Option<&Post>) -> Result<PostDraft, ValidationErrors> {
        let mut reader = FieldReader::new(fields, Self::FIELDS);
        let draft = PostDraft {
            title: reader.text("title"),
            body: reader.text("body"),
            tags: reader.list("tags"),
            reactions: previous.map(|post| post.reactions).unwrap_or_default(),
            views: previous.map_or(0, |post| post.views),
            user_id: reader.number("userId"),
        };
        reader.finish(draft)
    }
}
