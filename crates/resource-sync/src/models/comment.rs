//! Comment entity

use serde::{Deserialize, Serialize};

use crate::error::ValidationErrors;
use crate::form::{FieldReader, FieldSpec, FieldWidget, FormFields};
use crate::kind::ResourceKind;
use crate::resource::Resource;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CommentUser {
    pub id: u32,
    pub username: String,
    pub full_name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Comment {
    pub id: u32,
    pub body: String,
    pub post_id: u32,
    pub likes: u32,
    pub user: CommentUser,
}

/// Author reference inside a comment payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentAuthor {
    pub id: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentDraft {
    pub body: String,
    pub post_id: u32,
    pub user: CommentAuthor,
}

/// `Resource` binding for comments
pub struct Comments;

impl Resource for Comments {
    const KIND: ResourceKind = ResourceKind::Comment;
    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::new("userId", "User ID", FieldWidget::Number).required("User ID is required."),
        FieldSpec::new("postId", "Post ID", FieldWidget::Number).required("Post ID is required."),
        FieldSpec::new("body", "Comment", FieldWidget::TextArea).required("Comment body is required."),
    ];

    type Entity = Comment;
    type Draft = CommentDraft;

    fn entity_id(entity: &Comment) -> u32 {
        entity.id
    }

    fn title(entity: &Comment) -> String {
        entity.body.clone()
    }

    fn detail_rows(entity: &Comment) -> Vec<(&'static str, String)> {
        vec![
            ("Author", format!("{} (@{})", entity.user.full_name, entity.user.username)),
            ("Likes", entity.likes.to_string()),
        ]
    }

    fn to_form_fields(entity: &Comment) -> FormFields {
        FormFields::new()
            .with("userId", entity.user.id.to_string())
            .with("postId", entity.post_id.to_string())
            .with("body", entity.body.as_str())
    }

    fn from_form_fields(fields: &FormFields, _previous: Option<&Comment>) -> Result<CommentDraft, ValidationErrors> {
        let mut reader = FieldReader::new(fields, Self::FIELDS);
        let draft = CommentDraft {
            body: reader.text("body"),
            post_id: reader.number("postId"),
            user: CommentAuthor {
                id: reader.number("userId"),
            },
        };
        reader.finish(draft)
    }
}
