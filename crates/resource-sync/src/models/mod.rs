//! Resource Models
//!
//! Read models as the backend returns them, the drafts each form submits,
//! and the `Resource` binding of every kind.

mod catalog_item;
mod comment;
mod deleted;
mod post;
mod recipe;
mod task;

pub use catalog_item::{CatalogItem, CatalogItemDraft, CatalogItems, Dimensions, Review, CATEGORIES};
pub use comment::{Comment, CommentAuthor, CommentDraft, CommentUser, Comments};
pub use deleted::Deleted;
pub use post::{Post, PostDraft, Posts, Reactions};
pub use recipe::{Recipe, RecipeDraft, Recipes};
pub use task::{Task, TaskDraft, Tasks};
