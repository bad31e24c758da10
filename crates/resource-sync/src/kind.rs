//! Resource Kinds
//!
//! The five independently managed collections and their endpoint table.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One of the remotely managed entity types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResourceKind {
    Task,
    Post,
    Comment,
    CatalogItem,
    Recipe,
}

impl ResourceKind {
    pub const ALL: [ResourceKind; 5] = [
        ResourceKind::Task,
        ResourceKind::Post,
        ResourceKind::Comment,
        ResourceKind::CatalogItem,
        ResourceKind::Recipe,
    ];

    /// Path segment of the remote collection
    pub fn segment(&self) -> &'static str {
        match self {
            ResourceKind::Task => "todos",
            ResourceKind::Post => "posts",
            ResourceKind::Comment => "comments",
            ResourceKind::CatalogItem => "products",
            ResourceKind::Recipe => "recipes",
        }
    }

    /// Field of the list response that holds the entities
    pub fn collection_field(&self) -> &'static str {
        self.segment()
    }

    /// Singular, human-readable name ("catalog item")
    pub fn label(&self) -> &'static str {
        match self {
            ResourceKind::Task => "task",
            ResourceKind::Post => "post",
            ResourceKind::Comment => "comment",
            ResourceKind::CatalogItem => "catalog item",
            ResourceKind::Recipe => "recipe",
        }
    }

    /// Title used for the list screen
    pub fn plural_title(&self) -> &'static str {
        match self {
            ResourceKind::Task => "Tasks",
            ResourceKind::Post => "Posts",
            ResourceKind::Comment => "Comments",
            ResourceKind::CatalogItem => "Catalog",
            ResourceKind::Recipe => "Recipes",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::Task => "task",
            ResourceKind::Post => "post",
            ResourceKind::Comment => "comment",
            ResourceKind::CatalogItem => "catalog-item",
            ResourceKind::Recipe => "recipe",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "task" => Some(ResourceKind::Task),
            "post" => Some(ResourceKind::Post),
            "comment" => Some(ResourceKind::Comment),
            "catalog-item" => Some(ResourceKind::CatalogItem),
            "recipe" => Some(ResourceKind::Recipe),
            _ => None,
        }
    }

    // ========================
    // Endpoints
    // ========================

    /// `GET /{kind}`
    pub fn collection_path(&self) -> String {
        format!("/{}", self.segment())
    }

    /// `GET|PUT|DELETE /{kind}/{id}`
    pub fn detail_path(&self, id: u32) -> String {
        format!("/{}/{}", self.segment(), id)
    }

    /// `POST /{kind}/add`
    pub fn create_path(&self) -> String {
        format!("/{}/add", self.segment())
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
