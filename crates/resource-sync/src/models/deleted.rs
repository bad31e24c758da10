//! Delete response wrapper

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

/// Entity echoed back by a delete, with the deletion marker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Deleted<T> {
    #[serde(flatten)]
    pub entity: T,
    #[serde(default)]
    pub is_deleted: bool,
    #[serde(default)]
    pub deleted_on: String,
}

impl<T> Deleted<T> {
    /// `deleted_on` as a timestamp, when it is RFC 3339
    pub fn deleted_at(&self) -> Option<DateTime<FixedOffset>> {
        DateTime::parse_from_rfc3339(&self.deleted_on).ok()
    }
}
