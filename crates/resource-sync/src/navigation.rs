//! Navigation Signals
//!
//! Emitted by the core; the routing layer owns the actual location change.

use crate::kind::ResourceKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    /// The kind's list screen
    CanonicalList(ResourceKind),
    /// One item's detail screen
    Detail(ResourceKind, u32),
}

impl Navigation {
    pub fn kind(&self) -> ResourceKind {
        match self {
            Navigation::CanonicalList(kind) | Navigation::Detail(kind, _) => *kind,
        }
    }
}
