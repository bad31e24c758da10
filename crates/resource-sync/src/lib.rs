//! Resource Synchronization Core
//!
//! Layered the same way for every resource kind:
//! - codec: text block <-> list field conversion
//! - cache: keyed, de-duplicated reads of remote collections and items
//! - mutation: single-flight create/update/delete with invalidation
//! - form: flat edit-time fields, validation and the form state machine
//! - resource: generic per-kind facade tying the layers together

pub mod cache;
pub mod codec;
pub mod config;
pub mod error;
pub mod form;
pub mod kind;
pub mod models;
pub mod mutation;
pub mod navigation;
pub mod resource;
pub mod transport;

#[cfg(test)]
mod testing;
#[cfg(test)]
mod scenarios;

pub use cache::{CacheEntry, CacheKey, CacheStatus, LocalTask, QueryCache, Spawner, Subscription};
pub use config::ConsoleConfig;
pub use error::{FieldError, SyncError, SyncResult, TransportError, ValidationErrors};
pub use form::{FieldSpec, FieldWidget, FormBinder, FormFields, FormState};
pub use kind::ResourceKind;
pub use mutation::{
    ConfirmPrompt, MutationCoordinator, MutationIntent, MutationState, MutationStatus, Operation,
    SubmitOutcome,
};
pub use navigation::Navigation;
pub use resource::{Resource, ResourceSync, TypedEntry};
pub use transport::{HttpResponse, HttpTransport, Method, Transport};
