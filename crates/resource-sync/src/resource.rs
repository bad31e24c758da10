//! Generic Resource Facade
//!
//! Every kind runs through the same cache, coordinator and binder; the
//! `Resource` trait is the only per-kind code.

use std::fmt;
use std::marker::PhantomData;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::cache::{CacheEntry, CacheKey, CacheStatus, QueryCache, Subscription};
use crate::error::{SyncError, SyncResult, ValidationErrors};
use crate::form::{FieldSpec, FormBinder, FormFields};
use crate::kind::ResourceKind;
use crate::models::Deleted;
use crate::mutation::{ConfirmPrompt, MutationCoordinator, MutationIntent, SubmitOutcome};

/// Per-kind binding: wire types, form table and field mapping
pub trait Resource: 'static {
    const KIND: ResourceKind;
    /// Editable fields in display order
    const FIELDS: &'static [FieldSpec];

    /// Read model
    type Entity: Serialize + DeserializeOwned + Clone + PartialEq + fmt::Debug + Send + Sync + 'static;
    /// Create/update payload
    type Draft: Serialize + Clone + PartialEq + fmt::Debug;

    fn entity_id(entity: &Self::Entity) -> u32;

    /// One-line summary for lists
    fn title(entity: &Self::Entity) -> String;

    /// Read-only facts the detail screen shows below the editable fields
    fn detail_rows(_entity: &Self::Entity) -> Vec<(&'static str, String)> {
        Vec::new()
    }

    /// Flatten for editing; list fields are encoded as text blocks
    fn to_form_fields(entity: &Self::Entity) -> FormFields;

    /// Inverse of `to_form_fields`; fields the form does not show come from
    /// `previous`, or zero when creating
    fn from_form_fields(
        fields: &FormFields,
        previous: Option<&Self::Entity>,
    ) -> Result<Self::Draft, ValidationErrors>;
}

/// A cache entry decoded into `T`
#[derive(Debug, Clone, PartialEq)]
pub struct TypedEntry<T> {
    pub key: CacheKey,
    pub status: CacheStatus,
    pub data: Option<T>,
    pub error: Option<SyncError>,
    /// Data of the last successful read, kept while `status` is `Error`
    pub last_good: Option<T>,
}

impl<T> TypedEntry<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self.status, CacheStatus::Idle | CacheStatus::Loading)
    }

    /// Error text for display
    pub fn error_message(&self) -> Option<String> {
        self.error.as_ref().map(ToString::to_string)
    }
}

/// Resource Synchronization Core instantiated for one kind
pub struct ResourceSync<R: Resource> {
    cache: QueryCache,
    _resource: PhantomData<R>,
}

impl<R: Resource> Clone for ResourceSync<R> {
    fn clone(&self) -> Self {
        Self {
            cache: self.cache.clone(),
            _resource: PhantomData,
        }
    }
}

impl<R: Resource> ResourceSync<R> {
    pub fn new(cache: QueryCache) -> Self {
        Self {
            cache,
            _resource: PhantomData,
        }
    }

    pub fn kind(&self) -> ResourceKind {
        R::KIND
    }

    pub fn cache(&self) -> &QueryCache {
        &self.cache
    }

    pub fn list_key(&self) -> CacheKey {
        CacheKey::collection(R::KIND)
    }

    pub fn detail_key(&self, id: u32) -> CacheKey {
        CacheKey::detail(R::KIND, id)
    }

    // ========================
    // Reads
    // ========================

    pub fn list(&self) -> TypedEntry<Vec<R::Entity>> {
        self.decode_list(self.cache.get(self.list_key()))
    }

    pub fn detail(&self, id: u32) -> TypedEntry<R::Entity> {
        self.decode_detail(self.cache.get(self.detail_key(id)))
    }

    pub async fn fetch_list(&self) -> TypedEntry<Vec<R::Entity>> {
        self.decode_list(self.cache.fetch(self.list_key()).await)
    }

    pub async fn fetch_detail(&self, id: u32) -> TypedEntry<R::Entity> {
        self.decode_detail(self.cache.fetch(self.detail_key(id)).await)
    }

    pub fn subscribe_list(&self, listener: impl Fn(TypedEntry<Vec<R::Entity>>) + 'static) -> Subscription {
        let sync = self.clone();
        self.cache
            .subscribe(self.list_key(), move |entry| listener(sync.decode_list(entry.clone())))
    }

    pub fn subscribe_detail(&self, id: u32, listener: impl Fn(TypedEntry<R::Entity>) + 'static) -> Subscription {
        let sync = self.clone();
        self.cache
            .subscribe(self.detail_key(id), move |entry| listener(sync.decode_detail(entry.clone())))
    }

    /// Collection payloads are `{ "<segment>": [...] }`
    pub fn decode_list(&self, entry: CacheEntry) -> TypedEntry<Vec<R::Entity>> {
        let last_good = self.retained(&entry);
        decode_entry(entry, last_good, |data| {
            let items = data.get(R::KIND.collection_field()).cloned().ok_or_else(|| {
                SyncError::Decode(format!("missing `{}` in list response", R::KIND.collection_field()))
            })?;
            Ok(serde_json::from_value(items)?)
        })
    }

    pub fn decode_detail(&self, entry: CacheEntry) -> TypedEntry<R::Entity> {
        let last_good = self.retained(&entry);
        decode_entry(entry, last_good, |data| Ok(serde_json::from_value(data)?))
    }

    /// Last good payload of a failed key
    fn retained(&self, entry: &CacheEntry) -> Option<Value> {
        if entry.status == CacheStatus::Error {
            self.cache.last_good_data(entry.key)
        } else {
            None
        }
    }

    // ========================
    // Mutations
    // ========================

    /// Fresh coordinator for one screen
    pub fn coordinator(&self) -> MutationCoordinator {
        MutationCoordinator::new(self.cache.clone())
    }

    pub fn create_intent(&self, draft: &R::Draft) -> SyncResult<MutationIntent> {
        Ok(MutationIntent::create(R::KIND, serde_json::to_value(draft)?))
    }

    pub fn update_intent(&self, id: u32, draft: &R::Draft) -> SyncResult<MutationIntent> {
        Ok(MutationIntent::update(R::KIND, id, serde_json::to_value(draft)?))
    }

    pub fn delete_intent(&self, id: u32) -> MutationIntent {
        MutationIntent::delete(R::KIND, id)
    }

    /// Validate, confirm (edits only), submit, and advance the form state
    ///
    /// Validation failures never reach the network and are returned as
    /// `SyncError::Validation`; every other result is a `SubmitOutcome`.
    pub async fn submit_form(
        &self,
        binder: &mut FormBinder<R>,
        coordinator: &MutationCoordinator,
        prompt: &dyn ConfirmPrompt,
    ) -> SyncResult<SubmitOutcome> {
        let intent = self.form_intent(binder)?;
        let outcome = coordinator.submit_confirmed(intent, prompt).await;
        Self::settle_form(binder, &outcome, coordinator);
        Ok(outcome)
    }

    /// First half of `submit_form`: validate and build the intent
    ///
    /// Callers that cannot hold the binder across an await use this and
    /// `settle_form` around their own `submit_confirmed`.
    pub fn form_intent(&self, binder: &mut FormBinder<R>) -> SyncResult<MutationIntent> {
        let draft = binder.begin_submit()?;
        match binder.target_id() {
            Some(id) => self.update_intent(id, &draft),
            None => self.create_intent(&draft),
        }
    }

    /// Second half of `submit_form`: move the form to its next state
    pub fn settle_form(binder: &mut FormBinder<R>, outcome: &SubmitOutcome, coordinator: &MutationCoordinator) {
        match outcome {
            SubmitOutcome::Declined => binder.cancel(),
            SubmitOutcome::Succeeded(_) | SubmitOutcome::Failed(_) => binder.finish(coordinator.status()),
            SubmitOutcome::Rejected => {}
        }
    }

    /// Confirmed delete of one item
    pub async fn delete(&self, id: u32, coordinator: &MutationCoordinator, prompt: &dyn ConfirmPrompt) -> SubmitOutcome {
        coordinator.submit_confirmed(self.delete_intent(id), prompt).await
    }

    /// Typed view of a delete response
    pub fn decode_deleted(data: Value) -> SyncResult<Deleted<R::Entity>> {
        Ok(serde_json::from_value(data)?)
    }
}

fn decode_entry<T>(
    entry: CacheEntry,
    last_good: Option<Value>,
    decode: impl Fn(Value) -> SyncResult<T>,
) -> TypedEntry<T> {
    let CacheEntry {
        key,
        status,
        data,
        error,
    } = entry;
    let mut typed = TypedEntry {
        key,
        status,
        data: None,
        error: error.map(SyncError::from),
        last_good: last_good.and_then(|data| decode(data).ok()),
    };
    if let Some(data) = data {
        match decode(data) {
            Ok(value) => typed.data = Some(value),
            Err(err) => {
                log::warn!("resource: {} payload did not decode: {}", key, err);
                typed.status = CacheStatus::Error;
                typed.error = Some(err);
            }
        }
    }
    typed
}
