//! Mutation Coordinator
//!
//! One per screen. Runs at most one create/update/delete at a time, and on
//! success invalidates the cache before announcing navigation.

use std::cell::RefCell;
use std::rc::Rc;

use log::{debug, info, warn};
use serde_json::Value;

use crate::cache::{CacheKey, QueryCache};
use crate::error::TransportError;
use crate::kind::ResourceKind;
use crate::navigation::Navigation;
use crate::transport::Method;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Create,
    Update,
    Delete,
}

impl Operation {
    pub fn method(&self) -> Method {
        match self {
            Operation::Create => Method::Post,
            Operation::Update => Method::Put,
            Operation::Delete => Method::Delete,
        }
    }

    /// Updates and deletes need an explicit confirmation
    pub fn requires_confirmation(&self) -> bool {
        !matches!(self, Operation::Create)
    }

    pub fn verb(&self) -> &'static str {
        match self {
            Operation::Create => "create",
            Operation::Update => "update",
            Operation::Delete => "delete",
        }
    }
}

/// What a screen wants to change
#[derive(Debug, Clone, PartialEq)]
pub struct MutationIntent {
    pub kind: ResourceKind,
    pub operation: Operation,
    pub target_id: Option<u32>,
    pub payload: Option<Value>,
}

impl MutationIntent {
    pub fn create(kind: ResourceKind, payload: Value) -> Self {
        Self {
            kind,
            operation: Operation::Create,
            target_id: None,
            payload: Some(payload),
        }
    }

    pub fn update(kind: ResourceKind, id: u32, payload: Value) -> Self {
        Self {
            kind,
            operation: Operation::Update,
            target_id: Some(id),
            payload: Some(payload),
        }
    }

    pub fn delete(kind: ResourceKind, id: u32) -> Self {
        Self {
            kind,
            operation: Operation::Delete,
            target_id: Some(id),
            payload: None,
        }
    }

    /// `None` for an update/delete without a target
    pub fn path(&self) -> Option<String> {
        match (self.operation, self.target_id) {
            (Operation::Create, _) => Some(self.kind.create_path()),
            (_, Some(id)) => Some(self.kind.detail_path(id)),
            (_, None) => None,
        }
    }

    /// Text of the confirmation prompt
    pub fn confirmation_message(&self) -> String {
        format!(
            "Are you sure you want to {} this {}?",
            self.operation.verb(),
            self.kind.label()
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationStatus {
    Idle,
    Pending,
    Success,
    Failed,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MutationState {
    pub status: MutationStatus,
    pub error: Option<TransportError>,
}

impl MutationState {
    fn idle() -> Self {
        Self {
            status: MutationStatus::Idle,
            error: None,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.status == MutationStatus::Pending
    }
}

/// Result of one `submit` call
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// Another submission is still pending, or the intent had no target
    Rejected,
    /// The user declined the confirmation
    Declined,
    Succeeded(Value),
    Failed(TransportError),
}

/// Asks the user to affirm an update or delete
pub trait ConfirmPrompt {
    fn confirm(&self, message: &str) -> bool;
}

impl<F: Fn(&str) -> bool> ConfirmPrompt for F {
    fn confirm(&self, message: &str) -> bool {
        self(message)
    }
}

type StateListener = Rc<dyn Fn(&MutationState)>;
type NavigationHandler = Rc<dyn Fn(Navigation)>;

/// Single-flight submitter owned by one screen; clones share state
#[derive(Clone)]
pub struct MutationCoordinator {
    cache: QueryCache,
    state: Rc<RefCell<MutationState>>,
    watchers: Rc<RefCell<Vec<StateListener>>>,
    on_success: Rc<RefCell<Option<NavigationHandler>>>,
}

impl MutationCoordinator {
    pub fn new(cache: QueryCache) -> Self {
        Self {
            cache,
            state: Rc::new(RefCell::new(MutationState::idle())),
            watchers: Rc::new(RefCell::new(Vec::new())),
            on_success: Rc::new(RefCell::new(None)),
        }
    }

    pub fn state(&self) -> MutationState {
        self.state.borrow().clone()
    }

    pub fn status(&self) -> MutationStatus {
        self.state.borrow().status
    }

    /// Called with the list location, once per successful submission
    pub fn on_success(&self, handler: impl Fn(Navigation) + 'static) {
        *self.on_success.borrow_mut() = Some(Rc::new(handler));
    }

    /// Called after every state transition
    pub fn watch(&self, listener: impl Fn(&MutationState) + 'static) {
        self.watchers.borrow_mut().push(Rc::new(listener));
    }

    /// Return a finished coordinator to `Idle`
    pub fn reset(&self) {
        if self.status() != MutationStatus::Pending {
            self.transition(MutationState::idle());
        }
    }

    /// Confirmation gate, then `submit`
    ///
    /// Creates skip the prompt. Nothing is asked while a submission is
    /// already pending.
    pub async fn submit_confirmed(&self, intent: MutationIntent, prompt: &dyn ConfirmPrompt) -> SubmitOutcome {
        if self.status() == MutationStatus::Pending {
            return SubmitOutcome::Rejected;
        }
        if intent.operation.requires_confirmation() && !prompt.confirm(&intent.confirmation_message()) {
            debug!("mutation: {} {} declined", intent.operation.verb(), intent.kind);
            return SubmitOutcome::Declined;
        }
        self.submit(intent).await
    }

    /// Send the mutation unless one is already pending
    pub async fn submit(&self, intent: MutationIntent) -> SubmitOutcome {
        if self.status() == MutationStatus::Pending {
            debug!("mutation: {} {} rejected, already pending", intent.operation.verb(), intent.kind);
            return SubmitOutcome::Rejected;
        }
        let Some(path) = intent.path() else {
            warn!("mutation: {} {} has no target id", intent.operation.verb(), intent.kind);
            return SubmitOutcome::Rejected;
        };

        self.transition(MutationState {
            status: MutationStatus::Pending,
            error: None,
        });
        let result = self
            .cache
            .transport()
            .request(intent.operation.method(), &path, intent.payload.as_ref())
            .await;

        match result {
            Ok(response) => {
                self.invalidate_for(&intent);
                info!("mutation: {} {} succeeded", intent.operation.verb(), intent.kind);
                self.transition(MutationState {
                    status: MutationStatus::Success,
                    error: None,
                });
                self.navigate(Navigation::CanonicalList(intent.kind));
                SubmitOutcome::Succeeded(response.data)
            }
            Err(err) => {
                warn!("mutation: {} {} failed: {}", intent.operation.verb(), intent.kind, err);
                self.transition(MutationState {
                    status: MutationStatus::Failed,
                    error: Some(err.clone()),
                });
                SubmitOutcome::Failed(err)
            }
        }
    }

    /// Creates and deletes change collection membership; updates touch the
    /// item and the collection it appears in
    fn invalidate_for(&self, intent: &MutationIntent) {
        match (intent.operation, intent.target_id) {
            (Operation::Update, Some(id)) => {
                self.cache.invalidate(CacheKey::detail(intent.kind, id));
                self.cache.invalidate(CacheKey::collection(intent.kind));
            }
            _ => self.cache.invalidate_kind(intent.kind),
        }
    }

    fn transition(&self, next: MutationState) {
        *self.state.borrow_mut() = next.clone();
        let watchers: Vec<StateListener> = self.watchers.borrow().iter().cloned().collect();
        for watcher in watchers {
            watcher(&next);
        }
    }

    fn navigate(&self, target: Navigation) {
        let handler = self.on_success.borrow().clone();
        if let Some(handler) = handler {
            handler(target);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::CacheStatus;
    use crate::testing::{local_spawner, run_local, MockTransport};
    use serde_json::json;
    use std::cell::Cell;

    fn setup() -> (Rc<MockTransport>, QueryCache, MutationCoordinator) {
        let transport = Rc::new(MockTransport::new());
        let cache = QueryCache::new(transport.clone(), local_spawner());
        let coordinator = MutationCoordinator::new(cache.clone());
        (transport, cache, coordinator)
    }

    fn record_statuses(coordinator: &MutationCoordinator) -> Rc<RefCell<Vec<MutationStatus>>> {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        coordinator.watch(move |state| sink.borrow_mut().push(state.status));
        seen
    }

    #[test]
    fn test_intent_paths() {
        let create = MutationIntent::create(ResourceKind::Task, json!({}));
        assert_eq!(create.path().as_deref(), Some("/todos/add"));
        let update = MutationIntent::update(ResourceKind::Post, 3, json!({}));
        assert_eq!(update.path().as_deref(), Some("/posts/3"));
        let orphan = MutationIntent {
            target_id: None,
            ..MutationIntent::delete(ResourceKind::Recipe, 1)
        };
        assert_eq!(orphan.path(), None);
    }

    #[test]
    fn test_confirmation_message() {
        let intent = MutationIntent::delete(ResourceKind::CatalogItem, 2);
        assert_eq!(
            intent.confirmation_message(),
            "Are you sure you want to delete this catalog item?"
        );
    }

    #[tokio::test]
    async fn test_submit_while_pending_is_rejected() {
        run_local(async {
            let (transport, _cache, coordinator) = setup();
            transport.respond(Method::Post, "/todos/add", json!({"id": 255}));
            transport.hold();
            let seen = record_statuses(&coordinator);

            let intent = MutationIntent::create(ResourceKind::Task, json!({"todo": "a"}));
            let (first, second) = futures::join!(coordinator.submit(intent.clone()), async {
                let second = coordinator.submit(intent.clone()).await;
                transport.release();
                second
            });

            assert_eq!(second, SubmitOutcome::Rejected);
            assert!(matches!(first, SubmitOutcome::Succeeded(_)));
            assert_eq!(transport.call_count(Method::Post, "/todos/add"), 1);
            assert_eq!(*seen.borrow(), vec![MutationStatus::Pending, MutationStatus::Success]);
        })
        .await;
    }

    #[tokio::test]
    async fn test_failure_keeps_error_without_side_effects() {
        run_local(async {
            let (transport, cache, coordinator) = setup();
            transport.respond(Method::Get, "/posts/1", json!({"id": 1}));
            cache.fetch(CacheKey::detail(ResourceKind::Post, 1)).await;
            transport.fail(
                Method::Put,
                "/posts/1",
                TransportError::Status { status: 500, message: "boom".into() },
            );
            let navigated = Rc::new(Cell::new(false));
            let flag = navigated.clone();
            coordinator.on_success(move |_| flag.set(true));

            let outcome = coordinator
                .submit(MutationIntent::update(ResourceKind::Post, 1, json!({"title": "x"})))
                .await;

            assert!(matches!(outcome, SubmitOutcome::Failed(_)));
            let state = coordinator.state();
            assert_eq!(state.status, MutationStatus::Failed);
            assert_eq!(state.error.as_ref().and_then(TransportError::status), Some(500));
            assert!(!navigated.get());
            assert!(cache.peek(CacheKey::detail(ResourceKind::Post, 1)).is_ready());
        })
        .await;
    }

    #[tokio::test]
    async fn test_retry_after_failure() {
        run_local(async {
            let (transport, _cache, coordinator) = setup();
            transport.fail(Method::Delete, "/comments/4", TransportError::Network("offline".into()));
            let intent = MutationIntent::delete(ResourceKind::Comment, 4);
            coordinator.submit(intent.clone()).await;
            assert_eq!(coordinator.status(), MutationStatus::Failed);

            transport.respond(Method::Delete, "/comments/4", json!({"id": 4, "isDeleted": true}));
            let outcome = coordinator.submit(intent).await;

            assert!(matches!(outcome, SubmitOutcome::Succeeded(_)));
            assert_eq!(coordinator.state().error, None);
        })
        .await;
    }

    #[tokio::test]
    async fn test_declined_confirmation_has_no_effect() {
        run_local(async {
            let (transport, _cache, coordinator) = setup();
            let asked = Rc::new(RefCell::new(Vec::new()));
            let log = asked.clone();
            let decline = move |message: &str| {
                log.borrow_mut().push(message.to_string());
                false
            };

            let outcome = coordinator
                .submit_confirmed(MutationIntent::update(ResourceKind::Task, 1, json!({})), &decline)
                .await;

            assert_eq!(outcome, SubmitOutcome::Declined);
            assert_eq!(coordinator.status(), MutationStatus::Idle);
            assert!(transport.calls().is_empty());
            assert_eq!(*asked.borrow(), vec!["Are you sure you want to update this task?"]);
        })
        .await;
    }

    #[tokio::test]
    async fn test_create_skips_confirmation() {
        run_local(async {
            let (transport, _cache, coordinator) = setup();
            transport.respond(Method::Post, "/recipes/add", json!({"id": 51}));
            let never = |_: &str| -> bool { panic!("create must not ask for confirmation") };

            let outcome = coordinator
                .submit_confirmed(MutationIntent::create(ResourceKind::Recipe, json!({})), &never)
                .await;

            assert_eq!(outcome, SubmitOutcome::Succeeded(json!({"id": 51})));
        })
        .await;
    }

    #[tokio::test]
    async fn test_navigation_fires_once_per_success() {
        run_local(async {
            let (transport, _cache, coordinator) = setup();
            transport.respond(Method::Post, "/posts/add", json!({"id": 252}));
            let targets = Rc::new(RefCell::new(Vec::new()));
            let sink = targets.clone();
            coordinator.on_success(move |target| sink.borrow_mut().push(target));

            coordinator
                .submit(MutationIntent::create(ResourceKind::Post, json!({})))
                .await;
            // Observing the terminal state again must not re-navigate.
            let _ = coordinator.state();
            let _ = coordinator.state();

            assert_eq!(
                *targets.borrow(),
                vec![Navigation::CanonicalList(ResourceKind::Post)]
            );
        })
        .await;
    }

    #[tokio::test]
    async fn test_delete_invalidates_whole_kind() {
        run_local(async {
            let (transport, cache, coordinator) = setup();
            transport.respond(Method::Get, "/recipes", json!({"recipes": []}));
            transport.respond(Method::Get, "/recipes/2", json!({"id": 2}));
            transport.respond(Method::Get, "/recipes/3", json!({"id": 3}));
            transport.respond(Method::Delete, "/recipes/2", json!({"id": 2, "isDeleted": true}));
            for key in [
                CacheKey::collection(ResourceKind::Recipe),
                CacheKey::detail(ResourceKind::Recipe, 2),
                CacheKey::detail(ResourceKind::Recipe, 3),
            ] {
                cache.fetch(key).await;
            }

            coordinator.submit(MutationIntent::delete(ResourceKind::Recipe, 2)).await;

            for id in [None, Some(2), Some(3)] {
                let key = CacheKey { kind: ResourceKind::Recipe, id };
                assert_eq!(cache.peek(key).status, CacheStatus::Stale);
            }
        })
        .await;
    }

    #[tokio::test]
    async fn test_reset_returns_to_idle() {
        run_local(async {
            let (transport, _cache, coordinator) = setup();
            transport.respond(Method::Post, "/todos/add", json!({"id": 1}));
            coordinator
                .submit(MutationIntent::create(ResourceKind::Task, json!({})))
                .await;
            assert_eq!(coordinator.status(), MutationStatus::Success);

            coordinator.reset();
            assert_eq!(coordinator.state(), MutationState { status: MutationStatus::Idle, error: None });
        })
        .await;
    }
}
