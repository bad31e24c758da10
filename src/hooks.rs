//! Reactive Bindings
//!
//! Bridge cache subscriptions and coordinator callbacks into Leptos signals.
//! Every handle is owned by the calling component and released with it.

use leptos::prelude::*;
use resource_sync::{
    CacheKey, CacheStatus, ConfirmPrompt, MutationCoordinator, MutationState, QueryCache, Resource,
    Subscription, TypedEntry,
};

use crate::context::use_console;
use crate::route::Route;

type Listener<T> = Box<dyn Fn(TypedEntry<T>)>;

/// Mirror one cache key into a signal; stale entries are refetched while the
/// screen still shows them
fn bind_entry<T>(
    cache: QueryCache,
    key: CacheKey,
    initial: TypedEntry<T>,
    subscribe: impl FnOnce(Listener<T>) -> Subscription,
) -> ReadSignal<TypedEntry<T>>
where
    T: Send + Sync + 'static,
{
    let (entry, set_entry) = signal(initial);
    let watched = cache.clone();
    let subscription = subscribe(Box::new(move |next: TypedEntry<T>| {
        let stale = next.status == CacheStatus::Stale;
        set_entry.set(next);
        if stale && !cache.is_fetching(key) {
            cache.get(key);
        }
    }));
    log::debug!("hooks: {} has {} subscribers", key, watched.subscriber_count(key));
    // Dropped, and so unsubscribed, with the owning component
    StoredValue::new_local(subscription);
    entry
}

pub fn use_list<R: Resource>() -> ReadSignal<TypedEntry<Vec<R::Entity>>> {
    let sync = use_console().sync::<R>();
    bind_entry(sync.cache().clone(), sync.list_key(), sync.list(), |listener| {
        sync.subscribe_list(listener)
    })
}

pub fn use_detail<R: Resource>(id: u32) -> ReadSignal<TypedEntry<R::Entity>> {
    let sync = use_console().sync::<R>();
    bind_entry(sync.cache().clone(), sync.detail_key(id), sync.detail(id), |listener| {
        sync.subscribe_detail(id, listener)
    })
}

// ========================
// Mutations
// ========================

/// A screen's coordinator plus its state as a signal
#[derive(Clone, Copy)]
pub struct MutationHandle {
    coordinator: StoredValue<MutationCoordinator, LocalStorage>,
    pub state: ReadSignal<MutationState>,
}

impl MutationHandle {
    pub fn coordinator(&self) -> MutationCoordinator {
        self.coordinator.get_value()
    }

    pub fn is_pending(&self) -> bool {
        self.state.get().is_pending()
    }

    /// Message of the last failed submission
    pub fn failure(&self) -> Option<String> {
        self.state.get().error.map(|err| err.to_string())
    }

    /// Clear a failure once the user has seen it
    pub fn reset(&self) {
        self.coordinator.with_value(MutationCoordinator::reset);
    }
}

/// Coordinator for one screen; a success navigates to the list screen
pub fn use_mutation<R: Resource>() -> MutationHandle {
    let ctx = use_console();
    let coordinator = ctx.sync::<R>().coordinator();
    let (state, set_state) = signal(coordinator.state());
    coordinator.watch(move |next| set_state.set(next.clone()));
    coordinator.on_success(move |target| ctx.navigate(Route::from(target)));
    MutationHandle {
        coordinator: StoredValue::new_local(coordinator),
        state,
    }
}

/// `window.confirm`; a missing window counts as "no"
pub struct BrowserConfirm;

impl ConfirmPrompt for BrowserConfirm {
    fn confirm(&self, message: &str) -> bool {
        web_sys::window()
            .and_then(|window| window.confirm_with_message(message).ok())
            .unwrap_or(false)
    }
}
