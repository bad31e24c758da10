//! Resource Query Cache
//!
//! One entry per key, shared by every consumer. At most one fetch per key is
//! in flight; later readers attach to it. Invalidation keeps the last data
//! visible (stale-while-revalidate) and forces the next read to refetch.

use std::cell::{RefCell, RefMut};
use std::collections::HashMap;
use std::fmt;
use std::rc::{Rc, Weak};

use futures::future::{FutureExt, LocalBoxFuture, Shared};
use log::{debug, warn};
use serde_json::Value;

use crate::error::TransportError;
use crate::kind::ResourceKind;
use crate::transport::{Method, Transport};

/// Detached background work, such as one cache fetch
pub type LocalTask = LocalBoxFuture<'static, ()>;

/// Runs a detached local task (browser: Leptos `spawn_local`)
pub type Spawner = Rc<dyn Fn(LocalTask)>;

type Listener = Rc<dyn Fn(&CacheEntry)>;
type SharedFetch = Shared<LocalBoxFuture<'static, Result<Value, TransportError>>>;
/// Listeners whose `Subscription` was dropped while the state was borrowed
type Unsubscribed = Rc<RefCell<Vec<(CacheKey, u64)>>>;

// ========================
// Keys and Entries
// ========================

/// A collection read (`id == None`) or a single-item read
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CacheKey {
    pub kind: ResourceKind,
    pub id: Option<u32>,
}

impl CacheKey {
    pub fn collection(kind: ResourceKind) -> Self {
        Self { kind, id: None }
    }

    pub fn detail(kind: ResourceKind, id: u32) -> Self {
        Self { kind, id: Some(id) }
    }

    /// Remote path this key reads from
    pub fn path(&self) -> String {
        match self.id {
            Some(id) => self.kind.detail_path(id),
            None => self.kind.collection_path(),
        }
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.id {
            Some(id) => write!(f, "{}/{}", self.kind, id),
            None => write!(f, "{}", self.kind),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheStatus {
    /// Known key, never fetched
    Idle,
    /// First fetch in flight, nothing to show yet
    Loading,
    Ready,
    /// Data shown but known to need refreshing
    Stale,
    /// Last fetch failed; `error` is set and `data` is not
    Error,
}

/// Snapshot of one cached read
#[derive(Debug, Clone, PartialEq)]
pub struct CacheEntry {
    pub key: CacheKey,
    pub status: CacheStatus,
    pub data: Option<Value>,
    pub error: Option<TransportError>,
}

impl CacheEntry {
    pub fn idle(key: CacheKey) -> Self {
        Self {
            key,
            status: CacheStatus::Idle,
            data: None,
            error: None,
        }
    }

    pub fn is_ready(&self) -> bool {
        self.status == CacheStatus::Ready
    }

    /// Nothing to render yet: show a placeholder
    pub fn is_loading(&self) -> bool {
        matches!(self.status, CacheStatus::Idle | CacheStatus::Loading)
    }
}

struct InFlight {
    id: u64,
    future: SharedFetch,
    /// Invalidated after the request left; the response may predate the change
    invalidated: bool,
}

struct Slot {
    entry: CacheEntry,
    last_good: Option<Value>,
    in_flight: Option<InFlight>,
    listeners: Vec<(u64, Listener)>,
}

impl Slot {
    fn new(key: CacheKey) -> Self {
        Self {
            entry: CacheEntry::idle(key),
            last_good: None,
            in_flight: None,
            listeners: Vec::new(),
        }
    }

    fn needs_fetch(&self) -> bool {
        self.in_flight.is_none()
            && matches!(
                self.entry.status,
                CacheStatus::Idle | CacheStatus::Stale | CacheStatus::Error
            )
    }
}

#[derive(Default)]
struct CacheState {
    slots: HashMap<CacheKey, Slot>,
    next_id: u64,
    shut_down: bool,
}

impl CacheState {
    fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }
}

// ========================
// Cache
// ========================

/// Shared handle to one application-wide cache
///
/// Created once at startup and owned by the application context; clones
/// share state.
#[derive(Clone)]
pub struct QueryCache {
    state: Rc<RefCell<CacheState>>,
    unsubscribed: Unsubscribed,
    transport: Rc<dyn Transport>,
    spawner: Spawner,
}

impl QueryCache {
    pub fn new(transport: Rc<dyn Transport>, spawner: Spawner) -> Self {
        Self {
            state: Rc::new(RefCell::new(CacheState::default())),
            unsubscribed: Rc::new(RefCell::new(Vec::new())),
            transport,
            spawner,
        }
    }

    pub fn transport(&self) -> Rc<dyn Transport> {
        Rc::clone(&self.transport)
    }

    /// Current entry; starts a fetch if the key is new, stale or failed and
    /// nothing is in flight for it
    pub fn get(&self, key: CacheKey) -> CacheEntry {
        let (entry, started) = {
            let mut guard = self.state_mut();
            let state = &mut *guard;
            if state.shut_down {
                return CacheEntry::idle(key);
            }
            let slot = state.slots.entry(key).or_insert_with(|| Slot::new(key));

            let started = if slot.needs_fetch() {
                state.next_id += 1;
                let fetch_id = state.next_id;
                let future = self.request(key);
                slot.in_flight = Some(InFlight {
                    id: fetch_id,
                    future: future.clone(),
                    invalidated: false,
                });
                if slot.entry.status != CacheStatus::Stale {
                    slot.entry.status = CacheStatus::Loading;
                    slot.entry.data = None;
                }
                slot.entry.error = None;
                Some((fetch_id, future))
            } else {
                None
            };
            (slot.entry.clone(), started)
        };

        match started {
            Some((fetch_id, future)) => {
                debug!("cache: fetch {} started", key);
                self.notify(key);
                self.drive(key, fetch_id, future);
            }
            None => debug!("cache: {} served as {:?}", key, entry.status),
        }
        entry
    }

    /// `get`, then wait for the (possibly shared) in-flight fetch to settle
    pub async fn fetch(&self, key: CacheKey) -> CacheEntry {
        self.get(key);
        let pending = self
            .state
            .borrow()
            .slots
            .get(&key)
            .and_then(|slot| slot.in_flight.as_ref())
            .map(|flight| (flight.id, flight.future.clone()));
        if let Some((fetch_id, future)) = pending {
            let result = future.await;
            self.settle(key, fetch_id, result);
        }
        self.peek(key)
    }

    /// Snapshot without side effects; unknown keys read as `Idle`
    pub fn peek(&self, key: CacheKey) -> CacheEntry {
        self.state
            .borrow()
            .slots
            .get(&key)
            .map(|slot| slot.entry.clone())
            .unwrap_or_else(|| CacheEntry::idle(key))
    }

    pub fn is_fetching(&self, key: CacheKey) -> bool {
        self.state
            .borrow()
            .slots
            .get(&key)
            .is_some_and(|slot| slot.in_flight.is_some())
    }

    /// Data of the most recent successful fetch, kept even while in `Error`
    pub fn last_good_data(&self, key: CacheKey) -> Option<Value> {
        self.state
            .borrow()
            .slots
            .get(&key)
            .and_then(|slot| slot.last_good.clone())
    }

    /// Mark a `Ready` entry `Stale`; absent keys are ignored
    pub fn invalidate(&self, key: CacheKey) {
        let changed = {
            let mut state = self.state_mut();
            let changed = match state.slots.get_mut(&key) {
                Some(slot) => {
                    if let Some(flight) = slot.in_flight.as_mut() {
                        flight.invalidated = true;
                    }
                    if slot.entry.status == CacheStatus::Ready {
                        slot.entry.status = CacheStatus::Stale;
                        true
                    } else {
                        false
                    }
                }
                None => false,
            };
            changed
        };
        if changed {
            debug!("cache: {} invalidated", key);
            self.notify(key);
        }
    }

    /// Invalidate the collection and every detail key of `kind`
    pub fn invalidate_kind(&self, kind: ResourceKind) {
        let mut keys: Vec<CacheKey> = self
            .state
            .borrow()
            .slots
            .keys()
            .filter(|key| key.kind == kind)
            .copied()
            .collect();
        keys.sort();
        for key in keys {
            self.invalidate(key);
        }
    }

    // ========================
    // Consumers and Lifecycle
    // ========================

    /// Call `listener` after every change of `key`'s entry until the returned
    /// handle is dropped
    pub fn subscribe(&self, key: CacheKey, listener: impl Fn(&CacheEntry) + 'static) -> Subscription {
        let mut guard = self.state_mut();
        let state = &mut *guard;
        let id = state.next_id();
        if !state.shut_down {
            state
                .slots
                .entry(key)
                .or_insert_with(|| Slot::new(key))
                .listeners
                .push((id, Rc::new(listener)));
        }
        Subscription {
            state: Rc::downgrade(&self.state),
            unsubscribed: Rc::downgrade(&self.unsubscribed),
            key,
            id,
        }
    }

    pub fn subscriber_count(&self, key: CacheKey) -> usize {
        self.state_mut()
            .slots
            .get(&key)
            .map_or(0, |slot| slot.listeners.len())
    }

    pub fn len(&self) -> usize {
        self.state.borrow().slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop entries nobody subscribes to and nothing is fetching
    pub fn collect_garbage(&self) -> usize {
        let removed: Vec<Slot> = {
            let mut state = self.state_mut();
            let keys: Vec<CacheKey> = state
                .slots
                .iter()
                .filter(|(_, slot)| slot.listeners.is_empty() && slot.in_flight.is_none())
                .map(|(key, _)| *key)
                .collect();
            let removed = keys.iter().filter_map(|key| state.slots.remove(key)).collect();
            removed
        };
        if !removed.is_empty() {
            debug!("cache: collected {} unreferenced entries", removed.len());
        }
        removed.len()
    }

    /// `collect_garbage` once more than `limit` entries are held
    pub fn collect_garbage_over(&self, limit: usize) -> usize {
        if self.len() > limit {
            self.collect_garbage()
        } else {
            0
        }
    }

    /// Tear down: drop every entry; later responses are discarded
    pub fn shutdown(&self) {
        let slots = {
            let mut state = self.state_mut();
            state.shut_down = true;
            std::mem::take(&mut state.slots)
        };
        debug!("cache: shut down with {} entries", slots.len());
        drop(slots);
    }

    // ========================
    // Fetch Plumbing
    // ========================

    /// Borrow the state, first removing listeners queued by `Subscription::drop`
    fn state_mut(&self) -> RefMut<'_, CacheState> {
        let mut state = self.state.borrow_mut();
        let queued = std::mem::take(&mut *self.unsubscribed.borrow_mut());
        for (key, id) in queued {
            if let Some(slot) = state.slots.get_mut(&key) {
                slot.listeners.retain(|(listener_id, _)| *listener_id != id);
            }
        }
        state
    }

    fn request(&self, key: CacheKey) -> SharedFetch {
        let transport = Rc::clone(&self.transport);
        let path = key.path();
        async move {
            transport
                .request(Method::Get, &path, None)
                .await
                .map(|response| response.data)
        }
        .boxed_local()
        .shared()
    }

    fn drive(&self, key: CacheKey, fetch_id: u64, future: SharedFetch) {
        let cache = self.clone();
        (self.spawner)(
            async move {
                let result = future.await;
                cache.settle(key, fetch_id, result);
            }
            .boxed_local(),
        );
    }

    /// Store a fetch result; later callers for the same fetch are no-ops
    fn settle(&self, key: CacheKey, fetch_id: u64, result: Result<Value, TransportError>) {
        {
            let mut state = self.state_mut();
            if state.shut_down {
                return;
            }
            let Some(slot) = state.slots.get_mut(&key) else {
                return;
            };
            let invalidated = match slot.in_flight.take() {
                Some(flight) if flight.id == fetch_id => flight.invalidated,
                other => {
                    slot.in_flight = other;
                    return;
                }
            };

            match result {
                Ok(data) => {
                    slot.last_good = Some(data.clone());
                    slot.entry.status = if invalidated {
                        CacheStatus::Stale
                    } else {
                        CacheStatus::Ready
                    };
                    slot.entry.data = Some(data);
                    slot.entry.error = None;
                    debug!("cache: {} settled as {:?}", key, slot.entry.status);
                }
                Err(err) => {
                    warn!("cache: fetch {} failed: {}", key, err);
                    if let Some(data) = slot.entry.data.take() {
                        slot.last_good = Some(data);
                    }
                    slot.entry.status = CacheStatus::Error;
                    slot.entry.error = Some(err);
                }
            }
        }
        self.notify(key);
    }

    /// Run listeners outside of any borrow so they may call back in
    fn notify(&self, key: CacheKey) {
        let (entry, listeners) = {
            let state = self.state_mut();
            let Some(slot) = state.slots.get(&key) else {
                return;
            };
            let listeners: Vec<Listener> = slot
                .listeners
                .iter()
                .map(|(_, listener)| Rc::clone(listener))
                .collect();
            (slot.entry.clone(), listeners)
        };
        for listener in listeners {
            listener(&entry);
        }
    }
}

/// Live interest in one key; dropping it unsubscribes
pub struct Subscription {
    state: Weak<RefCell<CacheState>>,
    unsubscribed: Weak<RefCell<Vec<(CacheKey, u64)>>>,
    key: CacheKey,
    id: u64,
}

impl Subscription {
    pub fn key(&self) -> CacheKey {
        self.key
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        let Some(state) = self.state.upgrade() else {
            return;
        };
        // Busy only when dropped from inside a cache operation; the next
        // borrow removes the listener.
        let Ok(mut state) = state.try_borrow_mut() else {
            if let Some(queue) = self.unsubscribed.upgrade() {
                queue.borrow_mut().push((self.key, self.id));
            }
            return;
        };
        if let Some(slot) = state.slots.get_mut(&self.key) {
            slot.listeners.retain(|(id, _)| *id != self.id);
        }
    }
}
