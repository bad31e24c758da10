//! Console Context
//!
//! Shared services and routing provided via Leptos Context API.

use std::rc::Rc;

use leptos::prelude::*;
use resource_sync::{ConsoleConfig, HttpTransport, LocalTask, QueryCache, Resource, ResourceSync, Spawner};

use crate::route::Route;

/// Core services owned by the root component; not `Send`, so they live in
/// local storage
pub struct ConsoleServices {
    pub cache: QueryCache,
    pub config: ConsoleConfig,
}

impl ConsoleServices {
    pub fn new(config: ConsoleConfig) -> Self {
        let transport = Rc::new(HttpTransport::new(config.api_base_url.clone()));
        let spawner: Spawner = Rc::new(|task: LocalTask| leptos::task::spawn_local(task));
        Self {
            cache: QueryCache::new(transport, spawner),
            config,
        }
    }
}

/// App-wide handles provided via context
#[derive(Clone, Copy)]
pub struct ConsoleContext {
    services: StoredValue<ConsoleServices, LocalStorage>,
    /// Current screen - read
    pub route: ReadSignal<Route>,
    /// Current screen - write
    set_route: WriteSignal<Route>,
}

impl ConsoleContext {
    pub fn new(services: ConsoleServices, route: (ReadSignal<Route>, WriteSignal<Route>)) -> Self {
        Self {
            services: StoredValue::new_local(services),
            route: route.0,
            set_route: route.1,
        }
    }

    pub fn cache(&self) -> QueryCache {
        self.services.with_value(|services| services.cache.clone())
    }

    pub fn api_base_url(&self) -> String {
        self.services.with_value(|services| services.config.api_base_url.clone())
    }

    /// Core facade for resource kind `R`
    pub fn sync<R: Resource>(&self) -> ResourceSync<R> {
        ResourceSync::new(self.cache())
    }

    /// Discard every cached entry; responses still in flight are dropped
    pub fn shutdown(&self) {
        let _ = self.services.try_with_value(|services| services.cache.shutdown());
    }

    /// Switch screens; no-op when already there
    ///
    /// Runs before the leaving screen unsubscribes, so its entries survive
    /// the collection.
    pub fn navigate(&self, route: Route) {
        if self.route.get_untracked() == route {
            return;
        }
        let _ = self.services.try_with_value(|services| {
            let removed = services.cache.collect_garbage_over(services.config.cache_limit);
            if removed > 0 {
                log::debug!("context: collected {} cached reads before {:?}", removed, route);
            }
        });
        self.set_route.set(route);
    }
}

pub fn use_console() -> ConsoleContext {
    expect_context::<ConsoleContext>()
}
