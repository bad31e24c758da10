//! Resource Console App
//!
//! Navigation bar plus the screen for the current route. The route is kept in
//! sync with the location hash in both directions.

use leptos::ev;
use leptos::prelude::*;
use resource_sync::ConsoleConfig;

use crate::components::{screen_for, NavBar};
use crate::context::{ConsoleContext, ConsoleServices};
use crate::route::Route;

#[component]
pub fn App(config: ConsoleConfig) -> impl IntoView {
    let route = signal(Route::from_location());
    let ctx = ConsoleContext::new(ConsoleServices::new(config), route);

    // Provide context to all children
    provide_context(ctx);

    // Route -> hash
    Effect::new(move |_| {
        let hash = ctx.route.get().to_hash();
        if let Some(window) = web_sys::window() {
            let location = window.location();
            if location.hash().ok().as_deref() != Some(hash.as_str()) {
                if let Err(err) = location.set_hash(&hash) {
                    log::warn!("app: could not set location hash {}: {:?}", hash, err);
                }
            }
        }
    });

    // Hash -> route (back/forward, typed URLs)
    let hashchange = window_event_listener(ev::hashchange, move |_| {
        ctx.navigate(Route::from_location());
    });

    on_cleanup(move || {
        hashchange.remove();
        ctx.shutdown();
    });

    view! {
        <div class="console-layout">
            <NavBar />
            <main class="console-main">
                {move || {
                    let current = ctx.route.get();
                    log::debug!("app: rendering {:?}", current);
                    screen_for(current)
                }}
            </main>
        </div>
    }
}
