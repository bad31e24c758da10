//! Navigation Bar Component
//!
//! One tab per resource kind; the active tab follows the current route.

use leptos::prelude::*;
use resource_sync::ResourceKind;

use crate::context::use_console;
use crate::route::Route;

#[component]
pub fn NavBar() -> impl IntoView {
    let ctx = use_console();

    view! {
        <nav class="console-nav">
            <button class="nav-home" on:click=move |_| ctx.navigate(Route::Home)>
                "Console"
            </button>
            {ResourceKind::ALL.into_iter().map(|kind| {
                let is_active = move || ctx.route.get().kind() == Some(kind);
                view! {
                    <button
                        class=move || if is_active() { "nav-btn active" } else { "nav-btn" }
                        on:click=move |_| ctx.navigate(Route::List(kind))
                    >
                        {kind.plural_title()}
                    </button>
                }
            }).collect_view()}
        </nav>
    }
}
