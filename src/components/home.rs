//! Home Screen

use leptos::prelude::*;
use resource_sync::ResourceKind;

use crate::context::use_console;
use crate::route::Route;

#[component]
pub fn Home() -> impl IntoView {
    let ctx = use_console();

    view! {
        <section class="screen home">
            <h1>"Resource Console"</h1>
            <p class="api-base">"Backend: " {ctx.api_base_url()}</p>
            <ul class="kind-cards">
                {ResourceKind::ALL.into_iter().map(|kind| view! {
                    <li class="kind-card" on:click=move |_| ctx.navigate(Route::List(kind))>
                        {kind.plural_title()}
                    </li>
                }).collect_view()}
            </ul>
        </section>
    }
}
