//! Resource List Screen
//!
//! Collection of one kind, read through the shared cache.

use leptos::prelude::*;
use resource_sync::{CacheStatus, Resource};

use super::error_banner::ErrorBanner;
use crate::context::{use_console, ConsoleContext};
use crate::hooks::use_list;
use crate::route::Route;

fn list_row<R: Resource>(ctx: ConsoleContext, item: &R::Entity) -> impl IntoView {
    let id = R::entity_id(item);
    let kind = R::KIND;
    view! {
        <li class="item-row" on:click=move |_| ctx.navigate(Route::Detail(kind, id))>
            <span class="item-id">{format!("#{}", id)}</span>
            <span class="item-title">{R::title(item)}</span>
        </li>
    }
}

pub fn resource_list<R: Resource>() -> impl IntoView {
    let ctx = use_console();
    let kind = R::KIND;
    let list = use_list::<R>();

    view! {
        <section class="screen resource-list">
            <header class="screen-header">
                <h1>{kind.plural_title()}</h1>
                <button class="primary-btn" on:click=move |_| ctx.navigate(Route::Create(kind))>
                    {format!("New {}", kind.label())}
                </button>
            </header>
            {move || {
                let entry = list.get();
                if let Some(message) = entry.error_message() {
                    // Keep showing what the last successful read returned
                    return view! {
                        <ErrorBanner message=message />
                        {entry.last_good.map(|items| view! {
                            <ul class="item-list last-good">
                                {items.iter().map(|item| list_row::<R>(ctx, item)).collect_view()}
                            </ul>
                        })}
                    }
                    .into_any();
                }
                // Stale entries keep rendering their data while the refetch runs
                let refreshing = entry.status == CacheStatus::Stale;
                match entry.data {
                    None => view! { <p class="loading">"Loading..."</p> }.into_any(),
                    Some(items) if items.is_empty() => view! {
                        <p class="empty">{format!("No {} yet.", kind.plural_title().to_lowercase())}</p>
                    }.into_any(),
                    Some(items) => view! {
                        <ul class=if refreshing { "item-list refreshing" } else { "item-list" }>
                            {items.iter().map(|item| list_row::<R>(ctx, item)).collect_view()}
                        </ul>
                    }.into_any(),
                }
            }}
        </section>
    }
}
