//! Resource Detail Screen
//!
//! Read-only view of one item with edit and delete actions. Deleting asks
//! for confirmation and returns to the list on success.

use leptos::prelude::*;
use leptos::task::spawn_local;
use resource_sync::{codec, FieldWidget, Resource, ResourceSync, SubmitOutcome};

use super::error_banner::ErrorBanner;
use crate::context::use_console;
use crate::hooks::{use_detail, use_mutation, BrowserConfirm};
use crate::route::Route;

fn field_table<R: Resource>(entity: &R::Entity) -> impl IntoView {
    let fields = R::to_form_fields(entity);
    view! {
        <dl class="field-table">
            <dt>"ID"</dt>
            <dd>{R::entity_id(entity)}</dd>
            {R::FIELDS.iter().map(|spec| {
                let value = fields.get(spec.name).to_string();
                let rendered = match spec.widget {
                    FieldWidget::List => {
                        let lines = if value.is_empty() { Vec::new() } else { codec::decode(&value) };
                        view! {
                            <ul class="field-list">
                                {lines.into_iter().map(|line| view! { <li>{line}</li> }).collect_view()}
                            </ul>
                        }.into_any()
                    }
                    FieldWidget::Select(choices) => choices
                        .iter()
                        .find(|(choice, _)| *choice == value)
                        .map_or(value.clone(), |(_, label)| label.to_string())
                        .into_any(),
                    _ => value.into_any(),
                };
                view! {
                    <dt>{spec.label}</dt>
                    <dd>{rendered}</dd>
                }
            }).collect_view()}
            {R::detail_rows(entity).into_iter().map(|(label, value)| view! {
                <dt>{label}</dt>
                <dd>{value}</dd>
            }).collect_view()}
        </dl>
    }
}

pub fn resource_detail<R: Resource>(id: u32) -> impl IntoView {
    let ctx = use_console();
    let kind = R::KIND;
    let detail = use_detail::<R>(id);
    let mutation = use_mutation::<R>();

    let delete = move |_| {
        let sync = ctx.sync::<R>();
        let coordinator = mutation.coordinator();
        spawn_local(async move {
            if let SubmitOutcome::Succeeded(data) = sync.delete(id, &coordinator, &BrowserConfirm).await {
                match ResourceSync::<R>::decode_deleted(data) {
                    Ok(deleted) => log::info!(
                        "detail: {} #{} deleted at {}",
                        kind,
                        id,
                        deleted.deleted_at().map_or_else(|| deleted.deleted_on.clone(), |at| at.to_rfc3339())
                    ),
                    Err(err) => log::warn!("detail: delete response for {} #{}: {}", kind, id, err),
                }
            }
        });
    };

    let title = move || {
        detail
            .get()
            .data
            .map(|entity| R::title(&entity))
            .unwrap_or_else(|| format!("{} #{}", kind.label(), id))
    };

    view! {
        <section class="screen resource-detail">
            <header class="screen-header">
                <button class="back-btn" on:click=move |_| ctx.navigate(Route::List(kind))>
                    "Back"
                </button>
                <h1>{title}</h1>
                <div class="screen-actions">
                    <button on:click=move |_| ctx.navigate(Route::Edit(kind, id))>"Edit"</button>
                    <button class="danger-btn" disabled=move || mutation.is_pending() on:click=delete>
                        {move || if mutation.is_pending() { "Deleting..." } else { "Delete" }}
                    </button>
                </div>
            </header>
            {move || mutation.failure().map(|message| view! {
                <ErrorBanner message=format!("Could not delete {}: {}", kind.label(), message) />
                <button class="dismiss-btn" on:click=move |_| mutation.reset()>"Dismiss"</button>
            })}
            {move || {
                let entry = detail.get();
                if let Some(message) = entry.error_message() {
                    // Keep showing what the last successful read returned
                    return view! {
                        <ErrorBanner message=message />
                        {entry.last_good.map(|entity| view! {
                            <div class="last-good">{field_table::<R>(&entity)}</div>
                        })}
                    }
                    .into_any();
                }
                match entry.data {
                    None => view! { <p class="loading">"Loading..."</p> }.into_any(),
                    Some(entity) => field_table::<R>(&entity).into_any(),
                }
            }}
        </section>
    }
}
