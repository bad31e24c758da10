//! Resource Form Screen
//!
//! Create form, or edit form pre-filled once from the cached item. Submits go
//! through the screen's mutation coordinator; edits ask for confirmation.

use leptos::prelude::*;
use leptos::task::spawn_local;
use resource_sync::{FormBinder, FormState, Resource, ResourceSync};

use super::error_banner::ErrorBanner;
use super::field_input::field_input;
use crate::context::use_console;
use crate::hooks::{use_detail, use_mutation, BrowserConfirm};
use crate::route::Route;

pub fn resource_form<R: Resource>(target: Option<u32>) -> impl IntoView {
    let ctx = use_console();
    let kind = R::KIND;
    let mutation = use_mutation::<R>();
    let binder = StoredValue::new_local(
        target.map_or_else(FormBinder::<R>::new_create, FormBinder::<R>::new_edit),
    );
    let (revision, set_revision) = signal(0u32);
    let refresh = move || set_revision.update(|r| *r += 1);

    // Edit: fill the form the first time the item is available
    let detail = target.map(use_detail::<R>);
    if let Some(detail) = detail {
        Effect::new(move |_| {
            if let Some(entity) = detail.get().data {
                let mut applied = false;
                binder.update_value(|b| applied = b.populate(&entity));
                if applied {
                    refresh();
                }
            }
        });
    }

    let populated = move || {
        revision.get();
        binder.with_value(|b| b.state() != FormState::Unpopulated)
    };

    let submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        if mutation.state.get_untracked().is_pending() {
            return;
        }
        let sync = ctx.sync::<R>();
        let mut prepared = None;
        binder.update_value(|b| prepared = Some(sync.form_intent(b)));
        refresh();
        let Some(Ok(intent)) = prepared else {
            return;
        };

        let coordinator = mutation.coordinator();
        spawn_local(async move {
            let outcome = coordinator.submit_confirmed(intent, &BrowserConfirm).await;
            // A success has already navigated away; the binder may be gone
            let _ = binder.try_update_value(|b| ResourceSync::<R>::settle_form(b, &outcome, &coordinator));
            let _ = set_revision.try_update(|r| *r += 1);
        });
    };

    let title = match target {
        Some(id) => format!("Edit {} #{}", kind.label(), id),
        None => format!("New {}", kind.label()),
    };
    let back = target.map_or(Route::List(kind), |id| Route::Detail(kind, id));

    view! {
        <section class="screen resource-form">
            <header class="screen-header">
                <button class="back-btn" on:click=move |_| ctx.navigate(back)>"Cancel"</button>
                <h1>{title}</h1>
            </header>
            {move || mutation.failure().map(|message| view! {
                <ErrorBanner message=format!("Could not save {}: {}", kind.label(), message) />
            })}
            {move || detail.and_then(|d| d.get().error_message()).map(|message| view! {
                <ErrorBanner message=message />
            })}
            <Show when=populated fallback=|| view! { <p class="loading">"Loading..."</p> }>
                <form class="form-fields" on:submit=submit>
                    {R::FIELDS
                        .iter()
                        .map(|spec| field_input::<R>(*spec, binder, revision))
                        .collect_view()}
                    <button type="submit" class="primary-btn" disabled=move || mutation.is_pending()>
                        {move || if mutation.is_pending() { "Saving..." } else { "Save" }}
                    </button>
                </form>
            </Show>
        </section>
    }
}
