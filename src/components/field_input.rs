//! Field Input Component
//!
//! Renders one `FieldSpec` as its input widget, bound to the form binder.

use leptos::prelude::*;
use resource_sync::{FieldSpec, FieldWidget, FormBinder, Resource};

/// Input plus label and validation message for one field
///
/// `revision` is bumped whenever the binder changes outside of typing
/// (populate, validation), so values and errors re-render then.
pub fn field_input<R: Resource>(
    spec: FieldSpec,
    binder: StoredValue<FormBinder<R>, LocalStorage>,
    revision: ReadSignal<u32>,
) -> impl IntoView {
    let value = move || {
        revision.get();
        binder.with_value(|b| b.field(spec.name).to_string())
    };
    let error = move || {
        revision.get();
        binder.with_value(|b| b.error_for(spec.name).map(str::to_string))
    };
    let set_value = move |text: String| binder.update_value(|b| b.set(spec.name, text));

    let input = match spec.widget {
        FieldWidget::Text => view! {
            <input type="text" name=spec.name prop:value=value on:input=move |ev| set_value(event_target_value(&ev)) />
        }.into_any(),
        FieldWidget::Number => view! {
            <input type="number" step="any" name=spec.name prop:value=value on:input=move |ev| set_value(event_target_value(&ev)) />
        }.into_any(),
        FieldWidget::TextArea => view! {
            <textarea name=spec.name rows="3" prop:value=value on:input=move |ev| set_value(event_target_value(&ev))></textarea>
        }.into_any(),
        FieldWidget::List => view! {
            <textarea
                class="list-input"
                name=spec.name
                rows="5"
                placeholder="One entry per line"
                prop:value=value
                on:input=move |ev| set_value(event_target_value(&ev))
            ></textarea>
        }.into_any(),
        FieldWidget::Select(choices) => view! {
            <select name=spec.name prop:value=value on:change=move |ev| set_value(event_target_value(&ev))>
                {choices.iter().map(|(choice, label)| view! {
                    <option value=*choice>{*label}</option>
                }).collect_view()}
            </select>
        }.into_any(),
    };

    view! {
        <label class="form-field">
            <span class="field-label">{spec.label}</span>
            {input}
            {move || error().map(|message| view! { <span class="field-error">{message}</span> })}
        </label>
    }
}
