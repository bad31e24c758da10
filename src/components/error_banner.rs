//! Error Banner Component

use leptos::prelude::*;

/// Inline alert for failed reads and submissions
#[component]
pub fn ErrorBanner(#[prop(into)] message: String) -> impl IntoView {
    view! {
        <p class="error-banner" role="alert">{message}</p>
    }
}
