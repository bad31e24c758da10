//! Resource Console Frontend Entry Point

mod app;
mod components;
mod config;
mod context;
mod hooks;
mod logger;
mod route;

use app::App;
use leptos::prelude::*;

fn main() {
    console_error_panic_hook::set_once();
    let config = config::load();
    logger::init(config.level_filter());
    log::info!("console: backend {}", config.api_base_url);
    mount_to_body(move || view! { <App config=config /> });
}
