//! Runtime Configuration
//!
//! The host page may override the build-time settings with
//! `<meta name="console-api-base">` and `<meta name="console-log-level">`.

use resource_sync::ConsoleConfig;
use wasm_bindgen::JsCast;

const API_BASE_META: &str = "console-api-base";
const LOG_LEVEL_META: &str = "console-log-level";

fn meta_content(name: &str) -> Option<String> {
    let document = web_sys::window()?.document()?;
    let element = document
        .query_selector(&format!("meta[name=\"{}\"]", name))
        .ok()??;
    let meta = element.dyn_into::<web_sys::HtmlMetaElement>().ok()?;
    Some(meta.content())
}

/// Defaults, then build environment, then page meta tags
pub fn load() -> ConsoleConfig {
    let api_base = meta_content(API_BASE_META);
    let log_level = meta_content(LOG_LEVEL_META);
    ConsoleConfig::from_build_env().with_overrides(api_base.as_deref(), log_level.as_deref())
}
