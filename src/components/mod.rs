//! UI Components
//!
//! One generic list, detail and form screen, instantiated per resource kind.

mod error_banner;
mod field_input;
mod home;
mod nav_bar;
mod resource_detail;
mod resource_form;
mod resource_list;
mod screen;

pub use error_banner::ErrorBanner;
pub use home::Home;
pub use nav_bar::NavBar;
pub use screen::screen_for;
