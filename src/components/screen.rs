//! Screen Dispatch
//!
//! Picks the resource binding for a route and renders its screen.

use leptos::prelude::*;
use resource_sync::models::{CatalogItems, Comments, Posts, Recipes, Tasks};
use resource_sync::{Resource, ResourceKind};

use super::home::Home;
use super::resource_detail::resource_detail;
use super::resource_form::resource_form;
use super::resource_list::resource_list;
use crate::route::Route;

fn screen<R: Resource>(route: Route) -> AnyView {
    match route {
        Route::List(_) => resource_list::<R>().into_any(),
        Route::Detail(_, id) => resource_detail::<R>(id).into_any(),
        Route::Create(_) => resource_form::<R>(None).into_any(),
        Route::Edit(_, id) => resource_form::<R>(Some(id)).into_any(),
        Route::Home => view! { <Home /> }.into_any(),
    }
}

pub fn screen_for(route: Route) -> AnyView {
    match route.kind() {
        None => view! { <Home /> }.into_any(),
        Some(ResourceKind::Task) => screen::<Tasks>(route),
        Some(ResourceKind::Post) => screen::<Posts>(route),
        Some(ResourceKind::Comment) => screen::<Comments>(route),
        Some(ResourceKind::CatalogItem) => screen::<CatalogItems>(route),
        Some(ResourceKind::Recipe) => screen::<Recipes>(route),
    }
}
