//! Console Routes
//!
//! Screens are addressed by the location hash:
//! `#/recipes`, `#/recipes/5`, `#/recipes/new`, `#/recipes/5/edit`.

use resource_sync::{Navigation, ResourceKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Home,
    List(ResourceKind),
    Detail(ResourceKind, u32),
    Create(ResourceKind),
    Edit(ResourceKind, u32),
}

impl Route {
    pub fn kind(&self) -> Option<ResourceKind> {
        match self {
            Route::Home => None,
            Route::List(kind) | Route::Create(kind) => Some(*kind),
            Route::Detail(kind, _) | Route::Edit(kind, _) => Some(*kind),
        }
    }

    pub fn to_hash(&self) -> String {
        match self {
            Route::Home => "#/".to_string(),
            Route::List(kind) => format!("#/{}", kind.segment()),
            Route::Detail(kind, id) => format!("#/{}/{}", kind.segment(), id),
            Route::Create(kind) => format!("#/{}/new", kind.segment()),
            Route::Edit(kind, id) => format!("#/{}/{}/edit", kind.segment(), id),
        }
    }

    /// Unknown hashes land on `Home`
    pub fn from_hash(hash: &str) -> Self {
        let path = hash.trim_start_matches('#').trim_matches('/');
        let parts: Vec<&str> = path.split('/').filter(|p| !p.is_empty()).collect();
        let Some(kind) = parts
            .first()
            .and_then(|segment| ResourceKind::ALL.into_iter().find(|k| k.segment() == *segment))
        else {
            return Route::Home;
        };

        match parts[1..] {
            [] => Route::List(kind),
            ["new"] => Route::Create(kind),
            [id] => id.parse().map_or(Route::List(kind), |id| Route::Detail(kind, id)),
            [id, "edit"] => id.parse().map_or(Route::List(kind), |id| Route::Edit(kind, id)),
            _ => Route::List(kind),
        }
    }

    /// Route for the current browser location
    pub fn from_location() -> Self {
        web_sys::window()
            .and_then(|window| window.location().hash().ok())
            .map_or(Route::Home, |hash| Route::from_hash(&hash))
    }
}

impl From<Navigation> for Route {
    fn from(navigation: Navigation) -> Self {
        match navigation {
            Navigation::CanonicalList(kind) => Route::List(kind),
            Navigation::Detail(kind, id) => Route::Detail(kind, id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_round_trip() {
        let routes = [
            Route::Home,
            Route::List(ResourceKind::Task),
            Route::Detail(ResourceKind::CatalogItem, 12),
            Route::Create(ResourceKind::Recipe),
            Route::Edit(ResourceKind::Comment, 3),
        ];
        for route in routes {
            assert_eq!(Route::from_hash(&route.to_hash()), route);
        }
    }

    #[test]
    fn test_malformed_hashes() {
        assert_eq!(Route::from_hash(""), Route::Home);
        assert_eq!(Route::from_hash("#/users"), Route::Home);
        assert_eq!(Route::from_hash("#/posts/abc"), Route::List(ResourceKind::Post));
        assert_eq!(Route::from_hash("#/products/"), Route::List(ResourceKind::CatalogItem));
    }

    #[test]
    fn test_navigation_signal() {
        let route = Route::from(Navigation::CanonicalList(ResourceKind::Recipe));
        assert_eq!(route, Route::List(ResourceKind::Recipe));
        assert_eq!(route.to_hash(), "#/recipes");
    }
}
