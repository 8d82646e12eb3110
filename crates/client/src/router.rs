//! Route table and navigation.

use std::sync::{Arc, Mutex, PoisonError};

use finprod_core::ProductId;
use finprod_events::{EventBus, InMemoryEventBus, Subscription};

/// A screen of the client.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Route {
    /// `/`
    ProductList,
    /// `/products/new`
    NewProduct,
    /// `/products/edit/:id`
    EditProduct(ProductId),
}

impl Route {
    /// Resolve a path. Anything that is not a known route resolves to the
    /// product list.
    pub fn parse(path: &str) -> Self {
        let path = path
            .split(['?', '#'])
            .next()
            .unwrap_or_default()
            .trim();
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

        match segments.as_slice() {
            [] => Route::ProductList,
            ["products", "new"] => Route::NewProduct,
            ["products", "edit", id] => match id.parse() {
                Ok(id) => Route::EditProduct(id),
                Err(_) => Route::ProductList,
            },
            _ => {
                tracing::debug!(path, "unknown route, redirecting to /");
                Route::ProductList
            }
        }
    }

    pub fn path(&self) -> String {
        match self {
            Route::ProductList => "/".to_string(),
            Route::NewProduct => "/products/new".to_string(),
            Route::EditProduct(id) => format!("/products/edit/{id}"),
        }
    }
}

impl core::fmt::Display for Route {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.path())
    }
}

/// Shared handle to the current route.
///
/// Views navigate through it; the app subscribes to learn when to swap views.
#[derive(Debug, Clone)]
pub struct Navigator {
    current: Arc<Mutex<Route>>,
    bus: Arc<InMemoryEventBus<Route>>,
}

impl Default for Navigator {
    fn default() -> Self {
        Self::new()
    }
}

impl Navigator {
    pub fn new() -> Self {
        Self {
            current: Arc::new(Mutex::new(Route::ProductList)),
            bus: Arc::new(InMemoryEventBus::new()),
        }
    }

    pub fn current(&self) -> Route {
        self.current.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Navigate to a path (resolved with [`Route::parse`]).
    pub fn navigate(&self, path: &str) -> Route {
        let route = Route::parse(path);
        self.navigate_to(route.clone());
        route
    }

    pub fn navigate_to(&self, route: Route) {
        let mut current = self.current.lock().unwrap_or_else(PoisonError::into_inner);
        tracing::info!(from = %*current, to = %route, "navigate");
        *current = route.clone();
        if let Err(e) = self.bus.publish(route) {
            tracing::warn!(error = ?e, "failed to publish route change");
        }
    }

    /// Route changes published after this call.
    pub fn subscribe(&self) -> Subscription<Route> {
        self.bus.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_routes() {
        assert_eq!(Route::parse("/"), Route::ProductList);
        assert_eq!(Route::parse(""), Route::ProductList);
        assert_eq!(Route::parse("/products/new"), Route::NewProduct);
        assert_eq!(
            Route::parse("/products/edit/trj-crd"),
            Route::EditProduct("trj-crd".parse().unwrap())
        );
        assert_eq!(Route::parse("/products/new/?x=1"), Route::NewProduct);
    }

    #[test]
    fn unknown_paths_redirect_to_the_list() {
        assert_eq!(Route::parse("/nope"), Route::ProductList);
        assert_eq!(Route::parse("/products"), Route::ProductList);
        assert_eq!(Route::parse("/products/edit"), Route::ProductList);
        assert_eq!(Route::parse("/products/edit/a/b"), Route::ProductList);
    }

    #[test]
    fn path_is_the_inverse_of_parse() {
        for route in [
            Route::ProductList,
            Route::NewProduct,
            Route::EditProduct("abc".parse().unwrap()),
        ] {
            assert_eq!(Route::parse(&route.path()), route);
        }
    }

    #[test]
    fn navigator_tracks_and_publishes() {
        let navigator = Navigator::new();
        let mut changes = navigator.subscribe();

        assert_eq!(navigator.current(), Route::ProductList);
        navigator.navigate("/products/new");
        navigator.navigate("/whatever");

        assert_eq!(navigator.current(), Route::ProductList);
        assert_eq!(changes.try_recv().unwrap(), Route::NewProduct);
        assert_eq!(changes.try_recv().unwrap(), Route::ProductList);
    }
}
