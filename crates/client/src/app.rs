//! Composition root: wires the service, the stores and the views, and swaps
//! the active view when the route changes.

use std::sync::Arc;

use finprod_events::Subscription;

use crate::config::ClientConfig;
use crate::http::HttpClient;
use crate::notification::NotificationStore;
use crate::router::{Navigator, Route};
use crate::service::{ProductApi, ProductService};
use crate::views::{FormMode, ProductFormView, ProductListView};

/// The view mounted for the current route.
#[derive(Debug, Clone)]
pub enum ActiveView {
    List(ProductListView),
    Form(ProductFormView),
}

impl ActiveView {
    pub fn teardown(&self) {
        match self {
            ActiveView::List(view) => view.teardown(),
            ActiveView::Form(view) => view.teardown(),
        }
    }
}

pub struct App {
    api: Arc<dyn ProductApi>,
    notifications: NotificationStore,
    navigator: Navigator,
    items_per_page: usize,
    active: Option<ActiveView>,
    mounted_route: Option<Route>,
    route_events: Subscription<Route>,
}

impl core::fmt::Debug for App {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("App")
            .field("mounted_route", &self.mounted_route)
            .field("active", &self.active)
            .finish_non_exhaustive()
    }
}

impl App {
    /// App talking to the backend at `config.api_url`.
    pub fn new(config: &ClientConfig) -> Self {
        let http = HttpClient::new(config.api_url.clone());
        tracing::info!(api_url = %http.base_url(), "product client configured");
        Self::with_api(Arc::new(ProductService::new(http)), config.items_per_page)
    }

    pub fn with_api(api: Arc<dyn ProductApi>, items_per_page: usize) -> Self {
        let navigator = Navigator::new();
        let route_events = navigator.subscribe();
        Self {
            api,
            notifications: NotificationStore::new(),
            navigator,
            items_per_page,
            active: None,
            mounted_route: None,
            route_events,
        }
    }

    pub fn notifications(&self) -> &NotificationStore {
        &self.notifications
    }

    pub fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    pub fn active(&self) -> Option<&ActiveView> {
        self.active.as_ref()
    }

    pub fn mounted_route(&self) -> Option<&Route> {
        self.mounted_route.as_ref()
    }

    pub fn list(&self) -> Option<&ProductListView> {
        match &self.active {
            Some(ActiveView::List(view)) => Some(view),
            _ => None,
        }
    }

    pub fn form(&self) -> Option<&ProductFormView> {
        match &self.active {
            Some(ActiveView::Form(view)) => Some(view),
            _ => None,
        }
    }

    /// Navigate to `path` and mount its view, even when it is already shown.
    pub async fn open(&mut self, path: &str) -> Route {
        let route = Route::parse(path);
        self.open_route(route.clone()).await;
        route
    }

    /// [`Self::open`] for an already resolved route.
    pub async fn open_route(&mut self, route: Route) {
        self.navigator.navigate_to(route.clone());
        // Our own navigation is already handled here.
        let _ = self.route_events.latest();
        self.mount(route).await;
    }

    /// Mount the view for the route a view navigated to since the last call.
    /// Returns `true` when a new view was mounted.
    pub async fn follow_navigation(&mut self) -> bool {
        let Some(route) = self.route_events.latest() else {
            return false;
        };
        if self.mounted_route.as_ref() == Some(&route) {
            return false;
        }
        self.mount(route).await;
        true
    }

    async fn mount(&mut self, route: Route) {
        if let Some(previous) = self.active.take() {
            previous.teardown();
        }

        let view = match &route {
            Route::ProductList => ActiveView::List(ProductListView::new(
                self.api.clone(),
                self.notifications.clone(),
                self.navigator.clone(),
                self.items_per_page,
            )),
            Route::NewProduct | Route::EditProduct(_) => ActiveView::Form(ProductFormView::new(
                self.api.clone(),
                self.notifications.clone(),
                self.navigator.clone(),
                FormMode::for_route(&route),
            )),
        };
        tracing::info!(route = %route, "mount view");

        self.active = Some(view.clone());
        self.mounted_route = Some(route);
        match view {
            ActiveView::List(list) => list.activate().await,
            ActiveView::Form(form) => form.activate().await,
        }
    }
}
