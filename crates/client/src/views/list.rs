//! Product table: load, search, paginate, delete.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use finprod_core::ProductId;
use finprod_products::{Pagination, Product, filter_products, format_date};

use crate::notification::NotificationStore;
use crate::router::{Navigator, Route};
use crate::scope::ViewScope;
use crate::service::ProductApi;
use crate::views::components::{ConfirmationModal, LoadingIndicator};

/// Everything the product table renders.
#[derive(Debug, Clone)]
pub struct ProductListState {
    /// Last list returned by the backend.
    pub products: Vec<Product>,
    /// `products` after applying the search term.
    pub filtered: Vec<Product>,
    pub is_loading: bool,
    pub search_term: String,
    pub pagination: Pagination,
    /// Product waiting for delete confirmation.
    pub pending_delete: Option<Product>,
    pub delete_modal: ConfirmationModal,
    pub loading: LoadingIndicator,
}

impl ProductListState {
    fn new(items_per_page: usize) -> Self {
        Self {
            products: Vec::new(),
            filtered: Vec::new(),
            is_loading: false,
            search_term: String::new(),
            pagination: Pagination::new(items_per_page),
            pending_delete: None,
            delete_modal: ConfirmationModal::default(),
            loading: LoadingIndicator::default(),
        }
    }

    /// Rows of the current page.
    pub fn page(&self) -> &[Product] {
        self.pagination.page(&self.filtered)
    }

    pub fn current_page(&self) -> usize {
        self.pagination.effective_page(self.filtered.len())
    }

    pub fn total_pages(&self) -> usize {
        self.pagination.total_pages(self.filtered.len())
    }
}

/// The product list screen (`/`).
#[derive(Clone)]
pub struct ProductListView {
    api: Arc<dyn ProductApi>,
    notifications: NotificationStore,
    navigator: Navigator,
    scope: ViewScope,
    state: Arc<Mutex<ProductListState>>,
}

impl core::fmt::Debug for ProductListView {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ProductListView")
            .field("state", &*self.state())
            .finish_non_exhaustive()
    }
}

impl ProductListView {
    pub fn new(
        api: Arc<dyn ProductApi>,
        notifications: NotificationStore,
        navigator: Navigator,
        items_per_page: usize,
    ) -> Self {
        Self {
            api,
            notifications,
            navigator,
            scope: ViewScope::new(),
            state: Arc::new(Mutex::new(ProductListState::new(items_per_page))),
        }
    }

    /// Called once when the screen is shown.
    pub async fn activate(&self) {
        tracing::info!("product list activated");
        self.load_products().await;
    }

    /// Fetch all products and show them unfiltered.
    pub async fn load_products(&self) {
        self.state().is_loading = true;

        let Some(result) = self.scope.guard(self.api.list()).await else {
            tracing::debug!("product list torn down while loading");
            return;
        };

        match result {
            Ok(products) => {
                let mut state = self.state();
                tracing::info!(count = products.len(), "products loaded");
                state.filtered = products.clone();
                state.products = products;
                state.is_loading = false;
                let total = state.filtered.len();
                state.pagination.clamp_to(total);
            }
            Err(e) => {
                self.notifications
                    .error(format!("Error loading products: {}", e.message()));
                self.state().is_loading = false;
            }
        }
    }

    /// Filter by `term` (name, description or id; case-insensitive) and go
    /// back to page 1.
    pub fn search(&self, term: &str) {
        let mut state = self.state();
        state.search_term = term.to_string();
        state.filtered = filter_products(&state.products, term);
        state.pagination.reset();
    }

    /// Rows of the current page.
    pub fn page(&self) -> Vec<Product> {
        self.state().page().to_vec()
    }

    pub fn current_page(&self) -> usize {
        self.state().current_page()
    }

    pub fn total_pages(&self) -> usize {
        self.state().total_pages()
    }

    pub fn set_items_per_page(&self, items_per_page: usize) {
        self.state().pagination.set_items_per_page(items_per_page);
    }

    pub fn previous_page(&self) {
        self.state().pagination.previous();
    }

    pub fn next_page(&self) {
        let mut state = self.state();
        let total = state.filtered.len();
        state.pagination.next(total);
    }

    /// Ask for confirmation before deleting `product`.
    pub fn request_delete(&self, product: Product) {
        let mut state = self.state();
        state
            .delete_modal
            .open(format!("Are you sure you want to delete {}?", product.name));
        state.pending_delete = Some(product);
    }

    /// [`Self::request_delete`] for a product of the loaded list.
    /// Returns `false` when no such product is loaded.
    pub fn request_delete_by_id(&self, id: &ProductId) -> bool {
        let found = self.state().products.iter().find(|p| &p.id == id).cloned();
        match found {
            Some(product) => {
                self.request_delete(product);
                true
            }
            None => false,
        }
    }

    /// Delete the pending product, then reload the list on success.
    pub async fn confirm_delete(&self) {
        let Some(target) = self.state().pending_delete.clone() else {
            return;
        };

        let Some(result) = self.scope.guard(self.api.delete(&target.id)).await else {
            return;
        };

        self.close_delete_modal();
        match result {
            Ok(()) => {
                self.notifications.success("Product deleted successfully");
                self.load_products().await;
            }
            Err(e) => {
                self.notifications
                    .error(format!("Error deleting product: {}", e.message()));
            }
        }
    }

    /// Close the confirmation without calling the backend.
    pub fn cancel_delete(&self) {
        self.close_delete_modal();
    }

    /// `2025-01-15` → `15/01/2025`. Unparseable values are shown as they are.
    pub fn format_date(value: &str) -> String {
        format_date(value).unwrap_or_else(|_| value.to_string())
    }

    pub fn navigate_to_create(&self) {
        self.navigator.navigate_to(Route::NewProduct);
    }

    pub fn navigate_to_edit(&self, product: &Product) {
        self.navigator.navigate_to(Route::EditProduct(product.id.clone()));
    }

    /// Stop delivering backend results to this view.
    pub fn teardown(&self) {
        self.scope.teardown();
    }

    pub fn snapshot(&self) -> ProductListState {
        self.state().clone()
    }

    fn close_delete_modal(&self) {
        let mut state = self.state();
        state.delete_modal.close();
        state.pending_delete = None;
    }

    fn state(&self) -> MutexGuard<'_, ProductListState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notification::NotificationKind;
    use crate::testing::{Call, FakeProductApi, product, server_error};

    fn two_products() -> Vec<Product> {
        vec![
            product("prod-1", "Producto 1", "Descripcion del producto"),
            product("prod-2", "Producto 2", "Otra descripcion distinta"),
        ]
    }

    fn view_over(api: Arc<FakeProductApi>, per_page: usize) -> (ProductListView, NotificationStore, Navigator) {
        let notifications = NotificationStore::new();
        let navigator = Navigator::new();
        let view = ProductListView::new(api, notifications.clone(), navigator.clone(), per_page);
        (view, notifications, navigator)
    }

    #[tokio::test]
    async fn activate_loads_products_and_clears_loading() {
        let api = FakeProductApi::with_products(two_products());
        let (view, notifications, _) = view_over(api.clone(), 5);

        view.activate().await;

        let state = view.snapshot();
        assert!(!state.is_loading);
        assert_eq!(state.products, two_products());
        assert_eq!(state.filtered, two_products());
        assert_eq!(api.calls(), vec![Call::List]);
        assert!(notifications.snapshot().is_empty());
    }

    #[tokio::test]
    async fn load_failure_notifies_and_keeps_previous_list() {
        let api = FakeProductApi::with_products(two_products());
        let (view, notifications, _) = view_over(api.clone(), 5);
        view.activate().await;

        api.fail("list", server_error("backend down"));
        view.load_products().await;

        let state = view.snapshot();
        assert!(!state.is_loading);
        assert_eq!(state.products.len(), 2);

        let shown = notifications.snapshot();
        assert_eq!(shown.len(), 1);
        assert_eq!(shown[0].kind, NotificationKind::Error);
        assert_eq!(shown[0].message, "Error loading products: backend down");
    }

    #[tokio::test]
    async fn search_filters_and_resets_page() {
        let api = FakeProductApi::with_products(two_products());
        let (view, _, _) = view_over(api, 1);
        view.activate().await;

        view.next_page();
        assert_eq!(view.current_page(), 2);

        view.search("Producto 1");
        assert_eq!(view.current_page(), 1);
        let page = view.page();
        assert_eq!(page.len(), 1);
        assert_eq!(page[0].name, "Producto 1");

        view.next_page();
        view.search("   ");
        assert_eq!(view.snapshot().filtered, two_products());
        assert_eq!(view.current_page(), 1);
    }

    #[tokio::test]
    async fn paginates_two_items_one_per_page() {
        let api = FakeProductApi::with_products(two_products());
        let (view, _, _) = view_over(api, 1);
        view.activate().await;

        assert_eq!(view.total_pages(), 2);
        assert_eq!(view.page()[0].id.as_str(), "prod-1");

        view.previous_page();
        assert_eq!(view.current_page(), 1);

        view.next_page();
        assert_eq!(view.page()[0].id.as_str(), "prod-2");
        view.next_page();
        assert_eq!(view.current_page(), 2);

        view.set_items_per_page(5);
        assert_eq!(view.current_page(), 1);
        assert_eq!(view.total_pages(), 1);
        assert_eq!(view.page().len(), 2);
    }

    #[tokio::test]
    async fn cancel_delete_makes_no_call() {
        let api = FakeProductApi::with_products(two_products());
        let (view, _, _) = view_over(api.clone(), 5);
        view.activate().await;

        view.request_delete(two_products()[0].clone());
        let state = view.snapshot();
        assert!(state.delete_modal.is_open);
        assert_eq!(state.delete_modal.message, "Are you sure you want to delete Producto 1?");

        view.cancel_delete();
        let state = view.snapshot();
        assert!(!state.delete_modal.is_open);
        assert!(state.pending_delete.is_none());
        assert_eq!(api.calls(), vec![Call::List]);

        view.confirm_delete().await;
        assert_eq!(api.calls(), vec![Call::List]);
    }

    #[tokio::test]
    async fn confirm_delete_deletes_notifies_and_reloads() {
        let api = FakeProductApi::with_products(two_products());
        let (view, notifications, _) = view_over(api.clone(), 5);
        view.activate().await;

        assert!(view.request_delete_by_id(&"prod-1".parse().unwrap()));
        view.confirm_delete().await;

        assert_eq!(
            api.calls(),
            vec![Call::List, Call::Delete("prod-1".to_string()), Call::List]
        );
        let state = view.snapshot();
        assert_eq!(state.products.len(), 1);
        assert!(!state.delete_modal.is_open);
        assert!(state.pending_delete.is_none());
        assert_eq!(notifications.snapshot()[0].message, "Product deleted successfully");
    }

    #[tokio::test]
    async fn failed_delete_notifies_and_closes_confirmation() {
        let api = FakeProductApi::with_products(two_products());
        let (view, notifications, _) = view_over(api.clone(), 5);
        view.activate().await;
        api.fail("delete", server_error("locked"));

        view.request_delete(two_products()[1].clone());
        view.confirm_delete().await;

        let state = view.snapshot();
        assert_eq!(state.products.len(), 2);
        assert!(state.pending_delete.is_none());
        let shown = notifications.snapshot();
        assert_eq!(shown[0].kind, NotificationKind::Error);
        assert_eq!(shown[0].message, "Error deleting product: locked");
        assert_eq!(api.calls().last(), Some(&Call::Delete("prod-2".to_string())));
    }

    #[tokio::test]
    async fn unknown_id_does_not_open_confirmation() {
        let api = FakeProductApi::with_products(two_products());
        let (view, _, _) = view_over(api, 5);
        view.activate().await;

        assert!(!view.request_delete_by_id(&"nope".parse().unwrap()));
        assert!(!view.snapshot().delete_modal.is_open);
    }

    #[tokio::test]
    async fn teardown_drops_in_flight_results() {
        let api = FakeProductApi::with_products(two_products());
        let gate = api.hold_list();
        let (view, notifications, _) = view_over(api.clone(), 5);

        let loading = view.clone();
        let task = tokio::spawn(async move { loading.activate().await });
        while !view.snapshot().is_loading {
            tokio::task::yield_now().await;
        }

        view.teardown();
        gate.notify_one();
        task.await.unwrap();

        assert!(view.snapshot().products.is_empty());
        assert!(notifications.snapshot().is_empty());
    }

    #[tokio::test]
    async fn navigation_helpers() {
        let api = FakeProductApi::with_products(two_products());
        let (view, _, navigator) = view_over(api, 5);

        view.navigate_to_create();
        assert_eq!(navigator.current(), Route::NewProduct);

        view.navigate_to_edit(&two_products()[1]);
        assert_eq!(navigator.current().path(), "/products/edit/prod-2");
    }

    #[test]
    fn formats_dates_for_the_table() {
        assert_eq!(ProductListView::format_date("2025-01-15"), "15/01/2025");
        assert_eq!(ProductListView::format_date("2025-12-31"), "31/12/2025");
        assert_eq!(ProductListView::format_date("soon"), "soon");
    }
}
