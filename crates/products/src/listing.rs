//! Client-side search and pagination of the product table.

use crate::product::Product;

/// Products whose name, description or id contain `term`, ignoring case.
///
/// A blank term yields the full list.
pub fn filter_products(products: &[Product], term: &str) -> Vec<Product> {
    let needle = term.trim().to_lowercase();
    if needle.is_empty() {
        return products.to_vec();
    }

    products
        .iter()
        .filter(|product| product.matches(&needle))
        .cloned()
        .collect()
}

/// Page cursor over a filtered list.
///
/// `current_page` is 1-based and never below 1. The length of the list is
/// passed in on every call, so the cursor stays valid while the list changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    current_page: usize,
    items_per_page: usize,
}

impl Default for Pagination {
    fn default() -> Self {
        Self::new(Self::DEFAULT_ITEMS_PER_PAGE)
    }
}

impl Pagination {
    pub const DEFAULT_ITEMS_PER_PAGE: usize = 5;

    /// Page sizes offered by the list view.
    pub const PAGE_SIZE_OPTIONS: [usize; 3] = [5, 10, 20];

    pub fn new(items_per_page: usize) -> Self {
        Self {
            current_page: 1,
            items_per_page: items_per_page.max(1),
        }
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn items_per_page(&self) -> usize {
        self.items_per_page
    }

    /// `ceil(total_items / items_per_page)`, at least 1.
    pub fn total_pages(&self, total_items: usize) -> usize {
        total_items.div_ceil(self.items_per_page).max(1)
    }

    /// The current page, clamped to the pages that exist for `total_items`.
    pub fn effective_page(&self, total_items: usize) -> usize {
        self.current_page.min(self.total_pages(total_items))
    }

    /// Items of the effective page.
    pub fn page<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        let page = self.effective_page(items.len());
        let start = ((page - 1) * self.items_per_page).min(items.len());
        let end = (start + self.items_per_page).min(items.len());
        items.get(start..end).unwrap_or(&[])
    }

    pub fn reset(&mut self) {
        self.current_page = 1;
    }

    /// Change the page size and go back to page 1.
    pub fn set_items_per_page(&mut self, items_per_page: usize) {
        self.items_per_page = items_per_page.max(1);
        self.reset();
    }

    pub fn previous(&mut self) {
        if self.current_page > 1 {
            self.current_page -= 1;
        }
    }

    pub fn next(&mut self, total_items: usize) {
        if self.current_page < self.total_pages(total_items) {
            self.current_page += 1;
        }
    }

    /// Pull the cursor back inside the existing pages (after the list shrank).
    pub fn clamp_to(&mut self, total_items: usize) {
        self.current_page = self.effective_page(total_items);
    }
}
