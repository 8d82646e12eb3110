//! Financial products catalogue model.
//!
//! This crate contains the product model and the rules the views apply to it,
//! implemented purely as deterministic logic (no IO, no HTTP, no async).

pub mod date;
pub mod listing;
pub mod product;
pub mod validation;

pub use date::{format_date, parse_iso_date, revision_date_for};
pub use listing::{Pagination, filter_products};
pub use product::{Product, ProductFormData, ProductsResponse};
pub use validation::{Field, FieldError, Rule};
