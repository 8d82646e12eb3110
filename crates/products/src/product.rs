use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use finprod_core::ProductId;

use crate::date::{ISO_DATE_FORMAT, iso_date};

/// A financial product as returned by the backend.
///
/// `date_revision` is always one year after `date_release`; the client
/// derives it when editing but displays whatever the backend stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    /// Reference to the logo (usually a URL).
    pub logo: String,
    #[serde(with = "iso_date")]
    pub date_release: NaiveDate,
    #[serde(with = "iso_date")]
    pub date_revision: NaiveDate,
}

impl Product {
    /// Case-insensitive substring match on name, description or id.
    ///
    /// `needle` must already be lowercased.
    pub fn matches(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(needle)
            || self.description.to_lowercase().contains(needle)
            || self.id.as_str().to_lowercase().contains(needle)
    }
}

/// Envelope of `GET /products`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductsResponse {
    pub data: Vec<Product>,
}

/// Create/update payload.
///
/// Carries the raw values read from the form; the backend receives them
/// without an envelope.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductFormData {
    pub id: String,
    pub name: String,
    pub description: String,
    pub logo: String,
    pub date_release: String,
    pub date_revision: String,
}

impl From<&Product> for ProductFormData {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.to_string(),
            name: product.name.clone(),
            description: product.description.clone(),
            logo: product.logo.clone(),
            date_release: product.date_release.format(ISO_DATE_FORMAT).to_string(),
            date_revision: product.date_revision.format(ISO_DATE_FORMAT).to_string(),
        }
    }
}
