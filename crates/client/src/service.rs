//! Product service: domain operations on top of the HTTP wrapper.

use async_trait::async_trait;

use finprod_core::ProductId;
use finprod_products::{Product, ProductFormData};

use crate::http::{ApiError, HttpClient};

/// Operations the views need from the products backend.
///
/// Views only depend on this trait, so any backend (HTTP, in-memory fake)
/// can be injected.
#[async_trait]
pub trait ProductApi: Send + Sync {
    /// All products.
    async fn list(&self) -> Result<Vec<Product>, ApiError>;

    /// One product; fails when the backend does not know it.
    async fn get_by_id(&self, id: &ProductId) -> Result<Product, ApiError>;

    async fn create(&self, data: &ProductFormData) -> Result<Product, ApiError>;

    async fn update(&self, id: &ProductId, data: &ProductFormData) -> Result<Product, ApiError>;

    async fn delete(&self, id: &ProductId) -> Result<(), ApiError>;

    /// Whether a product with `id` already exists.
    async fn verify_id_exists(&self, id: &ProductId) -> Result<bool, ApiError>;
}

/// A single product as answered by the backend: either the bare object or
/// wrapped as `{ "message": ..., "data": {...} }`.
#[derive(serde::Deserialize)]
#[serde(untagged)]
enum ProductBody {
    Bare(Product),
    Wrapped { data: Product },
}

impl ProductBody {
    fn into_product(self) -> Product {
        match self {
            ProductBody::Bare(product) | ProductBody::Wrapped { data: product } => product,
        }
    }
}

/// Envelope of `GET /products`, rows kept undecoded so one bad row does not
/// sink the whole list.
#[derive(serde::Deserialize)]
struct ProductRows {
    data: Vec<serde_json::Value>,
}

impl ProductRows {
    fn into_products(self) -> Vec<Product> {
        self.data
            .into_iter()
            .enumerate()
            .filter_map(|(index, row)| match serde_json::from_value::<Product>(row) {
                Ok(product) => Some(product),
                Err(e) => {
                    tracing::warn!(index, error = %e, "skipping undecodable product");
                    None
                }
            })
            .collect()
    }
}

/// `ProductApi` backed by the REST API.
#[derive(Debug, Clone)]
pub struct ProductService {
    http: HttpClient,
}

impl ProductService {
    const ENDPOINT: &'static str = "products";

    pub fn new(http: HttpClient) -> Self {
        Self { http }
    }

    pub fn http(&self) -> &HttpClient {
        &self.http
    }

    fn item(id: &ProductId) -> [&str; 2] {
        [Self::ENDPOINT, id.as_str()]
    }
}

#[async_trait]
impl ProductApi for ProductService {
    async fn list(&self) -> Result<Vec<Product>, ApiError> {
        let rows: ProductRows = self.http.get(&[Self::ENDPOINT]).await?;
        Ok(rows.into_products())
    }

    async fn get_by_id(&self, id: &ProductId) -> Result<Product, ApiError> {
        let body: ProductBody = self.http.get(&Self::item(id)).await?;
        Ok(body.into_product())
    }

    async fn create(&self, data: &ProductFormData) -> Result<Product, ApiError> {
        let created: ProductBody = self.http.post(&[Self::ENDPOINT], data).await?;
        tracing::info!(product_id = %data.id, "product created");
        Ok(created.into_product())
    }

    async fn update(&self, id: &ProductId, data: &ProductFormData) -> Result<Product, ApiError> {
        let updated: ProductBody = self.http.put(&Self::item(id), data).await?;
        tracing::info!(product_id = %id, "product updated");
        Ok(updated.into_product())
    }

    async fn delete(&self, id: &ProductId) -> Result<(), ApiError> {
        self.http.delete(&Self::item(id)).await?;
        tracing::info!(product_id = %id, "product deleted");
        Ok(())
    }

    async fn verify_id_exists(&self, id: &ProductId) -> Result<bool, ApiError> {
        self.http
            .get(&[Self::ENDPOINT, "verification", id.as_str()])
            .await
    }
}
