//! In-memory `ProductApi` for view tests.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::NaiveDate;
use tokio::sync::Notify;

use finprod_core::ProductId;
use finprod_products::{Product, ProductFormData, parse_iso_date};

use crate::http::ApiError;
use crate::service::ProductApi;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    List,
    Get(String),
    Create(ProductFormData),
    Update(String, ProductFormData),
    Delete(String),
    Verify(String),
}

#[derive(Debug, Default)]
pub struct FakeProductApi {
    products: Mutex<Vec<Product>>,
    calls: Mutex<Vec<Call>>,
    failures: Mutex<HashMap<&'static str, ApiError>>,
    list_gate: Mutex<Option<Arc<Notify>>>,
}

pub fn product(id: &str, name: &str, description: &str) -> Product {
    Product {
        id: id.parse().unwrap(),
        name: name.to_string(),
        description: description.to_string(),
        logo: format!("https://example.test/{id}.png"),
        date_release: NaiveDate::from_ymd_opt(2025, 1, 15).unwrap(),
        date_revision: NaiveDate::from_ymd_opt(2026, 1, 15).unwrap(),
    }
}

pub fn server_error(message: &str) -> ApiError {
    ApiError::Status {
        status: 500,
        message: message.to_string(),
    }
}

impl FakeProductApi {
    pub fn with_products(products: Vec<Product>) -> Arc<Self> {
        let api = Self::default();
        *api.products.lock().unwrap() = products;
        Arc::new(api)
    }

    /// Make every call of `operation` fail with `error` until cleared.
    pub fn fail(&self, operation: &'static str, error: ApiError) {
        self.failures.lock().unwrap().insert(operation, error);
    }

    pub fn clear_failures(&self) {
        self.failures.lock().unwrap().clear();
    }

    /// Block `list` until the returned handle is notified.
    pub fn hold_list(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        *self.list_gate.lock().unwrap() = Some(gate.clone());
        gate
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn products(&self) -> Vec<Product> {
        self.products.lock().unwrap().clone()
    }

    fn record(&self, operation: &'static str, call: Call) -> Result<(), ApiError> {
        self.calls.lock().unwrap().push(call);
        match self.failures.lock().unwrap().get(operation) {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }

    fn to_product(data: &ProductFormData) -> Result<Product, ApiError> {
        let bad_request = |message: String| ApiError::Status {
            status: 400,
            message,
        };
        Ok(Product {
            id: data.id.parse().map_err(|e| bad_request(format!("{e}")))?,
            name: data.name.clone(),
            description: data.description.clone(),
            logo: data.logo.clone(),
            date_release: parse_iso_date(&data.date_release).map_err(|e| bad_request(format!("{e}")))?,
            date_revision: parse_iso_date(&data.date_revision)
                .map_err(|e| bad_request(format!("{e}")))?,
        })
    }

    fn not_found() -> ApiError {
        ApiError::Status {
            status: 404,
            message: "Not product found with that identifier".to_string(),
        }
    }
}

#[async_trait]
impl ProductApi for FakeProductApi {
    async fn list(&self) -> Result<Vec<Product>, ApiError> {
        let gate = self.list_gate.lock().unwrap().clone();
        if let Some(gate) = gate {
            gate.notified().await;
        }
        self.record("list", Call::List)?;
        Ok(self.products())
    }

    async fn get_by_id(&self, id: &ProductId) -> Result<Product, ApiError> {
        self.record("get", Call::Get(id.to_string()))?;
        self.products()
            .into_iter()
            .find(|p| &p.id == id)
            .ok_or_else(Self::not_found)
    }

    async fn create(&self, data: &ProductFormData) -> Result<Product, ApiError> {
        self.record("create", Call::Create(data.clone()))?;
        let product = Self::to_product(data)?;
        self.products.lock().unwrap().push(product.clone());
        Ok(product)
    }

    async fn update(&self, id: &ProductId, data: &ProductFormData) -> Result<Product, ApiError> {
        self.record("update", Call::Update(id.to_string(), data.clone()))?;
        let product = Self::to_product(data)?;
        let mut products = self.products.lock().unwrap();
        let slot = products.iter_mut().find(|p| &p.id == id).ok_or_else(Self::not_found)?;
        *slot = product.clone();
        Ok(product)
    }

    async fn delete(&self, id: &ProductId) -> Result<(), ApiError> {
        self.record("delete", Call::Delete(id.to_string()))?;
        let mut products = self.products.lock().unwrap();
        let before = products.len();
        products.retain(|p| &p.id != id);
        if products.len() == before {
            return Err(Self::not_found());
        }
        Ok(())
    }

    async fn verify_id_exists(&self, id: &ProductId) -> Result<bool, ApiError> {
        self.record("verify", Call::Verify(id.to_string()))?;
        Ok(self.products().iter().any(|p| &p.id == id))
    }
}
