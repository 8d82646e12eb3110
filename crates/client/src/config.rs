//! Client configuration from the environment.

use finprod_products::Pagination;
use thiserror::Error;

pub const API_URL_ENV: &str = "FINPROD_API_URL";
pub const ITEMS_PER_PAGE_ENV: &str = "FINPROD_ITEMS_PER_PAGE";

pub const DEFAULT_API_URL: &str = "http://localhost:3002/bp";

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid API URL {0:?}: must start with http:// or https://")]
    InvalidApiUrl(String),

    #[error("invalid items per page {0:?}: expected one of 5, 10, 20")]
    InvalidItemsPerPage(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Backend base URL without a trailing slash.
    pub api_url: String,
    pub items_per_page: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            items_per_page: Pagination::DEFAULT_ITEMS_PER_PAGE,
        }
    }
}

impl ClientConfig {
    pub fn new(api_url: impl Into<String>, items_per_page: usize) -> Result<Self, ConfigError> {
        let api_url = normalize_api_url(&api_url.into())?;
        if !Pagination::PAGE_SIZE_OPTIONS.contains(&items_per_page) {
            return Err(ConfigError::InvalidItemsPerPage(items_per_page.to_string()));
        }
        Ok(Self {
            api_url,
            items_per_page,
        })
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; unset or blank keys take their default.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let api_url = read(API_URL_ENV).unwrap_or_else(|| DEFAULT_API_URL.to_string());
        let items_per_page = match read(ITEMS_PER_PAGE_ENV) {
            Some(raw) => raw
                .trim()
                .parse::<usize>()
                .map_err(|_| ConfigError::InvalidItemsPerPage(raw.clone()))?,
            None => Pagination::DEFAULT_ITEMS_PER_PAGE,
        };

        Self::new(api_url, items_per_page)
    }
}

fn normalize_api_url(raw: &str) -> Result<String, ConfigError> {
    let url = raw.trim().trim_end_matches('/');
    let has_host = ["http://", "https://"]
        .iter()
        .any(|scheme| url.strip_prefix(scheme).is_some_and(|rest| !rest.is_empty()));
    if !has_host {
        return Err(ConfigError::InvalidApiUrl(raw.to_string()));
    }
    Ok(url.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        let config = ClientConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, ClientConfig::default());
        assert_eq!(config.api_url, "http://localhost:3002/bp");
        assert_eq!(config.items_per_page, 5);
    }

    #[test]
    fn reads_and_normalizes_values() {
        let config = ClientConfig::from_lookup(lookup(&[
            (API_URL_ENV, " https://api.example.test/bp/ "),
            (ITEMS_PER_PAGE_ENV, "20"),
        ]))
        .unwrap();
        assert_eq!(config.api_url, "https://api.example.test/bp");
        assert_eq!(config.items_per_page, 20);
    }

    #[test]
    fn rejects_bad_values() {
        assert_eq!(
            ClientConfig::from_lookup(lookup(&[(API_URL_ENV, "ftp://host")])),
            Err(ConfigError::InvalidApiUrl("ftp://host".to_string()))
        );
        assert!(matches!(
            ClientConfig::from_lookup(lookup(&[(API_URL_ENV, "http://")])),
            Err(ConfigError::InvalidApiUrl(_))
        ));
        assert_eq!(
            ClientConfig::from_lookup(lookup(&[(ITEMS_PER_PAGE_ENV, "7")])),
            Err(ConfigError::InvalidItemsPerPage("7".to_string()))
        );
        assert!(matches!(
            ClientConfig::from_lookup(lookup(&[(ITEMS_PER_PAGE_ENV, "ten")])),
            Err(ConfigError::InvalidItemsPerPage(_))
        ));
    }
}
