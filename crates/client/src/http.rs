//! HTTP access wrapper for the REST backend.
//!
//! Every call goes to `<base_url>/<segment>/...` (each segment
//! percent-encoded) with
//! `Content-Type: application/json`, and every failure (network, non-2xx,
//! undecodable body) comes back as one [`ApiError`] carrying the message
//! shown to the user. Nothing is retried.

use reqwest::header::CONTENT_TYPE;
use reqwest::{Method, RequestBuilder, Response, Url};
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

/// Text used when a failure carries no usable description.
pub const UNKNOWN_ERROR: &str = "An unknown error occurred";

/// A failed backend call, normalized to a single human-readable message.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ApiError {
    /// The request never produced a response (connection refused, DNS, ...).
    #[error("{message}")]
    Transport { message: String },

    /// The server answered with a non-2xx status.
    #[error("{message}")]
    Status { status: u16, message: String },

    /// A 2xx response whose body did not match the expected shape.
    #[error("{message}")]
    Decode { message: String },
}

impl ApiError {
    pub fn transport(cause: impl core::fmt::Display) -> Self {
        let cause = cause.to_string();
        let message = if cause.trim().is_empty() {
            UNKNOWN_ERROR.to_string()
        } else {
            format!("Error: {cause}")
        };
        Self::Transport { message }
    }

    /// Build the error for a non-2xx response.
    ///
    /// Prefers the server-supplied `message` field of a JSON body, then
    /// falls back to `Error <status>: <reason>`.
    pub fn from_status(status: reqwest::StatusCode, body: &str) -> Self {
        let message = server_message(body).unwrap_or_else(|| {
            format!(
                "Error {}: {}",
                status.as_u16(),
                status.canonical_reason().unwrap_or("Unknown Status")
            )
        });
        Self::Status {
            status: status.as_u16(),
            message,
        }
    }

    pub fn decode(cause: impl core::fmt::Display) -> Self {
        Self::Decode {
            message: format!("Error: invalid response body ({cause})"),
        }
    }

    pub fn message(&self) -> &str {
        match self {
            ApiError::Transport { message }
            | ApiError::Status { message, .. }
            | ApiError::Decode { message } => message,
        }
    }

    /// HTTP status, when the server answered.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[derive(serde::Deserialize)]
struct ServerErrorBody {
    message: Option<String>,
}

fn server_message(body: &str) -> Option<String> {
    serde_json::from_str::<ServerErrorBody>(body)
        .ok()
        .and_then(|parsed| parsed.message)
        .filter(|message| !message.trim().is_empty())
}

/// Thin wrapper over `reqwest::Client` bound to one base URL.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: reqwest::Client,
    base_url: String,
}

impl HttpClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `<base_url>/<segments...>`. Every segment is percent-encoded, so a
    /// value containing `?`, `#`, `%` or spaces stays a single path segment.
    pub fn url(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = Url::parse(&self.base_url).map_err(ApiError::transport)?;
        url.path_segments_mut()
            .map_err(|()| ApiError::transport(format!("base URL {} cannot take a path", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    pub async fn get<T>(&self, segments: &[&str]) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
    {
        let response = self.send(Method::GET, segments, |req| req).await?;
        decode_json(response).await
    }

    pub async fn post<T, B>(&self, segments: &[&str], body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let response = self.send(Method::POST, segments, |req| req.json(body)).await?;
        decode_json(response).await
    }

    pub async fn put<T, B>(&self, segments: &[&str], body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let response = self.send(Method::PUT, segments, |req| req.json(body)).await?;
        decode_json(response).await
    }

    /// DELETE; any 2xx counts as success and the body is ignored.
    pub async fn delete(&self, segments: &[&str]) -> Result<(), ApiError> {
        self.send(Method::DELETE, segments, |req| req).await?;
        Ok(())
    }

    async fn send(
        &self,
        method: Method,
        segments: &[&str],
        build: impl FnOnce(RequestBuilder) -> RequestBuilder,
    ) -> Result<Response, ApiError> {
        let url = match self.url(segments) {
            Ok(url) => url,
            Err(e) => {
                tracing::error!(%method, base_url = %self.base_url, error = %e, "invalid request URL");
                return Err(e);
            }
        };
        tracing::debug!(%method, %url, "sending request");

        let request = build(
            self.client
                .request(method.clone(), url.clone())
                .header(CONTENT_TYPE, "application/json"),
        );

        let result = match request.send().await {
            Ok(response) if response.status().is_success() => Ok(response),
            Ok(response) => {
                let status = response.status();
                let body = response.text().await.unwrap_or_default();
                Err(ApiError::from_status(status, &body))
            }
            Err(e) => Err(ApiError::transport(e)),
        };

        if let Err(e) = &result {
            tracing::error!(%method, %url, error = %e, "HTTP request failed");
        }
        result
    }
}

async fn decode_json<T>(response: Response) -> Result<T, ApiError>
where
    T: DeserializeOwned,
{
    let url = response.url().to_string();
    let bytes = response.bytes().await.map_err(ApiError::transport)?;
    serde_json::from_slice(&bytes).map_err(|e| {
        let err = ApiError::decode(e);
        tracing::error!(%url, error = %err, "HTTP request failed");
        err
    })
}
