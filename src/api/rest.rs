use std::sync::Arc;

use reqwest::header::HeaderMap;
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::traits::HttpTransport;
use super::types::{ApiError, HttpRequest};
use crate::config::ApiConfig;

/// JSON request helper rooted at the configured base URL.
pub struct RequestClient {
    config: Arc<ApiConfig>,
    transport: Arc<dyn HttpTransport>,
}

impl RequestClient {
    pub fn new(config: Arc<ApiConfig>, transport: Arc<dyn HttpTransport>) -> Self {
        Self { config, transport }
    }

    /// Issue a request and decode the JSON body. Caller headers override the
    /// configured defaults. Failures are logged and returned, never retried.
    pub async fn request<T, B>(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<&B>,
        headers: HeaderMap,
    ) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let url = self.config.endpoint(endpoint);
        let result = self.execute(method.clone(), url, body, headers).await;
        if let Err(e) = &result {
            tracing::error!("API request {} {} failed: {}", method, endpoint, e);
        }
        result
    }

    async fn execute<T, B>(
        &self,
        method: Method,
        url: String,
        body: Option<&B>,
        headers: HeaderMap,
    ) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let mut merged = self.config.default_headers().clone();
        merged.extend(headers);

        let body = body
            .map(serde_json::to_string)
            .transpose()
            .map_err(|e| ApiError::InvalidResponse(format!("Failed to encode body: {}", e)))?;

        let response = self
            .transport
            .send(HttpRequest {
                method,
                url,
                headers: merged,
                body,
            })
            .await?;

        if !response.is_success() {
            return Err(ApiError::status(response.status));
        }

        decode_json(&response.body)
    }

    pub async fn get<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T, ApiError> {
        self.request::<T, ()>(Method::GET, endpoint, None, HeaderMap::new()).await
    }

    pub async fn post<T, B>(&self, endpoint: &str, body: Option<&B>) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.request(Method::POST, endpoint, body, HeaderMap::new()).await
    }

    pub async fn put<T, B>(&self, endpoint: &str, body: Option<&B>) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.request(Method::PUT, endpoint, body, HeaderMap::new()).await
    }

    pub async fn delete<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T, ApiError> {
        self.request::<T, ()>(Method::DELETE, endpoint, None, HeaderMap::new()).await
    }
}

/// An empty body decodes as `null`.
pub(crate) fn decode_json<T: DeserializeOwned>(body: &str) -> Result<T, ApiError> {
    let body = if body.trim().is_empty() { "null" } else { body };
    serde_json::from_str(body).map_err(|e| ApiError::InvalidResponse(e.to_string()))
}
