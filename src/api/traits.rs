use async_trait::async_trait;

use super::types::{ApiError, HttpRequest, HttpResponse};

/// Sends a fully built request and hands back the raw status and body.
/// Non-success statuses are not errors at this layer.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, ApiError>;
}
