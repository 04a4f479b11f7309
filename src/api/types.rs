use reqwest::header::HeaderMap;
use reqwest::Method;
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

use crate::models::Message;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    #[error("{0}")]
    Transport(String),

    /// First entry of a GraphQL `errors` list; the rest are discarded.
    #[error("{0}")]
    GraphQl(String),

    #[error("No data returned from GraphQL query")]
    EmptyResponse,

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl ApiError {
    pub fn status(code: u16) -> Self {
        ApiError::Transport(format!("HTTP error: status {}", code))
    }
}

// --- Transport types ---

#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    pub headers: HeaderMap,
    pub body: Option<String>,
}

#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

// --- GraphQL envelope ---

#[derive(Debug, Clone, Default)]
pub struct GraphQlRequestOptions {
    pub query: String,
    pub variables: serde_json::Map<String, serde_json::Value>,
    pub headers: HeaderMap,
}

impl GraphQlRequestOptions {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Default::default()
        }
    }

    pub fn variable(mut self, name: &str, value: serde_json::Value) -> Self {
        self.variables.insert(name.to_string(), value);
        self
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct GraphQlBody<'a> {
    pub query: &'a str,
    pub variables: &'a serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GraphQlResponse<T> {
    #[serde(default)]
    pub data: Option<T>,
    #[serde(default)]
    pub errors: Option<Vec<GraphQlErrorEntry>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphQlErrorEntry {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locations: Option<Vec<GraphQlLocation>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<Vec<serde_json::Value>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphQlLocation {
    pub line: u32,
    pub column: u32,
}

// --- Chat operation results ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
    pub message: Option<Message>,
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ChatResponse {
    pub fn failure(err: &ApiError) -> Self {
        Self {
            message: None,
            success: false,
            error: Some(err.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryResponse {
    #[serde(default, deserialize_with = "valid_messages")]
    pub messages: Vec<Message>,
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl HistoryResponse {
    pub fn failure(err: &ApiError) -> Self {
        Self {
            messages: Vec::new(),
            success: false,
            error: Some(err.to_string()),
        }
    }
}

/// Entries that fail validation (e.g. blank content) are skipped rather than
/// failing the whole history.
fn valid_messages<'de, D>(deserializer: D) -> Result<Vec<Message>, D::Error>
where
    D: Deserializer<'de>,
{
    let entries = Vec::<serde_json::Value>::deserialize(deserializer)?;
    Ok(entries
        .into_iter()
        .filter_map(|entry| match serde_json::from_value(entry) {
            Ok(message) => Some(message),
            Err(e) => {
                tracing::warn!("Skipping history entry: {}", e);
                None
            }
        })
        .collect())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteResponse {
    pub success: bool,
    #[serde(default)]
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deleted_count: Option<String>,
}

impl DeleteResponse {
    pub fn failure(err: &ApiError) -> Self {
        Self {
            success: false,
            message: err.to_string(),
            deleted_count: None,
        }
    }
}
