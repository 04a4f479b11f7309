use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use thiserror::Error;
use url::Url;

pub const APP_ID: &str = "com.banter.Banter";
pub const APP_NAME: &str = "Banter";
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub const DEV_API_URL: &str = "http://localhost:8787";
pub const PROD_API_URL: &str = "https://api.zcx.icu";

/// Explicit backend URL, takes precedence over everything else.
pub const API_URL_ENV: &str = "BANTER_API_URL";
/// Origin the client is considered to be served from.
pub const ORIGIN_ENV: &str = "BANTER_ORIGIN";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid URL {url:?}: {reason}")]
    InvalidUrl { url: String, reason: String },
}

/// Connection settings shared by the REST and GraphQL clients.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    base_url: String,
    default_headers: HeaderMap,
}

impl ApiConfig {
    pub fn new(base_url: &str) -> Result<Self, ConfigError> {
        Url::parse(base_url).map_err(|e| ConfigError::InvalidUrl {
            url: base_url.to_string(),
            reason: e.to_string(),
        })?;

        let mut default_headers = HeaderMap::new();
        default_headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            default_headers,
        })
    }

    /// Pick the backend once: an explicit override wins, then the origin decides
    /// between the development and production endpoints.
    pub fn resolve(origin: Option<&Url>, override_url: Option<&str>) -> Result<Self, ConfigError> {
        if let Some(url) = override_url.map(str::trim).filter(|u| !u.is_empty()) {
            return Self::new(url);
        }

        let is_dev = origin.is_some_and(|o| is_development_origin(o.host_str(), o.port()));
        Self::new(if is_dev { DEV_API_URL } else { PROD_API_URL })
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        let override_url = std::env::var(API_URL_ENV).ok();
        let origin = match std::env::var(ORIGIN_ENV) {
            Ok(raw) if !raw.trim().is_empty() => {
                Some(Url::parse(raw.trim()).map_err(|e| ConfigError::InvalidUrl {
                    url: raw.clone(),
                    reason: e.to_string(),
                })?)
            }
            _ => None,
        };

        let config = Self::resolve(origin.as_ref(), override_url.as_deref())?;
        tracing::info!("Using API base URL {}", config.base_url);
        Ok(config)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn graphql_endpoint(&self) -> String {
        format!("{}/graphql", self.base_url)
    }

    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub fn default_headers(&self) -> &HeaderMap {
        &self.default_headers
    }
}

/// `port` is `None` when the origin uses its scheme's default port.
pub fn is_development_origin(host: Option<&str>, port: Option<u16>) -> bool {
    matches!(host, Some("localhost") | Some("127.0.0.1")) || port.is_some()
}
