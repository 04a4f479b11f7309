use async_trait::async_trait;
use reqwest::Client;

use super::traits::HttpTransport;
use super::types::{ApiError, HttpRequest, HttpResponse};

pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
        }
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

impl Default for ReqwestTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        let mut req = self
            .client
            .request(request.method, &request.url)
            .headers(request.headers);

        if let Some(body) = request.body {
            req = req.body(body);
        }

        let response = req
            .send()
            .await
            .map_err(|e| ApiError::Transport(format!("Failed to reach {}: {}", request.url, e)))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        Ok(HttpResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
    use reqwest::Method;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    fn transport() -> ReqwestTransport {
        ReqwestTransport::with_client(Client::builder().no_proxy().build().unwrap())
    }

    /// Accepts one connection, captures the raw request and answers with `reply`.
    async fn serve_once(
        status_line: &'static str,
        reply: &'static str,
    ) -> (String, tokio::task::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut raw = Vec::new();
            let mut chunk = [0u8; 1024];
            loop {
                let n = socket.read(&mut chunk).await.unwrap();
                if n == 0 {
                    break;
                }
                raw.extend_from_slice(&chunk[..n]);
                if request_complete(&raw) {
                    break;
                }
            }

            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status_line,
                reply.len(),
                reply
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();
            String::from_utf8_lossy(&raw).to_string()
        });

        (format!("http://{}", addr), handle)
    }

    fn request_complete(raw: &[u8]) -> bool {
        let text = String::from_utf8_lossy(raw);
        let Some(header_end) = text.find("\r\n\r\n") else {
            return false;
        };
        let content_length = text[..header_end]
            .lines()
            .find_map(|line| {
                let (name, value) = line.split_once(':')?;
                name.eq_ignore_ascii_case("content-length")
                    .then(|| value.trim().parse::<usize>().ok())
                    .flatten()
            })
            .unwrap_or(0);
        raw.len() >= header_end + 4 + content_length
    }

    #[tokio::test]
    async fn test_sends_body_and_headers() {
        let (base, server) = serve_once("200 OK", r#"{"ok":true}"#).await;

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let response = transport()
            .send(HttpRequest {
                method: Method::POST,
                url: format!("{}/graphql", base),
                headers,
                body: Some(r#"{"query":"{ health }"}"#.to_string()),
            })
            .await
            .unwrap();

        assert_eq!(response.status, 200);
        assert!(response.is_success());
        assert_eq!(response.body, r#"{"ok":true}"#);

        let raw = server.await.unwrap();
        assert!(raw.starts_with("POST /graphql HTTP/1.1"));
        assert!(raw.to_lowercase().contains("content-type: application/json"));
        assert!(raw.ends_with(r#"{"query":"{ health }"}"#));
    }

    #[tokio::test]
    async fn test_error_status_is_not_a_transport_failure() {
        let (base, server) = serve_once("503 Service Unavailable", "{}").await;

        let response = transport()
            .send(HttpRequest {
                method: Method::GET,
                url: format!("{}/status", base),
                headers: HeaderMap::new(),
                body: None,
            })
            .await
            .unwrap();

        assert_eq!(response.status, 503);
        assert!(!response.is_success());
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_unreachable_host_is_a_transport_failure() {
        // Bind then drop to get a port nothing listens on
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = transport()
            .send(HttpRequest {
                method: Method::GET,
                url: format!("http://{}/", addr),
                headers: HeaderMap::new(),
                body: None,
            })
            .await
            .unwrap_err();

        assert!(matches!(err, ApiError::Transport(_)));
    }
}
