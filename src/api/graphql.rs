use std::sync::Arc;

use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;

use super::queries;
use super::rest::decode_json;
use super::traits::HttpTransport;
use super::types::{
    ApiError, ChatResponse, DeleteResponse, GraphQlBody, GraphQlRequestOptions, GraphQlResponse,
    HistoryResponse, HttpRequest,
};
use crate::config::ApiConfig;

pub const ANONYMOUS_USER: &str = "anonymous";

/// Client for the chat backend's single `/graphql` endpoint.
///
/// Operations whose result carries its own `error` field (send, history,
/// delete) never fail: remote errors are folded into that field. The health
/// check has nowhere to put an error and returns `Err` instead.
pub struct GraphQlClient {
    config: Arc<ApiConfig>,
    transport: Arc<dyn HttpTransport>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SendMessageData {
    send_message: ChatResponse,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChatHistoryData {
    get_chat_history: HistoryResponse,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct DeleteHistoryData {
    delete_history: DeleteResponse,
}

#[derive(Deserialize)]
struct HealthData {
    health: String,
}

impl GraphQlClient {
    pub fn new(config: Arc<ApiConfig>, transport: Arc<dyn HttpTransport>) -> Self {
        Self { config, transport }
    }

    pub fn endpoint(&self) -> String {
        self.config.graphql_endpoint()
    }

    /// POST a `{query, variables}` envelope and unwrap `data`.
    ///
    /// Only the first entry of a non-empty `errors` list is reported. A missing
    /// or `null` `data` fails with [`ApiError::EmptyResponse`] even when
    /// `errors` is present but empty.
    pub async fn request<T: DeserializeOwned>(
        &self,
        options: GraphQlRequestOptions,
    ) -> Result<T, ApiError> {
        let result = self.execute(options).await;
        if let Err(e) = &result {
            tracing::error!("GraphQL request failed: {}", e);
        }
        result
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        options: GraphQlRequestOptions,
    ) -> Result<T, ApiError> {
        let GraphQlRequestOptions {
            query,
            variables,
            headers,
        } = options;

        let body = serde_json::to_string(&GraphQlBody {
            query: &query,
            variables: &variables,
        })
        .map_err(|e| ApiError::InvalidResponse(format!("Failed to encode request: {}", e)))?;
        tracing::debug!("GraphQL request: {}", body);

        let mut merged = self.config.default_headers().clone();
        merged.extend(headers);

        let response = self
            .transport
            .send(HttpRequest {
                method: Method::POST,
                url: self.endpoint(),
                headers: merged,
                body: Some(body),
            })
            .await?;

        if !response.is_success() {
            return Err(ApiError::status(response.status));
        }

        tracing::debug!("GraphQL response: {}", response.body);
        let envelope: GraphQlResponse<serde_json::Value> = decode_json(&response.body)?;

        if let Some(first) = envelope.errors.as_deref().and_then(<[_]>::first) {
            return Err(ApiError::GraphQl(first.message.clone()));
        }

        match envelope.data {
            None | Some(serde_json::Value::Null) => Err(ApiError::EmptyResponse),
            Some(data) => {
                serde_json::from_value(data).map_err(|e| ApiError::InvalidResponse(e.to_string()))
            }
        }
    }

    /// The message is passed through untouched; validation is the server's job.
    pub async fn send_message(&self, message: &str, user_id: Option<&str>) -> ChatResponse {
        let options = GraphQlRequestOptions::new(queries::SEND_MESSAGE).variable(
            "input",
            json!({
                "message": message,
                "userId": user_id.unwrap_or(ANONYMOUS_USER),
            }),
        );

        match self.request::<SendMessageData>(options).await {
            Ok(data) => data.send_message,
            Err(e) => ChatResponse::failure(&e),
        }
    }

    pub async fn get_chat_history(&self, user_id: Option<&str>) -> HistoryResponse {
        let options = GraphQlRequestOptions::new(queries::GET_CHAT_HISTORY)
            .variable("userId", json!(user_id.unwrap_or(ANONYMOUS_USER)));

        match self.request::<ChatHistoryData>(options).await {
            Ok(data) => data.get_chat_history,
            Err(e) => HistoryResponse::failure(&e),
        }
    }

    pub async fn delete_history(
        &self,
        user_id: Option<&str>,
        message_id: Option<&str>,
    ) -> DeleteResponse {
        let mut input = serde_json::Map::new();
        input.insert("userId".to_string(), json!(user_id.unwrap_or(ANONYMOUS_USER)));
        if let Some(id) = message_id {
            input.insert("messageId".to_string(), json!(id));
        }

        let options = GraphQlRequestOptions::new(queries::DELETE_HISTORY)
            .variable("input", serde_json::Value::Object(input));

        match self.request::<DeleteHistoryData>(options).await {
            Ok(data) => data.delete_history,
            Err(e) => DeleteResponse::failure(&e),
        }
    }

    pub async fn health_check(&self) -> Result<String, ApiError> {
        let data: HealthData = self
            .request(GraphQlRequestOptions::new(queries::HEALTH))
            .await?;
        Ok(data.health)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::testing::FakeTransport;
    use crate::models::Sender;
    use reqwest::header::{HeaderMap, HeaderValue};

    fn client(transport: FakeTransport) -> (GraphQlClient, Arc<FakeTransport>) {
        let transport = Arc::new(transport);
        let config = Arc::new(ApiConfig::new("https://api.example.com/").unwrap());
        (GraphQlClient::new(config, transport.clone()), transport)
    }

    #[tokio::test]
    async fn test_request_posts_envelope() {
        let (client, transport) = client(FakeTransport::new().reply(200, r#"{"data":{"x":1}}"#));

        let mut headers = HeaderMap::new();
        headers.insert("x-trace", HeaderValue::from_static("abc"));
        let options = GraphQlRequestOptions {
            query: "query { x }".to_string(),
            headers,
            ..Default::default()
        };

        let data: serde_json::Value = client.request(options).await.unwrap();
        assert_eq!(data, json!({"x": 1}));

        let sent = &transport.requests()[0];
        assert_eq!(sent.method, Method::POST);
        assert_eq!(sent.url, "https://api.example.com/graphql");
        assert_eq!(sent.headers.get("x-trace").unwrap(), "abc");
        assert_eq!(sent.headers.get("content-type").unwrap(), "application/json");
        assert_eq!(
            transport.last_body(),
            json!({"query": "query { x }", "variables": {}})
        );
    }

    #[tokio::test]
    async fn test_null_data_with_empty_errors_is_empty_response() {
        let (client, _) = client(FakeTransport::new().reply(200, r#"{"data":null,"errors":[]}"#));

        let err = client
            .request::<serde_json::Value>(GraphQlRequestOptions::new("{ x }"))
            .await
            .unwrap_err();
        assert_eq!(err, ApiError::EmptyResponse);
    }

    #[tokio::test]
    async fn test_missing_data_is_empty_response() {
        let (client, _) = client(FakeTransport::new().reply(200, "{}"));

        let err = client
            .request::<serde_json::Value>(GraphQlRequestOptions::new("{ x }"))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "No data returned from GraphQL query");
    }

    #[tokio::test]
    async fn test_only_first_error_is_reported() {
        let (client, _) = client(FakeTransport::new().reply(
            200,
            r#"{"data":{"x":1},"errors":[{"message":"E1","locations":[{"line":1,"column":3}],"path":["x",0]},{"message":"E2"}]}"#,
        ));

        let err = client
            .request::<serde_json::Value>(GraphQlRequestOptions::new("{ x }"))
            .await
            .unwrap_err();
        assert_eq!(err, ApiError::GraphQl("E1".to_string()));
        assert_eq!(err.to_string(), "E1");
    }

    #[tokio::test]
    async fn test_error_status_is_transport_error() {
        let (client, _) = client(FakeTransport::new().reply(500, r#"{"data":{"x":1}}"#));

        let err = client
            .request::<serde_json::Value>(GraphQlRequestOptions::new("{ x }"))
            .await
            .unwrap_err();
        assert_eq!(err, ApiError::status(500));
    }

    #[tokio::test]
    async fn test_send_message() {
        let (client, transport) = client(FakeTransport::new().reply(
            200,
            r#"{"data":{"sendMessage":{
                "message":{"id":"m1","content":"Hi!","sender":"ai","timestamp":"2025-03-01T08:00:00Z","model":"llama3"},
                "success":true,
                "error":null
            }}}"#,
        ));

        let response = client.send_message("hello", None).await;
        assert!(response.success);
        assert!(response.error.is_none());
        let message = response.message.unwrap();
        assert_eq!(message.content(), "Hi!");
        assert_eq!(message.sender(), Sender::Ai);
        assert_eq!(message.model(), Some("llama3"));

        let body = transport.last_body();
        assert_eq!(body["query"], queries::SEND_MESSAGE);
        assert_eq!(
            body["variables"],
            json!({"input": {"message": "hello", "userId": "anonymous"}})
        );
    }

    #[tokio::test]
    async fn test_send_message_soft_fails() {
        let (client, _) = client(FakeTransport::new().fail("connection reset"));

        let response = client.send_message("hello", Some("u-1")).await;
        assert!(!response.success);
        assert!(response.message.is_none());
        assert_eq!(response.error.as_deref(), Some("connection reset"));
    }

    #[tokio::test]
    async fn test_get_chat_history() {
        let (client, transport) = client(FakeTransport::new().reply(
            200,
            r#"{"data":{"getChatHistory":{
                "messages":[
                    {"id":"1","content":"hello","sender":"user","timestamp":"2025-03-01T08:00:00Z"},
                    {"id":"2","content":"hi","sender":"ai","timestamp":"2025-03-01T08:00:01Z","model":"llama3"}
                ],
                "success":true
            }}}"#,
        ));

        let history = client.get_chat_history(Some("u-42")).await;
        assert!(history.success);
        assert_eq!(history.messages.len(), 2);
        assert_eq!(history.messages[0].sender(), Sender::User);
        assert_eq!(history.messages[1].id(), "2");
        assert_eq!(transport.last_body()["variables"], json!({"userId": "u-42"}));
    }

    #[tokio::test]
    async fn test_get_chat_history_soft_fails() {
        let (client, _) = client(FakeTransport::new().fail("network down"));

        let history = client.get_chat_history(None).await;
        assert_eq!(
            history,
            HistoryResponse {
                messages: Vec::new(),
                success: false,
                error: Some("network down".to_string()),
            }
        );
    }

    #[tokio::test]
    async fn test_get_chat_history_soft_fails_on_graphql_error() {
        let (client, _) = client(
            FakeTransport::new().reply(200, r#"{"errors":[{"message":"Unknown user"}]}"#),
        );

        let history = client.get_chat_history(None).await;
        assert!(!history.success);
        assert_eq!(history.error.as_deref(), Some("Unknown user"));
    }

    #[tokio::test]
    async fn test_delete_history() {
        let (client, transport) = client(
            FakeTransport::new()
                .reply(
                    200,
                    r#"{"data":{"deleteHistory":{"success":true,"message":"Deleted","deletedCount":"3"}}}"#,
                )
                .reply(
                    200,
                    r#"{"data":{"deleteHistory":{"success":true,"message":"Deleted"}}}"#,
                ),
        );

        let response = client.delete_history(None, None).await;
        assert!(response.success);
        assert_eq!(response.deleted_count.as_deref(), Some("3"));
        assert_eq!(
            transport.last_body()["variables"],
            json!({"input": {"userId": "anonymous"}})
        );

        let response = client.delete_history(Some("u-1"), Some("m-9")).await;
        assert!(response.deleted_count.is_none());
        assert_eq!(
            transport.last_body()["variables"],
            json!({"input": {"userId": "u-1", "messageId": "m-9"}})
        );
    }

    #[tokio::test]
    async fn test_delete_history_soft_fails() {
        let (client, _) = client(FakeTransport::new().reply(502, ""));

        let response = client.delete_history(None, None).await;
        assert!(!response.success);
        assert_eq!(response.message, "HTTP error: status 502");
    }

    #[tokio::test]
    async fn test_health_check() {
        let (client, transport) =
            client(FakeTransport::new().reply(200, r#"{"data":{"health":"OK"}}"#));

        assert_eq!(client.health_check().await.unwrap(), "OK");
        assert_eq!(transport.last_body()["variables"], json!({}));
    }

    #[tokio::test]
    async fn test_health_check_propagates_failure() {
        let (client, _) = client(FakeTransport::new().fail("network down"));

        let err = client.health_check().await.unwrap_err();
        assert_eq!(err, ApiError::Transport("network down".to_string()));
    }
}
