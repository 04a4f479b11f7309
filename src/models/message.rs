use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Ai,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MessageError {
    #[error("Message content is empty")]
    Empty,
}

/// One conversation turn. Fields are read-only once constructed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "WireMessage")]
pub struct Message {
    id: String,
    content: String,
    sender: Sender,
    timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    model: Option<String>,
}

/// Unvalidated shape of a message as it arrives from the server.
#[derive(Deserialize)]
struct WireMessage {
    id: String,
    content: String,
    sender: Sender,
    timestamp: DateTime<Utc>,
    #[serde(default)]
    model: Option<String>,
}

impl TryFrom<WireMessage> for Message {
    type Error = MessageError;

    fn try_from(wire: WireMessage) -> Result<Self, Self::Error> {
        let content = checked_content(&wire.content)?;
        Ok(Self {
            id: wire.id,
            content,
            sender: wire.sender,
            timestamp: wire.timestamp,
            model: wire.model,
        })
    }
}

fn checked_content(content: &str) -> Result<String, MessageError> {
    let content = content.trim();
    if content.is_empty() {
        return Err(MessageError::Empty);
    }
    Ok(content.to_string())
}

impl Message {
    /// Build a message stamped with the current time. Content is trimmed and
    /// must not be empty afterwards.
    pub fn new(sender: Sender, content: &str) -> Result<Self, MessageError> {
        Ok(Self {
            id: new_message_id(),
            content: checked_content(content)?,
            sender,
            timestamp: Utc::now(),
            model: None,
        })
    }

    pub fn user(content: &str) -> Result<Self, MessageError> {
        Self::new(Sender::User, content)
    }

    pub fn ai(content: &str) -> Result<Self, MessageError> {
        Self::new(Sender::Ai, content)
    }

    /// Assistant message from fixed text that is known to be non-empty.
    pub(crate) fn canned(content: &'static str) -> Self {
        Self {
            id: new_message_id(),
            content: content.trim().to_string(),
            sender: Sender::Ai,
            timestamp: Utc::now(),
            model: None,
        }
    }

    pub fn with_model(mut self, model: Option<String>) -> Self {
        self.model = model;
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn sender(&self) -> Sender {
        self.sender
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn model(&self) -> Option<&str> {
        self.model.as_deref()
    }

    pub fn is_user(&self) -> bool {
        self.sender == Sender::User
    }
}

/// Time-ordered message ID.
pub fn new_message_id() -> String {
    Uuid::now_v7().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_blank_content() {
        assert_eq!(Message::user("").unwrap_err(), MessageError::Empty);
        assert_eq!(Message::ai("  \n\t ").unwrap_err(), MessageError::Empty);
    }

    #[test]
    fn test_trims_content() {
        let msg = Message::user("  hi there \n").unwrap();
        assert_eq!(msg.content(), "hi there");
        assert_eq!(msg.sender(), Sender::User);
        assert!(msg.is_user());
        assert!(msg.model().is_none());
    }

    #[test]
    fn test_ids_are_unique() {
        let a = Message::ai("one").unwrap();
        let b = Message::ai("two").unwrap();
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn test_wire_format() {
        let json = r#"{
            "id": "42",
            "content": "Hello from the server",
            "sender": "ai",
            "timestamp": "2025-01-15T10:30:00Z",
            "model": "gpt-4o-mini"
        }"#;
        let msg: Message = serde_json::from_str(json).unwrap();
        assert_eq!(msg.id(), "42");
        assert_eq!(msg.sender(), Sender::Ai);
        assert_eq!(msg.model(), Some("gpt-4o-mini"));
        assert_eq!(msg.timestamp().to_rfc3339(), "2025-01-15T10:30:00+00:00");

        let value = serde_json::to_value(Message::user("hey").unwrap()).unwrap();
        assert_eq!(value["sender"], "user");
        assert!(value.get("model").is_none());
    }

    #[test]
    fn test_wire_content_is_trimmed() {
        let json = r#"{
            "id": "7",
            "content": "  spaced out \n",
            "sender": "user",
            "timestamp": "2025-01-15T10:30:00Z"
        }"#;
        let msg: Message = serde_json::from_str(json).unwrap();
        assert_eq!(msg.content(), "spaced out");
    }

    #[test]
    fn test_wire_rejects_blank_content() {
        for content in ["", "   ", "\\n\\t"] {
            let json = format!(
                r#"{{"id":"7","content":"{}","sender":"ai","timestamp":"2025-01-15T10:30:00Z"}}"#,
                content
            );
            let err = serde_json::from_str::<Message>(&json).unwrap_err();
            assert!(err.to_string().contains("empty"), "{}", err);
        }
    }
}
