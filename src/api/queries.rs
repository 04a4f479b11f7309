//! GraphQL documents understood by the chat backend.

pub const SEND_MESSAGE: &str = r#"
mutation SendMessage($input: ChatInput!) {
  sendMessage(input: $input) {
    message {
      id
      content
      sender
      timestamp
      model
    }
    success
    error
  }
}
"#;

pub const GET_CHAT_HISTORY: &str = r#"
query GetChatHistory($userId: String) {
  getChatHistory(userId: $userId) {
    messages {
      id
      content
      sender
      timestamp
      model
    }
    success
    error
  }
}
"#;

pub const DELETE_HISTORY: &str = r#"
mutation DeleteHistory($input: DeleteHistoryInput!) {
  deleteHistory(input: $input) {
    success
    message
    deletedCount
  }
}
"#;

pub const HEALTH: &str = r#"
query Health {
  health
}
"#;
