use crate::models::Message;

pub const WELCOME_GREETING: &str = "Hello! I'm your AI assistant. How can I help you today?";
pub const CLEARED_GREETING: &str = "Chat history cleared. Anything new I can help with?";

/// Messages in insertion order, never longer than `max_messages`.
/// Overflow drops the oldest entries.
#[derive(Debug, Clone)]
pub struct ConversationBuffer {
    messages: Vec<Message>,
    max_messages: usize,
}

impl ConversationBuffer {
    pub fn new(max_messages: usize) -> Self {
        Self {
            messages: vec![Message::canned(WELCOME_GREETING)],
            max_messages: max_messages.max(1),
        }
    }

    pub fn append(&mut self, message: Message) {
        self.messages.push(message);
        self.enforce_bound();
    }

    /// Replace everything with a single fresh greeting.
    pub fn reset(&mut self) {
        self.messages = vec![Message::canned(CLEARED_GREETING)];
    }

    /// Load a full history, keeping its newest `max_messages` entries.
    pub fn replace_with(&mut self, messages: Vec<Message>) {
        if messages.is_empty() {
            self.messages = vec![Message::canned(WELCOME_GREETING)];
        } else {
            self.messages = messages;
            self.enforce_bound();
        }
    }

    pub fn set_max_messages(&mut self, max_messages: usize) {
        self.max_messages = max_messages.max(1);
        self.enforce_bound();
    }

    pub fn max_messages(&self) -> usize {
        self.max_messages
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    fn enforce_bound(&mut self) {
        if self.messages.len() > self.max_messages {
            let excess = self.messages.len() - self.max_messages;
            self.messages.drain(..excess);
        }
    }
}
