use std::time::Duration;

use thiserror::Error;
use tokio_util::sync::CancellationToken;

use crate::models::Message;
use crate::services::conversation::ConversationBuffer;
use crate::services::responder::Responder;
use crate::services::settings::{ChatSettings, ReplySource};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatState {
    Idle,
    /// Draft text present, nothing sent yet.
    Composing,
    AwaitingReply,
    /// Backend history requested; sending is blocked until it lands.
    LoadingHistory,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SendError {
    #[error("Cannot send an empty message")]
    EmptyInput,
    #[error("Still waiting for the previous reply")]
    AwaitingReply,
    #[error("Chat history is still loading")]
    LoadingHistory,
}

/// Identifies one outstanding reply. Completions carrying any other ticket are
/// ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ReplyTicket(u64);

/// Handle for the reply owed to a just-sent message. `Send + 'static` so it can
/// be moved into a background task.
#[derive(Debug, Clone)]
pub struct PendingReply {
    pub ticket: ReplyTicket,
    /// The user message as stored in the conversation.
    pub prompt: String,
    pub delay: Duration,
    pub cancel: CancellationToken,
}

impl PendingReply {
    /// Wait out the simulated thinking time. Returns `None` if the reply was
    /// cancelled first.
    pub async fn elapsed(&self) -> Option<ReplyTicket> {
        tokio::select! {
            _ = self.cancel.cancelled() => None,
            _ = tokio::time::sleep(self.delay) => Some(self.ticket),
        }
    }
}

struct Outstanding {
    ticket: ReplyTicket,
    canned: String,
    cancel: CancellationToken,
}

/// Conversation state behind the chat window: the bounded message buffer,
/// settings, the current draft and at most one outstanding reply.
pub struct ChatSession {
    buffer: ConversationBuffer,
    settings: ChatSettings,
    responder: Responder,
    draft: String,
    outstanding: Option<Outstanding>,
    loading_history: bool,
    next_ticket: u64,
}

impl ChatSession {
    pub fn new(settings: ChatSettings, responder: Responder) -> Self {
        Self {
            buffer: ConversationBuffer::new(settings.max_messages()),
            settings,
            responder,
            draft: String::new(),
            outstanding: None,
            loading_history: false,
            next_ticket: 0,
        }
    }

    pub fn state(&self) -> ChatState {
        if self.outstanding.is_some() {
            ChatState::AwaitingReply
        } else if self.loading_history {
            ChatState::LoadingHistory
        } else if !self.draft.trim().is_empty() {
            ChatState::Composing
        } else {
            ChatState::Idle
        }
    }

    pub fn can_send(&self) -> bool {
        self.outstanding.is_none() && !self.loading_history
    }

    pub fn messages(&self) -> &[Message] {
        self.buffer.messages()
    }

    pub fn settings(&self) -> &ChatSettings {
        &self.settings
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn update_draft(&mut self, text: &str) {
        self.draft = text.to_string();
    }

    /// Append the user's message and start waiting for a reply.
    ///
    /// The reply text and delay are drawn now, so a seeded responder yields the
    /// same conversation every time.
    pub fn send(&mut self, input: &str) -> Result<PendingReply, SendError> {
        if self.outstanding.is_some() {
            return Err(SendError::AwaitingReply);
        }
        if self.loading_history {
            return Err(SendError::LoadingHistory);
        }

        let message = Message::user(input).map_err(|_| SendError::EmptyInput)?;
        let prompt = message.content().to_string();
        self.buffer.append(message);
        self.draft.clear();

        let ticket = ReplyTicket(self.next_ticket);
        self.next_ticket += 1;

        let cancel = CancellationToken::new();
        let canned = self.responder.reply(&prompt);
        let delay = self.responder.delay();

        self.outstanding = Some(Outstanding {
            ticket,
            canned,
            cancel: cancel.clone(),
        });

        tracing::debug!("Sent message, reply {:?} due in {:?}", ticket, delay);

        Ok(PendingReply {
            ticket,
            prompt,
            delay,
            cancel,
        })
    }

    /// Deliver the canned reply drawn at send time. Returns `false` for stale
    /// tickets.
    pub fn complete_simulated(&mut self, ticket: ReplyTicket) -> bool {
        match self.take_outstanding(ticket) {
            Some(outstanding) => {
                self.push_reply(&outstanding.canned, None);
                true
            }
            None => false,
        }
    }

    /// Deliver a reply produced elsewhere (e.g. the backend).
    pub fn complete_with(
        &mut self,
        ticket: ReplyTicket,
        content: &str,
        model: Option<String>,
    ) -> bool {
        if self.take_outstanding(ticket).is_none() {
            return false;
        }
        self.push_reply(content, model);
        true
    }

    /// Give up on a reply without appending anything.
    pub fn abandon(&mut self, ticket: ReplyTicket) -> bool {
        self.take_outstanding(ticket).is_some()
    }

    /// Cancel any outstanding reply and reset to a single greeting.
    /// Also drops any history load in flight.
    pub fn clear(&mut self) {
        self.cancel_outstanding();
        self.loading_history = false;
        self.buffer.reset();
    }

    pub fn apply_settings(&mut self, settings: ChatSettings) {
        self.buffer.set_max_messages(settings.max_messages());
        if settings.reply_source == ReplySource::Simulated {
            self.loading_history = false;
        }
        self.settings = settings;
    }

    /// Block sending until `load_history` or `abort_history_load`.
    pub fn begin_history_load(&mut self) {
        self.loading_history = true;
    }

    /// Replace the conversation with a loaded history. Ignored (returns
    /// `false`) unless a load was begun and not since cleared or aborted.
    pub fn load_history(&mut self, messages: Vec<Message>) -> bool {
        if !self.loading_history {
            tracing::debug!("Ignoring history that is no longer wanted");
            return false;
        }
        self.loading_history = false;
        self.buffer.replace_with(messages);
        true
    }

    pub fn abort_history_load(&mut self) {
        self.loading_history = false;
    }

    fn take_outstanding(&mut self, ticket: ReplyTicket) -> Option<Outstanding> {
        match &self.outstanding {
            Some(o) if o.ticket == ticket => self.outstanding.take(),
            _ => {
                tracing::debug!("Ignoring stale reply {:?}", ticket);
                None
            }
        }
    }

    fn push_reply(&mut self, content: &str, model: Option<String>) {
        match Message::ai(content) {
            Ok(message) => self.buffer.append(message.with_model(model)),
            Err(e) => tracing::warn!("Dropping reply: {}", e),
        }
    }

    fn cancel_outstanding(&mut self) {
        if let Some(outstanding) = self.outstanding.take() {
            outstanding.cancel.cancel();
            tracing::debug!("Cancelled reply {:?}", outstanding.ticket);
        }
    }
}

impl Drop for ChatSession {
    fn drop(&mut self) {
        self.cancel_outstanding();
    }
}
