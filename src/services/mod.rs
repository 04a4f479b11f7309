pub mod chat;
pub mod conversation;
pub mod responder;
pub mod settings;

pub use chat::{ChatSession, ChatState, PendingReply, ReplyTicket, SendError};
pub use conversation::ConversationBuffer;
pub use responder::Responder;
pub use settings::{ChatSettings, ReplySource, Theme};
