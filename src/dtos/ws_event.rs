//! WebSocket Event DTOs - Events pushed to connected clients

use super::MessageDTO;
use serde::{Deserialize, Serialize};

/// Tagged union serialized as `{ "type": "NewMessage", "data": { ... } }`
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "type", content = "data")]
pub enum WsEventDTO {
    /// A real message was appended to one of the user's chats
    NewMessage(MessageDTO),
    /// The user's own read or delete marker changed the derived state of a chat
    ConversationUpdated { chat_id: i32 },
    /// Fresh value of the unread badge
    UnreadCount { count: u32 },
    Error { code: u16, message: String },
}
