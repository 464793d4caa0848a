//! Chat DTOs - Data Transfer Objects for chats

use super::{MessageDTO, RentalDTO};
use crate::entities::Chat;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ChatDTO {
    pub chat_id: i32,
    pub rental_id: i32,
    pub tenant_id: String,
    pub landlord_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Chat> for ChatDTO {
    fn from(value: Chat) -> Self {
        Self {
            chat_id: value.chat_id,
            rental_id: value.rental_id,
            tenant_id: value.tenant_id,
            landlord_id: value.landlord_id,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

/// A chat opened for reading: the rental it is about and the caller's visible transcript
#[derive(Serialize, Deserialize, Debug)]
pub struct ChatDetailDTO {
    pub chat: ChatDTO,
    pub rental: Option<RentalDTO>,
    pub messages: Vec<MessageDTO>,
}

/// One row of the conversation directory
#[derive(Serialize, Deserialize, Debug)]
pub struct ConversationSummaryDTO {
    pub chat: ChatDTO,
    pub rental: Option<RentalDTO>,
    pub other_participant_id: String,
    pub last_message: Option<MessageDTO>,
    pub has_unread: bool,
}

/// DTO to create a chat (without chat_id)
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct CreateChatDTO {
    pub rental_id: i32,
    pub tenant_id: String,
    pub landlord_id: String,
    pub created_at: DateTime<Utc>,
}

/// Body of an enquiry: the tenant is the caller, the landlord is the rental owner
#[derive(Serialize, Deserialize, Debug)]
pub struct EnquireDTO {
    pub rental_id: i32,
}

#[derive(Serialize, Deserialize, Debug, Default)]
pub struct MarkReadDTO {
    #[serde(default)]
    pub chat_id: Option<i32>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct UnreadCountDTO {
    pub count: u32,
}
