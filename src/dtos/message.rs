//! Message DTOs - Data Transfer Objects for messages

use crate::entities::{Attachment, Message};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Message as returned to the client
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct MessageDTO {
    pub message_id: i32,
    pub chat_id: i32,
    pub sender_id: String,
    pub content: String,
    pub file_url: Option<String>,
    pub file_name: Option<String>,
    pub file_type: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<Message> for MessageDTO {
    fn from(value: Message) -> Self {
        let (file_url, file_name, file_type) = match value.attachment {
            Some(a) => (Some(a.url), a.name, a.media_type),
            None => (None, None, None),
        };
        Self {
            message_id: value.message_id,
            chat_id: value.chat_id,
            sender_id: value.sender_id,
            content: value.content,
            file_url,
            file_name,
            file_type,
            created_at: value.created_at,
        }
    }
}

/// Body of a send request. Either text or a file (or both) must be present.
#[derive(Serialize, Deserialize, Debug, Clone, Default, Validate)]
pub struct SendMessageDTO {
    #[serde(default)]
    #[validate(length(max = 5000, message = "Message content must be at most 5000 characters"))]
    pub content: String,

    #[validate(length(min = 1, max = 1024))]
    pub file_url: Option<String>,

    #[validate(length(max = 255))]
    pub file_name: Option<String>,

    #[validate(length(max = 255))]
    pub file_type: Option<String>,
}

impl SendMessageDTO {
    pub fn attachment(&self) -> Option<Attachment> {
        self.file_url.as_ref().map(|url| Attachment {
            url: url.clone(),
            name: self.file_name.clone(),
            media_type: self.file_type.clone(),
        })
    }
}

/// DTO to append a message to a log (without message_id)
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct CreateMessageDTO {
    pub chat_id: i32,
    pub sender_id: String,
    pub content: String,
    pub attachment: Option<Attachment>,
    pub created_at: DateTime<Utc>,
}
