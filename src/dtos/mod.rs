//! DTOs module - Data Transfer Objects
//!
//! DTOs separate the API representation from the entities kept in the database.

pub mod chat;
pub mod message;
pub mod query;
pub mod rental;
pub mod response;
pub mod user;
pub mod ws_event;

// Re-exports to ease imports
pub use chat::{
    ChatDTO, ChatDetailDTO, ConversationSummaryDTO, CreateChatDTO, EnquireDTO, MarkReadDTO,
    UnreadCountDTO,
};
pub use message::{CreateMessageDTO, MessageDTO, SendMessageDTO};
pub use query::MessagesQuery;
pub use rental::{CreateRentalDTO, RentalDTO, RentalFieldsDTO, UpdateRentalDTO};
pub use response::{ApiResponse, ApiResult, UploadDTO};
pub use user::{UpsertUserDTO, UserDTO, UserStatusDTO};
pub use ws_event::WsEventDTO;
