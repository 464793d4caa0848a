//! Entities module - Domain entities
//!
//! Each entity mirrors a table of the database. Rows are decoded in the
//! repositories and converted into these types.

pub mod chat;
pub mod enums;
pub mod message;
pub mod rental;
pub mod user;

// Re-exports to ease imports
pub use chat::Chat;
pub use enums::UserStatus;
pub use message::{Attachment, LogPosition, Message};
pub use rental::Rental;
pub use user::{User, UserType};
