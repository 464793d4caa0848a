//! Repositories module - Database access for every entity
//!
//! Each repository owns a handle on the SQLite pool and maps rows into entities.
//! Timestamps are stored as integer microseconds (see `core::time`), so ordering
//! and comparisons in SQL are exact.

pub mod chat;
pub mod filter;
pub mod message;
pub mod rental;
pub mod traits;
pub mod user;
pub mod user_type;

// Re-export traits to ease imports
pub use traits::{Create, Delete, Read, Update};

pub use chat::ChatRepository;
pub use filter::{Condition, MessageFilter, SortOrder};
pub use message::MessageRepository;
pub use rental::RentalRepository;
pub use user::UserRepository;
pub use user_type::UserTypeRepository;
