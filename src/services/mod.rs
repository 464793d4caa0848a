//! Services module - HTTP handlers
//!
//! Each sub-module serves the endpoints of one feature.

pub mod auth;
pub mod chat;
pub mod rental;
pub mod upload;
pub mod user;

// Re-exports to ease imports
pub use auth::{get_current_user, get_user_status, register_landlord};
pub use chat::{
    delete_chat, enquire, get_chat, get_chat_messages, list_chats, mark_chat_read, mark_read,
    send_message, unread_count,
};
pub use rental::{
    create_rental, delete_rental, get_rental, landlord_listings, list_rentals, update_rental,
};
pub use upload::upload_file;
pub use user::{get_user_avatar, get_user_by_id};

use crate::AppState;
use crate::core::db::health_with_pool;
use axum::{extract::State, http::StatusCode, response::IntoResponse};
use std::sync::Arc;

/// Root endpoint - health check
pub async fn root(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    if health_with_pool(&state.pool).await {
        (StatusCode::OK, "Server is running!")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "Database unavailable")
    }
}
