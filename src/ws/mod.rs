//! WebSocket Module - Live notifications for connected users
//!
//! - HTTP -> WebSocket upgrade for an authenticated user
//! - Connection management (split sender/receiver tasks)
//! - Map of online users and their internal channels
//! - Notification fan-out after each append to a chat log

pub mod connection;
pub mod usermap;
pub mod utils;

pub use connection::handle_socket;
pub use utils::notify_appended;

use crate::{AppState, entities::User};
use axum::{
    Extension,
    extract::{State, ws::WebSocketUpgrade},
    response::Response,
};
use std::sync::Arc;

/// Minimum gap between two frames read from a client
pub const RATE_LIMITER_MILLIS: u64 = 10;

/// A connection silent for this long is closed
pub const TIMEOUT_DURATION_SECONDS: u64 = 300;

/// Upgrades the request of an authenticated user to a WebSocket
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
    Extension(current_user): Extension<User>,
) -> Response {
    let user_id = current_user.user_id;
    ws.on_upgrade(move |socket| handle_socket(socket, state, user_id))
}
