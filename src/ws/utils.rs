//! WebSocket Utilities - Notification fan-out after an append

use crate::AppState;
use crate::conversation;
use crate::dtos::{MessageDTO, WsEventDTO};
use crate::entities::{Chat, Message};
use tracing::{debug, instrument};

/// Pushes the events caused by appending `message` to `chat`.
///
/// A real message reaches both participants, and the recipient also gets a
/// fresh unread count. A marker only changes its author's view, so only the
/// author is told. Users who are offline are skipped.
#[instrument(skip(state, chat, message), fields(chat_id = %chat.chat_id, message_id = %message.message_id))]
pub async fn notify_appended(state: &AppState, chat: &Chat, message: &Message) {
    let author = message.sender_id.as_str();

    if message.is_visible() {
        let event = WsEventDTO::NewMessage(MessageDTO::from(message.clone()));
        state.users_online.send_if_online(&chat.tenant_id, event.clone());
        state.users_online.send_if_online(&chat.landlord_id, event);

        let recipient = chat.other_participant(author);
        send_unread_count(state, recipient).await;
    } else {
        state.users_online.send_if_online(
            author,
            WsEventDTO::ConversationUpdated {
                chat_id: chat.chat_id,
            },
        );
        send_unread_count(state, author).await;
    }
}

async fn send_unread_count(state: &AppState, user_id: &str) {
    if !state.users_online.is_user_online(user_id) {
        debug!("User offline, unread count not computed");
        return;
    }
    let count = conversation::unread_count(state, user_id).await;
    state
        .users_online
        .send_if_online(user_id, WsEventDTO::UnreadCount { count });
}
