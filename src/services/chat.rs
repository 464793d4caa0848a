//! Chat services - Enquiries, transcripts and read/delete state
//!
//! Routes under `/chats/{chat_id}` run behind `chat_participant_middleware`,
//! which puts the authorized `Chat` in the request extensions.

use crate::conversation;
use crate::core::{AppError, AppState};
use crate::dtos::{
    ApiResponse, ApiResult, ChatDTO, ChatDetailDTO, ConversationSummaryDTO, EnquireDTO,
    MarkReadDTO, MessageDTO, MessagesQuery, RentalDTO, SendMessageDTO, UnreadCountDTO,
};
use crate::entities::{Chat, Message, User};
use crate::repositories::Read;
use axum::{
    Extension,
    extract::{Json, Query, State},
};
use futures_util::future::try_join_all;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

fn to_dtos(messages: Vec<Message>) -> Vec<MessageDTO> {
    messages.into_iter().map(MessageDTO::from).collect()
}

/// Conversation directory of the caller, most recent activity first
#[instrument(skip(state, current_user), fields(user_id = %current_user.user_id))]
pub async fn list_chats(
    State(state): State<Arc<AppState>>,
    Extension(current_user): Extension<User>,
) -> ApiResult<Vec<ConversationSummaryDTO>> {
    let summaries = conversation::list_conversations(&state, &current_user.user_id).await?;

    let rentals = try_join_all(summaries.iter().map(|s| {
        let state = state.clone();
        let rental_id = s.chat.rental_id;
        async move { state.rental.read(&rental_id).await }
    }))
    .await?;

    let directory: Vec<ConversationSummaryDTO> = summaries
        .into_iter()
        .zip(rentals)
        .map(|(summary, rental)| ConversationSummaryDTO {
            chat: ChatDTO::from(summary.chat),
            rental: rental.map(RentalDTO::from),
            other_participant_id: summary.other_participant_id,
            last_message: summary.last_message.map(MessageDTO::from),
            has_unread: summary.has_unread,
        })
        .collect();

    info!("Directory lists {} chats", directory.len());
    Ok(ApiResponse::ok(directory))
}

/// Opens (or reopens) the caller's chat about a rental
#[instrument(skip(state, current_user, body), fields(user_id = %current_user.user_id, rental_id = %body.rental_id))]
pub async fn enquire(
    State(state): State<Arc<AppState>>,
    Extension(current_user): Extension<User>,
    Json(body): Json<EnquireDTO>,
) -> ApiResult<ChatDTO> {
    let chat = conversation::enquire(&state, body.rental_id, &current_user.user_id).await?;
    Ok(ApiResponse::ok(ChatDTO::from(chat)))
}

/// Number of the caller's chats with unread messages; 0 when it cannot be computed
#[instrument(skip(state, current_user), fields(user_id = %current_user.user_id))]
pub async fn unread_count(
    State(state): State<Arc<AppState>>,
    Extension(current_user): Extension<User>,
) -> ApiResult<UnreadCountDTO> {
    let count = conversation::unread_count(&state, &current_user.user_id).await;
    Ok(ApiResponse::ok(UnreadCountDTO { count }))
}

/// Marks the chat named in the body as read
#[instrument(skip(state, current_user, body), fields(user_id = %current_user.user_id))]
pub async fn mark_read(
    State(state): State<Arc<AppState>>,
    Extension(current_user): Extension<User>,
    Json(body): Json<MarkReadDTO>,
) -> ApiResult<UnreadCountDTO> {
    let chat_id = body.chat_id.ok_or_else(|| {
        warn!("Mark-read request without chat id");
        AppError::bad_request("Chat ID is required")
    })?;

    let chat = conversation::authorize(&state, chat_id, &current_user.user_id).await?;
    read_and_count(&state, &chat, &current_user.user_id).await
}

/// Marks the chat of the path as read
#[instrument(skip(state, current_user, chat), fields(user_id = %current_user.user_id, chat_id = %chat.chat_id))]
pub async fn mark_chat_read(
    State(state): State<Arc<AppState>>,
    Extension(current_user): Extension<User>,
    Extension(chat): Extension<Chat>,
) -> ApiResult<UnreadCountDTO> {
    read_and_count(&state, &chat, &current_user.user_id).await
}

async fn read_and_count(state: &AppState, chat: &Chat, user_id: &str) -> ApiResult<UnreadCountDTO> {
    conversation::mark_read(state, chat, user_id).await?;
    let count = conversation::unread_count(state, user_id).await;
    Ok(ApiResponse::ok(UnreadCountDTO { count }))
}

/// Chat, its rental and the caller's visible transcript
#[instrument(skip(state, current_user, chat), fields(user_id = %current_user.user_id, chat_id = %chat.chat_id))]
pub async fn get_chat(
    State(state): State<Arc<AppState>>,
    Extension(current_user): Extension<User>,
    Extension(chat): Extension<Chat>,
) -> ApiResult<ChatDetailDTO> {
    let rental = state.rental.read(&chat.rental_id).await?;
    let messages =
        conversation::visible_transcript(&state, chat.chat_id, &current_user.user_id, None).await;

    Ok(ApiResponse::ok(ChatDetailDTO {
        chat: ChatDTO::from(chat),
        rental: rental.map(RentalDTO::from),
        messages: to_dtos(messages),
    }))
}

/// Hides the chat's history from the caller only
#[instrument(skip(state, current_user, chat), fields(user_id = %current_user.user_id, chat_id = %chat.chat_id))]
pub async fn delete_chat(
    State(state): State<Arc<AppState>>,
    Extension(current_user): Extension<User>,
    Extension(chat): Extension<Chat>,
) -> ApiResult<ChatDTO> {
    conversation::delete_for_user(&state, &chat, &current_user.user_id).await?;
    info!("Chat deleted for user");
    Ok(ApiResponse::ok(ChatDTO::from(chat)))
}

#[instrument(skip(state, current_user, chat, params), fields(user_id = %current_user.user_id, chat_id = %chat.chat_id))]
pub async fn get_chat_messages(
    State(state): State<Arc<AppState>>,
    Extension(current_user): Extension<User>,
    Extension(chat): Extension<Chat>,
    Query(params): Query<MessagesQuery>,
) -> ApiResult<Vec<MessageDTO>> {
    let messages =
        conversation::visible_transcript(&state, chat.chat_id, &current_user.user_id, params.after)
            .await;
    debug!("Returning {} messages", messages.len());
    Ok(ApiResponse::ok(to_dtos(messages)))
}

#[instrument(skip(state, current_user, chat, body), fields(user_id = %current_user.user_id, chat_id = %chat.chat_id))]
pub async fn send_message(
    State(state): State<Arc<AppState>>,
    Extension(current_user): Extension<User>,
    Extension(chat): Extension<Chat>,
    Json(body): Json<SendMessageDTO>,
) -> ApiResult<MessageDTO> {
    let message = conversation::append_message(&state, &chat, &current_user.user_id, body).await?;
    info!("Message {} sent", message.message_id);
    Ok(ApiResponse::ok(MessageDTO::from(message)))
}
