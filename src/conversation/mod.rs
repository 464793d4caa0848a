//! Conversation module - Chat read/delete state built on the message log
//!
//! Read and delete state is never stored on its own: marking a chat read or
//! deleting it appends a marker message to the chat's log, and every query
//! derives the caller's view again from the log (see `state`).
//!
//! The operations here sit between the HTTP handlers and the repositories and
//! push live notifications after each append.

pub mod directory;
pub mod marker;
pub mod state;

pub use directory::ConversationSummary;
pub use marker::{DELETE_MARKER, MARKERS, MarkerKind, READ_MARKER};
pub use state::ConversationState;

use crate::core::{AppError, AppState};
use crate::dtos::{CreateChatDTO, CreateMessageDTO, SendMessageDTO};
use crate::entities::{Attachment, Chat, Message};
use crate::repositories::{Condition, Create, MessageFilter, Read, SortOrder};
use crate::ws::utils::notify_appended;
use chrono::Utc;
use tracing::{debug, info, instrument, warn};
use validator::Validate;

/// Loads a chat and checks that `user_id` takes part in it
#[instrument(skip(state), fields(chat_id = %chat_id, user_id = %user_id))]
pub async fn authorize(state: &AppState, chat_id: i32, user_id: &str) -> Result<Chat, AppError> {
    let chat = state.chat.read(&chat_id).await?.ok_or_else(|| {
        warn!("Chat not found");
        AppError::not_found("Chat not found")
    })?;

    if !chat.is_participant(user_id) {
        warn!("User is not a participant of the chat");
        return Err(AppError::forbidden("You are not a participant of this chat"));
    }

    Ok(chat)
}

/// Get-or-create the chat of `tenant_id` about a rental. The landlord is the rental owner.
#[instrument(skip(state), fields(rental_id = %rental_id, tenant_id = %tenant_id))]
pub async fn enquire(state: &AppState, rental_id: i32, tenant_id: &str) -> Result<Chat, AppError> {
    let rental = state.rental.read(&rental_id).await?.ok_or_else(|| {
        warn!("Enquiry about a missing rental");
        AppError::not_found("Rental not found")
    })?;

    if rental.owner_id == tenant_id {
        warn!("Owner tried to enquire about their own rental");
        return Err(AppError::bad_request("You cannot enquire about your own rental"));
    }

    let chat = state
        .chat
        .get_or_create(&CreateChatDTO {
            rental_id,
            tenant_id: tenant_id.to_string(),
            landlord_id: rental.owner_id,
            created_at: Utc::now(),
        })
        .await?;

    info!("Enquiry chat {} ready", chat.chat_id);
    Ok(chat)
}

/// Appends a user message to `chat`. Text, a file, or both must be present.
#[instrument(skip(state, chat, body), fields(chat_id = %chat.chat_id, sender_id = %sender_id))]
pub async fn append_message(
    state: &AppState,
    chat: &Chat,
    sender_id: &str,
    body: SendMessageDTO,
) -> Result<Message, AppError> {
    body.validate()?;

    let attachment = body.attachment();
    if body.content.trim().is_empty() && attachment.is_none() {
        warn!("Empty message rejected");
        return Err(AppError::bad_request("Message content or file is required"));
    }
    if marker::marker_kind(&body.content).is_some() {
        warn!("Message with reserved content rejected");
        return Err(AppError::bad_request("Message content is reserved"));
    }

    append(state, chat, sender_id, body.content, attachment).await
}

/// Appends a read-marker authored by `user_id`
#[instrument(skip(state, chat), fields(chat_id = %chat.chat_id, user_id = %user_id))]
pub async fn mark_read(state: &AppState, chat: &Chat, user_id: &str) -> Result<Message, AppError> {
    append_marker(state, chat, user_id, MarkerKind::Read).await
}

/// Appends a delete-marker authored by `user_id`. Only this user's view changes.
#[instrument(skip(state, chat), fields(chat_id = %chat.chat_id, user_id = %user_id))]
pub async fn delete_for_user(
    state: &AppState,
    chat: &Chat,
    user_id: &str,
) -> Result<Message, AppError> {
    append_marker(state, chat, user_id, MarkerKind::Delete).await
}

async fn append_marker(
    state: &AppState,
    chat: &Chat,
    user_id: &str,
    kind: MarkerKind,
) -> Result<Message, AppError> {
    debug!("Appending {:?} marker", kind);
    append(state, chat, user_id, kind.content().to_string(), None).await
}

async fn append(
    state: &AppState,
    chat: &Chat,
    sender_id: &str,
    content: String,
    attachment: Option<Attachment>,
) -> Result<Message, AppError> {
    let message = state
        .msg
        .create(&CreateMessageDTO {
            chat_id: chat.chat_id,
            sender_id: sender_id.to_string(),
            content,
            attachment,
            created_at: crate::core::time::now(),
        })
        .await?;

    notify_appended(state, chat, &message).await;
    Ok(message)
}

/// The part of a chat's log that can affect `viewer`'s view: the latest
/// delete-marker of the viewer followed by everything after it, or the whole
/// log when the viewer never deleted the chat
async fn load_log(state: &AppState, chat_id: i32, viewer: &str) -> Result<Vec<Message>, AppError> {
    let floor = state
        .msg
        .find_first(
            &MessageFilter::for_chat(chat_id)
                .and(Condition::SenderEq(viewer.to_string()))
                .and(Condition::ContentEq(DELETE_MARKER.to_string()))
                .and(Condition::WithoutAttachment)
                .order(SortOrder::Desc),
        )
        .await?;

    let Some(floor) = floor else {
        return Ok(state.msg.list(chat_id, false).await?);
    };

    let mut log = vec![floor.clone()];
    log.extend(
        state
            .msg
            .find_many(&MessageFilter::for_chat(chat_id).and(Condition::After(floor.position())))
            .await?,
    );
    Ok(log)
}

/// Visible transcript of a chat for `viewer`, oldest first.
/// With `after`, only the entries placed after that message are returned.
/// A storage failure yields an empty transcript.
#[instrument(skip(state), fields(chat_id = %chat_id, viewer = %viewer))]
pub async fn visible_transcript(
    state: &AppState,
    chat_id: i32,
    viewer: &str,
    after: Option<i32>,
) -> Vec<Message> {
    let log = match load_log(state, chat_id, viewer).await {
        Ok(log) => log,
        Err(e) => {
            warn!("Transcript unavailable, returning it empty: {:?}", e);
            return Vec::new();
        }
    };

    let view = ConversationState::derive(&log, viewer);
    let anchor = after.and_then(|id| log.iter().find(|m| m.message_id == id));
    let transcript = match anchor {
        Some(anchor) => view.transcript_after(anchor.position()),
        None => view.transcript,
    };

    debug!("Transcript has {} messages", transcript.len());
    transcript.into_iter().cloned().collect()
}

/// Whether `viewer` has unread messages in a chat
#[instrument(skip(state), fields(chat_id = %chat_id, viewer = %viewer))]
pub async fn compute_unread(state: &AppState, chat_id: i32, viewer: &str) -> Result<bool, AppError> {
    let log = load_log(state, chat_id, viewer).await?;
    Ok(ConversationState::derive(&log, viewer).unread)
}

/// Every chat of `user_id` the user has not deleted, most recent activity first.
/// A chat whose log cannot be read is listed without state.
#[instrument(skip(state), fields(user_id = %user_id))]
pub async fn list_conversations(
    state: &AppState,
    user_id: &str,
) -> Result<Vec<ConversationSummary>, AppError> {
    let chats = state.chat.find_many_by_participant(user_id).await?;

    let mut summaries = Vec::with_capacity(chats.len());
    for chat in chats {
        match load_log(state, chat.chat_id, user_id).await {
            Ok(log) => {
                if let Some(summary) = directory::summarize(chat, &log, user_id) {
                    summaries.push(summary);
                }
            }
            Err(e) => {
                warn!("Chat {} listed without state: {:?}", chat.chat_id, e);
                summaries.push(ConversationSummary::degraded(chat, user_id));
            }
        }
    }

    debug!("Directory has {} conversations", summaries.len());
    Ok(summaries)
}

/// Number of conversations with unread messages; 0 when it cannot be computed
#[instrument(skip(state), fields(user_id = %user_id))]
pub async fn unread_count(state: &AppState, user_id: &str) -> u32 {
    match list_conversations(state, user_id).await {
        Ok(summaries) => directory::count_unread(&summaries),
        Err(e) => {
            warn!("Unread count unavailable, reporting 0: {:?}", e);
            0
        }
    }
}
