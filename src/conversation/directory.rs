//! Conversation Directory - Per-user listing of chats with derived state

use super::state::ConversationState;
use crate::entities::{Chat, Message};

/// One directory row, before the rental is attached
#[derive(Debug, Clone, PartialEq)]
pub struct ConversationSummary {
    pub chat: Chat,
    pub other_participant_id: String,
    pub last_message: Option<Message>,
    pub has_unread: bool,
}

impl ConversationSummary {
    /// Row shown when the chat's log could not be read
    pub fn degraded(chat: Chat, viewer: &str) -> Self {
        Self {
            other_participant_id: chat.other_participant(viewer).to_string(),
            chat,
            last_message: None,
            has_unread: false,
        }
    }
}

/// Summarizes a chat for `viewer`, or `None` when the viewer deleted it and
/// nothing arrived since
pub fn summarize(chat: Chat, log: &[Message], viewer: &str) -> Option<ConversationSummary> {
    let state = ConversationState::derive(log, viewer);
    if state.is_hidden() {
        return None;
    }

    Some(ConversationSummary {
        other_participant_id: chat.other_participant(viewer).to_string(),
        last_message: state.last_visible().cloned(),
        has_unread: state.unread,
        chat,
    })
}

/// Number of directory rows flagged unread
pub fn count_unread(summaries: &[ConversationSummary]) -> u32 {
    summaries.iter().filter(|s| s.has_unread).count() as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conversation::marker::{DELETE_MARKER, READ_MARKER};
    use chrono::{Duration, TimeZone, Utc};

    fn chat(chat_id: i32) -> Chat {
        let at = Utc.with_ymd_and_hms(2025, 6, 1, 8, 0, 0).unwrap();
        Chat {
            chat_id,
            rental_id: 10,
            tenant_id: "tenant".into(),
            landlord_id: "landlord".into(),
            created_at: at,
            updated_at: at,
        }
    }

    fn msg(id: i32, sender: &str, content: &str) -> Message {
        Message {
            message_id: id,
            chat_id: 1,
            sender_id: sender.into(),
            content: content.into(),
            attachment: None,
            created_at: Utc.with_ymd_and_hms(2025, 6, 1, 8, 0, 0).unwrap()
                + Duration::seconds(id as i64),
        }
    }

    #[test]
    fn new_chat_without_messages_is_listed() {
        let summary = summarize(chat(1), &[], "tenant").unwrap();
        assert_eq!(summary.last_message, None);
        assert!(!summary.has_unread);
        assert_eq!(summary.other_participant_id, "landlord");
    }

    #[test]
    fn deleted_chat_is_excluded_until_a_new_message_arrives() {
        let mut log = vec![msg(1, "tenant", "Hi"), msg(2, "tenant", DELETE_MARKER)];
        assert_eq!(summarize(chat(1), &log, "tenant"), None);
        // the landlord still sees it
        assert!(summarize(chat(1), &log, "landlord").is_some());

        log.push(msg(3, "landlord", "Hello?"));
        let summary = summarize(chat(1), &log, "tenant").unwrap();
        assert!(summary.has_unread);
        assert_eq!(summary.last_message.map(|m| m.message_id), Some(3));
    }

    #[test]
    fn last_message_skips_trailing_markers() {
        let log = vec![
            msg(1, "tenant", "Hi"),
            msg(2, "landlord", "Hello"),
            msg(3, "tenant", READ_MARKER),
        ];
        let summary = summarize(chat(1), &log, "tenant").unwrap();
        assert_eq!(summary.last_message.map(|m| m.content), Some("Hello".to_string()));
        assert!(!summary.has_unread);
    }

    #[test]
    fn degraded_row_has_no_state() {
        let summary = ConversationSummary::degraded(chat(4), "landlord");
        assert_eq!(summary.other_participant_id, "tenant");
        assert!(!summary.has_unread);
        assert!(summary.last_message.is_none());
    }

    #[test]
    fn count_unread_counts_flagged_rows() {
        let unread = summarize(chat(1), &[msg(1, "landlord", "Hello")], "tenant").unwrap();
        let read = summarize(chat(2), &[msg(1, "tenant", "Hi")], "tenant").unwrap();
        assert_eq!(count_unread(&[unread.clone(), read, unread]), 2);
        assert_eq!(count_unread(&[]), 0);
    }
}
