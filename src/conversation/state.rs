//! Conversation State Deriver - Per-viewer projection of a chat log
//!
//! Everything is derived from one scan of the log. All "after" comparisons use
//! `LogPosition` ordering through `is_after`, so transcript filtering and
//! unread computation can never disagree about a message sitting on a marker.

use super::marker::MarkerKind;
use crate::entities::{LogPosition, Message};

/// True iff `position` lies strictly after `floor` (always true without a floor)
pub fn is_after(position: LogPosition, floor: Option<LogPosition>) -> bool {
    floor.is_none_or(|floor| position > floor)
}

/// Derived view of a chat for one viewer
#[derive(Debug, Clone, PartialEq)]
pub struct ConversationState<'a> {
    /// Position of the viewer's latest delete-marker
    pub delete_floor: Option<LogPosition>,
    /// Position of the viewer's latest read-marker
    pub read_watermark: Option<LogPosition>,
    /// Non-marker messages after the delete floor, in log order
    pub transcript: Vec<&'a Message>,
    pub unread: bool,
}

impl<'a> ConversationState<'a> {
    pub fn derive(log: &'a [Message], viewer: &str) -> Self {
        let latest_marker = |kind: MarkerKind| {
            log.iter()
                .filter(|m| m.sender_id == viewer && m.marker() == Some(kind))
                .map(Message::position)
                .max()
        };
        let delete_floor = latest_marker(MarkerKind::Delete);
        let read_watermark = latest_marker(MarkerKind::Read);

        let mut transcript: Vec<&Message> = log
            .iter()
            .filter(|m| m.is_visible() && is_after(m.position(), delete_floor))
            .collect();
        transcript.sort_by_key(|m| m.position());

        let unread = transcript
            .iter()
            .filter(|m| m.sender_id != viewer)
            .map(|m| m.position())
            .max()
            .is_some_and(|latest| !read_watermark.is_some_and(|read| read > latest));

        Self {
            delete_floor,
            read_watermark,
            transcript,
            unread,
        }
    }

    pub fn last_visible(&self) -> Option<&'a Message> {
        self.transcript.last().copied()
    }

    /// Deleted by the viewer with nothing new since: such a chat is not listed
    pub fn is_hidden(&self) -> bool {
        self.delete_floor.is_some() && self.transcript.is_empty()
    }

    /// Transcript entries placed after `position`
    pub fn transcript_after(&self, position: LogPosition) -> Vec<&'a Message> {
        self.transcript
            .iter()
            .copied()
            .filter(|m| is_after(m.position(), Some(position)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conversation::marker::{DELETE_MARKER, READ_MARKER};
    use crate::entities::Attachment;
    use chrono::{DateTime, Duration, TimeZone, Utc};

    const TENANT: &str = "tenant";
    const LANDLORD: &str = "landlord";

    fn t(n: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 8, 0, 0).unwrap() + Duration::seconds(n)
    }

    /// Builds a log from (sender, content, time) triples; ids follow the given order
    fn log(entries: &[(&str, &str, i64)]) -> Vec<Message> {
        entries
            .iter()
            .enumerate()
            .map(|(i, (sender, content, at))| Message {
                message_id: i as i32 + 1,
                chat_id: 1,
                sender_id: sender.to_string(),
                content: content.to_string(),
                attachment: None,
                created_at: t(*at),
            })
            .collect()
    }

    fn contents(state: &ConversationState) -> Vec<String> {
        state.transcript.iter().map(|m| m.content.clone()).collect()
    }

    #[test]
    fn empty_log_is_read_and_visible() {
        let state = ConversationState::derive(&[], TENANT);
        assert!(state.transcript.is_empty());
        assert!(!state.unread);
        assert!(!state.is_hidden());
        assert_eq!(state.last_visible(), None);
    }

    #[test]
    fn markers_never_reach_the_transcript() {
        let log = log(&[
            (TENANT, "Hi", 1),
            (LANDLORD, READ_MARKER, 2),
            (LANDLORD, "Hello", 3),
        ]);
        let state = ConversationState::derive(&log, TENANT);
        assert_eq!(contents(&state), vec!["Hi", "Hello"]);
        assert_eq!(state.last_visible().map(|m| m.content.as_str()), Some("Hello"));
    }

    // unread is driven purely by markers, for both sides
    #[test]
    fn messages_without_markers_are_unread_for_both_sides() {
        let log = log(&[(TENANT, "Hi", 1), (LANDLORD, "Hello", 2)]);

        assert!(ConversationState::derive(&log, TENANT).unread);
        // the landlord replied, but never left a read marker after "Hi"
        assert!(ConversationState::derive(&log, LANDLORD).unread);
    }

    #[test]
    fn read_marker_after_latest_other_message_clears_unread() {
        let log = log(&[
            (TENANT, "Hi", 1),
            (LANDLORD, "Hello", 2),
            (TENANT, READ_MARKER, 3),
        ]);
        let state = ConversationState::derive(&log, TENANT);
        assert!(!state.unread);
        assert_eq!(state.read_watermark.map(|p| p.message_id), Some(3));
    }

    #[test]
    fn newer_message_after_read_marker_is_unread_again() {
        let log = log(&[
            (LANDLORD, "Hello", 1),
            (TENANT, READ_MARKER, 2),
            (LANDLORD, "Still there?", 3),
        ]);
        assert!(ConversationState::derive(&log, TENANT).unread);
    }

    #[test]
    fn other_participants_read_marker_does_not_count() {
        let log = log(&[(LANDLORD, "Hello", 1), (LANDLORD, READ_MARKER, 2)]);
        assert!(ConversationState::derive(&log, TENANT).unread);
    }

    #[test]
    fn own_messages_alone_are_never_unread() {
        let log = log(&[(TENANT, "Hi", 1), (TENANT, "Anyone?", 2)]);
        assert!(!ConversationState::derive(&log, TENANT).unread);
    }

    #[test]
    fn delete_marker_hides_everything_before_it() {
        let log = log(&[
            (TENANT, "Hi", 1),
            (LANDLORD, "Hello", 2),
            (TENANT, DELETE_MARKER, 3),
            (LANDLORD, "Are you still interested?", 4),
        ]);
        let tenant = ConversationState::derive(&log, TENANT);
        assert_eq!(contents(&tenant), vec!["Are you still interested?"]);
        assert!(tenant.unread);

        // the other participant's view is untouched
        let landlord = ConversationState::derive(&log, LANDLORD);
        assert_eq!(contents(&landlord), vec!["Hi", "Hello", "Are you still interested?"]);
    }

    #[test]
    fn deleted_conversation_without_new_messages_is_hidden() {
        let log = log(&[(TENANT, "Hi", 1), (TENANT, DELETE_MARKER, 2)]);
        let state = ConversationState::derive(&log, TENANT);
        assert!(state.is_hidden());
        assert!(!state.unread);
    }

    #[test]
    fn messages_before_delete_floor_do_not_count_as_unread() {
        let log = log(&[(LANDLORD, "Hello", 1), (TENANT, DELETE_MARKER, 2)]);
        assert!(!ConversationState::derive(&log, TENANT).unread);
    }

    #[test]
    fn latest_delete_marker_wins() {
        let log = log(&[
            (LANDLORD, "one", 1),
            (TENANT, DELETE_MARKER, 2),
            (LANDLORD, "two", 3),
            (TENANT, DELETE_MARKER, 4),
            (LANDLORD, "three", 5),
        ]);
        let state = ConversationState::derive(&log, TENANT);
        assert_eq!(contents(&state), vec!["three"]);
        assert_eq!(state.delete_floor.map(|p| p.message_id), Some(4));
    }

    #[test]
    fn repeated_delete_gives_the_same_empty_view() {
        let once = log(&[(LANDLORD, "Hello", 1), (TENANT, DELETE_MARKER, 2)]);
        let twice = log(&[
            (LANDLORD, "Hello", 1),
            (TENANT, DELETE_MARKER, 2),
            (TENANT, DELETE_MARKER, 3),
        ]);
        assert_eq!(
            contents(&ConversationState::derive(&once, TENANT)),
            contents(&ConversationState::derive(&twice, TENANT))
        );
        assert!(ConversationState::derive(&twice, TENANT).transcript.is_empty());
    }

    #[test]
    fn same_timestamp_is_ordered_by_id_in_both_computations() {
        // marker and messages share one clock tick
        let log = log(&[
            (LANDLORD, "before", 5),
            (TENANT, DELETE_MARKER, 5),
            (LANDLORD, "after", 5),
        ]);
        let state = ConversationState::derive(&log, TENANT);
        assert_eq!(contents(&state), vec!["after"]);
        assert!(state.unread);

        let read = log_with_read_tie();
        assert!(!ConversationState::derive(&read, TENANT).unread);
    }

    fn log_with_read_tie() -> Vec<Message> {
        log(&[(LANDLORD, "Hello", 7), (TENANT, READ_MARKER, 7)])
    }

    #[test]
    fn file_message_with_empty_text_behaves_like_any_message() {
        let mut log = log(&[(TENANT, READ_MARKER, 1), (LANDLORD, "", 2)]);
        log[1].attachment = Some(Attachment {
            url: "/uploads/chat/1-floorplan.png".into(),
            name: Some("floorplan.png".into()),
            media_type: Some("image/png".into()),
        });

        let state = ConversationState::derive(&log, TENANT);
        assert_eq!(state.transcript.len(), 1);
        assert!(state.unread);
        assert_eq!(state.last_visible().map(|m| m.message_id), Some(2));
    }

    #[test]
    fn transcript_is_a_suffix_of_visible_messages() {
        let log = log(&[
            (TENANT, "a", 1),
            (LANDLORD, "b", 2),
            (TENANT, DELETE_MARKER, 3),
            (LANDLORD, "c", 4),
            (TENANT, READ_MARKER, 5),
            (TENANT, "d", 6),
        ]);
        let state = ConversationState::derive(&log, TENANT);
        let floor = state.delete_floor;

        let expected: Vec<&Message> = log
            .iter()
            .filter(|m| m.is_visible() && is_after(m.position(), floor))
            .collect();
        assert_eq!(state.transcript, expected);

        // once a message is visible every later visible message is too
        let first = state.transcript[0].position();
        assert!(log
            .iter()
            .filter(|m| m.is_visible() && m.position() > first)
            .all(|m| state.transcript.contains(&m)));
    }

    #[test]
    fn transcript_after_returns_only_newer_entries() {
        let log = log(&[(TENANT, "a", 1), (LANDLORD, "b", 2), (TENANT, "c", 3)]);
        let state = ConversationState::derive(&log, LANDLORD);
        let newer = state.transcript_after(log[0].position());
        assert_eq!(
            newer.iter().map(|m| m.content.as_str()).collect::<Vec<_>>(),
            vec!["b", "c"]
        );
    }
}
