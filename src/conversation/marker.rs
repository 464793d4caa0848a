//! Marker Protocol - Sentinel contents that record per-user state in the log
//!
//! A marker is a message whose content is one of the reserved values below. Its
//! sender is always the user whose state it records. Markers never carry an
//! attachment and never show up in a transcript.

use crate::entities::Message;

pub const READ_MARKER: &str = "\u{1F535} CHAT_READ_MARKER";
pub const DELETE_MARKER: &str = "\u{1F5D1}\u{FE0F} CHAT_DELETED_MARKER";

/// Every reserved content value
pub const MARKERS: [&str; 2] = [READ_MARKER, DELETE_MARKER];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerKind {
    /// "I have seen everything up to here"
    Read,
    /// "Hide everything up to here from me"
    Delete,
}

impl MarkerKind {
    pub fn content(self) -> &'static str {
        match self {
            MarkerKind::Read => READ_MARKER,
            MarkerKind::Delete => DELETE_MARKER,
        }
    }
}

pub fn marker_kind(content: &str) -> Option<MarkerKind> {
    match content {
        READ_MARKER => Some(MarkerKind::Read),
        DELETE_MARKER => Some(MarkerKind::Delete),
        _ => None,
    }
}

pub fn is_visible_content(content: &str) -> bool {
    marker_kind(content).is_none()
}

impl Message {
    /// Marker carried by this message. A message with a file is never a marker.
    pub fn marker(&self) -> Option<MarkerKind> {
        match self.attachment {
            Some(_) => None,
            None => marker_kind(&self.content),
        }
    }

    pub fn is_visible(&self) -> bool {
        self.marker().is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::Attachment;
    use chrono::Utc;

    fn message(content: &str, attachment: Option<Attachment>) -> Message {
        Message {
            message_id: 1,
            chat_id: 1,
            sender_id: "tenant".into(),
            content: content.into(),
            attachment,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn recognizes_both_markers() {
        assert_eq!(marker_kind(READ_MARKER), Some(MarkerKind::Read));
        assert_eq!(marker_kind(DELETE_MARKER), Some(MarkerKind::Delete));
        assert_eq!(marker_kind("Hello"), None);
        assert_eq!(marker_kind(""), None);
    }

    #[test]
    fn marker_content_round_trips() {
        for kind in [MarkerKind::Read, MarkerKind::Delete] {
            assert_eq!(marker_kind(kind.content()), Some(kind));
        }
    }

    #[test]
    fn markers_are_not_visible_content() {
        assert!(!is_visible_content(READ_MARKER));
        assert!(!is_visible_content(DELETE_MARKER));
        assert!(is_visible_content("CHAT_READ_MARKER"));
    }

    #[test]
    fn file_message_with_empty_text_is_visible() {
        let file = Attachment {
            url: "/uploads/chat/1-lease.pdf".into(),
            name: Some("lease.pdf".into()),
            media_type: Some("application/pdf".into()),
        };
        let msg = message("", Some(file.clone()));
        assert_eq!(msg.marker(), None);
        assert!(msg.is_visible());

        let disguised = message(READ_MARKER, Some(file));
        assert_eq!(disguised.marker(), None);
    }
}
