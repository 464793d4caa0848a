//! Message entity - An entry of a chat's ordered log

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// File attached to a message
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Attachment {
    pub url: String,
    pub name: Option<String>,
    pub media_type: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Message {
    pub message_id: i32,
    pub chat_id: i32,
    pub sender_id: String,
    pub content: String,
    pub attachment: Option<Attachment>,
    pub created_at: DateTime<Utc>,
}

impl Message {
    pub fn position(&self) -> LogPosition {
        LogPosition {
            created_at: self.created_at,
            message_id: self.message_id,
        }
    }
}

/// Place of a message in the total order of its chat log.
///
/// Ordered by timestamp first; messages sharing a timestamp are ordered by their
/// store-assigned id, which grows with every append.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LogPosition {
    pub created_at: DateTime<Utc>,
    pub message_id: i32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn position_breaks_timestamp_ties_by_id() {
        let ts = Utc.with_ymd_and_hms(2025, 3, 1, 10, 0, 0).unwrap();
        let first = LogPosition { created_at: ts, message_id: 4 };
        let second = LogPosition { created_at: ts, message_id: 5 };
        let later = LogPosition {
            created_at: ts + chrono::Duration::microseconds(1),
            message_id: 1,
        };

        assert!(first < second);
        assert!(second < later);
    }
}
