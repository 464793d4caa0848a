//! Query DTOs - Query string parameters

use serde::{Deserialize, Serialize};

/// Query parameters of the transcript endpoint
#[derive(Serialize, Deserialize, Debug, Default)]
pub struct MessagesQuery {
    /// Only return messages placed after this one (incremental polling)
    #[serde(default)]
    pub after: Option<i32>,
}
