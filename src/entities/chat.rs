//! Chat entity - One enquiry thread per (rental, tenant)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Chat {
    pub chat_id: i32,
    pub rental_id: i32,
    pub tenant_id: String,
    pub landlord_id: String,
    pub created_at: DateTime<Utc>,
    // last activity, touched by every append to the log
    pub updated_at: DateTime<Utc>,
}

impl Chat {
    pub fn is_participant(&self, user_id: &str) -> bool {
        self.tenant_id == user_id || self.landlord_id == user_id
    }

    /// The participant on the other side of the thread from `user_id`
    pub fn other_participant(&self, user_id: &str) -> &str {
        if self.tenant_id == user_id {
            &self.landlord_id
        } else {
            &self.tenant_id
        }
    }
}
