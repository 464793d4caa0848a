//! User DTOs - Data Transfer Objects for user profiles

use crate::entities::{User, UserStatus, user::FALLBACK_DISPLAY_NAME};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct UserDTO {
    pub id: String,
    pub display_name: String,
    pub primary_email: String,
    pub profile_image_url: Option<String>,
}

impl UserDTO {
    /// Profile returned when the identity provider knows nothing about `user_id`
    pub fn fallback(user_id: &str) -> Self {
        Self {
            id: user_id.to_string(),
            display_name: FALLBACK_DISPLAY_NAME.to_string(),
            primary_email: String::new(),
            profile_image_url: None,
        }
    }
}

impl From<User> for UserDTO {
    fn from(value: User) -> Self {
        let display_name = value.display_label();
        Self {
            id: value.user_id,
            display_name,
            primary_email: value.primary_email.unwrap_or_default(),
            profile_image_url: value.profile_image_url,
        }
    }
}

/// DTO to mirror a profile from the identity provider's token claims
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct UpsertUserDTO {
    pub user_id: String,
    pub display_name: Option<String>,
    pub primary_email: Option<String>,
    pub profile_image_url: Option<String>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct UserStatusDTO {
    pub status: UserStatus,
}
