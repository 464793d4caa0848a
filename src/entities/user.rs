//! User entities - Identity provider profiles mirrored locally and marketplace status

use super::enums::UserStatus;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Label shown when nothing better is known about a user
pub const FALLBACK_DISPLAY_NAME: &str = "User";

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct User {
    /// Subject id assigned by the identity provider
    pub user_id: String,
    pub display_name: Option<String>,
    pub primary_email: Option<String>,
    pub profile_image_url: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Display name, else the local part of the email, else a generic label
    pub fn display_label(&self) -> String {
        self.display_name
            .as_deref()
            .filter(|name| !name.trim().is_empty())
            .or_else(|| {
                self.primary_email
                    .as_deref()
                    .and_then(|email| email.split('@').next())
                    .filter(|local| !local.is_empty())
            })
            .unwrap_or(FALLBACK_DISPLAY_NAME)
            .to_string()
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct UserType {
    pub user_id: String,
    pub status: UserStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(display_name: Option<&str>, email: Option<&str>) -> User {
        User {
            user_id: "user_1".to_string(),
            display_name: display_name.map(str::to_string),
            primary_email: email.map(str::to_string),
            profile_image_url: None,
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn display_label_prefers_display_name() {
        assert_eq!(user(Some("Maria"), Some("m@x.ph")).display_label(), "Maria");
    }

    #[test]
    fn display_label_falls_back_to_email_local_part() {
        assert_eq!(user(None, Some("juan.cruz@mail.ph")).display_label(), "juan.cruz");
        assert_eq!(user(Some("  "), Some("ana@mail.ph")).display_label(), "ana");
    }

    #[test]
    fn display_label_falls_back_to_generic_label() {
        assert_eq!(user(None, None).display_label(), FALLBACK_DISPLAY_NAME);
    }
}
