//! UserRepository - Local mirror of identity provider profiles

use super::Read;
use crate::core::time::{from_micros, to_micros};
use crate::dtos::UpsertUserDTO;
use crate::entities::User;
use sqlx::{Error, FromRow, SqlitePool};
use tracing::{debug, instrument};

#[derive(FromRow)]
struct UserRow {
    user_id: String,
    display_name: Option<String>,
    primary_email: Option<String>,
    profile_image_url: Option<String>,
    updated_at: i64,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        Self {
            user_id: row.user_id,
            display_name: row.display_name,
            primary_email: row.primary_email,
            profile_image_url: row.profile_image_url,
            updated_at: from_micros(row.updated_at),
        }
    }
}

// USER REPOSITORY
pub struct UserRepository {
    connection_pool: SqlitePool,
}

impl UserRepository {
    pub fn new(connection_pool: SqlitePool) -> Self {
        Self { connection_pool }
    }

    /// Inserts or refreshes the profile carried by a verified token.
    /// Claims the provider left out do not erase what is already known.
    #[instrument(skip(self, data), fields(user_id = %data.user_id))]
    pub async fn upsert(&self, data: &UpsertUserDTO) -> Result<User, Error> {
        let row: UserRow = sqlx::query_as(
            r#"
            INSERT INTO users (user_id, display_name, primary_email, profile_image_url, updated_at)
            VALUES (?, ?, ?, ?, ?)
            ON CONFLICT (user_id) DO UPDATE SET
                display_name      = COALESCE(excluded.display_name, users.display_name),
                primary_email     = COALESCE(excluded.primary_email, users.primary_email),
                profile_image_url = COALESCE(excluded.profile_image_url, users.profile_image_url),
                updated_at        = excluded.updated_at
            RETURNING user_id, display_name, primary_email, profile_image_url, updated_at
            "#,
        )
        .bind(&data.user_id)
        .bind(&data.display_name)
        .bind(&data.primary_email)
        .bind(&data.profile_image_url)
        .bind(to_micros(&data.updated_at))
        .fetch_one(&self.connection_pool)
        .await?;

        debug!("Profile mirrored");
        Ok(User::from(row))
    }
}

impl Read<User, str> for UserRepository {
    #[instrument(skip(self), fields(user_id = %id))]
    async fn read(&self, id: &str) -> Result<Option<User>, Error> {
        let row: Option<UserRow> = sqlx::query_as(
            r#"
            SELECT user_id, display_name, primary_email, profile_image_url, updated_at
            FROM users
            WHERE user_id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.connection_pool)
        .await?;

        Ok(row.map(User::from))
    }
}
