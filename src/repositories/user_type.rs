//! UserTypeRepository - Tenant/landlord status of each user

use super::Read;
use crate::core::time::{from_micros, to_micros};
use crate::entities::{UserStatus, UserType};
use chrono::{DateTime, Utc};
use sqlx::{Error, FromRow, SqlitePool};
use tracing::{info, instrument};

#[derive(FromRow)]
struct UserTypeRow {
    user_id: String,
    status: UserStatus,
    created_at: i64,
    updated_at: i64,
}

impl From<UserTypeRow> for UserType {
    fn from(row: UserTypeRow) -> Self {
        Self {
            user_id: row.user_id,
            status: row.status,
            created_at: from_micros(row.created_at),
            updated_at: from_micros(row.updated_at),
        }
    }
}

// USER TYPE REPOSITORY
pub struct UserTypeRepository {
    connection_pool: SqlitePool,
}

impl UserTypeRepository {
    pub fn new(connection_pool: SqlitePool) -> Self {
        Self { connection_pool }
    }

    /// Status of a user; users without a stored row are tenants
    pub async fn status_of(&self, user_id: &str) -> Result<UserStatus, Error> {
        Ok(self
            .read(user_id)
            .await?
            .map(|user_type| user_type.status)
            .unwrap_or_default())
    }

    #[instrument(skip(self), fields(user_id = %user_id, status = ?status))]
    pub async fn upsert_status(
        &self,
        user_id: &str,
        status: UserStatus,
        now: &DateTime<Utc>,
    ) -> Result<UserType, Error> {
        let row: UserTypeRow = sqlx::query_as(
            r#"
            INSERT INTO user_types (user_id, status, created_at, updated_at)
            VALUES (?, ?, ?, ?)
            ON CONFLICT (user_id) DO UPDATE SET
                status     = excluded.status,
                updated_at = excluded.updated_at
            RETURNING user_id, status, created_at, updated_at
            "#,
        )
        .bind(user_id)
        .bind(status)
        .bind(to_micros(now))
        .bind(to_micros(now))
        .fetch_one(&self.connection_pool)
        .await?;

        info!("User status updated");
        Ok(UserType::from(row))
    }
}

impl Read<UserType, str> for UserTypeRepository {
    async fn read(&self, id: &str) -> Result<Option<UserType>, Error> {
        let row: Option<UserTypeRow> = sqlx::query_as(
            "SELECT user_id, status, created_at, updated_at FROM user_types WHERE user_id = ?",
        )
        .bind(id)
        .fetch_optional(&self.connection_pool)
        .await?;

        Ok(row.map(UserType::from))
    }
}
