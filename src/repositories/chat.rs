//! ChatRepository - One chat per (rental, tenant) pair

use super::Read;
use crate::core::time::{from_micros, to_micros};
use crate::dtos::CreateChatDTO;
use crate::entities::Chat;
use sqlx::{Error, FromRow, SqlitePool};
use tracing::{debug, info, instrument};

#[derive(FromRow)]
struct ChatRow {
    chat_id: i32,
    rental_id: i32,
    tenant_id: String,
    landlord_id: String,
    created_at: i64,
    updated_at: i64,
}

impl From<ChatRow> for Chat {
    fn from(row: ChatRow) -> Self {
        Self {
            chat_id: row.chat_id,
            rental_id: row.rental_id,
            tenant_id: row.tenant_id,
            landlord_id: row.landlord_id,
            created_at: from_micros(row.created_at),
            updated_at: from_micros(row.updated_at),
        }
    }
}

// CHAT REPOSITORY
pub struct ChatRepository {
    connection_pool: SqlitePool,
}

impl ChatRepository {
    pub fn new(connection_pool: SqlitePool) -> Self {
        Self { connection_pool }
    }

    /// Chat opened by `tenant_id` about `rental_id`, if any
    #[instrument(skip(self), fields(rental_id = %rental_id, tenant_id = %tenant_id))]
    pub async fn find_by_rental_and_tenant(
        &self,
        rental_id: &i32,
        tenant_id: &str,
    ) -> Result<Option<Chat>, Error> {
        let row: Option<ChatRow> = sqlx::query_as(
            r#"
            SELECT chat_id, rental_id, tenant_id, landlord_id, created_at, updated_at
            FROM chats
            WHERE rental_id = ? AND tenant_id = ?
            "#,
        )
        .bind(rental_id)
        .bind(tenant_id)
        .fetch_optional(&self.connection_pool)
        .await?;

        Ok(row.map(Chat::from))
    }

    /// Returns the chat for the (rental, tenant) pair, creating it on first enquiry.
    /// Concurrent enquiries converge on the same row thanks to the unique constraint.
    #[instrument(skip(self, data), fields(rental_id = %data.rental_id, tenant_id = %data.tenant_id))]
    pub async fn get_or_create(&self, data: &CreateChatDTO) -> Result<Chat, Error> {
        let created_at = to_micros(&data.created_at);
        let result = sqlx::query(
            r#"
            INSERT INTO chats (rental_id, tenant_id, landlord_id, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?)
            ON CONFLICT (rental_id, tenant_id) DO NOTHING
            "#,
        )
        .bind(data.rental_id)
        .bind(&data.tenant_id)
        .bind(&data.landlord_id)
        .bind(created_at)
        .bind(created_at)
        .execute(&self.connection_pool)
        .await?;

        if result.rows_affected() > 0 {
            info!("Chat created");
        } else {
            debug!("Chat already exists");
        }

        self.find_by_rental_and_tenant(&data.rental_id, &data.tenant_id)
            .await?
            .ok_or(Error::RowNotFound)
    }

    /// Chats where the user is tenant or landlord, most recent activity first
    #[instrument(skip(self), fields(user_id = %user_id))]
    pub async fn find_many_by_participant(&self, user_id: &str) -> Result<Vec<Chat>, Error> {
        let rows: Vec<ChatRow> = sqlx::query_as(
            r#"
            SELECT chat_id, rental_id, tenant_id, landlord_id, created_at, updated_at
            FROM chats
            WHERE tenant_id = ? OR landlord_id = ?
            ORDER BY updated_at DESC, chat_id DESC
            "#,
        )
        .bind(user_id)
        .bind(user_id)
        .fetch_all(&self.connection_pool)
        .await?;

        debug!("User takes part in {} chats", rows.len());
        Ok(rows.into_iter().map(Chat::from).collect())
    }
}

impl Read<Chat, i32> for ChatRepository {
    #[instrument(skip(self), fields(chat_id = %id))]
    async fn read(&self, id: &i32) -> Result<Option<Chat>, Error> {
        let row: Option<ChatRow> = sqlx::query_as(
            r#"
            SELECT chat_id, rental_id, tenant_id, landlord_id, created_at, updated_at
            FROM chats
            WHERE chat_id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.connection_pool)
        .await?;

        if row.is_none() {
            debug!("Chat not found");
        }

        Ok(row.map(Chat::from))
    }
}
