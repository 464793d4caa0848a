//! MessageRepository - Append-only message log per chat

use super::filter::{Condition, MessageFilter};
use crate::conversation::marker::MARKERS;
use super::Create;
use crate::core::time::{from_micros, to_micros};
use crate::dtos::CreateMessageDTO;
use crate::entities::{Attachment, Message};
use sqlx::{Error, FromRow, QueryBuilder, Sqlite, SqlitePool};
use tracing::{debug, instrument};

const SELECT_MESSAGES: &str = r#"
    SELECT message_id, chat_id, sender_id, content, file_url, file_name, file_type, created_at
    FROM messages"#;

#[derive(FromRow)]
struct MessageRow {
    message_id: i32,
    chat_id: i32,
    sender_id: String,
    content: String,
    file_url: Option<String>,
    file_name: Option<String>,
    file_type: Option<String>,
    created_at: i64,
}

impl From<MessageRow> for Message {
    fn from(row: MessageRow) -> Self {
        let attachment = row.file_url.map(|url| Attachment {
            url,
            name: row.file_name,
            media_type: row.file_type,
        });
        Self {
            message_id: row.message_id,
            chat_id: row.chat_id,
            sender_id: row.sender_id,
            content: row.content,
            attachment,
            created_at: from_micros(row.created_at),
        }
    }
}

// MESSAGE REPO
pub struct MessageRepository {
    connection_pool: SqlitePool,
}

impl MessageRepository {
    pub fn new(connection_pool: SqlitePool) -> Self {
        Self { connection_pool }
    }

    /// Messages matching `filter`, in the filter's order
    #[instrument(skip(self, filter))]
    pub async fn find_many(&self, filter: &MessageFilter) -> Result<Vec<Message>, Error> {
        let mut qb = QueryBuilder::<Sqlite>::new(SELECT_MESSAGES);
        filter.push_sql(&mut qb);

        let rows: Vec<MessageRow> = qb
            .build_query_as()
            .fetch_all(&self.connection_pool)
            .await?;

        debug!("Fetched {} messages", rows.len());
        Ok(rows.into_iter().map(Message::from).collect())
    }

    /// First message matching `filter` (use `SortOrder::Desc` for the latest)
    #[instrument(skip(self, filter))]
    pub async fn find_first(&self, filter: &MessageFilter) -> Result<Option<Message>, Error> {
        let filter = filter.clone().limit(1);
        let mut qb = QueryBuilder::<Sqlite>::new(SELECT_MESSAGES);
        filter.push_sql(&mut qb);

        let row: Option<MessageRow> = qb
            .build_query_as()
            .fetch_optional(&self.connection_pool)
            .await?;

        Ok(row.map(Message::from))
    }

    /// Log of a chat ordered by position, optionally without marker entries.
    /// Sentinel contents are only ever stored by markers, so excluding them by
    /// content is exact.
    pub async fn list(&self, chat_id: i32, exclude_markers: bool) -> Result<Vec<Message>, Error> {
        let mut filter = MessageFilter::for_chat(chat_id);
        if exclude_markers {
            filter = filter.and(Condition::ContentNotIn(
                MARKERS.iter().map(|m| m.to_string()).collect(),
            ));
        }
        self.find_many(&filter).await
    }
}

impl Create<Message, CreateMessageDTO> for MessageRepository {
    /// Appends a message and touches the chat's last activity in one transaction.
    ///
    /// The stored `created_at` is never earlier than the chat's latest entry, so
    /// a message always lands after everything committed before it, whatever
    /// clock value the caller proposed.
    #[instrument(skip(self, data), fields(chat_id = %data.chat_id, sender_id = %data.sender_id))]
    async fn create(&self, data: &CreateMessageDTO) -> Result<Message, Error> {
        let (file_url, file_name, file_type) = match &data.attachment {
            Some(a) => (Some(a.url.as_str()), a.name.as_deref(), a.media_type.as_deref()),
            None => (None, None, None),
        };

        let mut tx = self.connection_pool.begin().await?;

        let (new_id, created_at): (i32, i64) = sqlx::query_as(
            r#"
            INSERT INTO messages (chat_id, sender_id, content, file_url, file_name, file_type, created_at)
            VALUES (?, ?, ?, ?, ?, ?,
                MAX(?, COALESCE((SELECT MAX(created_at) FROM messages WHERE chat_id = ?), 0)))
            RETURNING message_id, created_at
            "#,
        )
        .bind(data.chat_id)
        .bind(&data.sender_id)
        .bind(&data.content)
        .bind(file_url)
        .bind(file_name)
        .bind(file_type)
        .bind(to_micros(&data.created_at))
        .bind(data.chat_id)
        .fetch_one(&mut *tx)
        .await?;

        let touched = sqlx::query("UPDATE chats SET updated_at = MAX(updated_at, ?) WHERE chat_id = ?")
            .bind(created_at)
            .bind(data.chat_id)
            .execute(&mut *tx)
            .await?;

        if touched.rows_affected() == 0 {
            return Err(Error::RowNotFound);
        }

        tx.commit().await?;

        debug!("Message {} appended", new_id);

        Ok(Message {
            message_id: new_id,
            chat_id: data.chat_id,
            sender_id: data.sender_id.clone(),
            content: data.content.clone(),
            attachment: data.attachment.clone(),
            created_at: from_micros(created_at),
        })
    }
}
