//! Message filters - Typed query conditions over the messages table
//!
//! A filter is a conjunction of conditions, each naming a column, an operator and
//! a value of the right type. `push_sql` renders it with bound parameters.

use crate::core::time::to_micros;
use crate::entities::LogPosition;
use sqlx::{QueryBuilder, Sqlite};

#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    ChatIdEq(i32),
    SenderEq(String),
    SenderNe(String),
    ContentEq(String),
    ContentNe(String),
    ContentNotIn(Vec<String>),
    /// No file attached (`file_url IS NULL`)
    WithoutAttachment,
    /// Strictly after a log position, using the `(created_at, message_id)` order
    After(LogPosition),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct MessageFilter {
    conditions: Vec<Condition>,
    order: SortOrder,
    limit: Option<i64>,
}

impl MessageFilter {
    /// Every message of a chat, oldest first
    pub fn for_chat(chat_id: i32) -> Self {
        Self::default().and(Condition::ChatIdEq(chat_id))
    }

    pub fn and(mut self, condition: Condition) -> Self {
        self.conditions.push(condition);
        self
    }

    pub fn order(mut self, order: SortOrder) -> Self {
        self.order = order;
        self
    }

    pub fn limit(mut self, limit: i64) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Appends `WHERE ... ORDER BY ... [LIMIT ?]` to a `SELECT ... FROM messages`
    pub fn push_sql(&self, qb: &mut QueryBuilder<'_, Sqlite>) {
        for (i, condition) in self.conditions.iter().enumerate() {
            qb.push(if i == 0 { " WHERE " } else { " AND " });
            match condition {
                Condition::ChatIdEq(chat_id) => {
                    qb.push("chat_id = ").push_bind(*chat_id);
                }
                Condition::SenderEq(sender) => {
                    qb.push("sender_id = ").push_bind(sender.clone());
                }
                Condition::SenderNe(sender) => {
                    qb.push("sender_id <> ").push_bind(sender.clone());
                }
                Condition::ContentEq(content) => {
                    qb.push("content = ").push_bind(content.clone());
                }
                Condition::ContentNe(content) => {
                    qb.push("content <> ").push_bind(content.clone());
                }
                Condition::ContentNotIn(values) if values.is_empty() => {
                    qb.push("1 = 1");
                }
                Condition::ContentNotIn(values) => {
                    qb.push("content NOT IN (");
                    let mut list = qb.separated(", ");
                    for value in values {
                        list.push_bind(value.clone());
                    }
                    list.push_unseparated(")");
                }
                Condition::WithoutAttachment => {
                    qb.push("file_url IS NULL");
                }
                Condition::After(position) => {
                    qb.push("(created_at, message_id) > (")
                        .push_bind(to_micros(&position.created_at))
                        .push(", ")
                        .push_bind(position.message_id)
                        .push(")");
                }
            }
        }

        match self.order {
            SortOrder::Asc => qb.push(" ORDER BY created_at ASC, message_id ASC"),
            SortOrder::Desc => qb.push(" ORDER BY created_at DESC, message_id DESC"),
        };

        if let Some(limit) = self.limit {
            qb.push(" LIMIT ").push_bind(limit);
        }
    }
}
