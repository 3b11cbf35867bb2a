use crate::{
    api::middleware::error::{ApiError, ApiResult},
    database::Database,
    models::{Channel, Message, SessionKind},
};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

impl Database {
    pub async fn create_channel(&self, channel: &Channel) -> ApiResult<()> {
        sqlx::query(
            "INSERT INTO channels (id, name, description, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&channel.id)
        .bind(&channel.name)
        .bind(&channel.description)
        .bind(&channel.created_at)
        .bind(&channel.updated_at)
        .execute(self.pool())
        .await?;

        Ok(())
    }

    pub async fn get_channel(&self, id: &str) -> ApiResult<Option<Channel>> {
        let row = sqlx::query("SELECT * FROM channels WHERE id = ?")
            .bind(id)
            .fetch_optional(self.pool())
            .await?;

        row.map(|r| channel_from_row(&r)).transpose()
    }

    pub async fn list_channels(&self) -> ApiResult<Vec<Channel>> {
        let rows = sqlx::query("SELECT * FROM channels ORDER BY name ASC")
            .fetch_all(self.pool())
            .await?;

        rows.iter().map(channel_from_row).collect()
    }

    pub async fn update_channel(
        &self,
        id: &str,
        name: Option<&str>,
        description: Option<Option<&str>>,
    ) -> ApiResult<()> {
        let current = self
            .get_channel(id)
            .await?
            .ok_or_else(|| ApiError::NotFound(format!("Channel {} not found", id)))?;

        let updated_name = name.unwrap_or(&current.name);
        let updated_description = match description {
            Some(description) => description.map(|d| d.to_string()),
            None => current.description.clone(),
        };
        let now = chrono::Utc::now().to_rfc3339();

        sqlx::query("UPDATE channels SET name = ?, description = ?, updated_at = ? WHERE id = ?")
            .bind(updated_name)
            .bind(&updated_description)
            .bind(&now)
            .bind(id)
            .execute(self.pool())
            .await?;

        Ok(())
    }

    pub async fn delete_channel(&self, id: &str) -> ApiResult<()> {
        let result = sqlx::query("DELETE FROM channels WHERE id = ?")
            .bind(id)
            .execute(self.pool())
            .await?;

        if result.rows_affected() == 0 {
            return Err(ApiError::NotFound(format!("Channel {} not found", id)));
        }

        Ok(())
    }

    // Message operations

    pub async fn create_message(&self, message: &Message) -> ApiResult<()> {
        sqlx::query(
            "INSERT INTO messages (id, channel_id, author_name, author_kind, body, created_at)
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(&message.id)
        .bind(&message.channel_id)
        .bind(&message.author_name)
        .bind(message.author_kind.as_str())
        .bind(&message.body)
        .bind(&message.created_at)
        .execute(self.pool())
        .await?;

        Ok(())
    }

    /// Messages of a channel in chronological order (newest last).
    pub async fn list_messages(
        &self,
        channel_id: &str,
        limit: i64,
        offset: i64,
    ) -> ApiResult<(Vec<Message>, i64)> {
        let rows = sqlx::query(
            "SELECT * FROM messages WHERE channel_id = ?
             ORDER BY created_at ASC, id ASC LIMIT ? OFFSET ?",
        )
        .bind(channel_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(self.pool())
        .await?;

        let total =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM messages WHERE channel_id = ?")
                .bind(channel_id)
                .fetch_one(self.pool())
                .await?;

        let messages = rows
            .iter()
            .map(message_from_row)
            .collect::<ApiResult<Vec<_>>>()?;

        Ok((messages, total))
    }
}

fn channel_from_row(row: &SqliteRow) -> ApiResult<Channel> {
    Ok(Channel {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        description: row.try_get("description")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

fn message_from_row(row: &SqliteRow) -> ApiResult<Message> {
    let kind_str: String = row.try_get("author_kind")?;
    let author_kind = SessionKind::parse(&kind_str)
        .ok_or_else(|| ApiError::Internal(format!("Unknown author kind: {}", kind_str)))?;

    Ok(Message {
        id: row.try_get("id")?,
        channel_id: row.try_get("channel_id")?,
        author_name: row.try_get("author_name")?,
        author_kind,
        body: row.try_get("body")?,
        created_at: row.try_get("created_at")?,
    })
}
