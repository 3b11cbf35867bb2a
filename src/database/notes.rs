use crate::{
    api::middleware::error::{ApiError, ApiResult},
    database::Database,
    models::Note,
};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

impl Database {
    pub async fn create_note(&self, note: &Note) -> ApiResult<()> {
        sqlx::query(
            "INSERT INTO notes (id, title, body, author_id, pinned, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&note.id)
        .bind(&note.title)
        .bind(&note.body)
        .bind(&note.author_id)
        .bind(note.pinned)
        .bind(&note.created_at)
        .bind(&note.updated_at)
        .execute(self.pool())
        .await?;

        Ok(())
    }

    pub async fn get_note(&self, id: &str) -> ApiResult<Option<Note>> {
        let row = sqlx::query("SELECT * FROM notes WHERE id = ?")
            .bind(id)
            .fetch_optional(self.pool())
            .await?;

        row.map(|r| note_from_row(&r)).transpose()
    }

    /// Pinned notes first, then newest first.
    pub async fn list_notes(&self) -> ApiResult<Vec<Note>> {
        let rows = sqlx::query("SELECT * FROM notes ORDER BY pinned DESC, created_at DESC")
            .fetch_all(self.pool())
            .await?;

        rows.iter().map(note_from_row).collect()
    }

    pub async fn update_note(
        &self,
        id: &str,
        title: Option<&str>,
        body: Option<&str>,
        pinned: Option<bool>,
    ) -> ApiResult<()> {
        let current = self
            .get_note(id)
            .await?
            .ok_or_else(|| ApiError::NotFound(format!("Note {} not found", id)))?;

        let now = chrono::Utc::now().to_rfc3339();

        sqlx::query("UPDATE notes SET title = ?, body = ?, pinned = ?, updated_at = ? WHERE id = ?")
            .bind(title.unwrap_or(&current.title))
            .bind(body.unwrap_or(&current.body))
            .bind(pinned.unwrap_or(current.pinned))
            .bind(&now)
            .bind(id)
            .execute(self.pool())
            .await?;

        Ok(())
    }

    pub async fn delete_note(&self, id: &str) -> ApiResult<()> {
        let result = sqlx::query("DELETE FROM notes WHERE id = ?")
            .bind(id)
            .execute(self.pool())
            .await?;

        if result.rows_affected() == 0 {
            return Err(ApiError::NotFound(format!("Note {} not found", id)));
        }

        Ok(())
    }
}

fn note_from_row(row: &SqliteRow) -> ApiResult<Note> {
    Ok(Note {
        id: row.try_get("id")?,
        title: row.try_get("title")?,
        body: row.try_get("body")?,
        author_id: row.try_get("author_id")?,
        pinned: row.try_get("pinned")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}
