use crate::{
    api::middleware::error::{ApiError, ApiResult},
    database::Database,
    models::Script,
};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

impl Database {
    pub async fn create_script(&self, script: &Script) -> ApiResult<()> {
        sqlx::query(
            "INSERT INTO scripts (id, title, category, body, position, active, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&script.id)
        .bind(&script.title)
        .bind(&script.category)
        .bind(&script.body)
        .bind(script.position)
        .bind(script.active)
        .bind(&script.created_at)
        .bind(&script.updated_at)
        .execute(self.pool())
        .await?;

        Ok(())
    }

    pub async fn get_script(&self, id: &str) -> ApiResult<Option<Script>> {
        let row = sqlx::query("SELECT * FROM scripts WHERE id = ?")
            .bind(id)
            .fetch_optional(self.pool())
            .await?;

        row.map(|r| script_from_row(&r)).transpose()
    }

    /// Scripts ordered by category then position. `category` narrows to one
    /// category; `active_only` hides deactivated scripts from operators.
    pub async fn list_scripts(
        &self,
        category: Option<&str>,
        active_only: bool,
    ) -> ApiResult<Vec<Script>> {
        let rows = match category {
            Some(category) => {
                sqlx::query(
                    "SELECT * FROM scripts WHERE category = ? AND (active = 1 OR ? = 0)
                     ORDER BY position ASC, title ASC",
                )
                .bind(category)
                .bind(active_only)
                .fetch_all(self.pool())
                .await?
            }
            None => {
                sqlx::query(
                    "SELECT * FROM scripts WHERE (active = 1 OR ? = 0)
                     ORDER BY category ASC, position ASC, title ASC",
                )
                .bind(active_only)
                .fetch_all(self.pool())
                .await?
            }
        };

        rows.iter().map(script_from_row).collect()
    }

    pub async fn update_script(
        &self,
        id: &str,
        title: Option<&str>,
        category: Option<&str>,
        body: Option<&str>,
        position: Option<i64>,
        active: Option<bool>,
    ) -> ApiResult<()> {
        let current = self
            .get_script(id)
            .await?
            .ok_or_else(|| ApiError::NotFound(format!("Script {} not found", id)))?;

        let now = chrono::Utc::now().to_rfc3339();

        sqlx::query(
            "UPDATE scripts SET title = ?, category = ?, body = ?, position = ?, active = ?, updated_at = ?
             WHERE id = ?",
        )
        .bind(title.unwrap_or(&current.title))
        .bind(category.unwrap_or(&current.category))
        .bind(body.unwrap_or(&current.body))
        .bind(position.unwrap_or(current.position))
        .bind(active.unwrap_or(current.active))
        .bind(&now)
        .bind(id)
        .execute(self.pool())
        .await?;

        Ok(())
    }

    pub async fn delete_script(&self, id: &str) -> ApiResult<()> {
        let result = sqlx::query("DELETE FROM scripts WHERE id = ?")
            .bind(id)
            .execute(self.pool())
            .await?;

        if result.rows_affected() == 0 {
            return Err(ApiError::NotFound(format!("Script {} not found", id)));
        }

        Ok(())
    }
}

fn script_from_row(row: &SqliteRow) -> ApiResult<Script> {
    Ok(Script {
        id: row.try_get("id")?,
        title: row.try_get("title")?,
        category: row.try_get("category")?,
        body: row.try_get("body")?,
        position: row.try_get("position")?,
        active: row.try_get("active")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}
