use crate::{
    api::middleware::error::{ApiError, ApiResult},
    database::Database,
    models::{Session, SessionKind},
};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

impl Database {
    pub async fn create_session(&self, session: &Session) -> ApiResult<()> {
        sqlx::query(
            "INSERT INTO sessions (id, user_id, token, kind, display_name, expires_at, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&session.id)
        .bind(&session.user_id)
        .bind(&session.token)
        .bind(session.kind.as_str())
        .bind(&session.display_name)
        .bind(&session.expires_at)
        .bind(&session.created_at)
        .execute(self.pool())
        .await?;

        Ok(())
    }

    pub async fn get_session_by_token(&self, token: &str) -> ApiResult<Option<Session>> {
        let row = sqlx::query("SELECT * FROM sessions WHERE token = ?")
            .bind(token)
            .fetch_optional(self.pool())
            .await?;

        row.map(|r| session_from_row(&r)).transpose()
    }

    pub async fn delete_session(&self, token: &str) -> ApiResult<()> {
        sqlx::query("DELETE FROM sessions WHERE token = ?")
            .bind(token)
            .execute(self.pool())
            .await?;

        Ok(())
    }

    /// Sliding expiration: push the session expiry forward from now.
    pub async fn touch_session(&self, token: &str, duration_hours: i64) -> ApiResult<()> {
        // Session timestamps use the same RFC3339 rendering as Session::new.
        let expires_at = (time::OffsetDateTime::now_utc() + time::Duration::hours(duration_hours))
            .format(&time::format_description::well_known::Rfc3339)
            .map_err(|e| ApiError::Internal(format!("Failed to format expiry: {}", e)))?;

        sqlx::query("UPDATE sessions SET expires_at = ? WHERE token = ?")
            .bind(&expires_at)
            .bind(token)
            .execute(self.pool())
            .await?;

        Ok(())
    }

    /// Delete every session past its expiry. Returns how many were removed.
    pub async fn delete_expired_sessions(&self) -> ApiResult<u64> {
        let now = time::OffsetDateTime::now_utc()
            .format(&time::format_description::well_known::Rfc3339)
            .map_err(|e| ApiError::Internal(format!("Failed to format timestamp: {}", e)))?;

        let result = sqlx::query("DELETE FROM sessions WHERE expires_at < ?")
            .bind(&now)
            .execute(self.pool())
            .await?;

        Ok(result.rows_affected())
    }
}

fn session_from_row(row: &SqliteRow) -> ApiResult<Session> {
    let kind_str: String = row.try_get("kind")?;
    let kind = SessionKind::parse(&kind_str)
        .ok_or_else(|| ApiError::Internal(format!("Unknown session kind: {}", kind_str)))?;

    Ok(Session {
        id: row.try_get("id")?,
        user_id: row.try_get("user_id")?,
        token: row.try_get("token")?,
        kind,
        display_name: row.try_get("display_name")?,
        expires_at: row.try_get("expires_at")?,
        created_at: row.try_get("created_at")?,
    })
}
