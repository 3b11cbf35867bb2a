use crate::{
    api::middleware::error::{ApiError, ApiResult},
    models::*,
};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow};
use sqlx::{Row, SqlitePool};
use std::str::FromStr;

pub mod channels;
pub mod notes;
pub mod quizzes;
pub mod scripts;
pub mod sessions;
pub mod tabulations;

#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    pub async fn connect(database_url: &str) -> Result<Self, sqlx::Error> {
        // foreign_keys must be set per connection, so it goes through the
        // connect options rather than a one-off PRAGMA.
        let options = SqliteConnectOptions::from_str(database_url)?
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(20)
            .min_connections(1)
            .connect_with(options)
            .await?;

        Ok(Self { pool })
    }

    pub async fn run_migrations(&self) -> Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("./migrations").run(&self.pool).await
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    // User operations

    pub async fn create_user(&self, user: &User) -> ApiResult<()> {
        sqlx::query(
            "INSERT INTO users (id, email, display_name, role, password_hash, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&user.id)
        .bind(&user.email)
        .bind(&user.display_name)
        .bind(user.role.as_str())
        .bind(&user.password_hash)
        .bind(&user.created_at)
        .bind(&user.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn get_user_by_id(&self, id: &str) -> ApiResult<Option<User>> {
        let row = sqlx::query("SELECT * FROM users WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(|r| user_from_row(&r)).transpose()
    }

    pub async fn get_user_by_email(&self, email: &str) -> ApiResult<Option<User>> {
        let row = sqlx::query("SELECT * FROM users WHERE email = ?")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;

        row.map(|r| user_from_row(&r)).transpose()
    }

    pub async fn list_users(
        &self,
        limit: i64,
        offset: i64,
        role_filter: Option<UserRole>,
    ) -> ApiResult<(Vec<User>, i64)> {
        let (rows, total) = match role_filter {
            Some(role) => {
                let rows = sqlx::query(
                    "SELECT * FROM users WHERE role = ? ORDER BY display_name ASC LIMIT ? OFFSET ?",
                )
                .bind(role.as_str())
                .bind(limit)
                .bind(offset)
                .fetch_all(&self.pool)
                .await?;

                let total =
                    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users WHERE role = ?")
                        .bind(role.as_str())
                        .fetch_one(&self.pool)
                        .await?;

                (rows, total)
            }
            None => {
                let rows =
                    sqlx::query("SELECT * FROM users ORDER BY display_name ASC LIMIT ? OFFSET ?")
                        .bind(limit)
                        .bind(offset)
                        .fetch_all(&self.pool)
                        .await?;

                let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users")
                    .fetch_one(&self.pool)
                    .await?;

                (rows, total)
            }
        };

        let users = rows
            .iter()
            .map(user_from_row)
            .collect::<ApiResult<Vec<_>>>()?;

        Ok((users, total))
    }

    pub async fn update_user(
        &self,
        id: &str,
        display_name: Option<&str>,
        role: Option<UserRole>,
    ) -> ApiResult<()> {
        let current = self
            .get_user_by_id(id)
            .await?
            .ok_or_else(|| ApiError::NotFound(format!("User {} not found", id)))?;

        let updated_name = display_name.unwrap_or(&current.display_name);
        let updated_role = role.unwrap_or(current.role);
        let now = chrono::Utc::now().to_rfc3339();

        sqlx::query("UPDATE users SET display_name = ?, role = ?, updated_at = ? WHERE id = ?")
            .bind(updated_name)
            .bind(updated_role.as_str())
            .bind(&now)
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    pub async fn update_user_password(&self, id: &str, password_hash: &str) -> ApiResult<()> {
        let now = chrono::Utc::now().to_rfc3339();

        let result =
            sqlx::query("UPDATE users SET password_hash = ?, updated_at = ? WHERE id = ?")
                .bind(password_hash)
                .bind(&now)
                .bind(id)
                .execute(&self.pool)
                .await?;

        if result.rows_affected() == 0 {
            return Err(ApiError::NotFound(format!("User {} not found", id)));
        }

        Ok(())
    }

    pub async fn delete_user(&self, id: &str) -> ApiResult<()> {
        sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    pub async fn count_admins(&self) -> ApiResult<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users WHERE role = 'admin'")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

pub(crate) fn user_from_row(row: &SqliteRow) -> ApiResult<User> {
    let role_str: String = row.try_get("role")?;
    let role = UserRole::parse(&role_str)
        .ok_or_else(|| ApiError::Internal(format!("Unknown user role: {}", role_str)))?;

    Ok(User {
        id: row.try_get("id")?,
        email: row.try_get("email")?,
        display_name: row.try_get("display_name")?,
        role,
        password_hash: row.try_get("password_hash")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}
