use crate::{
    api::middleware::error::{ApiError, ApiResult},
    database::Database,
    models::{Quiz, QuizQuestion},
};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

impl Database {
    pub async fn create_quiz(&self, quiz: &Quiz) -> ApiResult<()> {
        let questions = encode_questions(&quiz.questions)?;

        sqlx::query(
            "INSERT INTO quizzes (id, title, questions, active, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(&quiz.id)
        .bind(&quiz.title)
        .bind(&questions)
        .bind(quiz.active)
        .bind(&quiz.created_at)
        .bind(&quiz.updated_at)
        .execute(self.pool())
        .await?;

        Ok(())
    }

    pub async fn get_quiz(&self, id: &str) -> ApiResult<Option<Quiz>> {
        let row = sqlx::query("SELECT * FROM quizzes WHERE id = ?")
            .bind(id)
            .fetch_optional(self.pool())
            .await?;

        row.map(|r| quiz_from_row(&r)).transpose()
    }

    pub async fn list_quizzes(&self, active_only: bool) -> ApiResult<Vec<Quiz>> {
        let rows = sqlx::query(
            "SELECT * FROM quizzes WHERE (active = 1 OR ? = 0) ORDER BY created_at DESC",
        )
        .bind(active_only)
        .fetch_all(self.pool())
        .await?;

        rows.iter().map(quiz_from_row).collect()
    }

    pub async fn update_quiz(
        &self,
        id: &str,
        title: Option<&str>,
        questions: Option<&[QuizQuestion]>,
        active: Option<bool>,
    ) -> ApiResult<()> {
        let current = self
            .get_quiz(id)
            .await?
            .ok_or_else(|| ApiError::NotFound(format!("Quiz {} not found", id)))?;

        let encoded = match questions {
            Some(questions) => encode_questions(questions)?,
            None => encode_questions(&current.questions)?,
        };
        let now = chrono::Utc::now().to_rfc3339();

        sqlx::query(
            "UPDATE quizzes SET title = ?, questions = ?, active = ?, updated_at = ? WHERE id = ?",
        )
        .bind(title.unwrap_or(&current.title))
        .bind(&encoded)
        .bind(active.unwrap_or(current.active))
        .bind(&now)
        .bind(id)
        .execute(self.pool())
        .await?;

        Ok(())
    }

    pub async fn delete_quiz(&self, id: &str) -> ApiResult<()> {
        let result = sqlx::query("DELETE FROM quizzes WHERE id = ?")
            .bind(id)
            .execute(self.pool())
            .await?;

        if result.rows_affected() == 0 {
            return Err(ApiError::NotFound(format!("Quiz {} not found", id)));
        }

        Ok(())
    }
}

fn encode_questions(questions: &[QuizQuestion]) -> ApiResult<String> {
    serde_json::to_string(questions)
        .map_err(|e| ApiError::Internal(format!("Failed to encode quiz questions: {}", e)))
}

fn quiz_from_row(row: &SqliteRow) -> ApiResult<Quiz> {
    let questions_json: String = row.try_get("questions")?;
    let questions: Vec<QuizQuestion> = serde_json::from_str(&questions_json)
        .map_err(|e| ApiError::Internal(format!("Corrupt quiz questions: {}", e)))?;

    Ok(Quiz {
        id: row.try_get("id")?,
        title: row.try_get("title")?,
        questions,
        active: row.try_get("active")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}
