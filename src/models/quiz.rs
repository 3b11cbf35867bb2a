use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizQuestion {
    pub prompt: String,
    pub options: Vec<String>,
    /// Index into `options`.
    pub answer: usize,
}

/// Training quiz for operators. Questions are stored as a JSON column.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Quiz {
    pub id: String,
    pub title: String,
    pub questions: Vec<QuizQuestion>,
    pub active: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl Quiz {
    pub fn new(title: String, questions: Vec<QuizQuestion>) -> Self {
        let now = chrono::Utc::now().to_rfc3339();
        Self {
            id: Uuid::new_v4().to_string(),
            title,
            questions,
            active: true,
            created_at: now.clone(),
            updated_at: now,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateQuizRequest {
    pub title: String,
    pub questions: Vec<QuizQuestion>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateQuizRequest {
    pub title: Option<String>,
    pub questions: Option<Vec<QuizQuestion>>,
    pub active: Option<bool>,
}

#[derive(Debug, Serialize)]
pub struct QuizListResponse {
    pub quizzes: Vec<Quiz>,
    pub count: i64,
}

/// Validate that every question has at least two options and an in-range
/// answer index.
pub fn validate_questions(questions: &[QuizQuestion]) -> Result<(), String> {
    if questions.is_empty() {
        return Err("Quiz must have at least one question".to_string());
    }
    for (i, q) in questions.iter().enumerate() {
        if q.prompt.trim().is_empty() {
            return Err(format!("Question {} has an empty prompt", i + 1));
        }
        if q.options.len() < 2 {
            return Err(format!("Question {} must have at least two options", i + 1));
        }
        if q.answer >= q.options.len() {
            return Err(format!("Question {} answer index out of range", i + 1));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(answer: usize) -> QuizQuestion {
        QuizQuestion {
            prompt: "Qual o prazo do cartao?".to_string(),
            options: vec!["6 dias uteis".to_string(), "9 dias uteis".to_string()],
            answer,
        }
    }

    #[test]
    fn valid_quiz_passes() {
        assert!(validate_questions(&[question(0)]).is_ok());
    }

    #[test]
    fn empty_quiz_rejected() {
        assert!(validate_questions(&[]).is_err());
    }

    #[test]
    fn out_of_range_answer_rejected() {
        assert!(validate_questions(&[question(2)]).is_err());
    }

    #[test]
    fn questions_round_trip_through_json() {
        let quiz = Quiz::new("Prazos".to_string(), vec![question(0)]);
        let encoded = serde_json::to_string(&quiz.questions).unwrap();
        let decoded: Vec<QuizQuestion> = serde_json::from_str(&encoded).unwrap();
        assert_eq!(decoded.len(), 1);
        assert_eq!(decoded[0].answer, 0);
    }
}
