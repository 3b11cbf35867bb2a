use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use crate::{
    api::middleware::{ApiError, ApiResult, AppState, AuthenticatedUser},
    models::*,
};

pub async fn list_quizzes(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthenticatedUser>,
) -> ApiResult<Json<QuizListResponse>> {
    // Operators only see active quizzes.
    let quizzes = state.db.list_quizzes(!auth_user.is_admin()).await?;
    let count = quizzes.len() as i64;

    Ok(Json(QuizListResponse { quizzes, count }))
}

pub async fn create_quiz(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthenticatedUser>,
    Json(request): Json<CreateQuizRequest>,
) -> ApiResult<(StatusCode, Json<Quiz>)> {
    auth_user.require_admin()?;

    if request.title.trim().is_empty() {
        return Err(ApiError::BadRequest("Title is required".to_string()));
    }
    validate_questions(&request.questions).map_err(ApiError::BadRequest)?;

    let quiz = Quiz::new(request.title.trim().to_string(), request.questions);
    state.db.create_quiz(&quiz).await?;

    tracing::info!("Created quiz {} ({})", quiz.title, quiz.id);

    Ok((StatusCode::CREATED, Json(quiz)))
}

pub async fn get_quiz(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
) -> ApiResult<Json<Quiz>> {
    let quiz = state
        .db
        .get_quiz(&id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Quiz not found".to_string()))?;

    if !quiz.active && !auth_user.is_admin() {
        return Err(ApiError::NotFound("Quiz not found".to_string()));
    }

    Ok(Json(quiz))
}

pub async fn update_quiz(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
    Json(request): Json<UpdateQuizRequest>,
) -> ApiResult<Json<Quiz>> {
    auth_user.require_admin()?;

    if let Some(ref questions) = request.questions {
        validate_questions(questions).map_err(ApiError::BadRequest)?;
    }

    state
        .db
        .update_quiz(
            &id,
            request.title.as_deref(),
            request.questions.as_deref(),
            request.active,
        )
        .await?;

    let updated = state
        .db
        .get_quiz(&id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Quiz not found".to_string()))?;

    Ok(Json(updated))
}

pub async fn delete_quiz(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    auth_user.require_admin()?;

    state.db.delete_quiz(&id).await?;

    tracing::info!("Deleted quiz {}", id);

    Ok(StatusCode::NO_CONTENT)
}
