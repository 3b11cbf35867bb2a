use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use crate::{
    api::middleware::{ApiError, ApiResult, AppState, AuthenticatedUser},
    models::*,
};

pub async fn list_notes(
    State(state): State<AppState>,
    Extension(_auth_user): Extension<AuthenticatedUser>,
) -> ApiResult<Json<NoteListResponse>> {
    let notes = state.db.list_notes().await?;
    let count = notes.len() as i64;

    Ok(Json(NoteListResponse { notes, count }))
}

pub async fn create_note(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthenticatedUser>,
    Json(request): Json<CreateNoteRequest>,
) -> ApiResult<(StatusCode, Json<Note>)> {
    if request.title.trim().is_empty() {
        return Err(ApiError::BadRequest("Title is required".to_string()));
    }

    let note = Note::new(
        request.title.trim().to_string(),
        request.body,
        auth_user.user.id.clone(),
        request.pinned,
    );
    state.db.create_note(&note).await?;

    tracing::info!("Created note {} ({})", note.title, note.id);

    Ok((StatusCode::CREATED, Json(note)))
}

pub async fn get_note(
    State(state): State<AppState>,
    Extension(_auth_user): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
) -> ApiResult<Json<Note>> {
    let note = state
        .db
        .get_note(&id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Note not found".to_string()))?;

    Ok(Json(note))
}

pub async fn update_note(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
    Json(request): Json<UpdateNoteRequest>,
) -> ApiResult<Json<Note>> {
    let note = state
        .db
        .get_note(&id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Note not found".to_string()))?;

    if note.author_id != auth_user.user.id {
        auth_user.require_admin()?;
    }

    state
        .db
        .update_note(
            &id,
            request.title.as_deref(),
            request.body.as_deref(),
            request.pinned,
        )
        .await?;

    let updated = state
        .db
        .get_note(&id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Note not found".to_string()))?;

    Ok(Json(updated))
}

pub async fn delete_note(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    let note = state
        .db
        .get_note(&id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Note not found".to_string()))?;

    if note.author_id != auth_user.user.id {
        auth_user.require_admin()?;
    }

    state.db.delete_note(&id).await?;

    tracing::info!("Deleted note {}", id);

    Ok(StatusCode::NO_CONTENT)
}
