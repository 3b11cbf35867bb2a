use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Deserialize;
use crate::{
    api::middleware::{ApiError, ApiResult, AppState, AuthenticatedUser},
    models::*,
};

#[derive(Deserialize)]
pub struct ScriptListParams {
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub include_inactive: bool,
}

pub async fn list_scripts(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthenticatedUser>,
    Query(params): Query<ScriptListParams>,
) -> ApiResult<Json<ScriptListResponse>> {
    // Only admins see deactivated scripts.
    let active_only = !(params.include_inactive && auth_user.is_admin());

    let scripts = state
        .db
        .list_scripts(params.category.as_deref(), active_only)
        .await?;

    let count = scripts.len() as i64;
    Ok(Json(ScriptListResponse { scripts, count }))
}

pub async fn create_script(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthenticatedUser>,
    Json(request): Json<CreateScriptRequest>,
) -> ApiResult<(StatusCode, Json<Script>)> {
    auth_user.require_admin()?;

    if request.title.trim().is_empty() {
        return Err(ApiError::BadRequest("Title is required".to_string()));
    }
    if request.category.trim().is_empty() {
        return Err(ApiError::BadRequest("Category is required".to_string()));
    }

    let script = Script::new(
        request.title.trim().to_string(),
        request.category.trim().to_string(),
        request.body,
        request.position,
    );
    state.db.create_script(&script).await?;

    tracing::info!("Created script {} ({})", script.title, script.id);

    Ok((StatusCode::CREATED, Json(script)))
}

pub async fn get_script(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
) -> ApiResult<Json<Script>> {
    let script = state
        .db
        .get_script(&id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Script not found".to_string()))?;

    if !script.active && !auth_user.is_admin() {
        return Err(ApiError::NotFound("Script not found".to_string()));
    }

    Ok(Json(script))
}

pub async fn update_script(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
    Json(request): Json<UpdateScriptRequest>,
) -> ApiResult<Json<Script>> {
    auth_user.require_admin()?;

    state
        .db
        .update_script(
            &id,
            request.title.as_deref(),
            request.category.as_deref(),
            request.body.as_deref(),
            request.position,
            request.active,
        )
        .await?;

    let updated = state
        .db
        .get_script(&id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Script not found".to_string()))?;

    Ok(Json(updated))
}

pub async fn delete_script(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    auth_user.require_admin()?;

    state.db.delete_script(&id).await?;

    tracing::info!("Deleted script {}", id);

    Ok(StatusCode::NO_CONTENT)
}
