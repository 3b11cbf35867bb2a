use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Deserialize;
use crate::{
    api::middleware::{ApiError, ApiResult, AppState, AuthenticatedUser},
    models::*,
    services,
};

#[derive(Deserialize)]
pub struct UserListParams {
    #[serde(default = "default_page")]
    pub page: i64,
    #[serde(default = "default_per_page")]
    pub per_page: i64,
    #[serde(default)]
    pub role: Option<String>,
}

fn default_page() -> i64 {
    1
}

fn default_per_page() -> i64 {
    20
}

pub async fn list_users(
    State(state): State<AppState>,
    Extension(_auth_user): Extension<AuthenticatedUser>,
    Query(params): Query<UserListParams>,
) -> ApiResult<Json<UserListResponse>> {
    let page = params.page.max(1);
    let per_page = params.per_page.clamp(1, 100);
    let offset = (page - 1) * per_page;

    let role_filter = match params.role.as_deref() {
        Some(role_str) => Some(
            UserRole::parse(role_str)
                .ok_or_else(|| ApiError::BadRequest(format!("Unknown role: {}", role_str)))?,
        ),
        None => None,
    };

    let (users, total_count) = state.db.list_users(per_page, offset, role_filter).await?;
    let total_pages = (total_count + per_page - 1) / per_page;

    Ok(Json(UserListResponse {
        users: users.into_iter().map(UserResponse::from).collect(),
        pagination: PaginationMetadata {
            page,
            per_page,
            total_count,
            total_pages,
        },
    }))
}

pub async fn create_user(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthenticatedUser>,
    Json(request): Json<CreateUserRequest>,
) -> ApiResult<(StatusCode, Json<UserResponse>)> {
    auth_user.require_admin()?;

    let email = services::validators::validate_and_normalize_email(&request.email)?;
    services::auth::validate_password_complexity(&request.password)?;

    let display_name = request.display_name.trim();
    if display_name.is_empty() {
        return Err(ApiError::BadRequest("Display name is required".to_string()));
    }

    if state.db.get_user_by_email(&email).await?.is_some() {
        return Err(ApiError::Conflict("Email already exists".to_string()));
    }

    let password_hash = services::auth::hash_password(&request.password)?;
    let user = User::new(email, display_name.to_string(), request.role, password_hash);
    state.db.create_user(&user).await?;

    tracing::info!("Created {} account {} ({})", user.role, user.email, user.id);

    Ok((StatusCode::CREATED, Json(user.into())))
}

pub async fn get_user(
    State(state): State<AppState>,
    Extension(_auth_user): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
) -> ApiResult<Json<UserResponse>> {
    let user = state
        .db
        .get_user_by_id(&id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    Ok(Json(user.into()))
}

pub async fn update_user(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
    Json(request): Json<UpdateUserRequest>,
) -> ApiResult<Json<UserResponse>> {
    auth_user.require_admin()?;

    let user = state
        .db
        .get_user_by_id(&id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    // Demoting the last admin would lock everyone out of administration.
    if user.is_admin()
        && request.role == Some(UserRole::Operator)
        && state.db.count_admins().await? <= 1
    {
        return Err(ApiError::BadRequest(
            "Cannot demote the last admin".to_string(),
        ));
    }

    state
        .db
        .update_user(&id, request.display_name.as_deref(), request.role)
        .await?;

    let updated = state
        .db
        .get_user_by_id(&id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    Ok(Json(updated.into()))
}

pub async fn change_password(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
    Json(request): Json<ChangePasswordRequest>,
) -> ApiResult<StatusCode> {
    let user = state
        .db
        .get_user_by_id(&id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    if auth_user.user.id == user.id {
        // Self-service change requires the current password.
        let current = request
            .current_password
            .as_deref()
            .ok_or_else(|| ApiError::BadRequest("Current password is required".to_string()))?;

        if !services::auth::verify_password(current, &user.password_hash)? {
            return Err(ApiError::Unauthorized);
        }
    } else {
        auth_user.require_admin()?;
    }

    services::auth::validate_password_complexity(&request.new_password)?;

    let password_hash = services::auth::hash_password(&request.new_password)?;
    state.db.update_user_password(&id, &password_hash).await?;

    tracing::info!("Password changed for user {}", id);

    Ok(StatusCode::NO_CONTENT)
}

pub async fn delete_user(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    auth_user.require_admin()?;

    let user = state
        .db
        .get_user_by_id(&id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    if user.is_admin() && state.db.count_admins().await? <= 1 {
        return Err(ApiError::BadRequest(
            "Cannot remove the last admin".to_string(),
        ));
    }

    state.db.delete_user(&id).await?;

    tracing::info!("Deleted user {}", id);

    Ok(StatusCode::NO_CONTENT)
}
