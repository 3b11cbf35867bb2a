use axum::{extract::State, http::StatusCode, Extension, Json};
use crate::{
    api::middleware::{ApiError, ApiResult, AppState, AuthenticatedUser},
    events::SystemEvent,
    models::*,
    services,
};

pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    if let Err(wait) = state.rate_limiter.check(&request.email).await {
        tracing::warn!("Login rate limited for {}", request.email);
        return Err(ApiError::TooManyRequests(format!(
            "Too many login attempts. Retry in {} seconds",
            wait.as_secs().max(1)
        )));
    }

    let auth_result = services::auth::authenticate(
        &state.db,
        &request.email,
        &request.password,
        state.session_duration_hours,
    )
    .await
    .map_err(|e| {
        tracing::warn!("Login failed for {}", request.email);
        e
    })?;

    state.rate_limiter.reset(&request.email).await;

    state.event_bus.publish(SystemEvent::UserLoggedIn {
        user_id: auth_result.user.id.clone(),
        timestamp: chrono::Utc::now().to_rfc3339(),
    });

    tracing::info!("Login successful for user {}", auth_result.user.email);

    Ok(Json(LoginResponse {
        token: auth_result.session.token.clone(),
        expires_at: auth_result.session.expires_at.clone(),
        user: auth_result.user.into(),
    }))
}

pub async fn logout(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthenticatedUser>,
) -> ApiResult<StatusCode> {
    state.db.delete_session(&auth_user.token).await?;

    state.event_bus.publish(SystemEvent::UserLoggedOut {
        user_id: auth_user.user.id.clone(),
        timestamp: chrono::Utc::now().to_rfc3339(),
    });

    Ok(StatusCode::NO_CONTENT)
}

pub async fn get_session(
    Extension(auth_user): Extension<AuthenticatedUser>,
) -> ApiResult<Json<SessionResponse>> {
    Ok(Json(SessionResponse {
        id: auth_user.session.id.clone(),
        kind: auth_user.session.kind,
        expires_at: auth_user.session.expires_at.clone(),
        created_at: auth_user.session.created_at.clone(),
    }))
}

/// Anonymous chat session: a token bound to a display name only.
pub async fn create_chat_session(
    State(state): State<AppState>,
    Json(request): Json<CreateChatSessionRequest>,
) -> ApiResult<(StatusCode, Json<ChatSessionResponse>)> {
    let session = services::auth::create_guest_session(
        &state.db,
        &request.display_name,
        state.session_duration_hours,
    )
    .await?;

    tracing::info!("Guest chat session opened for {:?}", session.display_name);

    let display_name = session.display_name.clone().unwrap_or_default();
    Ok((
        StatusCode::CREATED,
        Json(ChatSessionResponse {
            token: session.token,
            kind: session.kind,
            display_name,
            expires_at: session.expires_at,
        }),
    ))
}
