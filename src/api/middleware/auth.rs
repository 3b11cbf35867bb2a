use crate::{
    api::middleware::error::ApiError,
    database::Database,
    events::EventBus,
    models::{Session, SessionKind, User},
    services::{AuthRateLimiter, ConnectionManager, SlideStore},
};
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub session_duration_hours: i64,
    pub event_bus: EventBus,
    pub connection_manager: Arc<dyn ConnectionManager>,
    pub rate_limiter: AuthRateLimiter,
    pub slide_store: SlideStore,
}

/// Console user resolved from a Bearer token. Only operator sessions pass.
#[derive(Clone)]
pub struct AuthenticatedUser {
    pub user: User,
    pub session: Session,
    pub token: String,
}

impl AuthenticatedUser {
    pub fn is_admin(&self) -> bool {
        self.user.is_admin()
    }

    pub fn require_admin(&self) -> Result<(), ApiError> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(ApiError::Forbidden("Requires admin role".to_string()))
        }
    }
}

/// Chat identity resolved from a Bearer token: a logged-in operator or an
/// anonymous guest session.
#[derive(Clone)]
pub struct ChatParticipant {
    pub display_name: String,
    pub kind: SessionKind,
    pub session: Session,
}

fn bearer_token(request: &Request) -> Result<&str, ApiError> {
    let auth_header = request
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok());

    match auth_header.and_then(|v| v.strip_prefix("Bearer ")) {
        Some(token) => Ok(token),
        None => Err(ApiError::Unauthorized),
    }
}

async fn resolve_session(state: &AppState, token: &str) -> Result<Session, ApiError> {
    let session = state
        .db
        .get_session_by_token(token)
        .await?
        .ok_or(ApiError::Unauthorized)?;

    if session.is_expired() {
        state.db.delete_session(token).await.ok();
        return Err(ApiError::Unauthorized);
    }

    Ok(session)
}

/// Extract and validate an operator session from the Authorization header.
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = bearer_token(&request)?.to_string();
    let session = resolve_session(&state, &token).await?;

    if session.kind != SessionKind::Operator {
        return Err(ApiError::Unauthorized);
    }

    let user_id = session.user_id.as_deref().ok_or(ApiError::Unauthorized)?;
    let user = state
        .db
        .get_user_by_id(user_id)
        .await?
        .ok_or(ApiError::Unauthorized)?;

    // Sliding expiration
    let _ = state
        .db
        .touch_session(&token, state.session_duration_hours)
        .await;

    request.extensions_mut().insert(AuthenticatedUser {
        user,
        session,
        token,
    });

    Ok(next.run(request).await)
}

/// Extract a chat identity: operator sessions and anonymous guest sessions
/// both pass.
pub async fn require_chat_session(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = bearer_token(&request)?.to_string();
    let session = resolve_session(&state, &token).await?;

    let participant = match session.kind {
        SessionKind::Operator => {
            let user_id = session.user_id.as_deref().ok_or(ApiError::Unauthorized)?;
            let user = state
                .db
                .get_user_by_id(user_id)
                .await?
                .ok_or(ApiError::Unauthorized)?;

            ChatParticipant {
                display_name: user.display_name,
                kind: SessionKind::Operator,
                session,
            }
        }
        SessionKind::Guest => {
            let display_name = session
                .display_name
                .clone()
                .ok_or(ApiError::Unauthorized)?;

            ChatParticipant {
                display_name,
                kind: SessionKind::Guest,
                session,
            }
        }
    };

    request.extensions_mut().insert(participant);

    Ok(next.run(request).await)
}
