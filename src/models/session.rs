use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Whether a session belongs to a logged-in console user or to an anonymous
/// chat participant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionKind {
    Operator,
    Guest,
}

impl SessionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionKind::Operator => "operator",
            SessionKind::Guest => "guest",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "operator" => Some(SessionKind::Operator),
            "guest" => Some(SessionKind::Guest),
            _ => None,
        }
    }
}

impl fmt::Display for SessionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub id: String,
    /// None for guest chat sessions.
    pub user_id: Option<String>,
    pub token: String,
    pub kind: SessionKind,
    /// Display name chosen at creation time; only set for guest sessions.
    pub display_name: Option<String>,
    pub expires_at: String,
    pub created_at: String,
}

impl Session {
    pub fn new(user_id: String, token: String, duration_hours: i64) -> Self {
        Self::build(Some(user_id), token, SessionKind::Operator, None, duration_hours)
    }

    pub fn new_guest(token: String, display_name: String, duration_hours: i64) -> Self {
        Self::build(None, token, SessionKind::Guest, Some(display_name), duration_hours)
    }

    fn build(
        user_id: Option<String>,
        token: String,
        kind: SessionKind,
        display_name: Option<String>,
        duration_hours: i64,
    ) -> Self {
        let now = time::OffsetDateTime::now_utc();
        let expires_at = now + time::Duration::hours(duration_hours);

        Self {
            id: Uuid::new_v4().to_string(),
            user_id,
            token,
            kind,
            display_name,
            expires_at: expires_at
                .format(&time::format_description::well_known::Rfc3339)
                .unwrap(),
            created_at: now
                .format(&time::format_description::well_known::Rfc3339)
                .unwrap(),
        }
    }

    pub fn is_expired(&self) -> bool {
        if let Ok(expires_at) = time::OffsetDateTime::parse(
            &self.expires_at,
            &time::format_description::well_known::Rfc3339,
        ) {
            expires_at < time::OffsetDateTime::now_utc()
        } else {
            true
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub expires_at: String,
    pub user: crate::models::user::UserResponse,
}

#[derive(Debug, Deserialize)]
pub struct CreateChatSessionRequest {
    pub display_name: String,
}

#[derive(Debug, Serialize)]
pub struct ChatSessionResponse {
    pub token: String,
    pub kind: SessionKind,
    pub display_name: String,
    pub expires_at: String,
}

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub id: String,
    pub kind: SessionKind,
    pub expires_at: String,
    pub created_at: String,
}
