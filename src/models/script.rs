use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A call script shown to operators, ordered by position within its category.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Script {
    pub id: String,
    pub title: String,
    pub category: String,
    pub body: String,
    pub position: i64,
    pub active: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl Script {
    pub fn new(title: String, category: String, body: String, position: i64) -> Self {
        let now = chrono::Utc::now().to_rfc3339();
        Self {
            id: Uuid::new_v4().to_string(),
            title,
            category,
            body,
            position,
            active: true,
            created_at: now.clone(),
            updated_at: now,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateScriptRequest {
    pub title: String,
    pub category: String,
    pub body: String,
    #[serde(default)]
    pub position: i64,
}

#[derive(Debug, Deserialize)]
pub struct UpdateScriptRequest {
    pub title: Option<String>,
    pub category: Option<String>,
    pub body: Option<String>,
    pub position: Option<i64>,
    pub active: Option<bool>,
}

#[derive(Debug, Serialize)]
pub struct ScriptListResponse {
    pub scripts: Vec<Script>,
    pub count: i64,
}
