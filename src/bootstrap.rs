use crate::api::middleware::{ApiResult, AppState};
use crate::config::Config;
use crate::database::Database;
use crate::events::{EventBus, SystemEvent};
use crate::models::{User, UserRole};
use crate::services::{
    self, AuthRateLimiter, ConnectionManager, InMemoryConnectionManager, SlideStore,
};
use std::sync::Arc;
use std::time::Duration;

/// Create the admin account from configuration if it does not exist yet.
pub async fn initialize_admin(db: &Database, config: &Config) -> ApiResult<()> {
    let email = services::validators::validate_and_normalize_email(&config.admin_email)?;

    if let Some(existing) = db.get_user_by_email(&email).await? {
        tracing::info!("Admin user already present ({})", existing.email);
        return Ok(());
    }

    services::auth::validate_password_complexity(&config.admin_password)?;
    let password_hash = services::auth::hash_password(&config.admin_password)?;

    let admin = User::new(
        email,
        config.admin_display_name.clone(),
        UserRole::Admin,
        password_hash,
    );
    db.create_user(&admin).await?;

    tracing::info!("Admin user created ({})", admin.email);
    Ok(())
}

/// Build application state and start background services.
pub async fn build_app_state(db: Database, config: &Config) -> ApiResult<AppState> {
    let event_bus = EventBus::new(100);
    tracing::info!("Event bus initialized with capacity 100");

    let connection_manager: Arc<dyn ConnectionManager> = Arc::new(InMemoryConnectionManager::new());
    tracing::info!("Connection manager initialized");

    let rate_limiter = AuthRateLimiter::new();
    tracing::info!("Rate limiter initialized (5 attempts per 15 minutes)");

    let slide_store = SlideStore::new(&config.presentations_dir, &config.slides_dir);
    slide_store.ensure_dirs().await?;
    tracing::info!(
        "Slide store initialized (presentations: {}, slides: {})",
        config.presentations_dir,
        config.slides_dir
    );

    spawn_audit_listener(&event_bus);
    spawn_session_sweeper(db.clone());

    Ok(AppState {
        db,
        session_duration_hours: config.session_duration_hours,
        event_bus,
        connection_manager,
        rate_limiter,
        slide_store,
    })
}

/// Log every system event for the audit trail.
fn spawn_audit_listener(event_bus: &EventBus) {
    let mut rx = event_bus.subscribe();

    tokio::spawn(async move {
        loop {
            match rx.recv().await {
                Ok(SystemEvent::UserLoggedIn { user_id, timestamp }) => {
                    tracing::info!("audit: user {} logged in at {}", user_id, timestamp);
                }
                Ok(SystemEvent::UserLoggedOut { user_id, timestamp }) => {
                    tracing::info!("audit: user {} logged out at {}", user_id, timestamp);
                }
                Ok(SystemEvent::MessagePosted {
                    message_id,
                    channel_id,
                    author_kind,
                    ..
                }) => {
                    tracing::info!(
                        "audit: message {} posted to {} by {}",
                        message_id,
                        channel_id,
                        author_kind
                    );
                }
                Ok(SystemEvent::TabulationRecorded {
                    tabulation_id,
                    operator_id,
                    product,
                    promise_date,
                    ..
                }) => {
                    tracing::info!(
                        "audit: tabulation {} by {} ({}, promise {})",
                        tabulation_id,
                        operator_id,
                        product,
                        promise_date
                    );
                }
                Err(tokio::sync::broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::warn!("Audit listener lagged, {} events skipped", skipped);
                }
                Err(tokio::sync::broadcast::error::RecvError::Closed) => break,
            }
        }
    });
}

/// Periodically delete expired sessions.
fn spawn_session_sweeper(db: Database) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(3600));
        loop {
            interval.tick().await;
            match db.delete_expired_sessions().await {
                Ok(0) => {}
                Ok(removed) => tracing::info!("Removed {} expired sessions", removed),
                Err(e) => tracing::error!("Failed to sweep expired sessions: {}", e),
            }
        }
    });
}
