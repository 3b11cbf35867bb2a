mod helpers;

use calldesk::bootstrap;
use calldesk::config::Config;
use calldesk::models::{SessionKind, UserRole};
use calldesk::services::auth;
use helpers::test_db::{create_test_user, setup_test_db, TEST_PASSWORD};

fn test_config(email: &str) -> Config {
    Config {
        database_url: String::new(),
        server_host: "127.0.0.1".to_string(),
        server_port: 3000,
        admin_email: email.to_string(),
        admin_password: TEST_PASSWORD.to_string(),
        admin_display_name: "Administrator".to_string(),
        session_duration_hours: 9,
        presentations_dir: "./presentations".to_string(),
        slides_dir: "./slides".to_string(),
        service_name: "calldesk".to_string(),
    }
}

#[tokio::test]
async fn admin_is_created_once() {
    let db = setup_test_db().await;
    let config = test_config("admin@example.com");

    bootstrap::initialize_admin(&db, &config).await.unwrap();

    let admin = db
        .get_user_by_email("admin@example.com")
        .await
        .unwrap()
        .expect("admin should exist");
    assert_eq!(admin.role, UserRole::Admin);

    // Second run is a no-op, not a conflict.
    bootstrap::initialize_admin(&db, &config).await.unwrap();
    let (_, total) = db.list_users(10, 0, None).await.unwrap();
    assert_eq!(total, 1);
}

#[tokio::test]
async fn login_opens_operator_session() {
    let db = setup_test_db().await;
    let user = create_test_user(&db, "operator@example.com", UserRole::Operator).await;

    let result = auth::authenticate(&db, "operator@example.com", TEST_PASSWORD, 9)
        .await
        .unwrap();

    assert_eq!(result.user.id, user.id);
    assert_eq!(result.session.kind, SessionKind::Operator);
    assert!(!result.session.is_expired());

    let stored = db
        .get_session_by_token(&result.session.token)
        .await
        .unwrap()
        .expect("session should be persisted");
    assert_eq!(stored.user_id.as_deref(), Some(user.id.as_str()));
}

#[tokio::test]
async fn login_rejects_wrong_password() {
    let db = setup_test_db().await;
    create_test_user(&db, "operator@example.com", UserRole::Operator).await;

    let result = auth::authenticate(&db, "operator@example.com", "WrongP@ssw0rd1", 9).await;
    assert!(result.is_err());
}

#[tokio::test]
async fn login_rejects_unknown_email() {
    let db = setup_test_db().await;

    let result = auth::authenticate(&db, "ghost@example.com", TEST_PASSWORD, 9).await;
    assert!(result.is_err());
}

#[tokio::test]
async fn email_lookup_is_normalized() {
    let db = setup_test_db().await;
    create_test_user(&db, "operator@example.com", UserRole::Operator).await;

    let result = auth::authenticate(&db, "  Operator@Example.COM  ", TEST_PASSWORD, 9).await;
    assert!(result.is_ok());
}

#[tokio::test]
async fn guest_session_has_display_name_and_no_user() {
    let db = setup_test_db().await;

    let session = auth::create_guest_session(&db, "Visitante", 2).await.unwrap();

    assert_eq!(session.kind, SessionKind::Guest);
    assert!(session.user_id.is_none());
    assert_eq!(session.display_name.as_deref(), Some("Visitante"));

    let stored = db
        .get_session_by_token(&session.token)
        .await
        .unwrap()
        .expect("guest session should be persisted");
    assert_eq!(stored.kind, SessionKind::Guest);
}

#[tokio::test]
async fn guest_session_requires_display_name() {
    let db = setup_test_db().await;

    assert!(auth::create_guest_session(&db, "   ", 2).await.is_err());
    assert!(auth::create_guest_session(&db, &"x".repeat(65), 2).await.is_err());
}

#[tokio::test]
async fn expired_sessions_are_swept() {
    let db = setup_test_db().await;
    create_test_user(&db, "operator@example.com", UserRole::Operator).await;

    // One live session, one already expired.
    let live = auth::authenticate(&db, "operator@example.com", TEST_PASSWORD, 9)
        .await
        .unwrap();
    let expired = auth::create_guest_session(&db, "Visitante", -1).await.unwrap();

    let removed = db.delete_expired_sessions().await.unwrap();
    assert_eq!(removed, 1);

    assert!(db
        .get_session_by_token(&live.session.token)
        .await
        .unwrap()
        .is_some());
    assert!(db
        .get_session_by_token(&expired.token)
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn touch_session_extends_expiry() {
    let db = setup_test_db().await;
    create_test_user(&db, "operator@example.com", UserRole::Operator).await;

    let result = auth::authenticate(&db, "operator@example.com", TEST_PASSWORD, 1)
        .await
        .unwrap();

    db.touch_session(&result.session.token, 9).await.unwrap();

    let touched = db
        .get_session_by_token(&result.session.token)
        .await
        .unwrap()
        .unwrap();
    assert!(touched.expires_at > result.session.expires_at);
}
