mod helpers;

use calldesk::models::{Channel, Message, SessionKind, UserRole};
use calldesk::services::auth;
use calldesk::services::connection_manager::{
    ChatEvent, ConnectionManager, InMemoryConnectionManager, MockConnectionManager,
};
use helpers::test_db::{create_test_user, setup_test_db, TEST_PASSWORD};
use tokio::sync::mpsc;
use tokio_test::assert_ok;

#[tokio::test]
async fn channel_crud() {
    let db = setup_test_db().await;

    let channel = Channel::new("geral".to_string(), Some("Canal geral".to_string()));
    db.create_channel(&channel).await.unwrap();

    let fetched = db.get_channel(&channel.id).await.unwrap().unwrap();
    assert_eq!(fetched.name, "geral");

    db.update_channel(&channel.id, Some("avisos"), Some(None))
        .await
        .unwrap();
    let updated = db.get_channel(&channel.id).await.unwrap().unwrap();
    assert_eq!(updated.name, "avisos");
    assert!(updated.description.is_none());

    db.delete_channel(&channel.id).await.unwrap();
    assert!(db.get_channel(&channel.id).await.unwrap().is_none());
}

#[tokio::test]
async fn duplicate_channel_name_conflicts() {
    let db = setup_test_db().await;

    db.create_channel(&Channel::new("geral".to_string(), None))
        .await
        .unwrap();
    let duplicate = db
        .create_channel(&Channel::new("geral".to_string(), None))
        .await;
    assert!(duplicate.is_err());
}

#[tokio::test]
async fn messages_list_in_chronological_order() {
    let db = setup_test_db().await;

    let channel = Channel::new("geral".to_string(), None);
    db.create_channel(&channel).await.unwrap();

    for (i, body) in ["primeira", "segunda", "terceira"].iter().enumerate() {
        let mut message = Message::new(
            channel.id.clone(),
            "Ana".to_string(),
            SessionKind::Operator,
            body.to_string(),
        );
        // Distinct timestamps so ordering is deterministic.
        message.created_at = format!("2026-02-02T10:00:0{}Z", i);
        db.create_message(&message).await.unwrap();
    }

    let (messages, total) = db.list_messages(&channel.id, 10, 0).await.unwrap();
    assert_eq!(total, 3);
    let bodies: Vec<&str> = messages.iter().map(|m| m.body.as_str()).collect();
    assert_eq!(bodies, vec!["primeira", "segunda", "terceira"]);

    // Pagination keeps the order.
    let (page, _) = db.list_messages(&channel.id, 2, 1).await.unwrap();
    assert_eq!(page[0].body, "segunda");
}

#[tokio::test]
async fn deleting_channel_removes_messages() {
    let db = setup_test_db().await;

    let channel = Channel::new("geral".to_string(), None);
    db.create_channel(&channel).await.unwrap();

    let message = Message::new(
        channel.id.clone(),
        "Visitante".to_string(),
        SessionKind::Guest,
        "ola".to_string(),
    );
    db.create_message(&message).await.unwrap();

    db.delete_channel(&channel.id).await.unwrap();

    let (messages, total) = db.list_messages(&channel.id, 10, 0).await.unwrap();
    assert!(messages.is_empty());
    assert_eq!(total, 0);
}

#[tokio::test]
async fn guest_and_operator_author_kinds_round_trip() {
    let db = setup_test_db().await;
    create_test_user(&db, "ana@example.com", UserRole::Operator).await;

    let channel = Channel::new("suporte".to_string(), None);
    db.create_channel(&channel).await.unwrap();

    let guest_session = auth::create_guest_session(&db, "Visitante", 2).await.unwrap();
    let operator_session = auth::authenticate(&db, "ana@example.com", TEST_PASSWORD, 9)
        .await
        .unwrap()
        .session;
    assert_eq!(guest_session.kind, SessionKind::Guest);
    assert_eq!(operator_session.kind, SessionKind::Operator);

    for (name, kind) in [
        ("Visitante", SessionKind::Guest),
        ("Ana", SessionKind::Operator),
    ] {
        let message = Message::new(
            channel.id.clone(),
            name.to_string(),
            kind,
            "mensagem".to_string(),
        );
        db.create_message(&message).await.unwrap();
    }

    let (messages, _) = db.list_messages(&channel.id, 10, 0).await.unwrap();
    assert_eq!(messages.len(), 2);
    assert!(messages
        .iter()
        .any(|m| m.author_kind == SessionKind::Guest && m.author_name == "Visitante"));
    assert!(messages
        .iter()
        .any(|m| m.author_kind == SessionKind::Operator && m.author_name == "Ana"));
}

#[tokio::test]
async fn broadcast_delivers_posted_message_to_subscribers() {
    let manager = InMemoryConnectionManager::new();
    let (tx, mut rx) = mpsc::channel(10);
    manager.subscribe("channel-1", "sub-1", tx).await;

    let message = Message::new(
        "channel-1".to_string(),
        "Ana".to_string(),
        SessionKind::Operator,
        "bom dia".to_string(),
    );
    let delivered = manager
        .broadcast("channel-1", ChatEvent::from(&message))
        .await;
    assert_eq!(delivered, 1);

    let event = tokio_test::assert_ok!(rx.try_recv());
    assert_eq!(event.message_id, message.id);
    assert_eq!(event.body, "bom dia");
    assert_eq!(event.author_kind, SessionKind::Operator);
}

#[tokio::test]
async fn mock_manager_records_instead_of_delivering() {
    let manager = MockConnectionManager::new();

    let message = Message::new(
        "channel-1".to_string(),
        "Visitante".to_string(),
        SessionKind::Guest,
        "ola".to_string(),
    );
    manager
        .broadcast("channel-1", ChatEvent::from(&message))
        .await;

    let recorded = manager.recorded_broadcasts().await;
    assert_eq!(recorded.len(), 1);
    assert_eq!(recorded[0].0, "channel-1");
    assert_eq!(recorded[0].1.author_name, "Visitante");
}
