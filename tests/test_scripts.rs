mod helpers;

use calldesk::models::Script;
use helpers::test_db::setup_test_db;

#[tokio::test]
async fn create_and_get_script() {
    let db = setup_test_db().await;

    let script = Script::new(
        "Abertura".to_string(),
        "atendimento".to_string(),
        "Bom dia, em que posso ajudar?".to_string(),
        1,
    );
    db.create_script(&script).await.unwrap();

    let fetched = db.get_script(&script.id).await.unwrap().unwrap();
    assert_eq!(fetched.title, "Abertura");
    assert_eq!(fetched.category, "atendimento");
    assert!(fetched.active);
}

#[tokio::test]
async fn list_orders_by_category_and_position() {
    let db = setup_test_db().await;

    let encerramento = Script::new(
        "Encerramento".to_string(),
        "atendimento".to_string(),
        "Posso ajudar em algo mais?".to_string(),
        2,
    );
    let abertura = Script::new(
        "Abertura".to_string(),
        "atendimento".to_string(),
        "Bom dia".to_string(),
        1,
    );
    let cobranca = Script::new(
        "Negociacao".to_string(),
        "cobranca".to_string(),
        "Sobre o seu contrato...".to_string(),
        1,
    );

    db.create_script(&encerramento).await.unwrap();
    db.create_script(&abertura).await.unwrap();
    db.create_script(&cobranca).await.unwrap();

    let all = db.list_scripts(None, true).await.unwrap();
    let titles: Vec<&str> = all.iter().map(|s| s.title.as_str()).collect();
    assert_eq!(titles, vec!["Abertura", "Encerramento", "Negociacao"]);

    let atendimento = db.list_scripts(Some("atendimento"), true).await.unwrap();
    assert_eq!(atendimento.len(), 2);
    assert_eq!(atendimento[0].title, "Abertura");
}

#[tokio::test]
async fn inactive_scripts_are_hidden_from_operators() {
    let db = setup_test_db().await;

    let script = Script::new(
        "Antigo".to_string(),
        "atendimento".to_string(),
        "Roteiro descontinuado".to_string(),
        1,
    );
    db.create_script(&script).await.unwrap();
    db.update_script(&script.id, None, None, None, None, Some(false))
        .await
        .unwrap();

    let visible = db.list_scripts(None, true).await.unwrap();
    assert!(visible.is_empty());

    let all = db.list_scripts(None, false).await.unwrap();
    assert_eq!(all.len(), 1);
    assert!(!all[0].active);
}

#[tokio::test]
async fn update_preserves_unchanged_fields() {
    let db = setup_test_db().await;

    let script = Script::new(
        "Abertura".to_string(),
        "atendimento".to_string(),
        "Bom dia".to_string(),
        1,
    );
    db.create_script(&script).await.unwrap();

    db.update_script(&script.id, Some("Abertura v2"), None, None, None, None)
        .await
        .unwrap();

    let updated = db.get_script(&script.id).await.unwrap().unwrap();
    assert_eq!(updated.title, "Abertura v2");
    assert_eq!(updated.category, "atendimento");
    assert_eq!(updated.body, "Bom dia");
}

#[tokio::test]
async fn delete_missing_script_is_not_found() {
    let db = setup_test_db().await;

    assert!(db.delete_script("missing").await.is_err());
}
