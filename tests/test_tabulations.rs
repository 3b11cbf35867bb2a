mod helpers;

use calldesk::models::{ProductType, Tabulation, UserRole};
use calldesk::services::business_days;
use chrono::NaiveDate;
use helpers::test_db::{create_test_user, setup_test_db};

fn promise_for(anchor: (i32, u32, u32), product: ProductType) -> String {
    let anchor = NaiveDate::from_ymd_opt(anchor.0, anchor.1, anchor.2).unwrap();
    business_days::promise_date_from(anchor, product)
        .format("%Y-%m-%d")
        .to_string()
}

#[tokio::test]
async fn record_and_fetch_tabulation() {
    let db = setup_test_db().await;
    let operator = create_test_user(&db, "operator@example.com", UserRole::Operator).await;

    let tabulation = Tabulation::new(
        operator.id.clone(),
        ProductType::Cartao,
        "atendido".to_string(),
        Some("cliente informado do prazo".to_string()),
        promise_for((2025, 12, 23), ProductType::Cartao),
    );
    db.create_tabulation(&tabulation).await.unwrap();

    let fetched = db.get_tabulation(&tabulation.id).await.unwrap().unwrap();
    assert_eq!(fetched.operator_id, operator.id);
    assert_eq!(fetched.product, ProductType::Cartao);
    assert_eq!(fetched.promise_date, "2026-01-02");
}

#[tokio::test]
async fn list_filters_by_operator_and_product() {
    let db = setup_test_db().await;
    let ana = create_test_user(&db, "ana@example.com", UserRole::Operator).await;
    let bruno = create_test_user(&db, "bruno@example.com", UserRole::Operator).await;

    for (operator, product) in [
        (&ana, ProductType::Cartao),
        (&ana, ProductType::Comercial),
        (&bruno, ProductType::Cartao),
    ] {
        let tabulation = Tabulation::new(
            operator.id.clone(),
            product,
            "atendido".to_string(),
            None,
            promise_for((2025, 12, 23), product),
        );
        db.create_tabulation(&tabulation).await.unwrap();
    }

    let (all, total) = db.list_tabulations(None, None, 10, 0).await.unwrap();
    assert_eq!(total, 3);
    assert_eq!(all.len(), 3);

    let (ana_only, total) = db
        .list_tabulations(Some(&ana.id), None, 10, 0)
        .await
        .unwrap();
    assert_eq!(total, 2);
    assert!(ana_only.iter().all(|t| t.operator_id == ana.id));

    let (cartao_only, total) = db
        .list_tabulations(None, Some(ProductType::Cartao), 10, 0)
        .await
        .unwrap();
    assert_eq!(total, 2);
    assert!(cartao_only.iter().all(|t| t.product == ProductType::Cartao));

    let (ana_cartao, total) = db
        .list_tabulations(Some(&ana.id), Some(ProductType::Cartao), 10, 0)
        .await
        .unwrap();
    assert_eq!(total, 1);
    assert_eq!(ana_cartao[0].operator_id, ana.id);
}

#[tokio::test]
async fn promise_dates_follow_product_allowance() {
    // Anchored at a plain Monday with no holidays in range.
    assert_eq!(
        promise_for((2025, 8, 4), ProductType::Cartao),
        "2025-08-12"
    );
    assert_eq!(
        promise_for((2025, 8, 4), ProductType::Comercial),
        "2025-08-15"
    );
    assert_eq!(
        promise_for((2025, 8, 4), ProductType::Habitacional),
        "2025-08-15"
    );
}

#[tokio::test]
async fn delete_tabulation() {
    let db = setup_test_db().await;
    let operator = create_test_user(&db, "operator@example.com", UserRole::Operator).await;

    let tabulation = Tabulation::new(
        operator.id.clone(),
        ProductType::Habitacional,
        "retorno agendado".to_string(),
        None,
        promise_for((2025, 8, 4), ProductType::Habitacional),
    );
    db.create_tabulation(&tabulation).await.unwrap();

    db.delete_tabulation(&tabulation.id).await.unwrap();
    assert!(db.get_tabulation(&tabulation.id).await.unwrap().is_none());
    assert!(db.delete_tabulation(&tabulation.id).await.is_err());
}
