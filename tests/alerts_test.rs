mod common;

use uuid::Uuid;

use larder_api::services::alerts::AlertDraft;

use common::TestApp;

fn low_stock_draft(ingredient_id: Uuid, message: &str) -> AlertDraft {
    AlertDraft {
        alert_type: "stock_low".to_string(),
        priority: "medium".to_string(),
        title: "Flour is running low".to_string(),
        message: message.to_string(),
        ingredient_id: Some(ingredient_id),
        receiving_id: None,
    }
}

#[tokio::test]
async fn repeated_low_stock_alerts_collapse_onto_open_row() {
    let app = TestApp::new().await;
    let ingredient_id = Uuid::new_v4();

    let first = app
        .services
        .alerts
        .record(low_stock_draft(ingredient_id, "stock at 8"))
        .await
        .expect("first alert");
    let second = app
        .services
        .alerts
        .record(low_stock_draft(ingredient_id, "stock at 6"))
        .await
        .expect("second alert");

    assert_eq!(first.id, second.id);
    assert_eq!(second.message, "stock at 6");

    let (alerts, total) = app
        .services
        .alerts
        .list_alerts(Some("active".to_string()), 1, 20)
        .await
        .unwrap();
    assert_eq!(total, 1);
    assert_eq!(alerts.len(), 1);
}

#[tokio::test]
async fn resolving_closes_the_alert_and_allows_a_new_one() {
    let app = TestApp::new().await;
    let ingredient_id = Uuid::new_v4();

    let alert = app
        .services
        .alerts
        .record(low_stock_draft(ingredient_id, "stock at 8"))
        .await
        .unwrap();

    let resolved = app
        .services
        .alerts
        .resolve_alert(alert.id)
        .await
        .expect("resolve");
    assert_eq!(resolved.status, "resolved");
    assert!(resolved.resolved_at.is_some());

    // Resolving twice is rejected.
    assert!(app.services.alerts.resolve_alert(alert.id).await.is_err());

    // A fresh occurrence opens a new row instead of reviving the old one.
    let fresh = app
        .services
        .alerts
        .record(low_stock_draft(ingredient_id, "stock at 4"))
        .await
        .unwrap();
    assert_ne!(fresh.id, alert.id);
}
