mod common;

use rust_decimal_macros::dec;

use larder_api::events::Event;
use larder_api::services::stock_ledger::StockStatus;

use common::TestApp;

#[tokio::test]
async fn manual_adjustment_writes_ledger_and_emits_events() {
    let mut app = TestApp::with_events().await;
    let flour = app
        .seed_ingredient("Flour", "kg", dec!(30), dec!(10), None)
        .await;

    let change = app
        .services
        .stock_ledger
        .adjust_stock(flour.id, dec!(4), Some("spillage".to_string()), "ana")
        .await
        .expect("adjust");

    assert_eq!(change.previous_stock, dec!(30));
    assert_eq!(change.new_stock, dec!(4));

    let (movements, total) = app
        .services
        .stock_ledger
        .list_movements(Some(flour.id), None, 1, 20)
        .await
        .unwrap();
    assert_eq!(total, 1);
    assert_eq!(movements[0].movement_type, "adjustment");
    assert_eq!(movements[0].quantity, dec!(-26));
    assert_eq!(movements[0].notes.as_deref(), Some("spillage"));

    // 4 < 10 * 0.5: the adjustment left the ingredient critical.
    let events = app.drain_events();
    assert!(events.iter().any(|e| matches!(
        e,
        Event::LowStock { critical: true, ingredient_id, .. } if *ingredient_id == flour.id
    )));
    assert!(events
        .iter()
        .any(|e| matches!(e, Event::StockAdjusted { .. })));
}

#[tokio::test]
async fn overview_groups_by_storage_center_with_status_rollup() {
    let app = TestApp::new().await;
    app.seed_ingredient("Flour", "kg", dec!(30), dec!(10), None)
        .await;
    app.seed_ingredient("Sugar", "kg", dec!(8), dec!(10), None)
        .await;
    app.seed_ingredient("Salt", "kg", dec!(2), dec!(10), None)
        .await;
    app.seed_ingredient("Oil", "l", dec!(50), dec!(5), Some(dec!(40)))
        .await;

    let overview = app
        .services
        .stock_ledger
        .stock_overview()
        .await
        .expect("overview");

    assert_eq!(overview.summary.total_ingredients, 4);
    assert_eq!(overview.summary.ok, 1);
    assert_eq!(overview.summary.low, 1);
    assert_eq!(overview.summary.critical, 1);
    assert_eq!(overview.summary.excess, 1);

    // No ingredient has a storage center assigned yet.
    let unassigned = overview
        .by_storage_center
        .get("unassigned")
        .expect("unassigned group");
    assert_eq!(unassigned.len(), 4);
    let sugar = unassigned.iter().find(|r| r.name == "Sugar").unwrap();
    assert_eq!(sugar.status, StockStatus::Low);
}
