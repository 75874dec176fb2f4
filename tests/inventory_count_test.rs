mod common;

use assert_matches::assert_matches;
use rust_decimal_macros::dec;
use sea_orm::EntityTrait;

use larder_api::entities::{ingredient, inventory_count::InventoryCountStatus, stock_movement};
use larder_api::errors::ServiceError;
use larder_api::services::inventory_counts::{CountItemInput, StartInventoryCount};

use common::TestApp;

fn start_input(
    center: &str,
    items: Vec<CountItemInput>,
) -> StartInventoryCount {
    StartInventoryCount {
        count_type: "weekly".to_string(),
        storage_center: center.to_string(),
        counted_by: "diego".to_string(),
        notes: None,
        items,
    }
}

#[tokio::test]
async fn starting_a_count_snapshots_system_quantities() {
    let app = TestApp::new().await;
    app.seed_center("dry_storage", "Dry Storage").await;
    let rice = app
        .seed_ingredient("Rice", "kg", dec!(20), dec!(5), None)
        .await;
    let beans = app
        .seed_ingredient("Beans", "kg", dec!(10), dec!(5), None)
        .await;

    let (count, items) = app
        .services
        .inventory_counts
        .start_count(start_input(
            "dry_storage",
            vec![
                CountItemInput {
                    ingredient_id: rice.id,
                    counted_qty: dec!(18),
                    notes: None,
                },
                CountItemInput {
                    ingredient_id: beans.id,
                    counted_qty: dec!(11),
                    notes: None,
                },
            ],
        ))
        .await
        .expect("start count");

    assert_eq!(count.status, InventoryCountStatus::InProgress);
    // |18-20| + |11-10|
    assert_eq!(count.total_differences, dec!(3));
    assert_eq!(items.len(), 2);
    assert_eq!(items[0].system_qty, dec!(20));
    assert_eq!(items[0].difference, dec!(-2));
    assert_eq!(items[1].difference, dec!(1));

    // Starting a count does not touch stock.
    let ing = ingredient::Entity::find_by_id(rice.id)
        .one(&*app.db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(ing.current_stock, dec!(20));
}

#[tokio::test]
async fn completing_a_count_sets_balances_to_counted_quantities() {
    let app = TestApp::new().await;
    app.seed_center("dry_storage", "Dry Storage").await;
    let rice = app
        .seed_ingredient("Rice", "kg", dec!(20), dec!(5), None)
        .await;
    let beans = app
        .seed_ingredient("Beans", "kg", dec!(10), dec!(5), None)
        .await;

    let (count, _) = app
        .services
        .inventory_counts
        .start_count(start_input(
            "dry_storage",
            vec![
                CountItemInput {
                    ingredient_id: rice.id,
                    counted_qty: dec!(18),
                    notes: None,
                },
                CountItemInput {
                    ingredient_id: beans.id,
                    counted_qty: dec!(10),
                    notes: None,
                },
            ],
        ))
        .await
        .unwrap();

    let completed = app
        .services
        .inventory_counts
        .complete_count(count.id, "elisa".to_string())
        .await
        .expect("apply count");
    assert_eq!(completed.status, InventoryCountStatus::Completed);
    assert_eq!(completed.approved_by.as_deref(), Some("elisa"));

    let rice_now = ingredient::Entity::find_by_id(rice.id)
        .one(&*app.db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(rice_now.current_stock, dec!(18));

    // Only the divergent line produced a ledger movement.
    let movements = stock_movement::Entity::find().all(&*app.db).await.unwrap();
    assert_eq!(movements.len(), 1);
    assert_eq!(movements[0].ingredient_id, rice.id);
    assert_eq!(movements[0].movement_type, "inventory_count");
    assert_eq!(movements[0].quantity, dec!(-2));

    // A completed count cannot be applied again.
    let err = app
        .services
        .inventory_counts
        .complete_count(count.id, "elisa".to_string())
        .await
        .expect_err("terminal count");
    assert_matches!(err, ServiceError::InvalidState(_));
}

#[tokio::test]
async fn cancelling_a_count_leaves_stock_untouched() {
    let app = TestApp::new().await;
    app.seed_center("dry_storage", "Dry Storage").await;
    let rice = app
        .seed_ingredient("Rice", "kg", dec!(20), dec!(5), None)
        .await;

    let (count, _) = app
        .services
        .inventory_counts
        .start_count(start_input(
            "dry_storage",
            vec![CountItemInput {
                ingredient_id: rice.id,
                counted_qty: dec!(2),
                notes: None,
            }],
        ))
        .await
        .unwrap();

    let cancelled = app
        .services
        .inventory_counts
        .cancel_count(count.id, "recount scheduled".to_string())
        .await
        .expect("cancel");
    assert_eq!(cancelled.status, InventoryCountStatus::Cancelled);

    let ing = ingredient::Entity::find_by_id(rice.id)
        .one(&*app.db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(ing.current_stock, dec!(20));
    let movements = stock_movement::Entity::find().all(&*app.db).await.unwrap();
    assert!(movements.is_empty());
}

#[tokio::test]
async fn count_requires_registered_storage_center() {
    let app = TestApp::new().await;
    let rice = app
        .seed_ingredient("Rice", "kg", dec!(20), dec!(5), None)
        .await;

    let err = app
        .services
        .inventory_counts
        .start_count(start_input(
            "attic",
            vec![CountItemInput {
                ingredient_id: rice.id,
                counted_qty: dec!(18),
                notes: None,
            }],
        ))
        .await
        .expect_err("unknown center");
    assert_matches!(err, ServiceError::ValidationError(_));
}
