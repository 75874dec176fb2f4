mod common;

use assert_matches::assert_matches;
use chrono::{Duration, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sea_orm::EntityTrait;

use larder_api::entities::{
    ingredient, purchase_order::PurchaseOrderStatus, receiving_record::ReceivingStatus,
    stock_movement,
};
use larder_api::errors::ServiceError;
use larder_api::events::Event;
use larder_api::services::purchase_orders::{CreatePurchaseOrder, NewOrderLine};
use larder_api::services::receivings::{ChecklistItemUpdate, CompleteReceiving};

use common::TestApp;

async fn place_order(
    app: &TestApp,
    lines: Vec<(uuid::Uuid, Decimal, Decimal)>,
) -> (larder_api::entities::purchase_order::Model, uuid::Uuid) {
    let supplier = app.seed_supplier("Hortifruti Sul").await;
    if !app
        .services
        .storage_centers
        .is_registered("dry_storage")
        .await
        .expect("center lookup")
    {
        app.seed_center("dry_storage", "Dry Storage").await;
    }
    let input = CreatePurchaseOrder {
        supplier_id: supplier.id,
        expected_delivery: Utc::now() + Duration::days(2),
        notes: None,
        created_by: "ana".to_string(),
        lines: lines
            .into_iter()
            .map(|(ingredient_id, quantity, unit_price)| NewOrderLine {
                ingredient_id,
                quantity,
                unit_price,
            })
            .collect(),
    };
    let (order, _) = app
        .services
        .purchase_orders
        .create_purchase_order(input)
        .await
        .expect("place order");
    let receiving_id = order.receiving_id.expect("receiving opened with order");
    (order, receiving_id)
}

fn received(qty: Decimal) -> ChecklistItemUpdate {
    ChecklistItemUpdate {
        is_received: true,
        received_qty: Some(qty),
        storage_center: Some("dry_storage".to_string()),
        checked_by: "bruno".to_string(),
        ..Default::default()
    }
}

fn not_received(reason: &str) -> ChecklistItemUpdate {
    ChecklistItemUpdate {
        is_received: false,
        missing_reason: Some(reason.to_string()),
        checked_by: "bruno".to_string(),
        ..Default::default()
    }
}

#[tokio::test]
async fn placing_an_order_opens_its_receiving() {
    let app = TestApp::new().await;
    let tomato = app
        .seed_ingredient("Tomato", "kg", dec!(0), dec!(5), None)
        .await;

    let (order, receiving_id) = place_order(&app, vec![(tomato.id, dec!(15), dec!(4))]).await;

    assert_eq!(order.status, PurchaseOrderStatus::Pending);
    assert_eq!(order.total_value, dec!(60));
    assert!(order.order_number.starts_with("PO-"));

    let (record, checklist) = app
        .services
        .receivings
        .get_receiving(receiving_id)
        .await
        .expect("receiving exists");
    assert_eq!(record.status, ReceivingStatus::AwaitingDelivery);
    assert_eq!(record.ordered_total_value, dec!(60));
    assert_eq!(record.received_total_value, Decimal::ZERO);
    assert_eq!(record.adjustment_value, dec!(60));
    assert_eq!(record.version, 0);
    assert_eq!(checklist.len(), 1);
    assert!(!checklist[0].is_checked);
    assert_eq!(checklist[0].ordered_qty, dec!(15));

    // Placing the order alone touches no ingredient metadata.
    let ing = ingredient::Entity::find_by_id(tomato.id)
        .one(&*app.db)
        .await
        .unwrap()
        .unwrap();
    assert!(ing.last_order_date.is_none());
    assert!(ing.last_order_supplier.is_none());
}

#[tokio::test]
async fn first_checklist_update_moves_receiving_in_progress() {
    let app = TestApp::new().await;
    let tomato = app
        .seed_ingredient("Tomato", "kg", dec!(0), dec!(5), None)
        .await;
    let (_, receiving_id) = place_order(&app, vec![(tomato.id, dec!(15), dec!(4))]).await;

    let (record, item) = app
        .services
        .receivings
        .update_checklist_item(receiving_id, 0, received(dec!(12.5)))
        .await
        .expect("update line");

    assert_eq!(record.status, ReceivingStatus::InProgress);
    assert_eq!(record.version, 1);
    assert!(item.is_checked);
    assert_eq!(item.received_qty, dec!(12.5));
    // Ordered 60 worth, 50 arrived so far.
    assert_eq!(record.received_total_value, dec!(50));
    assert_eq!(record.adjustment_value, dec!(10));
}

#[tokio::test]
async fn short_delivery_completion_posts_stock_and_adjustment() {
    let mut app = TestApp::with_events().await;
    let tomato = app
        .seed_ingredient("Tomato", "kg", dec!(2), dec!(1), None)
        .await;
    let (order, receiving_id) = place_order(&app, vec![(tomato.id, dec!(15), dec!(4))]).await;

    app.services
        .receivings
        .update_checklist_item(receiving_id, 0, received(dec!(12.5)))
        .await
        .expect("update line");

    let completed = app
        .services
        .receivings
        .complete_receiving(
            receiving_id,
            CompleteReceiving {
                completed_by: "carla".to_string(),
                invoice_number: Some("NF-1001".to_string()),
                ..Default::default()
            },
        )
        .await
        .expect("complete");

    assert_eq!(completed.status, ReceivingStatus::Completed);
    assert_eq!(completed.received_total_value, dec!(50));
    assert_eq!(completed.adjustment_value, dec!(10));
    assert!(completed.completed_at.is_some());

    // Stock was posted exactly once for the received quantity.
    let ing = ingredient::Entity::find_by_id(tomato.id)
        .one(&*app.db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(ing.current_stock, dec!(14.5));
    // Last-order metadata is stamped by the arrival, not the order.
    assert!(ing.last_stock_update.is_some());
    assert!(ing.last_order_date.is_some());
    assert_eq!(ing.last_order_supplier, Some(order.supplier_id));

    let movements = stock_movement::Entity::find().all(&*app.db).await.unwrap();
    assert_eq!(movements.len(), 1);
    assert_eq!(movements[0].quantity, dec!(12.5));
    assert_eq!(movements[0].previous_stock, dec!(2));
    assert_eq!(movements[0].new_stock, dec!(14.5));
    assert_eq!(movements[0].reference_type.as_deref(), Some("receiving"));

    // Single received line fully checked: purchase rolls up to received.
    let po = larder_api::entities::purchase_order::Entity::find_by_id(order.id)
        .one(&*app.db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(po.status, PurchaseOrderStatus::Received);

    let events = app.drain_events();
    assert!(events
        .iter()
        .any(|e| matches!(e, Event::ReceivingCompleted { .. })));
    assert!(events
        .iter()
        .any(|e| matches!(e, Event::StockIncremented { .. })));
}

#[tokio::test]
async fn over_delivery_is_recorded_as_supplier_credit() {
    let app = TestApp::new().await;
    let oil = app
        .seed_ingredient("Olive oil", "l", dec!(0), dec!(2), None)
        .await;
    // Ordered 40 worth.
    let (_, receiving_id) = place_order(&app, vec![(oil.id, dec!(10), dec!(4))]).await;

    app.services
        .receivings
        .update_checklist_item(receiving_id, 0, received(dec!(15)))
        .await
        .expect("update line");

    let completed = app
        .services
        .receivings
        .complete_receiving(
            receiving_id,
            CompleteReceiving {
                completed_by: "carla".to_string(),
                ..Default::default()
            },
        )
        .await
        .expect("complete");

    assert_eq!(completed.received_total_value, dec!(60));
    assert_eq!(completed.adjustment_value, dec!(-20));
}

#[tokio::test]
async fn completion_requires_every_line_checked() {
    let app = TestApp::new().await;
    let tomato = app
        .seed_ingredient("Tomato", "kg", dec!(0), dec!(5), None)
        .await;
    let onion = app
        .seed_ingredient("Onion", "kg", dec!(0), dec!(5), None)
        .await;
    let (_, receiving_id) = place_order(
        &app,
        vec![(tomato.id, dec!(10), dec!(4)), (onion.id, dec!(5), dec!(2))],
    )
    .await;

    app.services
        .receivings
        .update_checklist_item(receiving_id, 0, received(dec!(10)))
        .await
        .expect("update first line");

    let err = app
        .services
        .receivings
        .complete_receiving(
            receiving_id,
            CompleteReceiving {
                completed_by: "carla".to_string(),
                ..Default::default()
            },
        )
        .await
        .expect_err("one line unchecked");
    assert_matches!(err, ServiceError::ValidationError(_));

    // No stock posted by the failed completion.
    let movements = stock_movement::Entity::find().all(&*app.db).await.unwrap();
    assert!(movements.is_empty());
}

#[tokio::test]
async fn partially_received_order_rolls_up_partial() {
    let app = TestApp::new().await;
    let tomato = app
        .seed_ingredient("Tomato", "kg", dec!(0), dec!(5), None)
        .await;
    let onion = app
        .seed_ingredient("Onion", "kg", dec!(0), dec!(5), None)
        .await;
    let (order, receiving_id) = place_order(
        &app,
        vec![(tomato.id, dec!(10), dec!(4)), (onion.id, dec!(5), dec!(2))],
    )
    .await;

    app.services
        .receivings
        .update_checklist_item(receiving_id, 0, received(dec!(10)))
        .await
        .unwrap();
    app.services
        .receivings
        .update_checklist_item(receiving_id, 1, not_received("not in truck"))
        .await
        .unwrap();

    app.services
        .receivings
        .complete_receiving(
            receiving_id,
            CompleteReceiving {
                completed_by: "carla".to_string(),
                ..Default::default()
            },
        )
        .await
        .expect("complete");

    let po = larder_api::entities::purchase_order::Entity::find_by_id(order.id)
        .one(&*app.db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(po.status, PurchaseOrderStatus::Partial);

    // Only the received line posted stock.
    let movements = stock_movement::Entity::find().all(&*app.db).await.unwrap();
    assert_eq!(movements.len(), 1);
    assert_eq!(movements[0].ingredient_id, tomato.id);
}

#[tokio::test]
async fn terminal_receiving_rejects_further_edits() {
    let app = TestApp::new().await;
    let tomato = app
        .seed_ingredient("Tomato", "kg", dec!(0), dec!(5), None)
        .await;
    let (_, receiving_id) = place_order(&app, vec![(tomato.id, dec!(10), dec!(4))]).await;

    app.services
        .receivings
        .update_checklist_item(receiving_id, 0, received(dec!(10)))
        .await
        .unwrap();
    app.services
        .receivings
        .complete_receiving(
            receiving_id,
            CompleteReceiving {
                completed_by: "carla".to_string(),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let err = app
        .services
        .receivings
        .update_checklist_item(receiving_id, 0, received(dec!(5)))
        .await
        .expect_err("completed receiving is frozen");
    assert_matches!(err, ServiceError::InvalidState(_));

    let err = app
        .services
        .receivings
        .complete_receiving(
            receiving_id,
            CompleteReceiving {
                completed_by: "carla".to_string(),
                ..Default::default()
            },
        )
        .await
        .expect_err("double completion rejected");
    assert_matches!(err, ServiceError::InvalidState(_));

    // Double completion did not post stock twice.
    let movements = stock_movement::Entity::find().all(&*app.db).await.unwrap();
    assert_eq!(movements.len(), 1);
}

#[tokio::test]
async fn stale_version_is_a_conflict() {
    let app = TestApp::new().await;
    let tomato = app
        .seed_ingredient("Tomato", "kg", dec!(0), dec!(5), None)
        .await;
    let (_, receiving_id) = place_order(&app, vec![(tomato.id, dec!(10), dec!(4))]).await;

    // First writer bumps the version to 1.
    app.services
        .receivings
        .update_checklist_item(receiving_id, 0, received(dec!(10)))
        .await
        .unwrap();

    let stale = ChecklistItemUpdate {
        expected_version: Some(0),
        ..received(dec!(8))
    };
    let err = app
        .services
        .receivings
        .update_checklist_item(receiving_id, 0, stale)
        .await
        .expect_err("stale version");
    assert_matches!(err, ServiceError::ConcurrentModification(id) if id == receiving_id);

    // Matching version goes through.
    let current = ChecklistItemUpdate {
        expected_version: Some(1),
        ..received(dec!(8))
    };
    app.services
        .receivings
        .update_checklist_item(receiving_id, 0, current)
        .await
        .expect("current version accepted");
}

#[tokio::test]
async fn unregistered_storage_center_is_rejected() {
    let app = TestApp::new().await;
    let tomato = app
        .seed_ingredient("Tomato", "kg", dec!(0), dec!(5), None)
        .await;
    app.seed_center("camara_fria", "Camara Fria").await;
    let (_, receiving_id) = place_order(&app, vec![(tomato.id, dec!(10), dec!(4))]).await;

    let update = ChecklistItemUpdate {
        storage_center: Some("attic".to_string()),
        ..received(dec!(10))
    };
    let err = app
        .services
        .receivings
        .update_checklist_item(receiving_id, 0, update)
        .await
        .expect_err("unknown center");
    assert_matches!(err, ServiceError::ValidationError(_));

    let update = ChecklistItemUpdate {
        storage_center: Some("camara_fria".to_string()),
        ..received(dec!(10))
    };
    app.services
        .receivings
        .update_checklist_item(receiving_id, 0, update)
        .await
        .expect("registered center accepted");
}

#[tokio::test]
async fn received_line_requires_a_storage_center() {
    let app = TestApp::new().await;
    let tomato = app
        .seed_ingredient("Tomato", "kg", dec!(0), dec!(5), None)
        .await;
    let (_, receiving_id) = place_order(&app, vec![(tomato.id, dec!(10), dec!(4))]).await;

    for center in [None, Some("   ".to_string())] {
        let update = ChecklistItemUpdate {
            storage_center: center,
            ..received(dec!(10))
        };
        let err = app
            .services
            .receivings
            .update_checklist_item(receiving_id, 0, update)
            .await
            .expect_err("received line without a center");
        assert_matches!(err, ServiceError::ValidationError(_));
    }

    // A missing line is fine without a destination.
    app.services
        .receivings
        .update_checklist_item(receiving_id, 0, not_received("not in truck"))
        .await
        .expect("missing line needs no center");

    let (record, checklist) = app
        .services
        .receivings
        .get_receiving(receiving_id)
        .await
        .expect("receiving exists");
    assert_eq!(record.version, 1);
    assert!(checklist[0].storage_center.is_none());
}

#[tokio::test]
async fn zero_quantity_received_line_posts_no_stock() {
    let app = TestApp::new().await;
    let tomato = app
        .seed_ingredient("Tomato", "kg", dec!(2), dec!(1), None)
        .await;
    let (_, receiving_id) = place_order(&app, vec![(tomato.id, dec!(10), dec!(4))]).await;

    let (_, item) = app
        .services
        .receivings
        .update_checklist_item(receiving_id, 0, received(dec!(0)))
        .await
        .expect("zero quantity accepted");
    assert!(item.is_received);
    assert_eq!(item.received_qty, Decimal::ZERO);

    let completed = app
        .services
        .receivings
        .complete_receiving(
            receiving_id,
            CompleteReceiving {
                completed_by: "carla".to_string(),
                ..Default::default()
            },
        )
        .await
        .expect("complete");
    assert_eq!(completed.received_total_value, Decimal::ZERO);
    assert_eq!(completed.adjustment_value, dec!(40));

    let ing = ingredient::Entity::find_by_id(tomato.id)
        .one(&*app.db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(ing.current_stock, dec!(2));

    let movements = stock_movement::Entity::find().all(&*app.db).await.unwrap();
    assert!(movements.is_empty());
}

#[tokio::test]
async fn completion_without_invoice_photo_raises_alert_event() {
    let mut app = TestApp::with_events().await;
    let tomato = app
        .seed_ingredient("Tomato", "kg", dec!(0), dec!(5), None)
        .await;
    let (_, receiving_id) = place_order(&app, vec![(tomato.id, dec!(10), dec!(4))]).await;

    app.services
        .receivings
        .update_checklist_item(receiving_id, 0, received(dec!(10)))
        .await
        .unwrap();
    app.services
        .receivings
        .complete_receiving(
            receiving_id,
            CompleteReceiving {
                completed_by: "carla".to_string(),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let events = app.drain_events();
    assert!(events
        .iter()
        .any(|e| matches!(e, Event::MissingInvoicePhoto { receiving_id: id, .. } if *id == receiving_id)));
}

#[tokio::test]
async fn attached_photo_suppresses_missing_photo_event() {
    let mut app = TestApp::with_events().await;
    let tomato = app
        .seed_ingredient("Tomato", "kg", dec!(0), dec!(5), None)
        .await;
    let (_, receiving_id) = place_order(&app, vec![(tomato.id, dec!(10), dec!(4))]).await;

    app.services
        .receivings
        .update_checklist_item(receiving_id, 0, received(dec!(10)))
        .await
        .unwrap();
    app.services
        .receivings
        .record_invoice_photo(receiving_id, "/media/invoices/nf.jpg".to_string())
        .await
        .unwrap();
    app.services
        .receivings
        .complete_receiving(
            receiving_id,
            CompleteReceiving {
                completed_by: "carla".to_string(),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let events = app.drain_events();
    assert!(!events
        .iter()
        .any(|e| matches!(e, Event::MissingInvoicePhoto { .. })));
}

#[tokio::test]
async fn cancelling_order_cancels_open_receiving() {
    let app = TestApp::new().await;
    let tomato = app
        .seed_ingredient("Tomato", "kg", dec!(0), dec!(5), None)
        .await;
    let (order, receiving_id) = place_order(&app, vec![(tomato.id, dec!(10), dec!(4))]).await;

    let cancelled = app
        .services
        .purchase_orders
        .cancel_purchase_order(order.id, "supplier out of stock".to_string())
        .await
        .expect("cancel order");
    assert_eq!(cancelled.status, PurchaseOrderStatus::Cancelled);

    let (record, _) = app
        .services
        .receivings
        .get_receiving(receiving_id)
        .await
        .unwrap();
    assert_eq!(record.status, ReceivingStatus::Cancelled);

    // Cancelled receivings reject checklist edits.
    let err = app
        .services
        .receivings
        .update_checklist_item(receiving_id, 0, received(dec!(1)))
        .await
        .expect_err("cancelled receiving is frozen");
    assert_matches!(err, ServiceError::InvalidState(_));
}

#[tokio::test]
async fn completed_order_cannot_be_cancelled() {
    let app = TestApp::new().await;
    let tomato = app
        .seed_ingredient("Tomato", "kg", dec!(0), dec!(5), None)
        .await;
    let (order, receiving_id) = place_order(&app, vec![(tomato.id, dec!(10), dec!(4))]).await;

    app.services
        .receivings
        .update_checklist_item(receiving_id, 0, received(dec!(10)))
        .await
        .unwrap();
    app.services
        .receivings
        .complete_receiving(
            receiving_id,
            CompleteReceiving {
                completed_by: "carla".to_string(),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let err = app
        .services
        .purchase_orders
        .cancel_purchase_order(order.id, "too late".to_string())
        .await
        .expect_err("stock already posted");
    assert_matches!(err, ServiceError::InvalidState(_));
}

#[tokio::test]
async fn order_numbers_are_sequential_within_the_year() {
    let app = TestApp::new().await;
    let tomato = app
        .seed_ingredient("Tomato", "kg", dec!(0), dec!(5), None)
        .await;

    let (first, _) = place_order(&app, vec![(tomato.id, dec!(1), dec!(1))]).await;
    let (second, _) = place_order(&app, vec![(tomato.id, dec!(1), dec!(1))]).await;

    let year = Utc::now().format("%Y").to_string();
    assert_eq!(first.order_number, format!("PO-{}-001", year));
    assert_eq!(second.order_number, format!("PO-{}-002", year));
}
