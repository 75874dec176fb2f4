mod common;

use assert_matches::assert_matches;
use rust_decimal_macros::dec;
use uuid::Uuid;

use larder_api::errors::ServiceError;
use larder_api::services::registry::{CreateIngredient, CreateSupplier};

use common::TestApp;

fn flour(supplier_id: Option<Uuid>) -> CreateIngredient {
    CreateIngredient {
        name: "Flour".to_string(),
        unit: "kg".to_string(),
        category: Some("dry_goods".to_string()),
        current_stock: dec!(12),
        min_stock: dec!(5),
        max_stock: Some(dec!(40)),
        storage_center: Some("dry_storage".to_string()),
        supplier_id,
    }
}

#[tokio::test]
async fn ingredient_registration_round_trips() {
    let app = TestApp::new().await;

    let supplier = app
        .services
        .registry
        .create_supplier(CreateSupplier {
            name: "Acme Foods".to_string(),
            contact_name: Some("Sam".to_string()),
            phone: None,
            email: Some("orders@acme.example".to_string()),
            delivery_time_days: Some(3),
        })
        .await
        .expect("create supplier");
    assert_eq!(supplier.status, "active");

    let created = app
        .services
        .registry
        .create_ingredient(flour(Some(supplier.id)))
        .await
        .expect("create ingredient");
    assert_eq!(created.name, "Flour");
    assert_eq!(created.current_stock, dec!(12));
    assert!(created.last_stock_update.is_none());

    let fetched = app
        .services
        .registry
        .get_ingredient(created.id)
        .await
        .expect("get ingredient");
    assert_eq!(fetched.supplier_id, Some(supplier.id));

    let (listed, total) = app
        .services
        .registry
        .list_ingredients(Some("dry_goods".to_string()), 1, 20)
        .await
        .expect("list ingredients");
    assert_eq!(total, 1);
    assert_eq!(listed[0].id, created.id);
}

#[tokio::test]
async fn duplicate_ingredient_name_is_a_conflict() {
    let app = TestApp::new().await;

    app.services
        .registry
        .create_ingredient(flour(None))
        .await
        .expect("first create");
    let err = app
        .services
        .registry
        .create_ingredient(flour(None))
        .await
        .expect_err("duplicate create");

    assert_matches!(err, ServiceError::Conflict(_));
}

#[tokio::test]
async fn ingredient_with_unknown_supplier_is_rejected() {
    let app = TestApp::new().await;

    let err = app
        .services
        .registry
        .create_ingredient(flour(Some(Uuid::new_v4())))
        .await
        .expect_err("unknown supplier");

    assert_matches!(err, ServiceError::ValidationError(_));
}

#[tokio::test]
async fn negative_stock_levels_are_rejected() {
    let app = TestApp::new().await;

    let mut input = flour(None);
    input.min_stock = dec!(-1);
    let err = app
        .services
        .registry
        .create_ingredient(input)
        .await
        .expect_err("negative min_stock");

    assert_matches!(err, ServiceError::ValidationError(_));
}

#[tokio::test]
async fn supplier_list_filters_by_status() {
    let app = TestApp::new().await;

    for name in ["Acme Foods", "Harvest Co"] {
        app.services
            .registry
            .create_supplier(CreateSupplier {
                name: name.to_string(),
                contact_name: None,
                phone: None,
                email: None,
                delivery_time_days: None,
            })
            .await
            .expect("create supplier");
    }

    let (active, total) = app
        .services
        .registry
        .list_suppliers(Some("active".to_string()), 1, 20)
        .await
        .expect("list suppliers");
    assert_eq!(total, 2);
    assert_eq!(active[0].name, "Acme Foods");

    let (inactive, total) = app
        .services
        .registry
        .list_suppliers(Some("inactive".to_string()), 1, 20)
        .await
        .expect("list suppliers");
    assert_eq!(total, 0);
    assert!(inactive.is_empty());
}
