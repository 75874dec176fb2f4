#![allow(dead_code)]

use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, ActiveValue::Set, DatabaseConnection};
use tokio::sync::mpsc;
use uuid::Uuid;

use larder_api::db;
use larder_api::entities::{ingredient, supplier};
use larder_api::events::{Event, EventSender};
use larder_api::handlers::AppServices;

/// Service harness on an in-memory database with migrations applied.
pub struct TestApp {
    pub db: Arc<DatabaseConnection>,
    pub services: AppServices,
    pub events: Option<mpsc::Receiver<Event>>,
}

impl TestApp {
    pub async fn new() -> Self {
        Self::build(false).await
    }

    /// Harness that captures emitted events for assertions.
    pub async fn with_events() -> Self {
        Self::build(true).await
    }

    async fn build(capture_events: bool) -> Self {
        let conn = db::establish_connection("sqlite::memory:")
            .await
            .expect("sqlite in-memory connection");
        db::run_migrations(&conn).await.expect("migrations");
        let db = Arc::new(conn);

        let (sender, events) = if capture_events {
            let (tx, rx) = mpsc::channel(64);
            (Some(EventSender::new(tx)), Some(rx))
        } else {
            (None, None)
        };

        let services = AppServices::new(db.clone(), sender);
        Self {
            db,
            services,
            events,
        }
    }

    /// Drains every event emitted so far.
    pub fn drain_events(&mut self) -> Vec<Event> {
        let mut out = Vec::new();
        if let Some(rx) = self.events.as_mut() {
            while let Ok(event) = rx.try_recv() {
                out.push(event);
            }
        }
        out
    }

    pub async fn seed_supplier(&self, name: &str) -> supplier::Model {
        let now = Utc::now();
        supplier::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(name.to_string()),
            contact_name: Set(None),
            phone: Set(None),
            email: Set(None),
            delivery_time_days: Set(Some(3)),
            status: Set("active".to_string()),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&*self.db)
        .await
        .expect("seed supplier")
    }

    pub async fn seed_ingredient(
        &self,
        name: &str,
        unit: &str,
        current_stock: Decimal,
        min_stock: Decimal,
        max_stock: Option<Decimal>,
    ) -> ingredient::Model {
        let now = Utc::now();
        ingredient::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(name.to_string()),
            unit: Set(unit.to_string()),
            category: Set(None),
            current_stock: Set(current_stock),
            min_stock: Set(min_stock),
            max_stock: Set(max_stock),
            storage_center: Set(None),
            supplier_id: Set(None),
            status: Set("active".to_string()),
            last_stock_update: Set(None),
            last_order_date: Set(None),
            last_order_supplier: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&*self.db)
        .await
        .expect("seed ingredient")
    }

    pub async fn seed_center(&self, value: &str, label: &str) {
        self.services
            .storage_centers
            .create_center(value.to_string(), label.to_string(), 0)
            .await
            .expect("seed storage center");
    }
}
