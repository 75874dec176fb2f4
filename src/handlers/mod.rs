use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::events::EventSender;
use crate::services::{
    AlertService, InventoryCountService, PurchaseOrderService, ReceivingService, RegistryService,
    StockLedgerService, StorageCenterDirectory,
};

pub mod alerts;
pub mod common;
pub mod ingredients;
pub mod inventory_counts;
pub mod purchase_orders;
pub mod receivings;
pub mod stock;
pub mod storage_centers;
pub mod suppliers;

// Re-export AppState so handler modules can import it as crate::handlers::AppState
pub use crate::AppState;

/// Service container shared through the router state.
#[derive(Clone)]
pub struct AppServices {
    pub registry: RegistryService,
    pub storage_centers: StorageCenterDirectory,
    pub stock_ledger: StockLedgerService,
    pub receivings: ReceivingService,
    pub purchase_orders: PurchaseOrderService,
    pub inventory_counts: InventoryCountService,
    pub alerts: AlertService,
}

impl AppServices {
    pub fn new(db: Arc<DatabaseConnection>, event_sender: Option<EventSender>) -> Self {
        let registry = RegistryService::new(db.clone());
        let storage_centers = StorageCenterDirectory::new(db.clone());
        let stock_ledger = StockLedgerService::new(db.clone(), event_sender.clone());
        let receivings = ReceivingService::new(
            db.clone(),
            storage_centers.clone(),
            stock_ledger.clone(),
            event_sender.clone(),
        );
        let purchase_orders =
            PurchaseOrderService::new(db.clone(), receivings.clone(), event_sender.clone());
        let inventory_counts = InventoryCountService::new(
            db.clone(),
            storage_centers.clone(),
            stock_ledger.clone(),
            event_sender,
        );
        let alerts = AlertService::new(db);

        Self {
            registry,
            storage_centers,
            stock_ledger,
            receivings,
            purchase_orders,
            inventory_counts,
            alerts,
        }
    }
}
