pub mod alerts;
pub mod inventory_counts;
pub mod purchase_orders;
pub mod receivings;
pub mod registry;
pub mod stock_ledger;
pub mod storage_centers;

pub use alerts::AlertService;
pub use inventory_counts::InventoryCountService;
pub use purchase_orders::PurchaseOrderService;
pub use receivings::ReceivingService;
pub use registry::RegistryService;
pub use stock_ledger::StockLedgerService;
pub use storage_centers::StorageCenterDirectory;
