use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::services::alerts::{AlertDraft, AlertService};

/// Domain events emitted by the services. Consumers must tolerate loss:
/// emission is fire-and-forget and never blocks the emitting operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    PurchaseOrderCreated {
        purchase_id: Uuid,
        order_number: String,
        receiving_id: Uuid,
    },
    PurchaseOrderCancelled {
        purchase_id: Uuid,
        reason: String,
    },
    ChecklistItemChecked {
        receiving_id: Uuid,
        line_index: i32,
        is_received: bool,
    },
    ReceivingCompleted {
        receiving_id: Uuid,
        purchase_id: Uuid,
        adjustment_value: Decimal,
    },
    ReceivingCancelled {
        receiving_id: Uuid,
        reason: String,
    },
    /// Receiving was completed without an invoice photo attached.
    MissingInvoicePhoto {
        receiving_id: Uuid,
        supplier_name: String,
    },
    StockIncremented {
        ingredient_id: Uuid,
        quantity: Decimal,
        storage_center: Option<String>,
    },
    StockAdjusted {
        ingredient_id: Uuid,
        previous_stock: Decimal,
        new_stock: Decimal,
    },
    LowStock {
        ingredient_id: Uuid,
        ingredient_name: String,
        current_stock: Decimal,
        min_stock: Decimal,
        critical: bool,
    },
    InventoryCountCompleted {
        count_id: Uuid,
        total_differences: Decimal,
        completed_at: DateTime<Utc>,
    },
}

#[derive(Debug, Clone)]
pub struct EventSender {
    sender: mpsc::Sender<Event>,
}

impl EventSender {
    pub fn new(sender: mpsc::Sender<Event>) -> Self {
        Self { sender }
    }

    pub async fn send(&self, event: Event) -> Result<(), String> {
        self.sender
            .send(event)
            .await
            .map_err(|e| format!("Failed to send event: {}", e))
    }

    /// Sends an event, logging instead of propagating failure.
    pub async fn send_or_log(&self, event: Event) {
        if let Err(e) = self.send(event).await {
            error!("Event dropped: {}", e);
        }
    }
}

/// Background event loop: logs every event and materializes the ones that
/// surface to operators as alert rows.
pub async fn process_events(mut receiver: mpsc::Receiver<Event>, alerts: AlertService) {
    info!("Event processor started");
    while let Some(event) = receiver.recv().await {
        info!(?event, "Processing event");
        if let Some(draft) = alert_for(&event) {
            if let Err(e) = alerts.record(draft).await {
                warn!("Failed to record alert: {}", e);
            }
        }
    }
    info!("Event processor stopped");
}

fn alert_for(event: &Event) -> Option<AlertDraft> {
    match event {
        Event::MissingInvoicePhoto {
            receiving_id,
            supplier_name,
        } => Some(AlertDraft {
            alert_type: "missing_invoice_photo".into(),
            priority: "medium".into(),
            title: "Receiving completed without invoice photo".into(),
            message: format!(
                "Receiving from {} was completed without an invoice photo",
                supplier_name
            ),
            ingredient_id: None,
            receiving_id: Some(*receiving_id),
        }),
        Event::LowStock {
            ingredient_id,
            ingredient_name,
            current_stock,
            min_stock,
            critical,
        } => Some(AlertDraft {
            alert_type: if *critical {
                "stock_critical".into()
            } else {
                "stock_low".into()
            },
            priority: if *critical { "high".into() } else { "medium".into() },
            title: format!("{} is running low", ingredient_name),
            message: format!(
                "{}: current stock {} is below the minimum of {}",
                ingredient_name, current_stock, min_stock
            ),
            ingredient_id: Some(*ingredient_id),
            receiving_id: None,
        }),
        _ => None,
    }
}
