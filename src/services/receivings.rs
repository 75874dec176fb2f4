use std::sync::Arc;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, ConnectionTrait, DatabaseConnection,
    EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, TransactionTrait,
};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::{
    entities::{
        purchase_order::{self, Entity as PurchaseOrderEntity, PurchaseOrderStatus},
        purchase_order_line,
        receiving_checklist_item::{self, Entity as ChecklistItemEntity},
        receiving_record::{self, Entity as ReceivingEntity, ReceivingStatus},
    },
    errors::ServiceError,
    events::{Event, EventSender},
    services::{
        stock_ledger::{MovementRef, StockChange, StockLedgerService},
        storage_centers::StorageCenterDirectory,
    },
};

/// Sum of `received_qty * unit_price` over checklist lines.
pub fn received_total<I: IntoIterator<Item = (Decimal, Decimal)>>(lines: I) -> Decimal {
    lines.into_iter().map(|(qty, price)| qty * price).sum()
}

/// Reconciliation delta. Positive means the supplier delivered less value
/// than ordered; negative is a credit for over-delivery.
pub fn adjustment(ordered_total: Decimal, received_total: Decimal) -> Decimal {
    ordered_total - received_total
}

/// Operator's determination for one checklist line.
#[derive(Debug, Clone, Default)]
pub struct ChecklistItemUpdate {
    pub is_received: bool,
    /// Defaults to the ordered quantity when the line is received and no
    /// quantity is given.
    pub received_qty: Option<Decimal>,
    pub missing_reason: Option<String>,
    pub notes: Option<String>,
    pub batch_number: Option<String>,
    pub expiry_date: Option<DateTime<Utc>>,
    pub storage_center: Option<String>,
    pub checked_by: String,
    /// When present, the update is rejected unless it matches the record's
    /// current version.
    pub expected_version: Option<i64>,
}

#[derive(Debug, Clone, Default)]
pub struct CompleteReceiving {
    pub completed_by: String,
    pub invoice_number: Option<String>,
    pub general_notes: Option<String>,
    pub expected_version: Option<i64>,
}

/// Receiving reconciliation workflow: checklist updates, running totals,
/// completion with the one-and-only stock posting, and the purchase order
/// status rollup.
#[derive(Clone)]
pub struct ReceivingService {
    db: Arc<DatabaseConnection>,
    storage_centers: StorageCenterDirectory,
    stock_ledger: StockLedgerService,
    event_sender: Option<EventSender>,
}

impl ReceivingService {
    pub fn new(
        db: Arc<DatabaseConnection>,
        storage_centers: StorageCenterDirectory,
        stock_ledger: StockLedgerService,
        event_sender: Option<EventSender>,
    ) -> Self {
        Self {
            db,
            storage_centers,
            stock_ledger,
            event_sender,
        }
    }

    /// Opens the receiving for a freshly placed purchase order, inside the
    /// order-creation transaction. One checklist row per order line, all
    /// unchecked, totals seeded from the order.
    pub async fn open_receiving_for_order<C: ConnectionTrait>(
        &self,
        conn: &C,
        purchase: &purchase_order::Model,
        lines: &[purchase_order_line::Model],
    ) -> Result<receiving_record::Model, ServiceError> {
        let ordered_total: Decimal = lines.iter().map(|l| l.total_price).sum();
        let now = Utc::now();

        let record = receiving_record::ActiveModel {
            id: Set(Uuid::new_v4()),
            purchase_id: Set(purchase.id),
            supplier_id: Set(purchase.supplier_id),
            supplier_name: Set(purchase.supplier_name.clone()),
            receiving_date: Set(purchase.expected_delivery),
            invoice_number: Set(None),
            invoice_photo_url: Set(None),
            invoice_photo_uploaded_at: Set(None),
            status: Set(ReceivingStatus::AwaitingDelivery),
            ordered_total_value: Set(ordered_total),
            received_total_value: Set(Decimal::ZERO),
            adjustment_value: Set(ordered_total),
            general_notes: Set(None),
            cancel_reason: Set(None),
            created_by: Set(purchase.created_by.clone()),
            completed_by: Set(None),
            completed_at: Set(None),
            version: Set(0),
            created_at: Set(now),
            updated_at: Set(now),
        };
        let record = record.insert(conn).await?;

        for (index, line) in lines.iter().enumerate() {
            let item = receiving_checklist_item::ActiveModel {
                id: Set(Uuid::new_v4()),
                receiving_id: Set(record.id),
                line_index: Set(index as i32),
                ingredient_id: Set(line.ingredient_id),
                ingredient_name: Set(line.ingredient_name.clone()),
                ordered_qty: Set(line.quantity),
                unit: Set(line.unit.clone()),
                unit_price: Set(line.unit_price),
                is_checked: Set(false),
                is_received: Set(false),
                received_qty: Set(Decimal::ZERO),
                missing_reason: Set(None),
                notes: Set(None),
                batch_number: Set(None),
                expiry_date: Set(None),
                storage_center: Set(None),
                checked_at: Set(None),
                checked_by: Set(None),
            };
            item.insert(conn).await?;
        }

        info!(receiving_id = %record.id, purchase_id = %purchase.id, "Receiving opened");
        Ok(record)
    }

    pub async fn get_receiving(
        &self,
        id: Uuid,
    ) -> Result<(receiving_record::Model, Vec<receiving_checklist_item::Model>), ServiceError> {
        let record = ReceivingEntity::find_by_id(id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Receiving {} not found", id)))?;
        let items = self.checklist_items(&*self.db, id).await?;
        Ok((record, items))
    }

    #[instrument(skip(self))]
    pub async fn list_receivings(
        &self,
        status: Option<ReceivingStatus>,
        supplier_id: Option<Uuid>,
        page: u64,
        per_page: u64,
    ) -> Result<(Vec<receiving_record::Model>, u64), ServiceError> {
        let mut query = ReceivingEntity::find().order_by_desc(receiving_record::Column::CreatedAt);
        if let Some(status) = status {
            query = query.filter(receiving_record::Column::Status.eq(status));
        }
        if let Some(supplier_id) = supplier_id {
            query = query.filter(receiving_record::Column::SupplierId.eq(supplier_id));
        }

        let paginator = query.paginate(&*self.db, per_page.max(1));
        let total = paginator.num_items().await?;
        let records = paginator.fetch_page(page.saturating_sub(1)).await?;
        Ok((records, total))
    }

    /// Records the operator's determination for one checklist line and
    /// recomputes the running totals. The first update moves the receiving
    /// from `awaiting_delivery` into `in_progress`.
    #[instrument(skip(self, update), fields(checked_by = %update.checked_by))]
    pub async fn update_checklist_item(
        &self,
        receiving_id: Uuid,
        line_index: i32,
        update: ChecklistItemUpdate,
    ) -> Result<(receiving_record::Model, receiving_checklist_item::Model), ServiceError> {
        // A received line must say where the goods went.
        let storage_center = update
            .storage_center
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(str::to_string);
        if update.is_received && storage_center.is_none() {
            return Err(ServiceError::ValidationError(
                "A received line must name a storage center".to_string(),
            ));
        }
        if let Some(center) = &storage_center {
            if !self.storage_centers.is_registered(center).await? {
                return Err(ServiceError::ValidationError(format!(
                    "Storage center '{}' is not registered",
                    center
                )));
            }
        }

        let txn = self.db.begin().await?;

        let record = self
            .load_editable(&txn, receiving_id, update.expected_version)
            .await?;

        let item = ChecklistItemEntity::find()
            .filter(receiving_checklist_item::Column::ReceivingId.eq(receiving_id))
            .filter(receiving_checklist_item::Column::LineIndex.eq(line_index))
            .one(&txn)
            .await?
            .ok_or_else(|| {
                ServiceError::NotFound(format!(
                    "Checklist line {} not found on receiving {}",
                    line_index, receiving_id
                ))
            })?;

        let received_qty = if update.is_received {
            let qty = update.received_qty.unwrap_or(item.ordered_qty);
            if qty < Decimal::ZERO {
                return Err(ServiceError::ValidationError(
                    "Received quantity cannot be negative".to_string(),
                ));
            }
            qty
        } else {
            Decimal::ZERO
        };

        let is_received = update.is_received;
        let now = Utc::now();
        let mut active: receiving_checklist_item::ActiveModel = item.into();
        active.is_checked = Set(true);
        active.is_received = Set(is_received);
        active.received_qty = Set(received_qty);
        active.missing_reason = Set(if is_received {
            None
        } else {
            update.missing_reason
        });
        active.notes = Set(update.notes);
        active.batch_number = Set(update.batch_number);
        active.expiry_date = Set(update.expiry_date);
        active.storage_center = Set(storage_center);
        active.checked_at = Set(Some(now));
        active.checked_by = Set(Some(update.checked_by));
        let item = active.update(&txn).await?;

        let items = self.checklist_items(&txn, receiving_id).await?;
        let received = received_total(items.iter().map(|i| (i.received_qty, i.unit_price)));

        let next_status = if record.status == ReceivingStatus::AwaitingDelivery {
            Self::transition(&record, ReceivingStatus::InProgress)?
        } else {
            record.status
        };

        let mut active: receiving_record::ActiveModel = record.clone().into();
        active.status = Set(next_status);
        active.received_total_value = Set(received);
        active.adjustment_value = Set(adjustment(record.ordered_total_value, received));
        active.version = Set(record.version + 1);
        active.updated_at = Set(now);
        let record = active.update(&txn).await?;

        self.rollup_purchase_status(&txn, record.purchase_id, &items)
            .await?;

        txn.commit().await?;

        if let Some(sender) = &self.event_sender {
            sender
                .send_or_log(Event::ChecklistItemChecked {
                    receiving_id,
                    line_index,
                    is_received,
                })
                .await;
        }
        Ok((record, item))
    }

    /// Completes the receiving: every line must be checked, the final
    /// totals are fixed, and stock is posted exactly once for the received
    /// quantities. All writes share one transaction.
    #[instrument(skip(self, input), fields(completed_by = %input.completed_by))]
    pub async fn complete_receiving(
        &self,
        receiving_id: Uuid,
        input: CompleteReceiving,
    ) -> Result<receiving_record::Model, ServiceError> {
        let txn = self.db.begin().await?;

        let record = self
            .load_editable(&txn, receiving_id, input.expected_version)
            .await?;

        let items = self.checklist_items(&txn, receiving_id).await?;
        let unchecked = items.iter().filter(|i| !i.is_checked).count();
        if unchecked > 0 {
            return Err(ServiceError::ValidationError(format!(
                "Cannot complete receiving: {} checklist line(s) not yet checked",
                unchecked
            )));
        }

        let received = received_total(items.iter().map(|i| (i.received_qty, i.unit_price)));
        let now = Utc::now();

        let mut changes: Vec<StockChange> = Vec::new();
        for item in items
            .iter()
            .filter(|i| i.is_received && i.received_qty > Decimal::ZERO)
        {
            let change = self
                .stock_ledger
                .increment_stock(
                    &txn,
                    item.ingredient_id,
                    item.received_qty,
                    item.storage_center.clone(),
                    MovementRef {
                        reference_type: "receiving".to_string(),
                        reference_id: receiving_id,
                    },
                    record.supplier_id,
                    &input.completed_by,
                )
                .await?;
            changes.push(change);
        }

        let adjustment_value = adjustment(record.ordered_total_value, received);
        let mut active: receiving_record::ActiveModel = record.clone().into();
        active.status = Set(Self::transition(&record, ReceivingStatus::Completed)?);
        active.received_total_value = Set(received);
        active.adjustment_value = Set(adjustment_value);
        active.invoice_number = Set(input.invoice_number.or(record.invoice_number.clone()));
        active.general_notes = Set(input.general_notes.or(record.general_notes.clone()));
        active.completed_by = Set(Some(input.completed_by));
        active.completed_at = Set(Some(now));
        active.version = Set(record.version + 1);
        active.updated_at = Set(now);
        let completed = active.update(&txn).await?;

        self.rollup_purchase_status(&txn, completed.purchase_id, &items)
            .await?;

        txn.commit().await?;

        if adjustment_value < Decimal::ZERO {
            warn!(
                receiving_id = %receiving_id,
                credit = %-adjustment_value,
                "Receiving over-delivered; adjustment recorded as supplier credit"
            );
        }

        if let Some(sender) = &self.event_sender {
            sender
                .send_or_log(Event::ReceivingCompleted {
                    receiving_id,
                    purchase_id: completed.purchase_id,
                    adjustment_value,
                })
                .await;
            for change in &changes {
                sender
                    .send_or_log(Event::StockIncremented {
                        ingredient_id: change.ingredient.id,
                        quantity: change.new_stock - change.previous_stock,
                        storage_center: change.ingredient.storage_center.clone(),
                    })
                    .await;
                self.stock_ledger.emit_post_commit(change).await;
            }
            if completed.invoice_photo_url.is_none() {
                sender
                    .send_or_log(Event::MissingInvoicePhoto {
                        receiving_id,
                        supplier_name: completed.supplier_name.clone(),
                    })
                    .await;
            }
        }

        info!(
            receiving_id = %receiving_id,
            received_total = %received,
            adjustment = %adjustment_value,
            "Receiving completed"
        );
        Ok(completed)
    }

    /// Cancels the receiving without touching stock.
    #[instrument(skip(self))]
    pub async fn cancel_receiving(
        &self,
        receiving_id: Uuid,
        reason: String,
        expected_version: Option<i64>,
    ) -> Result<receiving_record::Model, ServiceError> {
        let txn = self.db.begin().await?;

        let record = self
            .load_editable(&txn, receiving_id, expected_version)
            .await?;

        let mut active: receiving_record::ActiveModel = record.clone().into();
        active.status = Set(Self::transition(&record, ReceivingStatus::Cancelled)?);
        active.cancel_reason = Set(Some(reason.clone()));
        active.version = Set(record.version + 1);
        active.updated_at = Set(Utc::now());
        let cancelled = active.update(&txn).await?;

        txn.commit().await?;

        if let Some(sender) = &self.event_sender {
            sender
                .send_or_log(Event::ReceivingCancelled {
                    receiving_id,
                    reason,
                })
                .await;
        }
        Ok(cancelled)
    }

    /// Attaches the invoice photo. Allowed at any point before cancellation,
    /// including after completion so a late upload can clear the alert
    /// condition.
    #[instrument(skip(self, url))]
    pub async fn record_invoice_photo(
        &self,
        receiving_id: Uuid,
        url: String,
    ) -> Result<receiving_record::Model, ServiceError> {
        let record = ReceivingEntity::find_by_id(receiving_id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Receiving {} not found", receiving_id))
            })?;

        if record.status == ReceivingStatus::Cancelled {
            return Err(ServiceError::InvalidState(format!(
                "Receiving {} is cancelled",
                receiving_id
            )));
        }

        let mut active: receiving_record::ActiveModel = record.clone().into();
        active.invoice_photo_url = Set(Some(url));
        active.invoice_photo_uploaded_at = Set(Some(Utc::now()));
        active.version = Set(record.version + 1);
        active.updated_at = Set(Utc::now());
        Ok(active.update(&*self.db).await?)
    }

    /// Derives the purchase order status from the checklist: `received`
    /// when every line was received, `partial` when some were, `pending`
    /// otherwise.
    async fn rollup_purchase_status<C: ConnectionTrait>(
        &self,
        conn: &C,
        purchase_id: Uuid,
        items: &[receiving_checklist_item::Model],
    ) -> Result<(), ServiceError> {
        let purchase = PurchaseOrderEntity::find_by_id(purchase_id)
            .one(conn)
            .await?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Purchase order {} not found", purchase_id))
            })?;
        if purchase.status == PurchaseOrderStatus::Cancelled {
            return Ok(());
        }

        let received = items.iter().filter(|i| i.is_received).count();
        let next = if received == items.len() && !items.is_empty() {
            PurchaseOrderStatus::Received
        } else if received > 0 {
            PurchaseOrderStatus::Partial
        } else {
            PurchaseOrderStatus::Pending
        };

        if purchase.status != next {
            let mut active: purchase_order::ActiveModel = purchase.into();
            active.status = Set(next);
            active.updated_at = Set(Utc::now());
            active.update(conn).await?;
        }
        Ok(())
    }

    async fn checklist_items<C: ConnectionTrait>(
        &self,
        conn: &C,
        receiving_id: Uuid,
    ) -> Result<Vec<receiving_checklist_item::Model>, ServiceError> {
        Ok(ChecklistItemEntity::find()
            .filter(receiving_checklist_item::Column::ReceivingId.eq(receiving_id))
            .order_by_asc(receiving_checklist_item::Column::LineIndex)
            .all(conn)
            .await?)
    }

    /// Applies the state machine guard before a status write.
    fn transition(
        record: &receiving_record::Model,
        next: ReceivingStatus,
    ) -> Result<ReceivingStatus, ServiceError> {
        if !record.status.can_transition_to(next) {
            return Err(ServiceError::InvalidState(format!(
                "Receiving {} cannot move from {} to {}",
                record.id,
                record.status.as_str(),
                next.as_str()
            )));
        }
        Ok(next)
    }

    /// Loads a receiving for mutation: terminal states are rejected, and a
    /// stale expected version is a conflict.
    async fn load_editable<C: ConnectionTrait>(
        &self,
        conn: &C,
        receiving_id: Uuid,
        expected_version: Option<i64>,
    ) -> Result<receiving_record::Model, ServiceError> {
        let record = ReceivingEntity::find_by_id(receiving_id)
            .one(conn)
            .await?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Receiving {} not found", receiving_id))
            })?;

        if !record.status.is_editable() {
            return Err(ServiceError::InvalidState(format!(
                "Receiving {} is {} and can no longer be modified",
                receiving_id,
                record.status.as_str()
            )));
        }
        if let Some(expected) = expected_version {
            if expected != record.version {
                return Err(ServiceError::ConcurrentModification(receiving_id));
            }
        }
        Ok(record)
    }
}
