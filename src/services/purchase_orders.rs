use std::sync::Arc;

use chrono::{DateTime, Datelike, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, ConnectionTrait, DatabaseConnection,
    EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, TransactionTrait,
};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::{
    entities::{
        ingredient::Entity as IngredientEntity,
        purchase_order::{self, Entity as PurchaseOrderEntity, PurchaseOrderStatus},
        purchase_order_line::{self, Entity as OrderLineEntity},
        receiving_record::{self, Entity as ReceivingEntity, ReceivingStatus},
        supplier::Entity as SupplierEntity,
    },
    errors::ServiceError,
    events::{Event, EventSender},
    services::receivings::ReceivingService,
};

#[derive(Debug, Clone)]
pub struct NewOrderLine {
    pub ingredient_id: Uuid,
    pub quantity: Decimal,
    pub unit_price: Decimal,
}

#[derive(Debug, Clone)]
pub struct CreatePurchaseOrder {
    pub supplier_id: Uuid,
    pub expected_delivery: DateTime<Utc>,
    pub notes: Option<String>,
    pub created_by: String,
    pub lines: Vec<NewOrderLine>,
}

/// Purchase orders and their lifecycle. Placing an order immediately opens
/// its receiving so the delivery checklist exists before the truck arrives.
#[derive(Clone)]
pub struct PurchaseOrderService {
    db: Arc<DatabaseConnection>,
    receivings: ReceivingService,
    event_sender: Option<EventSender>,
}

impl PurchaseOrderService {
    pub fn new(
        db: Arc<DatabaseConnection>,
        receivings: ReceivingService,
        event_sender: Option<EventSender>,
    ) -> Self {
        Self {
            db,
            receivings,
            event_sender,
        }
    }

    /// Places a purchase order: validates the supplier and every
    /// ingredient, snapshots names and prices into the lines, and opens
    /// the receiving in the same transaction.
    #[instrument(skip(self, input), fields(supplier_id = %input.supplier_id))]
    pub async fn create_purchase_order(
        &self,
        input: CreatePurchaseOrder,
    ) -> Result<(purchase_order::Model, Vec<purchase_order_line::Model>), ServiceError> {
        if input.lines.is_empty() {
            return Err(ServiceError::ValidationError(
                "Purchase order must have at least one line".to_string(),
            ));
        }
        for line in &input.lines {
            if line.quantity <= Decimal::ZERO {
                return Err(ServiceError::ValidationError(
                    "Line quantity must be positive".to_string(),
                ));
            }
            if line.unit_price < Decimal::ZERO {
                return Err(ServiceError::ValidationError(
                    "Line unit price cannot be negative".to_string(),
                ));
            }
        }

        let txn = self.db.begin().await?;

        let supplier = SupplierEntity::find_by_id(input.supplier_id)
            .one(&txn)
            .await?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Supplier {} not found", input.supplier_id))
            })?;
        if supplier.status != "active" {
            return Err(ServiceError::ValidationError(format!(
                "Supplier '{}' is not active",
                supplier.name
            )));
        }

        let now = Utc::now();
        let order_number = self.generate_order_number(&txn, now).await?;
        let order_id = Uuid::new_v4();

        let mut lines: Vec<purchase_order_line::Model> = Vec::with_capacity(input.lines.len());
        let mut total_value = Decimal::ZERO;
        for line in &input.lines {
            let ing = IngredientEntity::find_by_id(line.ingredient_id)
                .one(&txn)
                .await?
                .ok_or_else(|| {
                    ServiceError::NotFound(format!("Ingredient {} not found", line.ingredient_id))
                })?;

            let total_price = line.quantity * line.unit_price;
            total_value += total_price;

            let row = purchase_order_line::ActiveModel {
                id: Set(Uuid::new_v4()),
                purchase_id: Set(order_id),
                ingredient_id: Set(ing.id),
                ingredient_name: Set(ing.name.clone()),
                quantity: Set(line.quantity),
                unit: Set(ing.unit.clone()),
                unit_price: Set(line.unit_price),
                total_price: Set(total_price),
            };
            lines.push(row.insert(&txn).await?);
        }

        let order = purchase_order::ActiveModel {
            id: Set(order_id),
            order_number: Set(order_number.clone()),
            supplier_id: Set(supplier.id),
            supplier_name: Set(supplier.name.clone()),
            order_date: Set(now),
            expected_delivery: Set(input.expected_delivery),
            status: Set(PurchaseOrderStatus::Pending),
            total_value: Set(total_value),
            receiving_id: Set(None),
            notes: Set(input.notes),
            cancel_reason: Set(None),
            created_by: Set(input.created_by),
            created_at: Set(now),
            updated_at: Set(now),
        };
        let order = order.insert(&txn).await?;

        let receiving = self
            .receivings
            .open_receiving_for_order(&txn, &order, &lines)
            .await?;

        let mut active: purchase_order::ActiveModel = order.into();
        active.receiving_id = Set(Some(receiving.id));
        let order = active.update(&txn).await?;

        txn.commit().await?;

        if let Some(sender) = &self.event_sender {
            sender
                .send_or_log(Event::PurchaseOrderCreated {
                    purchase_id: order.id,
                    order_number: order.order_number.clone(),
                    receiving_id: receiving.id,
                })
                .await;
        }

        info!(order_number = %order_number, total = %total_value, "Purchase order placed");
        Ok((order, lines))
    }

    pub async fn get_purchase_order(
        &self,
        id: Uuid,
    ) -> Result<(purchase_order::Model, Vec<purchase_order_line::Model>), ServiceError> {
        let order = PurchaseOrderEntity::find_by_id(id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Purchase order {} not found", id)))?;
        let lines = OrderLineEntity::find()
            .filter(purchase_order_line::Column::PurchaseId.eq(id))
            .all(&*self.db)
            .await?;
        Ok((order, lines))
    }

    #[instrument(skip(self))]
    pub async fn list_purchase_orders(
        &self,
        status: Option<PurchaseOrderStatus>,
        supplier_id: Option<Uuid>,
        page: u64,
        per_page: u64,
    ) -> Result<(Vec<purchase_order::Model>, u64), ServiceError> {
        let mut query = PurchaseOrderEntity::find().order_by_desc(purchase_order::Column::CreatedAt);
        if let Some(status) = status {
            query = query.filter(purchase_order::Column::Status.eq(status));
        }
        if let Some(supplier_id) = supplier_id {
            query = query.filter(purchase_order::Column::SupplierId.eq(supplier_id));
        }

        let paginator = query.paginate(&*self.db, per_page.max(1));
        let total = paginator.num_items().await?;
        let orders = paginator.fetch_page(page.saturating_sub(1)).await?;
        Ok((orders, total))
    }

    /// Cancels an order and its linked receiving. Rejected once the
    /// receiving has completed, since stock was already posted.
    #[instrument(skip(self))]
    pub async fn cancel_purchase_order(
        &self,
        id: Uuid,
        reason: String,
    ) -> Result<purchase_order::Model, ServiceError> {
        let txn = self.db.begin().await?;

        let order = PurchaseOrderEntity::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Purchase order {} not found", id)))?;

        if order.status == PurchaseOrderStatus::Cancelled {
            return Err(ServiceError::InvalidState(format!(
                "Purchase order {} is already cancelled",
                id
            )));
        }

        let receiving = match order.receiving_id {
            Some(receiving_id) => ReceivingEntity::find_by_id(receiving_id).one(&txn).await?,
            None => None,
        };
        if let Some(rec) = &receiving {
            if rec.status == ReceivingStatus::Completed {
                return Err(ServiceError::InvalidState(format!(
                    "Purchase order {} was already received and cannot be cancelled",
                    id
                )));
            }
        }

        let now = Utc::now();
        let mut cancelled_receiving = None;
        if let Some(rec) = receiving {
            if rec.status != ReceivingStatus::Cancelled {
                let mut active: receiving_record::ActiveModel = rec.clone().into();
                active.status = Set(ReceivingStatus::Cancelled);
                active.cancel_reason = Set(Some(format!("Purchase order cancelled: {}", reason)));
                active.version = Set(rec.version + 1);
                active.updated_at = Set(now);
                active.update(&txn).await?;
                cancelled_receiving = Some(rec.id);
            }
        }

        let mut active: purchase_order::ActiveModel = order.into();
        active.status = Set(PurchaseOrderStatus::Cancelled);
        active.cancel_reason = Set(Some(reason.clone()));
        active.updated_at = Set(now);
        let cancelled = active.update(&txn).await?;

        txn.commit().await?;

        if let Some(sender) = &self.event_sender {
            sender
                .send_or_log(Event::PurchaseOrderCancelled {
                    purchase_id: id,
                    reason: reason.clone(),
                })
                .await;
            if let Some(receiving_id) = cancelled_receiving {
                sender
                    .send_or_log(Event::ReceivingCancelled {
                        receiving_id,
                        reason,
                    })
                    .await;
            }
        }
        Ok(cancelled)
    }

    /// Sequential order number scoped to the calendar year, `PO-2026-041`.
    /// Falls back to a timestamp suffix if the sequential candidate is
    /// already taken.
    async fn generate_order_number<C: ConnectionTrait>(
        &self,
        conn: &C,
        now: DateTime<Utc>,
    ) -> Result<String, ServiceError> {
        let year = now.year();
        let prefix = format!("PO-{}-", year);
        let count = PurchaseOrderEntity::find()
            .filter(purchase_order::Column::OrderNumber.starts_with(&prefix))
            .count(conn)
            .await?;

        let candidate = format!("{}{:03}", prefix, count + 1);
        let taken = PurchaseOrderEntity::find()
            .filter(purchase_order::Column::OrderNumber.eq(candidate.clone()))
            .one(conn)
            .await?
            .is_some();
        if !taken {
            return Ok(candidate);
        }
        Ok(format!("{}{}", prefix, now.timestamp_millis()))
    }
}
