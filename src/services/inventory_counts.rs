use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, TransactionTrait,
};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::{
    entities::{
        ingredient::Entity as IngredientEntity,
        inventory_count::{self, Entity as InventoryCountEntity, InventoryCountStatus},
        inventory_count_item::{self, Entity as CountItemEntity},
    },
    errors::ServiceError,
    events::{Event, EventSender},
    services::{
        stock_ledger::{MovementRef, StockLedgerService},
        storage_centers::StorageCenterDirectory,
    },
};

#[derive(Debug, Clone)]
pub struct CountItemInput {
    pub ingredient_id: Uuid,
    pub counted_qty: Decimal,
    pub notes: Option<String>,
}

#[derive(Debug, Clone)]
pub struct StartInventoryCount {
    pub count_type: String,
    pub storage_center: String,
    pub counted_by: String,
    pub notes: Option<String>,
    pub items: Vec<CountItemInput>,
}

/// Physical inventory counts. A count snapshots system quantities when it
/// is started; applying it at completion sets each ingredient's balance to
/// the counted quantity through the stock ledger.
#[derive(Clone)]
pub struct InventoryCountService {
    db: Arc<DatabaseConnection>,
    storage_centers: StorageCenterDirectory,
    stock_ledger: StockLedgerService,
    event_sender: Option<EventSender>,
}

impl InventoryCountService {
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

    #[instrument(skip(self, input), fields(storage_center = %input.storage_center))]
    pub async fn start_count(
        &self,
        input: StartInventoryCount,
    ) -> Result<(inventory_count::Model, Vec<inventory_count_item::Model>), ServiceError> {
        if input.items.is_empty() {
            return Err(ServiceError::ValidationError(
                "Inventory count must include at least one ingredient".to_string(),
            ));
        }
        if !self.storage_centers.is_registered(&input.storage_center).await? {
            return Err(ServiceError::ValidationError(format!(
                "Storage center '{}' is not registered",
                input.storage_center
            )));
        }
        for item in &input.items {
            if item.counted_qty < Decimal::ZERO {
                return Err(ServiceError::ValidationError(
                    "Counted quantity cannot be negative".to_string(),
                ));
            }
        }

        let txn = self.db.begin().await?;
        let now = Utc::now();
        let count_id = Uuid::new_v4();

        let mut rows: Vec<inventory_count_item::Model> = Vec::with_capacity(input.items.len());
        let mut total_differences = Decimal::ZERO;
        for item in &input.items {
            let ing = IngredientEntity::find_by_id(item.ingredient_id)
                .one(&txn)
                .await?
                .ok_or_else(|| {
                    ServiceError::NotFound(format!("Ingredient {} not found", item.ingredient_id))
                })?;

            let difference = item.counted_qty - ing.current_stock;
            total_differences += difference.abs();

            let row = inventory_count_item::ActiveModel {
                id: Set(Uuid::new_v4()),
                count_id: Set(count_id),
                ingredient_id: Set(ing.id),
                ingredient_name: Set(ing.name),
                system_qty: Set(ing.current_stock),
                counted_qty: Set(item.counted_qty),
                difference: Set(difference),
                unit: Set(ing.unit),
                notes: Set(item.notes.clone()),
            };
            rows.push(row.insert(&txn).await?);
        }

        let count = inventory_count::ActiveModel {
            id: Set(count_id),
            count_date: Set(now),
            count_type: Set(input.count_type),
            storage_center: Set(input.storage_center),
            status: Set(InventoryCountStatus::InProgress),
            total_differences: Set(total_differences),
            counted_by: Set(input.counted_by),
            approved_by: Set(None),
            cancel_reason: Set(None),
            notes: Set(input.notes),
            created_at: Set(now),
            updated_at: Set(now),
        };
        let count = count.insert(&txn).await?;

        txn.commit().await?;

        info!(count_id = %count.id, total_differences = %total_differences, "Inventory count started");
        Ok((count, rows))
    }

    /// Applies the count: each ingredient's balance is set to the counted
    /// quantity, with one ledger movement per divergence. All writes share
    /// one transaction.
    #[instrument(skip(self))]
    pub async fn complete_count(
        &self,
        count_id: Uuid,
        approved_by: String,
    ) -> Result<inventory_count::Model, ServiceError> {
        let txn = self.db.begin().await?;

        let count = self.load_open(&txn, count_id).await?;
        let items = CountItemEntity::find()
            .filter(inventory_count_item::Column::CountId.eq(count_id))
            .all(&txn)
            .await?;

        let mut changes = Vec::new();
        for item in items.iter().filter(|i| i.difference != Decimal::ZERO) {
            let change = self
                .stock_ledger
                .set_stock_to_count(
                    &txn,
                    item.ingredient_id,
                    item.counted_qty,
                    MovementRef {
                        reference_type: "inventory_count".to_string(),
                        reference_id: count_id,
                    },
                    &approved_by,
                )
                .await?;
            changes.push(change);
        }

        let now = Utc::now();
        let mut active: inventory_count::ActiveModel = count.into();
        active.status = Set(InventoryCountStatus::Completed);
        active.approved_by = Set(Some(approved_by));
        active.updated_at = Set(now);
        let completed = active.update(&txn).await?;

        txn.commit().await?;

        if let Some(sender) = &self.event_sender {
            sender
                .send_or_log(Event::InventoryCountCompleted {
                    count_id,
                    total_differences: completed.total_differences,
                    completed_at: now,
                })
                .await;
        }
        for change in &changes {
            self.stock_ledger.emit_post_commit(change).await;
        }

        info!(count_id = %count_id, corrections = changes.len(), "Inventory count applied");
        Ok(completed)
    }

    #[instrument(skip(self))]
    pub async fn cancel_count(
        &self,
        count_id: Uuid,
        reason: String,
    ) -> Result<inventory_count::Model, ServiceError> {
        let count = self.load_open(&*self.db, count_id).await?;

        let mut active: inventory_count::ActiveModel = count.into();
        active.status = Set(InventoryCountStatus::Cancelled);
        active.cancel_reason = Set(Some(reason));
        active.updated_at = Set(Utc::now());
        Ok(active.update(&*self.db).await?)
    }

    pub async fn get_count(
        &self,
        count_id: Uuid,
    ) -> Result<(inventory_count::Model, Vec<inventory_count_item::Model>), ServiceError> {
        let count = InventoryCountEntity::find_by_id(count_id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Inventory count {} not found", count_id))
            })?;
        let items = CountItemEntity::find()
            .filter(inventory_count_item::Column::CountId.eq(count_id))
            .all(&*self.db)
            .await?;
        Ok((count, items))
    }

    #[instrument(skip(self))]
    pub async fn list_counts(
        &self,
        status: Option<InventoryCountStatus>,
        page: u64,
        per_page: u64,
    ) -> Result<(Vec<inventory_count::Model>, u64), ServiceError> {
        let mut query =
            InventoryCountEntity::find().order_by_desc(inventory_count::Column::CountDate);
        if let Some(status) = status {
            query = query.filter(inventory_count::Column::Status.eq(status));
        }

        let paginator = query.paginate(&*self.db, per_page.max(1));
        let total = paginator.num_items().await?;
        let counts = paginator.fetch_page(page.saturating_sub(1)).await?;
        Ok((counts, total))
    }

    async fn load_open<C: sea_orm::ConnectionTrait>(
        &self,
        conn: &C,
        count_id: Uuid,
    ) -> Result<inventory_count::Model, ServiceError> {
        let count = InventoryCountEntity::find_by_id(count_id)
            .one(conn)
            .await?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Inventory count {} not found", count_id))
            })?;
        if count.status.is_terminal() {
            return Err(ServiceError::InvalidState(format!(
                "Inventory count {} is no longer open",
                count_id
            )));
        }
        Ok(count)
    }
}
