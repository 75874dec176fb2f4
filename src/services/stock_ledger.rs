use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, ConnectionTrait, DatabaseConnection,
    EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    entities::{
        ingredient::{self, Entity as IngredientEntity},
        stock_movement::{self, Entity as StockMovementEntity},
    },
    errors::ServiceError,
    events::{Event, EventSender},
};

/// Stock level relative to the ingredient's configured bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum StockStatus {
    Ok,
    Low,
    Critical,
    Excess,
}

/// Result of a ledger write, surfaced to the caller so events can be
/// emitted after the surrounding transaction commits.
#[derive(Debug, Clone)]
pub struct StockChange {
    pub ingredient: ingredient::Model,
    pub previous_stock: Decimal,
    pub new_stock: Decimal,
    pub low_stock: Option<LowStockSignal>,
}

#[derive(Debug, Clone)]
pub struct LowStockSignal {
    pub ingredient_id: Uuid,
    pub ingredient_name: String,
    pub current_stock: Decimal,
    pub min_stock: Decimal,
    pub critical: bool,
}

/// Reference that ties a movement back to the operation that caused it.
#[derive(Debug, Clone)]
pub struct MovementRef {
    pub reference_type: String,
    pub reference_id: Uuid,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct StockOverviewRow {
    pub ingredient_id: Uuid,
    pub name: String,
    pub unit: String,
    pub current_stock: Decimal,
    pub min_stock: Decimal,
    pub max_stock: Option<Decimal>,
    pub storage_center: Option<String>,
    pub status: StockStatus,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct StockOverview {
    /// Rows grouped by storage center value; unassigned ingredients are
    /// grouped under `"unassigned"`.
    pub by_storage_center: BTreeMap<String, Vec<StockOverviewRow>>,
    pub summary: StockSummary,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct StockSummary {
    pub total_ingredients: u64,
    pub ok: u64,
    pub low: u64,
    pub critical: u64,
    pub excess: u64,
}

/// Computes the status band for a stock level. Critical takes precedence
/// over low; excess only applies when a maximum is configured.
pub fn stock_status(current: Decimal, min: Decimal, max: Option<Decimal>) -> StockStatus {
    if let Some(max) = max {
        if current > max {
            return StockStatus::Excess;
        }
    }
    if min > Decimal::ZERO {
        if current < min * dec!(0.5) {
            return StockStatus::Critical;
        }
        if current < min {
            return StockStatus::Low;
        }
    }
    StockStatus::Ok
}

/// Append-only stock ledger. Every change to `ingredients.current_stock`
/// goes through here and leaves a movement row with the before and after
/// balances.
#[derive(Clone)]
pub struct StockLedgerService {
    db: Arc<DatabaseConnection>,
    event_sender: Option<EventSender>,
}

impl StockLedgerService {
    pub fn new(db: Arc<DatabaseConnection>, event_sender: Option<EventSender>) -> Self {
        Self { db, event_sender }
    }

    /// Adds `quantity` to the ingredient's balance inside the caller's
    /// transaction. Used by receiving completion so the stock write commits
    /// or rolls back with the receiving itself. `supplier_id` stamps the
    /// ingredient's last-order fields with the arrival.
    pub async fn increment_stock<C: ConnectionTrait>(
        &self,
        conn: &C,
        ingredient_id: Uuid,
        quantity: Decimal,
        storage_center: Option<String>,
        reference: MovementRef,
        supplier_id: Uuid,
        created_by: &str,
    ) -> Result<StockChange, ServiceError> {
        if quantity <= Decimal::ZERO {
            return Err(ServiceError::ValidationError(
                "Stock increment must be positive".to_string(),
            ));
        }
        self.apply_change(
            conn,
            ingredient_id,
            |current| current + quantity,
            "receiving",
            storage_center,
            Some(reference),
            Some(supplier_id),
            None,
            created_by,
        )
        .await
    }

    /// Sets the ingredient's balance to the counted quantity inside the
    /// caller's transaction. Used by inventory count completion.
    pub async fn set_stock_to_count<C: ConnectionTrait>(
        &self,
        conn: &C,
        ingredient_id: Uuid,
        counted_qty: Decimal,
        reference: MovementRef,
        created_by: &str,
    ) -> Result<StockChange, ServiceError> {
        if counted_qty < Decimal::ZERO {
            return Err(ServiceError::ValidationError(
                "Counted quantity cannot be negative".to_string(),
            ));
        }
        self.apply_change(
            conn,
            ingredient_id,
            |_| counted_qty,
            "inventory_count",
            None,
            Some(reference),
            None,
            None,
            created_by,
        )
        .await
    }

    /// Manual correction to an absolute quantity, in its own transaction.
    #[instrument(skip(self))]
    pub async fn adjust_stock(
        &self,
        ingredient_id: Uuid,
        new_quantity: Decimal,
        notes: Option<String>,
        created_by: &str,
    ) -> Result<StockChange, ServiceError> {
        if new_quantity < Decimal::ZERO {
            return Err(ServiceError::ValidationError(
                "Stock quantity cannot be negative".to_string(),
            ));
        }

        let txn = self.db.begin().await?;
        let change = self
            .apply_change(
                &txn,
                ingredient_id,
                |_| new_quantity,
                "adjustment",
                None,
                None,
                None,
                notes,
                created_by,
            )
            .await?;
        txn.commit().await?;

        if let Some(sender) = &self.event_sender {
            sender
                .send_or_log(Event::StockAdjusted {
                    ingredient_id,
                    previous_stock: change.previous_stock,
                    new_stock: change.new_stock,
                })
                .await;
            self.emit_low_stock(sender, &change).await;
        }

        info!(
            ingredient_id = %ingredient_id,
            previous = %change.previous_stock,
            new = %change.new_stock,
            "Stock adjusted"
        );
        Ok(change)
    }

    /// Emits the low-stock event for a change made inside a caller-owned
    /// transaction, after that transaction has committed.
    pub async fn emit_post_commit(&self, change: &StockChange) {
        if let Some(sender) = &self.event_sender {
            self.emit_low_stock(sender, change).await;
        }
    }

    async fn emit_low_stock(&self, sender: &EventSender, change: &StockChange) {
        if let Some(signal) = &change.low_stock {
            sender
                .send_or_log(Event::LowStock {
                    ingredient_id: signal.ingredient_id,
                    ingredient_name: signal.ingredient_name.clone(),
                    current_stock: signal.current_stock,
                    min_stock: signal.min_stock,
                    critical: signal.critical,
                })
                .await;
        }
    }

    #[allow(clippy::too_many_arguments)]
    async fn apply_change<C: ConnectionTrait>(
        &self,
        conn: &C,
        ingredient_id: Uuid,
        next_balance: impl FnOnce(Decimal) -> Decimal,
        movement_type: &str,
        storage_center: Option<String>,
        reference: Option<MovementRef>,
        order_supplier: Option<Uuid>,
        notes: Option<String>,
        created_by: &str,
    ) -> Result<StockChange, ServiceError> {
        let ingredient = IngredientEntity::find_by_id(ingredient_id)
            .one(conn)
            .await?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Ingredient {} not found", ingredient_id))
            })?;

        let previous_stock = ingredient.current_stock;
        let new_stock = next_balance(previous_stock);
        let now = Utc::now();

        let movement = stock_movement::ActiveModel {
            id: Set(Uuid::new_v4()),
            ingredient_id: Set(ingredient_id),
            ingredient_name: Set(ingredient.name.clone()),
            movement_type: Set(movement_type.to_string()),
            quantity: Set(new_stock - previous_stock),
            unit: Set(ingredient.unit.clone()),
            previous_stock: Set(previous_stock),
            new_stock: Set(new_stock),
            reference_type: Set(reference.as_ref().map(|r| r.reference_type.clone())),
            reference_id: Set(reference.as_ref().map(|r| r.reference_id)),
            storage_center: Set(storage_center),
            notes: Set(notes),
            created_by: Set(created_by.to_string()),
            created_at: Set(now),
        };
        movement.insert(conn).await?;

        let mut active: ingredient::ActiveModel = ingredient.clone().into();
        active.current_stock = Set(new_stock);
        active.last_stock_update = Set(Some(now));
        if let Some(supplier_id) = order_supplier {
            active.last_order_date = Set(Some(now));
            active.last_order_supplier = Set(Some(supplier_id));
        }
        active.updated_at = Set(now);
        let updated = active.update(conn).await?;

        let low_stock = match stock_status(new_stock, updated.min_stock, updated.max_stock) {
            StockStatus::Low => Some(false),
            StockStatus::Critical => Some(true),
            _ => None,
        }
        .map(|critical| LowStockSignal {
            ingredient_id,
            ingredient_name: updated.name.clone(),
            current_stock: new_stock,
            min_stock: updated.min_stock,
            critical,
        });

        Ok(StockChange {
            ingredient: updated,
            previous_stock,
            new_stock,
            low_stock,
        })
    }

    #[instrument(skip(self))]
    pub async fn list_movements(
        &self,
        ingredient_id: Option<Uuid>,
        movement_type: Option<String>,
        page: u64,
        per_page: u64,
    ) -> Result<(Vec<stock_movement::Model>, u64), ServiceError> {
        let mut query = StockMovementEntity::find().order_by_desc(stock_movement::Column::CreatedAt);
        if let Some(id) = ingredient_id {
            query = query.filter(stock_movement::Column::IngredientId.eq(id));
        }
        if let Some(kind) = movement_type {
            query = query.filter(stock_movement::Column::MovementType.eq(kind));
        }

        let paginator = query.paginate(&*self.db, per_page.max(1));
        let total = paginator.num_items().await?;
        let movements = paginator.fetch_page(page.saturating_sub(1)).await?;
        Ok((movements, total))
    }

    /// Current stock posture across the whole registry, grouped by storage
    /// center with a status rollup.
    #[instrument(skip(self))]
    pub async fn stock_overview(&self) -> Result<StockOverview, ServiceError> {
        let ingredients = IngredientEntity::find()
            .filter(ingredient::Column::Status.eq("active"))
            .order_by_asc(ingredient::Column::Name)
            .all(&*self.db)
            .await?;

        let mut by_storage_center: BTreeMap<String, Vec<StockOverviewRow>> = BTreeMap::new();
        let mut summary = StockSummary {
            total_ingredients: 0,
            ok: 0,
            low: 0,
            critical: 0,
            excess: 0,
        };

        for ing in ingredients {
            let status = stock_status(ing.current_stock, ing.min_stock, ing.max_stock);
            summary.total_ingredients += 1;
            match status {
                StockStatus::Ok => summary.ok += 1,
                StockStatus::Low => summary.low += 1,
                StockStatus::Critical => summary.critical += 1,
                StockStatus::Excess => summary.excess += 1,
            }

            let group = ing
                .storage_center
                .clone()
                .unwrap_or_else(|| "unassigned".to_string());
            by_storage_center.entry(group).or_default().push(StockOverviewRow {
                ingredient_id: ing.id,
                name: ing.name,
                unit: ing.unit,
                current_stock: ing.current_stock,
                min_stock: ing.min_stock,
                max_stock: ing.max_stock,
                storage_center: ing.storage_center,
                status,
            });
        }

        Ok(StockOverview {
            by_storage_center,
            summary,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn status_bands() {
        assert_eq!(stock_status(dec!(10), dec!(5), None), StockStatus::Ok);
        assert_eq!(stock_status(dec!(4), dec!(5), None), StockStatus::Low);
        assert_eq!(stock_status(dec!(2), dec!(5), None), StockStatus::Critical);
        assert_eq!(stock_status(dec!(2.5), dec!(5), None), StockStatus::Low);
        assert_eq!(
            stock_status(dec!(20), dec!(5), Some(dec!(15))),
            StockStatus::Excess
        );
    }

    #[test]
    fn zero_minimum_never_flags_low() {
        assert_eq!(stock_status(dec!(0), dec!(0), None), StockStatus::Ok);
    }

    #[test]
    fn at_exact_minimum_is_ok() {
        assert_eq!(stock_status(dec!(5), dec!(5), None), StockStatus::Ok);
    }

    #[test]
    fn at_exact_maximum_is_ok() {
        assert_eq!(
            stock_status(dec!(15), dec!(5), Some(dec!(15))),
            StockStatus::Ok
        );
    }

    proptest! {
        #[test]
        fn critical_implies_low_threshold(current in 0u32..1000, min in 1u32..1000) {
            let current = Decimal::from(current);
            let min = Decimal::from(min);
            if stock_status(current, min, None) == StockStatus::Critical {
                prop_assert!(current < min);
            }
        }

        #[test]
        fn status_is_total(current in 0u32..1000, min in 0u32..1000) {
            // Never panics, always lands in one of the four bands.
            let _ = stock_status(Decimal::from(current), Decimal::from(min), None);
        }
    }
}
