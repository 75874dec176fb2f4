use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Ingredient registry row. `current_stock` is the aggregate stock ledger
/// balance and is only mutated through the stock ledger service.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "ingredients")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    pub unit: String,
    pub category: Option<String>,
    pub current_stock: Decimal,
    pub min_stock: Decimal,
    pub max_stock: Option<Decimal>,
    pub storage_center: Option<String>,
    pub supplier_id: Option<Uuid>,
    pub status: String,
    pub last_stock_update: Option<DateTime<Utc>>,
    pub last_order_date: Option<DateTime<Utc>>,
    pub last_order_supplier: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::stock_movement::Entity")]
    StockMovements,
}

impl Related<super::stock_movement::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::StockMovements.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
