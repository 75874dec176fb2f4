use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Per-ingredient count line. `difference = counted_qty − system_qty`.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "inventory_count_items")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub count_id: Uuid,
    pub ingredient_id: Uuid,
    pub ingredient_name: String,
    pub system_qty: Decimal,
    pub counted_qty: Decimal,
    pub difference: Decimal,
    pub unit: String,
    pub notes: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::inventory_count::Entity",
        from = "Column::CountId",
        to = "super::inventory_count::Column::Id"
    )]
    InventoryCount,
}

impl Related<super::inventory_count::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::InventoryCount.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
