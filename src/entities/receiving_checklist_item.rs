use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// One checklist entry per purchase order line, addressed by
/// `(receiving_id, line_index)`.
///
/// Invariant: `received_qty` is zero whenever `is_received` is false.
/// `received_qty` may exceed `ordered_qty` (over-delivery).
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "receiving_checklist_items")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub receiving_id: Uuid,
    pub line_index: i32,
    pub ingredient_id: Uuid,
    pub ingredient_name: String,
    pub ordered_qty: Decimal,
    pub unit: String,
    pub unit_price: Decimal,
    /// Whether the operator has made a determination for this line.
    pub is_checked: bool,
    pub is_received: bool,
    pub received_qty: Decimal,
    pub missing_reason: Option<String>,
    pub notes: Option<String>,
    pub batch_number: Option<String>,
    pub expiry_date: Option<DateTime<Utc>>,
    pub storage_center: Option<String>,
    pub checked_at: Option<DateTime<Utc>>,
    pub checked_by: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::receiving_record::Entity",
        from = "Column::ReceivingId",
        to = "super::receiving_record::Column::Id"
    )]
    ReceivingRecord,
}

impl Related<super::receiving_record::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ReceivingRecord.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
