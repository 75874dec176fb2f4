use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Receiving record opened against a purchase order. The checklist rows in
/// `receiving_checklist_items` are exclusively owned by this record: created
/// once at open time, mutated in place, never added or removed afterwards.
///
/// `version` increments on every mutation and backs the optimistic
/// concurrency check on checklist updates and completion.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "receiving_records")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub purchase_id: Uuid,
    pub supplier_id: Uuid,
    pub supplier_name: String,
    pub receiving_date: DateTime<Utc>,
    pub invoice_number: Option<String>,
    pub invoice_photo_url: Option<String>,
    pub invoice_photo_uploaded_at: Option<DateTime<Utc>>,
    pub status: ReceivingStatus,
    /// Σ ordered_qty × unit_price over the checklist, fixed at open time.
    pub ordered_total_value: Decimal,
    /// Σ received_qty × unit_price, recomputed on every checklist update.
    pub received_total_value: Decimal,
    /// ordered_total_value − received_total_value. Negative means the
    /// supplier over-delivered and the difference is a credit.
    pub adjustment_value: Decimal,
    pub general_notes: Option<String>,
    pub cancel_reason: Option<String>,
    pub created_by: String,
    pub completed_by: Option<String>,
    pub completed_at: Option<DateTime<Utc>>,
    pub version: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Receiving lifecycle. Transitions are guarded: terminal states reject
/// every edit, and stock is only ever written on the single transition
/// into `Completed`.
#[derive(
    Copy, Clone, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "snake_case")]
pub enum ReceivingStatus {
    #[sea_orm(string_value = "awaiting_delivery")]
    AwaitingDelivery,
    #[sea_orm(string_value = "in_progress")]
    InProgress,
    #[sea_orm(string_value = "completed")]
    Completed,
    #[sea_orm(string_value = "cancelled")]
    Cancelled,
}

impl ReceivingStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }

    /// Whether the checklist may still be edited in this state.
    pub fn is_editable(self) -> bool {
        !self.is_terminal()
    }

    pub fn can_transition_to(self, next: Self) -> bool {
        match (self, next) {
            (Self::AwaitingDelivery, Self::InProgress) => true,
            (Self::AwaitingDelivery | Self::InProgress, Self::Completed) => true,
            (Self::AwaitingDelivery | Self::InProgress, Self::Cancelled) => true,
            _ => false,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::AwaitingDelivery => "awaiting_delivery",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::receiving_checklist_item::Entity")]
    ChecklistItems,
}

impl Related<super::receiving_checklist_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ChecklistItems.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[cfg(test)]
mod tests {
    use super::ReceivingStatus::*;
    use rstest::rstest;

    #[rstest]
    #[case(AwaitingDelivery, InProgress, true)]
    #[case(AwaitingDelivery, Completed, true)]
    #[case(AwaitingDelivery, Cancelled, true)]
    #[case(InProgress, Completed, true)]
    #[case(InProgress, Cancelled, true)]
    #[case(InProgress, AwaitingDelivery, false)]
    #[case(Completed, InProgress, false)]
    #[case(Completed, Cancelled, false)]
    #[case(Cancelled, InProgress, false)]
    #[case(Cancelled, Completed, false)]
    fn transition_guards(
        #[case] from: super::ReceivingStatus,
        #[case] to: super::ReceivingStatus,
        #[case] allowed: bool,
    ) {
        assert_eq!(from.can_transition_to(to), allowed);
    }

    #[test]
    fn terminal_states_are_not_editable() {
        assert!(AwaitingDelivery.is_editable());
        assert!(InProgress.is_editable());
        assert!(!Completed.is_editable());
        assert!(!Cancelled.is_editable());
    }
}
