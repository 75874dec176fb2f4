use std::sync::Arc;

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder,
};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::{
    entities::alert::{self, Entity as AlertEntity},
    errors::ServiceError,
};

/// Alert to be materialized, produced by the event processor.
#[derive(Debug, Clone)]
pub struct AlertDraft {
    pub alert_type: String,
    pub priority: String,
    pub title: String,
    pub message: String,
    pub ingredient_id: Option<Uuid>,
    pub receiving_id: Option<Uuid>,
}

#[derive(Clone)]
pub struct AlertService {
    db: Arc<DatabaseConnection>,
}

impl AlertService {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Persists an alert row. Repeated low-stock events for the same
    /// ingredient collapse onto the open alert instead of piling up.
    #[instrument(skip(self, draft), fields(alert_type = %draft.alert_type))]
    pub async fn record(&self, draft: AlertDraft) -> Result<alert::Model, ServiceError> {
        if let Some(ingredient_id) = draft.ingredient_id {
            let open = AlertEntity::find()
                .filter(alert::Column::IngredientId.eq(ingredient_id))
                .filter(alert::Column::AlertType.eq(draft.alert_type.clone()))
                .filter(alert::Column::Status.eq("active"))
                .one(&*self.db)
                .await?;
            if let Some(existing) = open {
                let mut active: alert::ActiveModel = existing.into();
                active.message = Set(draft.message);
                active.priority = Set(draft.priority);
                let updated = active.update(&*self.db).await?;
                return Ok(updated);
            }
        }

        let row = alert::ActiveModel {
            id: Set(Uuid::new_v4()),
            alert_type: Set(draft.alert_type),
            priority: Set(draft.priority),
            status: Set("active".to_string()),
            title: Set(draft.title),
            message: Set(draft.message),
            ingredient_id: Set(draft.ingredient_id),
            receiving_id: Set(draft.receiving_id),
            created_at: Set(Utc::now()),
            resolved_at: Set(None),
        };
        let created = row.insert(&*self.db).await?;
        info!(alert_id = %created.id, "Alert recorded");
        Ok(created)
    }

    #[instrument(skip(self))]
    pub async fn list_alerts(
        &self,
        status: Option<String>,
        page: u64,
        per_page: u64,
    ) -> Result<(Vec<alert::Model>, u64), ServiceError> {
        let mut query = AlertEntity::find().order_by_desc(alert::Column::CreatedAt);
        if let Some(status) = status {
            query = query.filter(alert::Column::Status.eq(status));
        }

        let paginator = query.paginate(&*self.db, per_page.max(1));
        let total = paginator.num_items().await?;
        let alerts = paginator.fetch_page(page.saturating_sub(1)).await?;
        Ok((alerts, total))
    }

    pub async fn get_alert(&self, id: Uuid) -> Result<alert::Model, ServiceError> {
        AlertEntity::find_by_id(id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Alert {} not found", id)))
    }

    #[instrument(skip(self))]
    pub async fn resolve_alert(&self, id: Uuid) -> Result<alert::Model, ServiceError> {
        let alert = self.get_alert(id).await?;
        if alert.status == "resolved" {
            return Err(ServiceError::InvalidState(format!(
                "Alert {} is already resolved",
                id
            )));
        }

        let mut active: alert::ActiveModel = alert.into();
        active.status = Set("resolved".to_string());
        active.resolved_at = Set(Some(Utc::now()));
        let updated = active.update(&*self.db).await?;
        info!(alert_id = %id, "Alert resolved");
        Ok(updated)
    }
}
