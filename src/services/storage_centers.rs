use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::Utc;
use dashmap::DashMap;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder,
};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    entities::storage_center::{self, Entity as StorageCenterEntity},
    errors::ServiceError,
};

/// Option presented to clients when assigning a storage location.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CenterOption {
    pub value: String,
    pub label: String,
}

/// Directory of registered storage centers backed by the database, with an
/// in-process cache so validation on the hot checklist path does not hit
/// the database per item.
///
/// Cache coherence is per-instance: mutations invalidate the local cache
/// and the next read repopulates it.
#[derive(Clone)]
pub struct StorageCenterDirectory {
    db: Arc<DatabaseConnection>,
    cache: Arc<DashMap<String, String>>,
    populated: Arc<AtomicBool>,
}

impl StorageCenterDirectory {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self {
            db,
            cache: Arc::new(DashMap::new()),
            populated: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Active centers in display order.
    #[instrument(skip(self))]
    pub async fn list_centers(&self) -> Result<Vec<CenterOption>, ServiceError> {
        let centers = StorageCenterEntity::find()
            .filter(storage_center::Column::Active.eq(true))
            .order_by_asc(storage_center::Column::SortOrder)
            .order_by_asc(storage_center::Column::Label)
            .all(&*self.db)
            .await?;

        self.cache.clear();
        for center in &centers {
            self.cache.insert(center.value.clone(), center.label.clone());
        }
        self.populated.store(true, Ordering::Release);

        Ok(centers
            .into_iter()
            .map(|c| CenterOption {
                value: c.value,
                label: c.label,
            })
            .collect())
    }

    /// Whether `value` names a registered, active center.
    pub async fn is_registered(&self, value: &str) -> Result<bool, ServiceError> {
        if !self.populated.load(Ordering::Acquire) {
            self.list_centers().await?;
        }
        Ok(self.cache.contains_key(value))
    }

    /// Display label for a center value. Unregistered values fall back to a
    /// humanized form of the raw value so stale references still render.
    pub async fn label_for(&self, value: &str) -> Result<String, ServiceError> {
        if !self.populated.load(Ordering::Acquire) {
            self.list_centers().await?;
        }
        Ok(self
            .cache
            .get(value)
            .map(|entry| entry.value().clone())
            .unwrap_or_else(|| humanize(value)))
    }

    pub fn invalidate(&self) {
        self.cache.clear();
        self.populated.store(false, Ordering::Release);
    }

    #[instrument(skip(self))]
    pub async fn create_center(
        &self,
        value: String,
        label: String,
        sort_order: i32,
    ) -> Result<storage_center::Model, ServiceError> {
        let value = value.trim().to_lowercase().replace(' ', "_");
        if value.is_empty() {
            return Err(ServiceError::ValidationError(
                "Storage center value cannot be empty".to_string(),
            ));
        }

        let existing = StorageCenterEntity::find()
            .filter(storage_center::Column::Value.eq(value.clone()))
            .one(&*self.db)
            .await?;
        if existing.is_some() {
            return Err(ServiceError::Conflict(format!(
                "Storage center '{}' already exists",
                value
            )));
        }

        let center = storage_center::ActiveModel {
            id: Set(Uuid::new_v4()),
            value: Set(value.clone()),
            label: Set(label),
            sort_order: Set(sort_order),
            active: Set(true),
            created_at: Set(Utc::now()),
        };
        let created = center.insert(&*self.db).await?;

        self.invalidate();
        info!(value = %value, "Storage center registered");
        Ok(created)
    }

    /// Deactivates a center. Existing references keep rendering through the
    /// humanize fallback; new assignments are rejected.
    #[instrument(skip(self))]
    pub async fn deactivate_center(&self, id: Uuid) -> Result<(), ServiceError> {
        let center = StorageCenterEntity::find_by_id(id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Storage center {} not found", id)))?;

        let mut active: storage_center::ActiveModel = center.into();
        active.active = Set(false);
        active.update(&*self.db).await?;

        self.invalidate();
        Ok(())
    }
}

/// "camara_fria" -> "Camara Fria".
fn humanize(value: &str) -> String {
    value
        .split(['_', '-'])
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::humanize;

    #[test]
    fn humanize_splits_separators() {
        assert_eq!(humanize("camara_fria"), "Camara Fria");
        assert_eq!(humanize("dry-storage"), "Dry Storage");
        assert_eq!(humanize("freezer"), "Freezer");
    }

    #[test]
    fn humanize_ignores_empty_segments() {
        assert_eq!(humanize("__walk__in__"), "Walk In");
    }
}
