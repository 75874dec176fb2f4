use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder,
};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::{
    entities::{
        ingredient::{self, Entity as IngredientEntity},
        supplier::{self, Entity as SupplierEntity},
    },
    errors::ServiceError,
};

/// Input for registering an ingredient. `current_stock` seeds the opening
/// balance; all later changes go through the stock ledger.
#[derive(Debug, Clone)]
pub struct CreateIngredient {
    pub name: String,
    pub unit: String,
    pub category: Option<String>,
    pub current_stock: Decimal,
    pub min_stock: Decimal,
    pub max_stock: Option<Decimal>,
    pub storage_center: Option<String>,
    pub supplier_id: Option<Uuid>,
}

#[derive(Debug, Clone)]
pub struct CreateSupplier {
    pub name: String,
    pub contact_name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub delivery_time_days: Option<i32>,
}

/// Minimal CRUD over the ingredient and supplier registries. Just enough
/// surface for purchase-order validation and the stock ledger to work
/// against real rows.
#[derive(Clone)]
pub struct RegistryService {
    db: Arc<DatabaseConnection>,
}

impl RegistryService {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    #[instrument(skip(self, input), fields(name = %input.name))]
    pub async fn create_ingredient(
        &self,
        input: CreateIngredient,
    ) -> Result<ingredient::Model, ServiceError> {
        let name = input.name.trim().to_string();
        if name.is_empty() {
            return Err(ServiceError::ValidationError(
                "Ingredient name cannot be empty".to_string(),
            ));
        }
        if input.current_stock < Decimal::ZERO || input.min_stock < Decimal::ZERO {
            return Err(ServiceError::ValidationError(
                "Stock levels cannot be negative".to_string(),
            ));
        }
        if let Some(max) = input.max_stock {
            if max < input.min_stock {
                return Err(ServiceError::ValidationError(
                    "max_stock cannot be below min_stock".to_string(),
                ));
            }
        }

        if let Some(supplier_id) = input.supplier_id {
            SupplierEntity::find_by_id(supplier_id)
                .one(&*self.db)
                .await?
                .ok_or_else(|| {
                    ServiceError::ValidationError(format!("Supplier {} not found", supplier_id))
                })?;
        }

        let existing = IngredientEntity::find()
            .filter(ingredient::Column::Name.eq(name.clone()))
            .one(&*self.db)
            .await?;
        if existing.is_some() {
            return Err(ServiceError::Conflict(format!(
                "Ingredient '{}' already exists",
                name
            )));
        }

        let now = Utc::now();
        let model = ingredient::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(name.clone()),
            unit: Set(input.unit),
            category: Set(input.category),
            current_stock: Set(input.current_stock),
            min_stock: Set(input.min_stock),
            max_stock: Set(input.max_stock),
            storage_center: Set(input.storage_center),
            supplier_id: Set(input.supplier_id),
            status: Set("active".to_string()),
            last_stock_update: Set(None),
            last_order_date: Set(None),
            last_order_supplier: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        };
        let created = model.insert(&*self.db).await?;

        info!(ingredient_id = %created.id, "Ingredient registered");
        Ok(created)
    }

    pub async fn get_ingredient(&self, id: Uuid) -> Result<ingredient::Model, ServiceError> {
        IngredientEntity::find_by_id(id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Ingredient {} not found", id)))
    }

    pub async fn list_ingredients(
        &self,
        category: Option<String>,
        page: u64,
        per_page: u64,
    ) -> Result<(Vec<ingredient::Model>, u64), ServiceError> {
        let mut query = IngredientEntity::find().order_by_asc(ingredient::Column::Name);
        if let Some(category) = category {
            query = query.filter(ingredient::Column::Category.eq(category));
        }

        let paginator = query.paginate(&*self.db, per_page.max(1));
        let total = paginator.num_items().await?;
        let ingredients = paginator.fetch_page(page.saturating_sub(1)).await?;
        Ok((ingredients, total))
    }

    #[instrument(skip(self, input), fields(name = %input.name))]
    pub async fn create_supplier(
        &self,
        input: CreateSupplier,
    ) -> Result<supplier::Model, ServiceError> {
        let name = input.name.trim().to_string();
        if name.is_empty() {
            return Err(ServiceError::ValidationError(
                "Supplier name cannot be empty".to_string(),
            ));
        }
        if let Some(days) = input.delivery_time_days {
            if days < 0 {
                return Err(ServiceError::ValidationError(
                    "delivery_time_days cannot be negative".to_string(),
                ));
            }
        }

        let now = Utc::now();
        let model = supplier::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(name),
            contact_name: Set(input.contact_name),
            phone: Set(input.phone),
            email: Set(input.email),
            delivery_time_days: Set(input.delivery_time_days),
            status: Set("active".to_string()),
            created_at: Set(now),
            updated_at: Set(now),
        };
        let created = model.insert(&*self.db).await?;

        info!(supplier_id = %created.id, "Supplier registered");
        Ok(created)
    }

    pub async fn get_supplier(&self, id: Uuid) -> Result<supplier::Model, ServiceError> {
        SupplierEntity::find_by_id(id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Supplier {} not found", id)))
    }

    pub async fn list_suppliers(
        &self,
        status: Option<String>,
        page: u64,
        per_page: u64,
    ) -> Result<(Vec<supplier::Model>, u64), ServiceError> {
        let mut query = SupplierEntity::find().order_by_asc(supplier::Column::Name);
        if let Some(status) = status {
            query = query.filter(supplier::Column::Status.eq(status));
        }

        let paginator = query.paginate(&*self.db, per_page.max(1));
        let total = paginator.num_items().await?;
        let suppliers = paginator.fetch_page(page.saturating_sub(1)).await?;
        Ok((suppliers, total))
    }
}
