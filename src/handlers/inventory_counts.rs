use axum::{
    extract::{Json, Path, Query, State},
    routing::{get, post},
    Router,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use super::common::{
    created_response, map_service_error, success_response, validate_input, PaginatedResponse,
    PaginationParams,
};
use crate::{
    entities::inventory_count::InventoryCountStatus,
    errors::ApiError,
    handlers::AppState,
    services::inventory_counts::{CountItemInput, StartInventoryCount},
};

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct StartCountRequest {
    #[validate(length(min = 1, max = 50))]
    pub count_type: String,
    #[validate(length(min = 1))]
    pub storage_center: String,
    #[validate(length(min = 1))]
    pub counted_by: String,
    #[validate(length(max = 1000))]
    pub notes: Option<String>,
    #[validate(length(min = 1))]
    pub items: Vec<CountItemRequest>,
}

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct CountItemRequest {
    pub ingredient_id: Uuid,
    pub counted_qty: Decimal,
    #[validate(length(max = 500))]
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CompleteCountRequest {
    #[validate(length(min = 1))]
    pub approved_by: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CancelCountRequest {
    #[validate(length(min = 1, max = 500))]
    pub reason: String,
}

#[derive(Debug, Deserialize)]
pub struct CountFilters {
    pub status: Option<String>,
}

fn parse_status(raw: &str) -> Result<InventoryCountStatus, ApiError> {
    match raw {
        "in_progress" => Ok(InventoryCountStatus::InProgress),
        "completed" => Ok(InventoryCountStatus::Completed),
        "cancelled" => Ok(InventoryCountStatus::Cancelled),
        other => Err(ApiError::ValidationError(format!(
            "Unknown inventory count status '{}'",
            other
        ))),
    }
}

/// Start an inventory count
#[utoipa::path(
    post,
    path = "/api/v1/inventory-counts",
    request_body = StartCountRequest,
    responses(
        (status = 201, description = "Count started", body = serde_json::Value),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse)
    ),
    tag = "inventory-counts"
)]
pub async fn start_count(
    State(state): State<AppState>,
    Json(payload): Json<StartCountRequest>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    validate_input(&payload)?;

    let input = StartInventoryCount {
        count_type: payload.count_type,
        storage_center: payload.storage_center,
        counted_by: payload.counted_by,
        notes: payload.notes,
        items: payload
            .items
            .into_iter()
            .map(|i| CountItemInput {
                ingredient_id: i.ingredient_id,
                counted_qty: i.counted_qty,
                notes: i.notes,
            })
            .collect(),
    };

    let (count, items) = state
        .services
        .inventory_counts
        .start_count(input)
        .await
        .map_err(map_service_error)?;

    info!("Inventory count started: {}", count.id);
    Ok(created_response(serde_json::json!({
        "count": count,
        "items": items,
    })))
}

/// List inventory counts
#[utoipa::path(
    get,
    path = "/api/v1/inventory-counts",
    params(
        PaginationParams,
        ("status" = Option<String>, Query, description = "Filter by status")
    ),
    responses(
        (status = 200, description = "Counts listed", body = serde_json::Value)
    ),
    tag = "inventory-counts"
)]
pub async fn list_counts(
    State(state): State<AppState>,
    Query(pagination): Query<PaginationParams>,
    Query(filters): Query<CountFilters>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let status = filters.status.as_deref().map(parse_status).transpose()?;

    let (counts, total) = state
        .services
        .inventory_counts
        .list_counts(status, pagination.page, pagination.per_page)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(PaginatedResponse::new(
        counts,
        pagination.page,
        pagination.per_page,
        total,
    )))
}

/// Get an inventory count with its items
#[utoipa::path(
    get,
    path = "/api/v1/inventory-counts/{id}",
    params(("id" = Uuid, Path, description = "Inventory count ID")),
    responses(
        (status = 200, description = "Count fetched", body = serde_json::Value),
        (status = 404, description = "Count not found", body = crate::errors::ErrorResponse)
    ),
    tag = "inventory-counts"
)]
pub async fn get_count(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let (count, items) = state
        .services
        .inventory_counts
        .get_count(id)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(serde_json::json!({
        "count": count,
        "items": items,
    })))
}

/// Apply the count corrections to stock
#[utoipa::path(
    post,
    path = "/api/v1/inventory-counts/{id}/complete",
    request_body = CompleteCountRequest,
    params(("id" = Uuid, Path, description = "Inventory count ID")),
    responses(
        (status = 200, description = "Count applied", body = serde_json::Value),
        (status = 404, description = "Count not found", body = crate::errors::ErrorResponse),
        (status = 422, description = "Count no longer open", body = crate::errors::ErrorResponse)
    ),
    tag = "inventory-counts"
)]
pub async fn complete_count(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<CompleteCountRequest>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    validate_input(&payload)?;

    let count = state
        .services
        .inventory_counts
        .complete_count(id, payload.approved_by)
        .await
        .map_err(map_service_error)?;

    info!("Inventory count applied: {}", id);
    Ok(success_response(count))
}

/// Cancel an open count
#[utoipa::path(
    post,
    path = "/api/v1/inventory-counts/{id}/cancel",
    request_body = CancelCountRequest,
    params(("id" = Uuid, Path, description = "Inventory count ID")),
    responses(
        (status = 200, description = "Count cancelled", body = serde_json::Value),
        (status = 404, description = "Count not found", body = crate::errors::ErrorResponse),
        (status = 422, description = "Count no longer open", body = crate::errors::ErrorResponse)
    ),
    tag = "inventory-counts"
)]
pub async fn cancel_count(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<CancelCountRequest>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    validate_input(&payload)?;

    let count = state
        .services
        .inventory_counts
        .cancel_count(id, payload.reason)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(count))
}

pub fn inventory_count_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(start_count).get(list_counts))
        .route("/{id}", get(get_count))
        .route("/{id}/complete", post(complete_count))
        .route("/{id}/cancel", post(cancel_count))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn count_without_items_fails_validation() {
        let request = StartCountRequest {
            count_type: "general".to_string(),
            storage_center: "dry_storage".to_string(),
            counted_by: "ana".to_string(),
            notes: None,
            items: vec![],
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn count_with_an_item_passes_validation() {
        let request = StartCountRequest {
            count_type: "general".to_string(),
            storage_center: "dry_storage".to_string(),
            counted_by: "ana".to_string(),
            notes: None,
            items: vec![CountItemRequest {
                ingredient_id: Uuid::new_v4(),
                counted_qty: Decimal::from(3),
                notes: None,
            }],
        };
        assert!(request.validate().is_ok());
    }
}
