use axum::{
    extract::{Json, Path, Query, State},
    routing::{get, post},
    Router,
};
use chrono::{DateTime, Utc};
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
    entities::purchase_order::PurchaseOrderStatus,
    errors::ApiError,
    handlers::AppState,
    services::purchase_orders::{CreatePurchaseOrder, NewOrderLine},
};

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreatePurchaseOrderRequest {
    pub supplier_id: Uuid,
    pub expected_delivery: DateTime<Utc>,
    #[validate(length(max = 1000))]
    pub notes: Option<String>,
    #[validate(length(min = 1))]
    pub created_by: String,
    #[validate(length(min = 1))]
    pub lines: Vec<OrderLineRequest>,
}

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct OrderLineRequest {
    pub ingredient_id: Uuid,
    pub quantity: Decimal,
    pub unit_price: Decimal,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CancelRequest {
    #[validate(length(min = 1, max = 500))]
    pub reason: String,
}

#[derive(Debug, Deserialize)]
pub struct PurchaseOrderFilters {
    pub status: Option<String>,
    pub supplier_id: Option<Uuid>,
}

fn parse_status(raw: &str) -> Result<PurchaseOrderStatus, ApiError> {
    match raw {
        "pending" => Ok(PurchaseOrderStatus::Pending),
        "partial" => Ok(PurchaseOrderStatus::Partial),
        "received" => Ok(PurchaseOrderStatus::Received),
        "cancelled" => Ok(PurchaseOrderStatus::Cancelled),
        other => Err(ApiError::ValidationError(format!(
            "Unknown purchase order status '{}'",
            other
        ))),
    }
}

/// Place a purchase order
#[utoipa::path(
    post,
    path = "/api/v1/purchase-orders",
    request_body = CreatePurchaseOrderRequest,
    responses(
        (status = 201, description = "Purchase order placed", body = serde_json::Value),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse),
        (status = 404, description = "Supplier or ingredient not found", body = crate::errors::ErrorResponse)
    ),
    tag = "purchase-orders"
)]
pub async fn create_purchase_order(
    State(state): State<AppState>,
    Json(payload): Json<CreatePurchaseOrderRequest>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    validate_input(&payload)?;

    let input = CreatePurchaseOrder {
        supplier_id: payload.supplier_id,
        expected_delivery: payload.expected_delivery,
        notes: payload.notes,
        created_by: payload.created_by,
        lines: payload
            .lines
            .into_iter()
            .map(|l| NewOrderLine {
                ingredient_id: l.ingredient_id,
                quantity: l.quantity,
                unit_price: l.unit_price,
            })
            .collect(),
    };

    let (order, lines) = state
        .services
        .purchase_orders
        .create_purchase_order(input)
        .await
        .map_err(map_service_error)?;

    info!("Purchase order placed: {}", order.order_number);

    Ok(created_response(serde_json::json!({
        "purchase_order": order,
        "lines": lines,
    })))
}

/// List purchase orders
#[utoipa::path(
    get,
    path = "/api/v1/purchase-orders",
    params(
        PaginationParams,
        ("status" = Option<String>, Query, description = "Filter by status"),
        ("supplier_id" = Option<Uuid>, Query, description = "Filter by supplier")
    ),
    responses(
        (status = 200, description = "Purchase orders listed", body = serde_json::Value)
    ),
    tag = "purchase-orders"
)]
pub async fn list_purchase_orders(
    State(state): State<AppState>,
    Query(pagination): Query<PaginationParams>,
    Query(filters): Query<PurchaseOrderFilters>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let status = filters.status.as_deref().map(parse_status).transpose()?;

    let (orders, total) = state
        .services
        .purchase_orders
        .list_purchase_orders(status, filters.supplier_id, pagination.page, pagination.per_page)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(PaginatedResponse::new(
        orders,
        pagination.page,
        pagination.per_page,
        total,
    )))
}

/// Get a purchase order with its lines
#[utoipa::path(
    get,
    path = "/api/v1/purchase-orders/{id}",
    params(("id" = Uuid, Path, description = "Purchase order ID")),
    responses(
        (status = 200, description = "Purchase order fetched", body = serde_json::Value),
        (status = 404, description = "Purchase order not found", body = crate::errors::ErrorResponse)
    ),
    tag = "purchase-orders"
)]
pub async fn get_purchase_order(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let (order, lines) = state
        .services
        .purchase_orders
        .get_purchase_order(id)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(serde_json::json!({
        "purchase_order": order,
        "lines": lines,
    })))
}

/// Cancel a purchase order and its linked receiving
#[utoipa::path(
    post,
    path = "/api/v1/purchase-orders/{id}/cancel",
    request_body = CancelRequest,
    params(("id" = Uuid, Path, description = "Purchase order ID")),
    responses(
        (status = 200, description = "Purchase order cancelled", body = serde_json::Value),
        (status = 404, description = "Purchase order not found", body = crate::errors::ErrorResponse),
        (status = 422, description = "Order already received or cancelled", body = crate::errors::ErrorResponse)
    ),
    tag = "purchase-orders"
)]
pub async fn cancel_purchase_order(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<CancelRequest>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    validate_input(&payload)?;

    let order = state
        .services
        .purchase_orders
        .cancel_purchase_order(id, payload.reason)
        .await
        .map_err(map_service_error)?;

    info!("Purchase order cancelled: {}", order.order_number);
    Ok(success_response(order))
}

pub fn purchase_order_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_purchase_order).get(list_purchase_orders))
        .route("/{id}", get(get_purchase_order))
        .route("/{id}/cancel", post(cancel_purchase_order))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_without_lines_fails_validation() {
        let request = CreatePurchaseOrderRequest {
            supplier_id: Uuid::new_v4(),
            expected_delivery: Utc::now(),
            notes: None,
            created_by: "ana".to_string(),
            lines: vec![],
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn order_with_a_line_passes_validation() {
        let request = CreatePurchaseOrderRequest {
            supplier_id: Uuid::new_v4(),
            expected_delivery: Utc::now(),
            notes: None,
            created_by: "ana".to_string(),
            lines: vec![OrderLineRequest {
                ingredient_id: Uuid::new_v4(),
                quantity: Decimal::from(5),
                unit_price: Decimal::from(2),
            }],
        };
        assert!(request.validate().is_ok());
    }
}
