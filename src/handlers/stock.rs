use axum::{
    extract::{Json, Query, State},
    routing::{get, post},
    Router,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::info;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use super::common::{
    map_service_error, success_response, validate_input, PaginatedResponse, PaginationParams,
};
use crate::{errors::ApiError, handlers::AppState};

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct AdjustStockRequest {
    pub ingredient_id: Uuid,
    pub new_quantity: Decimal,
    #[validate(length(max = 500))]
    pub notes: Option<String>,
    #[validate(length(min = 1))]
    pub adjusted_by: String,
}

#[derive(Debug, Deserialize)]
pub struct MovementFilters {
    pub ingredient_id: Option<Uuid>,
    pub movement_type: Option<String>,
}

/// Stock posture grouped by storage center
#[utoipa::path(
    get,
    path = "/api/v1/stock/overview",
    responses(
        (status = 200, description = "Stock overview", body = crate::services::stock_ledger::StockOverview)
    ),
    tag = "stock"
)]
pub async fn stock_overview(
    State(state): State<AppState>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let overview = state
        .services
        .stock_ledger
        .stock_overview()
        .await
        .map_err(map_service_error)?;
    Ok(success_response(overview))
}

/// Stock movement history
#[utoipa::path(
    get,
    path = "/api/v1/stock/movements",
    params(
        PaginationParams,
        ("ingredient_id" = Option<Uuid>, Query, description = "Filter by ingredient"),
        ("movement_type" = Option<String>, Query, description = "Filter by movement type")
    ),
    responses(
        (status = 200, description = "Movements listed", body = serde_json::Value)
    ),
    tag = "stock"
)]
pub async fn list_movements(
    State(state): State<AppState>,
    Query(pagination): Query<PaginationParams>,
    Query(filters): Query<MovementFilters>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let (movements, total) = state
        .services
        .stock_ledger
        .list_movements(
            filters.ingredient_id,
            filters.movement_type,
            pagination.page,
            pagination.per_page,
        )
        .await
        .map_err(map_service_error)?;

    Ok(success_response(PaginatedResponse::new(
        movements,
        pagination.page,
        pagination.per_page,
        total,
    )))
}

/// Manual stock correction to an absolute quantity
#[utoipa::path(
    post,
    path = "/api/v1/stock/adjust",
    request_body = AdjustStockRequest,
    responses(
        (status = 200, description = "Stock adjusted", body = serde_json::Value),
        (status = 400, description = "Invalid quantity", body = crate::errors::ErrorResponse),
        (status = 404, description = "Ingredient not found", body = crate::errors::ErrorResponse)
    ),
    tag = "stock"
)]
pub async fn adjust_stock(
    State(state): State<AppState>,
    Json(payload): Json<AdjustStockRequest>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    validate_input(&payload)?;

    let change = state
        .services
        .stock_ledger
        .adjust_stock(
            payload.ingredient_id,
            payload.new_quantity,
            payload.notes,
            &payload.adjusted_by,
        )
        .await
        .map_err(map_service_error)?;

    info!(
        "Stock adjusted for {}: {} -> {}",
        change.ingredient.name, change.previous_stock, change.new_stock
    );

    Ok(success_response(serde_json::json!({
        "ingredient": change.ingredient,
        "previous_stock": change.previous_stock,
        "new_stock": change.new_stock,
    })))
}

pub fn stock_routes() -> Router<AppState> {
    Router::new()
        .route("/overview", get(stock_overview))
        .route("/movements", get(list_movements))
        .route("/adjust", post(adjust_stock))
}
