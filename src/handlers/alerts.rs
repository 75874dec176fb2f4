use axum::{
    extract::{Path, Query, State},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use uuid::Uuid;

use super::common::{
    map_service_error, success_response, PaginatedResponse, PaginationParams,
};
use crate::{errors::ApiError, handlers::AppState};

#[derive(Debug, Deserialize)]
pub struct AlertFilters {
    pub status: Option<String>,
}

/// List alerts
#[utoipa::path(
    get,
    path = "/api/v1/alerts",
    params(
        PaginationParams,
        ("status" = Option<String>, Query, description = "Filter by status (active, resolved)")
    ),
    responses(
        (status = 200, description = "Alerts listed", body = serde_json::Value)
    ),
    tag = "alerts"
)]
pub async fn list_alerts(
    State(state): State<AppState>,
    Query(pagination): Query<PaginationParams>,
    Query(filters): Query<AlertFilters>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let (alerts, total) = state
        .services
        .alerts
        .list_alerts(filters.status, pagination.page, pagination.per_page)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(PaginatedResponse::new(
        alerts,
        pagination.page,
        pagination.per_page,
        total,
    )))
}

/// Resolve an alert
#[utoipa::path(
    post,
    path = "/api/v1/alerts/{id}/resolve",
    params(("id" = Uuid, Path, description = "Alert ID")),
    responses(
        (status = 200, description = "Alert resolved", body = serde_json::Value),
        (status = 404, description = "Alert not found", body = crate::errors::ErrorResponse),
        (status = 422, description = "Alert already resolved", body = crate::errors::ErrorResponse)
    ),
    tag = "alerts"
)]
pub async fn resolve_alert(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let alert = state
        .services
        .alerts
        .resolve_alert(id)
        .await
        .map_err(map_service_error)?;
    Ok(success_response(alert))
}

pub fn alert_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_alerts))
        .route("/{id}/resolve", post(resolve_alert))
}
