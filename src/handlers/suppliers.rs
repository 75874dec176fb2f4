use axum::{
    extract::{Json, Path, Query, State},
    routing::get,
    Router,
};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use super::common::{
    created_response, map_service_error, success_response, validate_input, PaginatedResponse,
    PaginationParams,
};
use crate::{errors::ApiError, handlers::AppState, services::registry::CreateSupplier};

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateSupplierRequest {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(length(max = 200))]
    pub contact_name: Option<String>,
    #[validate(length(max = 50))]
    pub phone: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    pub delivery_time_days: Option<i32>,
}

#[derive(Debug, Deserialize)]
pub struct SupplierFilters {
    pub status: Option<String>,
}

/// Register a supplier
#[utoipa::path(
    post,
    path = "/api/v1/suppliers",
    request_body = CreateSupplierRequest,
    responses(
        (status = 201, description = "Supplier registered", body = serde_json::Value)
    ),
    tag = "registries"
)]
pub async fn create_supplier(
    State(state): State<AppState>,
    Json(payload): Json<CreateSupplierRequest>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    validate_input(&payload)?;

    let supplier = state
        .services
        .registry
        .create_supplier(CreateSupplier {
            name: payload.name,
            contact_name: payload.contact_name,
            phone: payload.phone,
            email: payload.email,
            delivery_time_days: payload.delivery_time_days,
        })
        .await
        .map_err(map_service_error)?;

    Ok(created_response(supplier))
}

/// List suppliers
#[utoipa::path(
    get,
    path = "/api/v1/suppliers",
    params(
        PaginationParams,
        ("status" = Option<String>, Query, description = "Filter by status (active, inactive)")
    ),
    responses(
        (status = 200, description = "Suppliers listed", body = serde_json::Value)
    ),
    tag = "registries"
)]
pub async fn list_suppliers(
    State(state): State<AppState>,
    Query(pagination): Query<PaginationParams>,
    Query(filters): Query<SupplierFilters>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let (suppliers, total) = state
        .services
        .registry
        .list_suppliers(filters.status, pagination.page, pagination.per_page)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(PaginatedResponse::new(
        suppliers,
        pagination.page,
        pagination.per_page,
        total,
    )))
}

/// Get a supplier
#[utoipa::path(
    get,
    path = "/api/v1/suppliers/{id}",
    params(("id" = Uuid, Path, description = "Supplier ID")),
    responses(
        (status = 200, description = "Supplier found", body = serde_json::Value),
        (status = 404, description = "Supplier not found", body = crate::errors::ErrorResponse)
    ),
    tag = "registries"
)]
pub async fn get_supplier(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let supplier = state
        .services
        .registry
        .get_supplier(id)
        .await
        .map_err(map_service_error)?;
    Ok(success_response(supplier))
}

pub fn supplier_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_suppliers).post(create_supplier))
        .route("/{id}", get(get_supplier))
}
