use axum::{
    extract::{Json, Path, Query, State},
    routing::get,
    Router,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use super::common::{
    created_response, map_service_error, success_response, validate_input, PaginatedResponse,
    PaginationParams,
};
use crate::{
    errors::ApiError,
    handlers::AppState,
    services::registry::CreateIngredient,
};

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateIngredientRequest {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(length(min = 1, max = 20))]
    pub unit: String,
    #[validate(length(max = 100))]
    pub category: Option<String>,
    #[serde(default)]
    pub current_stock: Decimal,
    #[serde(default)]
    pub min_stock: Decimal,
    pub max_stock: Option<Decimal>,
    pub storage_center: Option<String>,
    pub supplier_id: Option<Uuid>,
}

#[derive(Debug, Deserialize)]
pub struct IngredientFilters {
    pub category: Option<String>,
}

/// Register an ingredient
#[utoipa::path(
    post,
    path = "/api/v1/ingredients",
    request_body = CreateIngredientRequest,
    responses(
        (status = 201, description = "Ingredient registered", body = serde_json::Value),
        (status = 409, description = "Ingredient name already exists", body = crate::errors::ErrorResponse)
    ),
    tag = "registries"
)]
pub async fn create_ingredient(
    State(state): State<AppState>,
    Json(payload): Json<CreateIngredientRequest>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    validate_input(&payload)?;

    if let Some(center) = payload.storage_center.as_deref() {
        if !state
            .services
            .storage_centers
            .is_registered(center)
            .await
            .map_err(map_service_error)?
        {
            return Err(ApiError::ValidationError(format!(
                "Unknown storage center '{}'",
                center
            )));
        }
    }

    let ingredient = state
        .services
        .registry
        .create_ingredient(CreateIngredient {
            name: payload.name,
            unit: payload.unit,
            category: payload.category,
            current_stock: payload.current_stock,
            min_stock: payload.min_stock,
            max_stock: payload.max_stock,
            storage_center: payload.storage_center,
            supplier_id: payload.supplier_id,
        })
        .await
        .map_err(map_service_error)?;

    Ok(created_response(ingredient))
}

/// List ingredients
#[utoipa::path(
    get,
    path = "/api/v1/ingredients",
    params(
        PaginationParams,
        ("category" = Option<String>, Query, description = "Filter by category")
    ),
    responses(
        (status = 200, description = "Ingredients listed", body = serde_json::Value)
    ),
    tag = "registries"
)]
pub async fn list_ingredients(
    State(state): State<AppState>,
    Query(pagination): Query<PaginationParams>,
    Query(filters): Query<IngredientFilters>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let (ingredients, total) = state
        .services
        .registry
        .list_ingredients(filters.category, pagination.page, pagination.per_page)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(PaginatedResponse::new(
        ingredients,
        pagination.page,
        pagination.per_page,
        total,
    )))
}

/// Get an ingredient
#[utoipa::path(
    get,
    path = "/api/v1/ingredients/{id}",
    params(("id" = Uuid, Path, description = "Ingredient ID")),
    responses(
        (status = 200, description = "Ingredient found", body = serde_json::Value),
        (status = 404, description = "Ingredient not found", body = crate::errors::ErrorResponse)
    ),
    tag = "registries"
)]
pub async fn get_ingredient(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let ingredient = state
        .services
        .registry
        .get_ingredient(id)
        .await
        .map_err(map_service_error)?;
    Ok(success_response(ingredient))
}

pub fn ingredient_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_ingredients).post(create_ingredient))
        .route("/{id}", get(get_ingredient))
}
