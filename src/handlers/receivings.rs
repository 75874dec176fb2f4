use axum::{
    extract::{Json, Multipart, Path, Query, State},
    routing::{get, post, put},
    Router,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::info;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use super::common::{
    map_service_error, success_response, validate_input, PaginatedResponse, PaginationParams,
};
use crate::{
    entities::receiving_record::ReceivingStatus,
    errors::ApiError,
    handlers::AppState,
    services::receivings::{ChecklistItemUpdate, CompleteReceiving},
};

const MAX_PHOTO_BYTES: usize = 10 * 1024 * 1024;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ChecklistItemRequest {
    pub is_received: bool,
    pub received_qty: Option<Decimal>,
    #[validate(length(max = 500))]
    pub missing_reason: Option<String>,
    #[validate(length(max = 1000))]
    pub notes: Option<String>,
    #[validate(length(max = 100))]
    pub batch_number: Option<String>,
    pub expiry_date: Option<DateTime<Utc>>,
    pub storage_center: Option<String>,
    #[validate(length(min = 1))]
    pub checked_by: String,
    pub expected_version: Option<i64>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CompleteReceivingRequest {
    #[validate(length(min = 1))]
    pub completed_by: String,
    #[validate(length(max = 100))]
    pub invoice_number: Option<String>,
    #[validate(length(max = 1000))]
    pub general_notes: Option<String>,
    pub expected_version: Option<i64>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CancelReceivingRequest {
    #[validate(length(min = 1, max = 500))]
    pub reason: String,
    pub expected_version: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct ReceivingFilters {
    pub status: Option<String>,
    pub supplier_id: Option<Uuid>,
}

fn parse_status(raw: &str) -> Result<ReceivingStatus, ApiError> {
    match raw {
        "awaiting_delivery" => Ok(ReceivingStatus::AwaitingDelivery),
        "in_progress" => Ok(ReceivingStatus::InProgress),
        "completed" => Ok(ReceivingStatus::Completed),
        "cancelled" => Ok(ReceivingStatus::Cancelled),
        other => Err(ApiError::ValidationError(format!(
            "Unknown receiving status '{}'",
            other
        ))),
    }
}

/// List receivings
#[utoipa::path(
    get,
    path = "/api/v1/receivings",
    params(
        PaginationParams,
        ("status" = Option<String>, Query, description = "Filter by status"),
        ("supplier_id" = Option<Uuid>, Query, description = "Filter by supplier")
    ),
    responses(
        (status = 200, description = "Receivings listed", body = serde_json::Value)
    ),
    tag = "receivings"
)]
pub async fn list_receivings(
    State(state): State<AppState>,
    Query(pagination): Query<PaginationParams>,
    Query(filters): Query<ReceivingFilters>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let status = filters.status.as_deref().map(parse_status).transpose()?;

    let (records, total) = state
        .services
        .receivings
        .list_receivings(status, filters.supplier_id, pagination.page, pagination.per_page)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(PaginatedResponse::new(
        records,
        pagination.page,
        pagination.per_page,
        total,
    )))
}

/// Get a receiving with its checklist
#[utoipa::path(
    get,
    path = "/api/v1/receivings/{id}",
    params(("id" = Uuid, Path, description = "Receiving ID")),
    responses(
        (status = 200, description = "Receiving fetched", body = serde_json::Value),
        (status = 404, description = "Receiving not found", body = crate::errors::ErrorResponse)
    ),
    tag = "receivings"
)]
pub async fn get_receiving(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let (record, checklist) = state
        .services
        .receivings
        .get_receiving(id)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(serde_json::json!({
        "receiving": record,
        "checklist": checklist,
    })))
}

/// Record the operator's determination for one checklist line
#[utoipa::path(
    put,
    path = "/api/v1/receivings/{id}/checklist/{line_index}",
    request_body = ChecklistItemRequest,
    params(
        ("id" = Uuid, Path, description = "Receiving ID"),
        ("line_index" = i32, Path, description = "Checklist line index")
    ),
    responses(
        (status = 200, description = "Checklist line updated", body = serde_json::Value),
        (status = 404, description = "Receiving or line not found", body = crate::errors::ErrorResponse),
        (status = 409, description = "Stale version", body = crate::errors::ErrorResponse),
        (status = 422, description = "Receiving is no longer editable", body = crate::errors::ErrorResponse)
    ),
    tag = "receivings"
)]
pub async fn update_checklist_item(
    State(state): State<AppState>,
    Path((id, line_index)): Path<(Uuid, i32)>,
    Json(payload): Json<ChecklistItemRequest>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    validate_input(&payload)?;

    let update = ChecklistItemUpdate {
        is_received: payload.is_received,
        received_qty: payload.received_qty,
        missing_reason: payload.missing_reason,
        notes: payload.notes,
        batch_number: payload.batch_number,
        expiry_date: payload.expiry_date,
        storage_center: payload.storage_center,
        checked_by: payload.checked_by,
        expected_version: payload.expected_version,
    };

    let (record, item) = state
        .services
        .receivings
        .update_checklist_item(id, line_index, update)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(serde_json::json!({
        "receiving": record,
        "item": item,
    })))
}

/// Complete a receiving and post stock
#[utoipa::path(
    post,
    path = "/api/v1/receivings/{id}/complete",
    request_body = CompleteReceivingRequest,
    params(("id" = Uuid, Path, description = "Receiving ID")),
    responses(
        (status = 200, description = "Receiving completed", body = serde_json::Value),
        (status = 400, description = "Checklist incomplete", body = crate::errors::ErrorResponse),
        (status = 404, description = "Receiving not found", body = crate::errors::ErrorResponse),
        (status = 409, description = "Stale version", body = crate::errors::ErrorResponse),
        (status = 422, description = "Receiving already terminal", body = crate::errors::ErrorResponse)
    ),
    tag = "receivings"
)]
pub async fn complete_receiving(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<CompleteReceivingRequest>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    validate_input(&payload)?;

    let completed = state
        .services
        .receivings
        .complete_receiving(
            id,
            CompleteReceiving {
                completed_by: payload.completed_by,
                invoice_number: payload.invoice_number,
                general_notes: payload.general_notes,
                expected_version: payload.expected_version,
            },
        )
        .await
        .map_err(map_service_error)?;

    info!("Receiving completed: {}", id);
    Ok(success_response(completed))
}

/// Cancel a receiving without touching stock
#[utoipa::path(
    post,
    path = "/api/v1/receivings/{id}/cancel",
    request_body = CancelReceivingRequest,
    params(("id" = Uuid, Path, description = "Receiving ID")),
    responses(
        (status = 200, description = "Receiving cancelled", body = serde_json::Value),
        (status = 404, description = "Receiving not found", body = crate::errors::ErrorResponse),
        (status = 422, description = "Receiving already terminal", body = crate::errors::ErrorResponse)
    ),
    tag = "receivings"
)]
pub async fn cancel_receiving(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<CancelReceivingRequest>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    validate_input(&payload)?;

    let cancelled = state
        .services
        .receivings
        .cancel_receiving(id, payload.reason, payload.expected_version)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(cancelled))
}

/// Attach the supplier invoice photo
#[utoipa::path(
    post,
    path = "/api/v1/receivings/{id}/invoice-photo",
    request_body(content = Vec<u8>, content_type = "multipart/form-data"),
    params(("id" = Uuid, Path, description = "Receiving ID")),
    responses(
        (status = 200, description = "Photo attached", body = serde_json::Value),
        (status = 404, description = "Receiving not found", body = crate::errors::ErrorResponse),
        (status = 413, description = "Photo too large", body = crate::errors::ErrorResponse),
        (status = 415, description = "Unsupported image type", body = crate::errors::ErrorResponse)
    ),
    tag = "receivings"
)]
pub async fn upload_invoice_photo(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    mut multipart: Multipart,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let mut stored: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Malformed multipart body: {}", e)))?
    {
        if field.name() != Some("photo") {
            continue;
        }

        let extension = match field.content_type() {
            Some("image/jpeg") => "jpg",
            Some("image/png") => "png",
            Some("image/webp") => "webp",
            other => {
                return Err(ApiError::UnsupportedMediaType(format!(
                    "Invoice photo must be JPEG, PNG or WebP, got {}",
                    other.unwrap_or("no content type")
                )))
            }
        };

        let data = field
            .bytes()
            .await
            .map_err(|e| ApiError::BadRequest(format!("Failed to read photo: {}", e)))?;
        if data.len() > MAX_PHOTO_BYTES {
            return Err(ApiError::PayloadTooLarge(format!(
                "Invoice photo exceeds {} bytes",
                MAX_PHOTO_BYTES
            )));
        }

        let dir = std::path::Path::new(&state.config.media_root).join("invoices");
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|e| ApiError::InternalServerError(format!("Media storage error: {}", e)))?;

        let filename = format!("{}-{}.{}", id, Uuid::new_v4(), extension);
        tokio::fs::write(dir.join(&filename), &data)
            .await
            .map_err(|e| ApiError::InternalServerError(format!("Media storage error: {}", e)))?;

        stored = Some(format!("/media/invoices/{}", filename));
        break;
    }

    let url = stored
        .ok_or_else(|| ApiError::BadRequest("Missing 'photo' multipart field".to_string()))?;

    let record = state
        .services
        .receivings
        .record_invoice_photo(id, url)
        .await
        .map_err(map_service_error)?;

    info!("Invoice photo attached to receiving {}", id);
    Ok(success_response(record))
}

pub fn receiving_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_receivings))
        .route("/{id}", get(get_receiving))
        .route("/{id}/checklist/{line_index}", put(update_checklist_item))
        .route("/{id}/complete", post(complete_receiving))
        .route("/{id}/cancel", post(cancel_receiving))
        .route("/{id}/invoice-photo", post(upload_invoice_photo))
}
