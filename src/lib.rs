/*!
Back-office API for restaurant inventory operations: purchase orders,
delivery receiving with reconciliation, the stock ledger, inventory
counts and operational alerts.
*/

use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};
use chrono::Utc;
use sea_orm::DatabaseConnection;
use serde::Serialize;
use serde_json::{json, Value};
use utoipa::ToSchema;

pub mod config;
pub mod db;
pub mod entities;
pub mod errors;
pub mod events;
pub mod handlers;
pub mod migrator;
pub mod openapi;
pub mod services;

/// Shared application state threaded through every handler.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DatabaseConnection>,
    pub config: config::AppConfig,
    pub event_sender: events::EventSender,
    pub services: handlers::AppServices,
}

// Common response wrappers
#[derive(Serialize, ToSchema)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<ResponseMeta>,
}

#[derive(Serialize, ToSchema)]
pub struct ResponseMeta {
    pub timestamp: String,
}

impl ResponseMeta {
    fn capture() -> Self {
        Self {
            timestamp: Utc::now().to_rfc3339(),
        }
    }
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
            meta: Some(ResponseMeta::capture()),
        }
    }

    pub fn error(message: String) -> Self {
        Self {
            success: false,
            data: None,
            message: Some(message),
            meta: Some(ResponseMeta::capture()),
        }
    }
}

/// All v1 API routes, nested under `/api/v1` by the binary.
pub fn api_v1_routes() -> Router<AppState> {
    Router::new()
        .nest(
            "/purchase-orders",
            handlers::purchase_orders::purchase_order_routes(),
        )
        .nest("/receivings", handlers::receivings::receiving_routes())
        .nest("/stock", handlers::stock::stock_routes())
        .nest(
            "/inventory-counts",
            handlers::inventory_counts::inventory_count_routes(),
        )
        .nest(
            "/storage-centers",
            handlers::storage_centers::storage_center_routes(),
        )
        .nest("/alerts", handlers::alerts::alert_routes())
        .nest("/ingredients", handlers::ingredients::ingredient_routes())
        .nest("/suppliers", handlers::suppliers::supplier_routes())
        .route("/status", get(api_status))
        .route("/health", get(health_check))
}

async fn api_status() -> Result<Json<ApiResponse<Value>>, errors::ServiceError> {
    let status_data = json!({
        "status": "ok",
        "service": "larder-api",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": Utc::now().to_rfc3339(),
    });
    Ok(Json(ApiResponse::success(status_data)))
}

async fn health_check(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Value>>, errors::ServiceError> {
    let db_status = match state.db.ping().await {
        Ok(_) => "healthy",
        Err(_) => "unhealthy",
    };

    let health_data = json!({
        "status": db_status,
        "checks": { "database": db_status },
        "timestamp": Utc::now().to_rfc3339(),
    });
    Ok(Json(ApiResponse::success(health_data)))
}

#[cfg(test)]
mod response_tests {
    use super::*;

    #[test]
    fn success_wraps_data_with_meta() {
        let resp = ApiResponse::success("ok");
        assert!(resp.success);
        assert_eq!(resp.data, Some("ok"));
        assert!(resp.meta.is_some());
    }

    #[test]
    fn error_carries_message_only() {
        let resp = ApiResponse::<()>::error("oops".into());
        assert!(!resp.success);
        assert!(resp.data.is_none());
        assert_eq!(resp.message.as_deref(), Some("oops"));
    }
}
