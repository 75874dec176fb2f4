use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::handlers;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Larder API",
        description = r#"
Back-office API for restaurant inventory operations.

- **Purchase orders**: place orders against suppliers; every order opens a
  receiving checklist immediately.
- **Receivings**: line-by-line delivery reconciliation with running
  ordered/received totals and a supplier adjustment value.
- **Stock**: append-only movement ledger, overview by storage center,
  manual corrections.
- **Inventory counts**: physical counts that set balances to the counted
  quantities when applied.
- **Alerts**: low-stock and missing-invoice-photo conditions surfaced to
  operators.
        "#
    ),
    paths(
        handlers::purchase_orders::create_purchase_order,
        handlers::purchase_orders::list_purchase_orders,
        handlers::purchase_orders::get_purchase_order,
        handlers::purchase_orders::cancel_purchase_order,
        handlers::receivings::list_receivings,
        handlers::receivings::get_receiving,
        handlers::receivings::update_checklist_item,
        handlers::receivings::complete_receiving,
        handlers::receivings::cancel_receiving,
        handlers::receivings::upload_invoice_photo,
        handlers::stock::stock_overview,
        handlers::stock::list_movements,
        handlers::stock::adjust_stock,
        handlers::inventory_counts::start_count,
        handlers::inventory_counts::list_counts,
        handlers::inventory_counts::get_count,
        handlers::inventory_counts::complete_count,
        handlers::inventory_counts::cancel_count,
        handlers::storage_centers::list_centers,
        handlers::storage_centers::create_center,
        handlers::storage_centers::deactivate_center,
        handlers::alerts::list_alerts,
        handlers::alerts::resolve_alert,
        handlers::ingredients::create_ingredient,
        handlers::ingredients::list_ingredients,
        handlers::ingredients::get_ingredient,
        handlers::suppliers::create_supplier,
        handlers::suppliers::list_suppliers,
        handlers::suppliers::get_supplier,
    ),
    tags(
        (name = "purchase-orders", description = "Purchase order lifecycle"),
        (name = "receivings", description = "Delivery receiving and reconciliation"),
        (name = "stock", description = "Stock ledger and overview"),
        (name = "inventory-counts", description = "Physical inventory counts"),
        (name = "storage-centers", description = "Storage center registry"),
        (name = "alerts", description = "Operational alerts"),
        (name = "registries", description = "Ingredient and supplier registries"),
    )
)]
pub struct ApiDoc;

/// Swagger UI mounted at `/docs`, serving the document at `/api-docs/openapi.json`.
pub fn swagger_ui() -> SwaggerUi {
    SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi())
}
