use axum::routing::{delete, get};
use axum::Router;

use catalog_application::AppState;

use crate::handlers::{export_handlers, item_handlers, ops_handlers};

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(
            "/api/items",
            get(item_handlers::list_items).put(item_handlers::replace_items),
        )
        .route("/api/items/:index", delete(item_handlers::delete_item_at))
        .route(
            "/api/items/by-key/:key",
            delete(item_handlers::delete_item_by_key),
        )
        .route("/api/export", get(export_handlers::export_items))
        .route("/api/health/live", get(ops_handlers::health_live))
        .route("/api/health/ready", get(ops_handlers::health_ready))
        .route(
            "/api/metrics/prometheus",
            get(ops_handlers::metrics_prometheus),
        )
        .with_state(state)
}
