use axum::extract::State;
use axum::http::{header, HeaderMap, HeaderValue, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;
use tokio::time::{timeout, Duration};
use tracing::{error, warn};

use catalog_application::AppState;

use crate::middleware::authorize;

pub async fn health_live() -> StatusCode {
    StatusCode::OK
}

/// Catalog readiness: the backing file must be readable, and the report says
/// whether it still holds as many items as the in-memory catalog.
#[derive(Debug, Serialize, PartialEq)]
pub struct ReadyReport {
    pub status: &'static str,
    pub version: u64,
    pub items: usize,
    pub stored_items: Option<usize>,
}

impl ReadyReport {
    fn new(version: u64, items: usize, stored_items: Option<usize>) -> Self {
        let status = match stored_items {
            None => "unavailable",
            Some(stored) if stored == items => "ready",
            Some(_) => "out_of_sync",
        };
        Self {
            status,
            version,
            items,
            stored_items,
        }
    }

    fn status_code(&self) -> StatusCode {
        if self.stored_items.is_some() {
            StatusCode::OK
        } else {
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}

pub async fn health_ready(State(state): State<AppState>) -> (StatusCode, Json<ReadyReport>) {
    let snapshot = state.store.snapshot().await;
    let limit = Duration::from_secs(state.config.request_timeout_seconds.max(1));
    let stored_items = match timeout(limit, state.store.probe()).await {
        Ok(Ok(count)) => Some(count),
        Ok(Err(err)) => {
            error!("catalog file unreadable: {}", err);
            None
        }
        Err(_) => {
            error!("catalog file read exceeded {}s", limit.as_secs());
            None
        }
    };
    let report = ReadyReport::new(snapshot.version, snapshot.len(), stored_items);
    if report.status == "out_of_sync" {
        warn!(
            items = report.items,
            stored_items = ?report.stored_items,
            "catalog file differs from loaded catalog"
        );
    }
    (report.status_code(), Json(report))
}

pub async fn metrics_prometheus(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> impl IntoResponse {
    if !authorize(&state.config, &headers) {
        return (StatusCode::UNAUTHORIZED, "unauthorized".to_string()).into_response();
    }
    let payload = state.metrics.render_prometheus();
    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("text/plain; version=0.0.4; charset=utf-8"),
    );
    (headers, payload).into_response()
}
