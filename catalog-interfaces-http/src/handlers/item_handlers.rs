use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::http::HeaderMap;
use axum::Json;

use catalog_application::commands::item_commands;
use catalog_application::queries::item_queries;
use catalog_application::AppState;
use catalog_domain::{ItemsResponse, MutationQuery, MutationResponse};

use crate::error::HttpError;
use crate::middleware::{authorize, parse_items_payload};

pub async fn list_items(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<ItemsResponse>, HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    Ok(Json(item_queries::list_items(&state).await))
}

pub async fn replace_items(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<MutationResponse>, HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    let payload = parse_items_payload(&headers, &body, state.config.max_body_bytes)
        .map_err(|err| HttpError::BadRequest(err.to_string()))?;
    let response = item_commands::replace_items(&state, payload).await?;
    Ok(Json(response))
}

pub async fn delete_item_at(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(index): Path<usize>,
    Query(query): Query<MutationQuery>,
) -> Result<Json<MutationResponse>, HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    let response = item_commands::delete_item_at(&state, index, query).await?;
    Ok(Json(response))
}

pub async fn delete_item_by_key(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(key): Path<String>,
    Query(query): Query<MutationQuery>,
) -> Result<Json<MutationResponse>, HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    let response = item_commands::delete_item_by_key(&state, &key, query).await?;
    Ok(Json(response))
}
