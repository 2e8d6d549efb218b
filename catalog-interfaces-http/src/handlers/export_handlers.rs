use axum::extract::State;
use axum::http::{header, HeaderMap, HeaderName, HeaderValue};
use axum::response::{IntoResponse, Response};

use catalog_application::dtos::ExportDocument;
use catalog_application::queries::item_queries;
use catalog_application::AppState;

use crate::error::HttpError;
use crate::middleware::{authorize, request_base_url};

const CHECKSUM_HEADER: &str = "x-content-sha256";
const SKIPPED_HEADER: &str = "x-skipped-items";

pub async fn export_items(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Response, HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    let base_url = request_base_url(&headers, &state.config.public_base_url);
    let document = item_queries::export_items(&state, &base_url).await?;
    Ok(attachment(document))
}

fn attachment(document: ExportDocument) -> Response {
    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static(document.content_type),
    );
    if let Ok(value) =
        HeaderValue::from_str(&format!("attachment; filename=\"{}\"", document.filename))
    {
        headers.insert(header::CONTENT_DISPOSITION, value);
    }
    if let Ok(value) = HeaderValue::from_str(&document.checksum_sha256) {
        headers.insert(HeaderName::from_static(CHECKSUM_HEADER), value);
    }
    headers.insert(
        HeaderName::from_static(SKIPPED_HEADER),
        HeaderValue::from(document.skipped.len()),
    );
    (headers, document.body).into_response()
}
