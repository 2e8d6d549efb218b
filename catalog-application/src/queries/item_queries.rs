use sha2::{Digest, Sha256};
use tracing::{info, warn};

use crate::dtos::ExportDocument;
use crate::AppError;
use crate::AppState;
use catalog_domain::{emit_items, ItemsResponse, ValidationPolicy};

pub async fn list_items(state: &AppState) -> ItemsResponse {
    let snapshot = state.store.snapshot().await;
    ItemsResponse {
        version: snapshot.version,
        updated_at_ms: snapshot.updated_at_ms,
        entries: snapshot.entries,
    }
}

/// Renders the current catalog with every asset URL rebased onto `base_url`.
pub async fn export_items(state: &AppState, base_url: &str) -> Result<ExportDocument, AppError> {
    export_items_with_policy(state, base_url, state.config.export_validation_policy).await
}

pub async fn export_items_with_policy(
    state: &AppState,
    base_url: &str,
    policy: ValidationPolicy,
) -> Result<ExportDocument, AppError> {
    let snapshot = state.store.snapshot().await;
    let report = emit_items(&snapshot.items(), base_url, policy)?;
    for issue in &report.skipped {
        warn!(index = issue.index, name = %issue.name, "item skipped in export: {}", issue.reason);
    }
    state.metrics.record_export(report.skipped.len());
    info!(
        version = snapshot.version,
        emitted = report.emitted,
        skipped = report.skipped.len(),
        base_url,
        "catalog exported"
    );

    let checksum = checksum_sha256(&report.text);
    Ok(ExportDocument::new(report, snapshot.version, checksum))
}

fn checksum_sha256(body: &str) -> String {
    let digest = Sha256::digest(body.as_bytes());
    let mut out = String::with_capacity(digest.len() * 2);
    for byte in digest {
        out.push_str(&format!("{:02x}", byte));
    }
    out
}
