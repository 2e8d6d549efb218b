use serde::Serialize;

use catalog_domain::{ExportReport, ValidationIssue, EXPORT_CONTENT_TYPE, EXPORT_FILENAME};

/// A rendered items file ready to be handed out as an attachment.
#[derive(Debug, Clone, Serialize)]
pub struct ExportDocument {
    pub filename: &'static str,
    pub content_type: &'static str,
    pub checksum_sha256: String,
    pub catalog_version: u64,
    pub emitted: usize,
    pub skipped: Vec<ValidationIssue>,
    #[serde(skip)]
    pub body: String,
}

impl ExportDocument {
    pub fn new(report: ExportReport, catalog_version: u64, checksum_sha256: String) -> Self {
        Self {
            filename: EXPORT_FILENAME,
            content_type: EXPORT_CONTENT_TYPE,
            checksum_sha256,
            catalog_version,
            emitted: report.emitted,
            skipped: report.skipped,
            body: report.text,
        }
    }
}
