// API payloads and runtime configuration

use serde::{Deserialize, Serialize};

use crate::entities::{CatalogEntry, Item};
use crate::error::ValidationIssue;
use crate::value_objects::ValidationPolicy;

/// Body of a save-all request. A bare JSON array is accepted as well as the
/// wrapped form carrying an optimistic-concurrency version.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ItemsPayload {
    Wrapped {
        items: Vec<Item>,
        #[serde(default)]
        expected_version: Option<u64>,
    },
    Bare(Vec<Item>),
}

impl ItemsPayload {
    pub fn into_parts(self) -> (Vec<Item>, Option<u64>) {
        match self {
            ItemsPayload::Wrapped {
                items,
                expected_version,
            } => (items, expected_version),
            ItemsPayload::Bare(items) => (items, None),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct MutationQuery {
    pub expected_version: Option<u64>,
}

/// Listing of the catalog in stored order. Each entry carries the `key`
/// accepted by delete-by-key.
#[derive(Debug, Serialize)]
pub struct ItemsResponse {
    pub version: u64,
    pub updated_at_ms: i64,
    pub entries: Vec<CatalogEntry>,
}

#[derive(Debug, Serialize)]
pub struct MutationResponse {
    pub version: u64,
}

/// Result of one export: the Lua source plus everything that was left out.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportReport {
    pub text: String,
    pub emitted: usize,
    pub skipped: Vec<ValidationIssue>,
}

#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub bind_addr: String,
    pub api_token: Option<String>,
    pub public_base_url: String,
    pub items_path: String,
    pub upload_dir: String,
    pub upload_url_prefix: String,
    pub export_validation_policy: ValidationPolicy,
    pub max_body_bytes: u64,
    pub request_timeout_seconds: u64,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:3000".to_string(),
            api_token: None,
            public_base_url: "http://127.0.0.1:3000".to_string(),
            items_path: "./data/items.json".to_string(),
            upload_dir: "./uploads".to_string(),
            upload_url_prefix: "/uploads/".to_string(),
            export_validation_policy: ValidationPolicy::Skip,
            max_body_bytes: 8 * 1024 * 1024,
            request_timeout_seconds: 15,
        }
    }
}
