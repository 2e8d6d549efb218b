use serde::Serialize;
use thiserror::Error;

use crate::value_objects::ItemKey;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("persistence failed: {0}")]
    Persistence(#[source] anyhow::Error),
    #[error("index {index} out of range for catalog of {len} items")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("item {0} not found")]
    NotFound(ItemKey),
    #[error("catalog version conflict: expected {expected}, current {current}")]
    VersionConflict { expected: u64, current: u64 },
    #[error("invalid item: {0}")]
    Validation(ValidationIssue),
}

/// Why an item cannot be emitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Error)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ValidationReason {
    #[error("name is missing")]
    MissingName,
    #[error("label is missing")]
    MissingLabel,
    #[error("name is already used by an earlier item")]
    DuplicateName,
    #[error("{field} must be a number")]
    InvalidNumber { field: String },
    #[error("status '{key}' must be a number, boolean or expression")]
    NonScalarStatus { key: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Error)]
#[error("item #{index} ('{name}'): {reason}")]
pub struct ValidationIssue {
    pub index: usize,
    pub name: String,
    pub reason: ValidationReason,
}

#[derive(Debug, Error)]
pub enum AssetError {
    #[error("asset not found: {0}")]
    NotFound(String),
    #[error("asset reference is not a stored upload: {0}")]
    InvalidReference(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
