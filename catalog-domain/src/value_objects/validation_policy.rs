// Validation policy value object

use serde::{Deserialize, Serialize};

/// What an export does with an item that fails validation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationPolicy {
    /// Leave the item out and report it.
    #[default]
    Skip,
    /// Fail the whole export on the first invalid item.
    Abort,
}

impl ValidationPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValidationPolicy::Skip => "skip",
            ValidationPolicy::Abort => "abort",
        }
    }
}

impl From<&str> for ValidationPolicy {
    fn from(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "abort" => ValidationPolicy::Abort,
            _ => ValidationPolicy::Skip,
        }
    }
}
