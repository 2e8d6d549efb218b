// Asset reference value object

use std::fmt;

use serde::{Deserialize, Serialize};

/// A URL pointing at an uploaded image. Stored values may carry whatever
/// host they were recorded against; only the path is meaningful.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssetRef(String);

impl AssetRef {
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Path and query of the reference with any scheme and authority
    /// stripped. Always starts with `/`.
    pub fn path(&self) -> String {
        let raw = self.0.as_str();
        let without_authority = if let Some(rest) = after_scheme(raw) {
            strip_authority(rest)
        } else if let Some(rest) = raw.strip_prefix("//") {
            strip_authority(rest)
        } else {
            raw
        };
        if without_authority.starts_with('/') {
            without_authority.to_string()
        } else {
            format!("/{without_authority}")
        }
    }

    /// Absolute URL of this asset under `base_url` (scheme + authority).
    ///
    /// Rebasing an already rebased reference onto the same base yields the
    /// same URL.
    pub fn rebase(&self, base_url: &str) -> String {
        format!("{}{}", base_url.trim().trim_end_matches('/'), self.path())
    }

    /// Final path segment, used to locate the stored file.
    pub fn file_name(&self) -> Option<String> {
        let path = self.path();
        let path = path.split(['?', '#']).next().unwrap_or_default();
        path.rsplit('/')
            .next()
            .filter(|name| !name.is_empty())
            .map(ToString::to_string)
    }
}

impl fmt::Display for AssetRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Text after `scheme://`, when the reference starts with a scheme. A `://`
/// appearing after the first `/`, `?` or `#` belongs to the path or query.
fn after_scheme(raw: &str) -> Option<&str> {
    let pos = raw.find("://")?;
    if raw[..pos].contains(['/', '?', '#']) {
        return None;
    }
    Some(&raw[pos + 3..])
}

fn strip_authority(rest: &str) -> &str {
    match rest.find(['/', '?', '#']) {
        Some(idx) => &rest[idx..],
        None => "",
    }
}
