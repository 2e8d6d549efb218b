use std::io::Read;

use anyhow::{anyhow, Result};
use axum::http::HeaderMap;
use flate2::read::GzDecoder;

use catalog_domain::{ItemsPayload, RuntimeConfig};

pub fn authorize(config: &RuntimeConfig, headers: &HeaderMap) -> bool {
    if let Some(api_token) = &config.api_token {
        return extract_bearer(headers)
            .map(|v| v == *api_token)
            .unwrap_or(false);
    }
    true
}

/// Parses a save-all body, transparently inflating gzip uploads. The
/// inflated body may not exceed `max_bytes`.
pub fn parse_items_payload(
    headers: &HeaderMap,
    body: &[u8],
    max_bytes: u64,
) -> Result<ItemsPayload> {
    let content = maybe_gunzip(headers, body, max_bytes)?;
    Ok(serde_json::from_str(&content)?)
}

fn maybe_gunzip(headers: &HeaderMap, body: &[u8], max_bytes: u64) -> Result<String> {
    if let Some(encoding) = headers.get("Content-Encoding") {
        if encoding.to_str().unwrap_or("") == "gzip" {
            let mut decoder = GzDecoder::new(body).take(max_bytes.saturating_add(1));
            let mut out = Vec::new();
            decoder.read_to_end(&mut out)?;
            if out.len() as u64 > max_bytes {
                return Err(anyhow!("inflated body exceeds {} bytes", max_bytes));
            }
            return Ok(String::from_utf8(out)?);
        }
    }
    Ok(String::from_utf8(body.to_vec())?)
}

fn extract_bearer(headers: &HeaderMap) -> Option<String> {
    let value = headers.get("Authorization")?.to_str().ok()?.trim();
    let token = value.strip_prefix("Bearer ")?.trim();
    if token.is_empty() {
        return None;
    }
    Some(token.to_string())
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use axum::http::HeaderValue;
    use flate2::write::GzEncoder;
    use flate2::Compression;

    use super::*;

    fn config_with_token(token: Option<&str>) -> RuntimeConfig {
        RuntimeConfig {
            api_token: token.map(ToString::to_string),
            ..RuntimeConfig::default()
        }
    }

    #[test]
    fn open_when_no_token_configured() {
        assert!(authorize(&config_with_token(None), &HeaderMap::new()));
    }

    #[test]
    fn bearer_token_must_match() {
        let config = config_with_token(Some("s3cret"));
        let mut headers = HeaderMap::new();
        assert!(!authorize(&config, &headers));
        headers.insert("Authorization", HeaderValue::from_static("Bearer wrong"));
        assert!(!authorize(&config, &headers));
        headers.insert("Authorization", HeaderValue::from_static("Bearer s3cret"));
        assert!(authorize(&config, &headers));
    }

    #[test]
    fn gzip_bodies_are_inflated() {
        let json = br#"[{"name":"bread","label":"Bread"}]"#;
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(json).expect("compress");
        let body = encoder.finish().expect("finish");

        let mut headers = HeaderMap::new();
        headers.insert("Content-Encoding", HeaderValue::from_static("gzip"));
        let (items, expected_version) = parse_items_payload(&headers, &body, 1024)
            .expect("payload")
            .into_parts();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].name, "bread");
        assert_eq!(expected_version, None);
    }

    #[test]
    fn wrapped_payload_carries_version() {
        let body = br#"{"items":[],"expected_version":4}"#;
        let (items, expected_version) = parse_items_payload(&HeaderMap::new(), body, 1024)
            .expect("payload")
            .into_parts();
        assert!(items.is_empty());
        assert_eq!(expected_version, Some(4));
    }

    #[test]
    fn inflated_size_is_capped() {
        let json = format!(r#"[{{"name":"bread","label":"{}"}}]"#, "B".repeat(4096));
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(json.as_bytes()).expect("compress");
        let body = encoder.finish().expect("finish");
        assert!(body.len() < 1024);

        let mut headers = HeaderMap::new();
        headers.insert("Content-Encoding", HeaderValue::from_static("gzip"));
        let err = parse_items_payload(&headers, &body, 1024).expect_err("too large");
        assert!(err.to_string().contains("exceeds 1024 bytes"));
        assert!(parse_items_payload(&headers, &body, 8192).is_ok());
    }
}
