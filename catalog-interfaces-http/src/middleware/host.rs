use axum::http::HeaderMap;

/// Scheme and authority the client reached us on, honouring reverse-proxy
/// forwarding headers. Falls back to `fallback` when no usable host is known.
///
/// A host carrying a path, query or fragment is ignored: the result must be
/// scheme and authority only for image URL rebasing to stay idempotent.
pub fn request_base_url(headers: &HeaderMap, fallback: &str) -> String {
    let host = first_value(headers, "X-Forwarded-Host")
        .filter(|host| is_authority(host))
        .or_else(|| first_value(headers, "Host").filter(|host| is_authority(host)));
    let Some(host) = host else {
        return fallback.trim_end_matches('/').to_string();
    };
    let scheme = first_value(headers, "X-Forwarded-Proto")
        .map(|proto| proto.to_ascii_lowercase())
        .filter(|proto| proto == "http" || proto == "https")
        .unwrap_or_else(|| "http".to_string());
    format!("{scheme}://{host}")
}

fn is_authority(host: &str) -> bool {
    !host.contains(['/', '?', '#', '@', '\\']) && !host.contains(char::is_whitespace)
}

fn first_value(headers: &HeaderMap, name: &str) -> Option<String> {
    let raw = headers.get(name)?.to_str().ok()?;
    let first = raw.split(',').next()?.trim();
    if first.is_empty() {
        None
    } else {
        Some(first.to_string())
    }
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    #[test]
    fn uses_host_header_directly() {
        let mut headers = HeaderMap::new();
        headers.insert("Host", HeaderValue::from_static("localhost:3000"));
        assert_eq!(
            request_base_url(&headers, "https://fallback.example"),
            "http://localhost:3000"
        );
    }

    #[test]
    fn forwarding_headers_win() {
        let mut headers = HeaderMap::new();
        headers.insert("Host", HeaderValue::from_static("10.0.0.4:3000"));
        headers.insert("X-Forwarded-Host", HeaderValue::from_static("items.example, proxy.internal"));
        headers.insert("X-Forwarded-Proto", HeaderValue::from_static("HTTPS,http"));
        assert_eq!(
            request_base_url(&headers, "https://fallback.example"),
            "https://items.example"
        );
    }

    #[test]
    fn falls_back_to_configured_url() {
        assert_eq!(
            request_base_url(&HeaderMap::new(), "https://fallback.example/"),
            "https://fallback.example"
        );
    }

    #[test]
    fn host_with_path_is_ignored() {
        let mut headers = HeaderMap::new();
        headers.insert("X-Forwarded-Host", HeaderValue::from_static("items.example/app"));
        assert_eq!(
            request_base_url(&headers, "https://fallback.example"),
            "https://fallback.example"
        );

        headers.insert("Host", HeaderValue::from_static("10.0.0.4:3000"));
        assert_eq!(
            request_base_url(&headers, "https://fallback.example"),
            "http://10.0.0.4:3000"
        );

        let mut headers = HeaderMap::new();
        headers.insert("Host", HeaderValue::from_static("items.example?x=1"));
        assert_eq!(
            request_base_url(&headers, "https://fallback.example"),
            "https://fallback.example"
        );
    }
}
