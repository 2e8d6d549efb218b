use anyhow::{anyhow, Result};

/// Accepts `scheme://authority` with an http(s) scheme and no path.
pub fn validate_base_url(value: &str) -> Result<()> {
    let trimmed = value.trim().trim_end_matches('/');
    let Some((scheme, authority)) = trimmed.split_once("://") else {
        return Err(anyhow!("base url must include a scheme"));
    };
    if scheme != "http" && scheme != "https" {
        return Err(anyhow!("unsupported scheme '{}'", scheme));
    }
    if authority.is_empty() {
        return Err(anyhow!("base url has no host"));
    }
    if authority.contains(['/', '?', '#']) {
        return Err(anyhow!("base url must not carry a path"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_scheme_and_authority() {
        assert!(validate_base_url("https://items.example").is_ok());
        assert!(validate_base_url("http://127.0.0.1:3000/").is_ok());
    }

    #[test]
    fn rejects_missing_scheme_or_path() {
        assert!(validate_base_url("items.example").is_err());
        assert!(validate_base_url("ftp://items.example").is_err());
        assert!(validate_base_url("https://").is_err());
        assert!(validate_base_url("https://items.example/app").is_err());
    }
}
