use std::env;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Result};
use serde::Deserialize;
use tokio::fs;
use tracing::warn;

use catalog_domain::{RuntimeConfig, ValidationPolicy};

use crate::config::validation::validate_base_url;

pub const CONFIG_ENV: &str = "ITEMFORGE_CONFIG";
const DEFAULT_CONFIG_PATH: &str = "./config.toml";

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct AppConfig {
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

impl Default for AppConfig {
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

impl AppConfig {
    /// Loads configuration from `path`, or from `ITEMFORGE_CONFIG`, or from
    /// `./config.toml`. A missing file falls back to defaults.
    pub async fn load(path: Option<&Path>) -> Result<Self> {
        let file_path = match path {
            Some(path) => path.to_path_buf(),
            None => PathBuf::from(
                env::var(CONFIG_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string()),
            ),
        };
        let base_dir = file_path.parent();
        let mut config = if file_path.exists() {
            let content = fs::read_to_string(&file_path).await?;
            toml::from_str(&content)?
        } else {
            warn!(path = %file_path.display(), "config file not found, using defaults");
            AppConfig::default()
        };
        config.apply_env_overrides();
        config.resolve_paths(base_dir);
        config.normalize();
        config.validate()?;
        Ok(config)
    }

    pub fn normalize(&mut self) {
        if let Some(api_token) = &self.api_token {
            if api_token.trim().is_empty() {
                self.api_token = None;
            }
        }
        self.public_base_url = self.public_base_url.trim().trim_end_matches('/').to_string();
        let prefix = self.upload_url_prefix.trim().trim_matches('/');
        self.upload_url_prefix = if prefix.is_empty() {
            "/".to_string()
        } else {
            format!("/{prefix}/")
        };
        if self.request_timeout_seconds == 0 {
            self.request_timeout_seconds = 1;
        }
    }

    fn resolve_paths(&mut self, base_dir: Option<&Path>) {
        let Some(base) = base_dir else {
            return;
        };
        self.items_path = resolve_path(base, &self.items_path);
        self.upload_dir = resolve_path(base, &self.upload_dir);
    }

    pub fn validate(&self) -> Result<()> {
        self.bind_addr
            .parse::<std::net::SocketAddr>()
            .map_err(|err| anyhow!("invalid bind_addr: {}", err))?;
        validate_base_url(&self.public_base_url)
            .map_err(|err| anyhow!("invalid public_base_url: {}", err))?;
        if self.items_path.trim().is_empty() {
            return Err(anyhow!("items_path must not be empty"));
        }
        if self.max_body_bytes == 0 {
            return Err(anyhow!("max_body_bytes must be greater than 0"));
        }
        Ok(())
    }

    pub fn to_runtime_config(&self) -> RuntimeConfig {
        RuntimeConfig {
            bind_addr: self.bind_addr.clone(),
            api_token: self.api_token.clone(),
            public_base_url: self.public_base_url.clone(),
            items_path: self.items_path.clone(),
            upload_dir: self.upload_dir.clone(),
            upload_url_prefix: self.upload_url_prefix.clone(),
            export_validation_policy: self.export_validation_policy,
            max_body_bytes: self.max_body_bytes,
            request_timeout_seconds: self.request_timeout_seconds,
        }
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(value) = env::var("ITEMFORGE_BIND_ADDR") {
            self.bind_addr = value;
        }
        if let Ok(value) = env::var("ITEMFORGE_API_TOKEN") {
            self.api_token = Some(value);
        }
        if let Ok(value) = env::var("ITEMFORGE_PUBLIC_BASE_URL") {
            self.public_base_url = value;
        }
        if let Ok(value) = env::var("ITEMFORGE_ITEMS_PATH") {
            self.items_path = value;
        }
        if let Ok(value) = env::var("ITEMFORGE_UPLOAD_DIR") {
            self.upload_dir = value;
        }
        if let Ok(value) = env::var("ITEMFORGE_UPLOAD_URL_PREFIX") {
            self.upload_url_prefix = value;
        }
        if let Ok(value) = env::var("ITEMFORGE_EXPORT_VALIDATION_POLICY") {
            self.export_validation_policy = ValidationPolicy::from(value.as_str());
        }
        if let Ok(value) = env::var("ITEMFORGE_MAX_BODY_BYTES") {
            self.max_body_bytes = value.parse().unwrap_or(self.max_body_bytes);
        }
        if let Ok(value) = env::var("ITEMFORGE_REQUEST_TIMEOUT_SECONDS") {
            self.request_timeout_seconds = value.parse().unwrap_or(self.request_timeout_seconds);
        }
    }
}

fn resolve_path(base: &Path, value: &str) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return trimmed.to_string();
    }
    let path = Path::new(trimmed);
    if path.is_absolute() {
        trimmed.to_string()
    } else {
        base.join(path).to_string_lossy().to_string()
    }
}
