use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tracing::debug;

use catalog_domain::{Item, ItemRepository};

/// Stores the catalog as a single JSON array on disk.
pub struct JsonItemRepository {
    path: PathBuf,
}

impl JsonItemRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|name| name.to_os_string())
            .unwrap_or_else(|| "items.json".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

#[async_trait]
impl ItemRepository for JsonItemRepository {
    async fn read_collection(&self) -> anyhow::Result<Vec<Item>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let content = fs::read_to_string(&self.path).await?;
        if content.trim().is_empty() {
            return Ok(Vec::new());
        }
        let items: Vec<Item> = serde_json::from_str(&content)?;
        debug!(path = %self.path.display(), items = items.len(), "loaded item collection");
        Ok(items)
    }

    async fn write_collection(&self, items: &[Item]) -> anyhow::Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }
        let content = serde_json::to_string_pretty(items)?;
        let temp_path = self.temp_path();
        fs::write(&temp_path, content).await?;
        if let Err(err) = fs::rename(&temp_path, &self.path).await {
            let _ = fs::remove_file(&temp_path).await;
            return Err(err.into());
        }
        debug!(path = %self.path.display(), items = items.len(), "saved item collection");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Vec<Item> {
        serde_json::from_value(json!([
            { "name": "burger", "label": "Burger", "weight": 220,
              "client": { "status": { "hunger": 200000, "thirst": -10000 } } },
            { "name": "phone", "label": "Phone", "stack": false,
              "buttons": [{ "label": "Call", "group": "", "action": "call" }] }
        ]))
        .expect("items")
    }

    #[tokio::test]
    async fn missing_file_reads_as_empty() {
        let dir = tempfile::tempdir().expect("tempdir");
        let repo = JsonItemRepository::new(dir.path().join("items.json"));
        assert!(repo.read_collection().await.expect("read").is_empty());
    }

    #[tokio::test]
    async fn write_then_read_preserves_order() {
        let dir = tempfile::tempdir().expect("tempdir");
        let repo = JsonItemRepository::new(dir.path().join("nested/items.json"));
        repo.write_collection(&sample()).await.expect("write");

        let loaded = repo.read_collection().await.expect("read");
        assert_eq!(loaded, sample());
        let status_keys: Vec<String> = loaded[0]
            .client
            .as_ref()
            .map(|client| client.status.keys().cloned().collect())
            .unwrap_or_default();
        assert_eq!(status_keys, vec!["hunger", "thirst"]);
        assert!(!dir.path().join("nested/items.json.tmp").exists());
    }

    #[tokio::test]
    async fn failed_write_leaves_previous_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("items.json");
        let repo = JsonItemRepository::new(&path);
        repo.write_collection(&sample()).await.expect("write");

        // A directory squatting on the temp path makes the next write fail.
        std::fs::create_dir(dir.path().join("items.json.tmp")).expect("block temp path");
        assert!(repo.write_collection(&[]).await.is_err());
        assert_eq!(repo.read_collection().await.expect("read"), sample());
    }

    #[tokio::test]
    async fn corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("items.json");
        std::fs::write(&path, "{ not json").expect("write");
        let repo = JsonItemRepository::new(&path);
        assert!(repo.read_collection().await.is_err());
    }
}
