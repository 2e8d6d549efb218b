use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use tracing::info;

use catalog_application::{AppState, ItemStore, Metrics};
use catalog_infrastructure::{AppConfig, JsonItemRepository, UploadDirAssetStore};

pub struct AppContext {
    pub state: AppState,
}

impl AppContext {
    pub async fn new(config_path: Option<&Path>) -> Result<Self> {
        let config = AppConfig::load(config_path).await?;
        let runtime_config = config.to_runtime_config();

        let repo = Arc::new(JsonItemRepository::new(&runtime_config.items_path));
        let store = ItemStore::load(repo).await?;
        info!(
            path = %runtime_config.items_path,
            items = store.snapshot().await.len(),
            "item catalog loaded"
        );

        let asset_store = Arc::new(UploadDirAssetStore::new(
            &runtime_config.upload_dir,
            runtime_config.upload_url_prefix.clone(),
        ));

        let state = AppState {
            config: runtime_config,
            store: Arc::new(store),
            asset_store,
            metrics: Arc::new(Metrics::default()),
        };

        Ok(Self { state })
    }
}
