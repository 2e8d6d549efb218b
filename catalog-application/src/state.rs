use std::sync::Arc;

use catalog_domain::ports::AssetStore;
use catalog_domain::RuntimeConfig;

use crate::{ItemStore, Metrics};

#[derive(Clone)]
pub struct AppState {
    pub config: RuntimeConfig,
    pub store: Arc<ItemStore>,
    pub asset_store: Arc<dyn AssetStore>,
    pub metrics: Arc<Metrics>,
}
