use async_trait::async_trait;

use crate::error::AssetError;
use crate::value_objects::AssetRef;

#[async_trait]
pub trait AssetStore: Send + Sync {
    async fn delete_asset(&self, reference: &AssetRef) -> Result<(), AssetError>;
}
