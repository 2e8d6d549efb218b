use async_trait::async_trait;

use crate::entities::Item;

#[async_trait]
pub trait ItemRepository: Send + Sync {
    /// Returns the persisted collection, or an empty one when nothing has
    /// been written yet.
    async fn read_collection(&self) -> anyhow::Result<Vec<Item>>;
    /// Replaces the persisted collection. Either the whole write lands or
    /// the previous collection stays in place.
    async fn write_collection(&self, items: &[Item]) -> anyhow::Result<()>;
}
