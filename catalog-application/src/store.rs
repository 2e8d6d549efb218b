//! Versioned in-memory catalog backed by an [`ItemRepository`].
//!
//! Reads are served from the in-memory snapshot. Every mutation takes the
//! single writer lock, persists the new collection, and only then swaps the
//! snapshot in, so a failed write leaves both memory and disk untouched.

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::{Mutex, RwLock};
use tracing::debug;

use catalog_domain::ports::ItemRepository;
use catalog_domain::{CatalogEntry, CatalogError, CatalogSnapshot, Item, ItemKey};

/// An entry taken out of the catalog together with the version that
/// removal produced.
#[derive(Debug, Clone)]
pub struct Removal {
    pub entry: CatalogEntry,
    pub version: u64,
}

pub struct ItemStore {
    repo: Arc<dyn ItemRepository>,
    snapshot: RwLock<CatalogSnapshot>,
    writer: Mutex<()>,
}

impl ItemStore {
    /// Loads the persisted collection. A missing collection yields an empty
    /// catalog at version 0.
    pub async fn load(repo: Arc<dyn ItemRepository>) -> Result<Self, CatalogError> {
        let items = repo
            .read_collection()
            .await
            .map_err(CatalogError::Persistence)?;
        let snapshot = CatalogSnapshot {
            version: 0,
            updated_at_ms: Utc::now().timestamp_millis(),
            entries: items.into_iter().map(CatalogEntry::new).collect(),
        };
        Ok(Self {
            repo,
            snapshot: RwLock::new(snapshot),
            writer: Mutex::new(()),
        })
    }

    pub async fn snapshot(&self) -> CatalogSnapshot {
        self.snapshot.read().await.clone()
    }

    pub async fn version(&self) -> u64 {
        self.snapshot.read().await.version
    }

    /// Re-reads the backing collection without touching the catalog. Used
    /// by readiness checks.
    pub async fn probe(&self) -> Result<usize, CatalogError> {
        self.repo
            .read_collection()
            .await
            .map(|items| items.len())
            .map_err(CatalogError::Persistence)
    }

    /// Substitutes the whole collection.
    pub async fn replace_all(
        &self,
        items: Vec<Item>,
        expected_version: Option<u64>,
    ) -> Result<CatalogSnapshot, CatalogError> {
        let _guard = self.writer.lock().await;
        let current = self.snapshot.read().await.version;
        check_version(expected_version, current)?;

        let entries: Vec<CatalogEntry> = items.into_iter().map(CatalogEntry::new).collect();
        self.commit(entries, current).await
    }

    /// Removes the entry at `index` in stored order.
    pub async fn delete_at(
        &self,
        index: usize,
        expected_version: Option<u64>,
    ) -> Result<Removal, CatalogError> {
        let _guard = self.writer.lock().await;
        let (mut entries, current) = self.entries_for_update(expected_version).await?;
        if index >= entries.len() {
            return Err(CatalogError::IndexOutOfRange {
                index,
                len: entries.len(),
            });
        }
        let entry = entries.remove(index);
        let snapshot = self.commit(entries, current).await?;
        Ok(Removal {
            entry,
            version: snapshot.version,
        })
    }

    /// Removes the entry with the given stable key.
    pub async fn delete_by_key(
        &self,
        key: ItemKey,
        expected_version: Option<u64>,
    ) -> Result<Removal, CatalogError> {
        let _guard = self.writer.lock().await;
        let (mut entries, current) = self.entries_for_update(expected_version).await?;
        let Some(index) = entries.iter().position(|entry| entry.key == key) else {
            return Err(CatalogError::NotFound(key));
        };
        let entry = entries.remove(index);
        let snapshot = self.commit(entries, current).await?;
        Ok(Removal {
            entry,
            version: snapshot.version,
        })
    }

    async fn entries_for_update(
        &self,
        expected_version: Option<u64>,
    ) -> Result<(Vec<CatalogEntry>, u64), CatalogError> {
        let snapshot = self.snapshot.read().await;
        check_version(expected_version, snapshot.version)?;
        Ok((snapshot.entries.clone(), snapshot.version))
    }

    // Caller must hold the writer lock.
    async fn commit(
        &self,
        entries: Vec<CatalogEntry>,
        current: u64,
    ) -> Result<CatalogSnapshot, CatalogError> {
        let items: Vec<Item> = entries.iter().map(|entry| entry.item.clone()).collect();
        self.repo
            .write_collection(&items)
            .await
            .map_err(CatalogError::Persistence)?;

        let next = CatalogSnapshot {
            version: current + 1,
            updated_at_ms: Utc::now().timestamp_millis(),
            entries,
        };
        *self.snapshot.write().await = next.clone();
        debug!(version = next.version, items = next.len(), "catalog committed");
        Ok(next)
    }
}

fn check_version(expected: Option<u64>, current: u64) -> Result<(), CatalogError> {
    match expected {
        Some(expected) if expected != current => {
            Err(CatalogError::VersionConflict { expected, current })
        }
        _ => Ok(()),
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Mutex as StdMutex;

    use async_trait::async_trait;
    use catalog_domain::ports::{AssetStore, ItemRepository};
    use catalog_domain::{AssetError, AssetRef, Item};

    #[derive(Default)]
    pub struct MemoryRepository {
        pub items: StdMutex<Vec<Item>>,
        pub writes: StdMutex<usize>,
        pub fail_writes: AtomicBool,
    }

    impl MemoryRepository {
        pub fn with_items(items: Vec<Item>) -> Self {
            Self {
                items: StdMutex::new(items),
                ..Self::default()
            }
        }

        pub fn stored(&self) -> Vec<Item> {
            self.items.lock().expect("items lock").clone()
        }

        pub fn set_failing(&self, failing: bool) {
            self.fail_writes.store(failing, Ordering::SeqCst);
        }
    }

    #[async_trait]
    impl ItemRepository for MemoryRepository {
        async fn read_collection(&self) -> anyhow::Result<Vec<Item>> {
            Ok(self.stored())
        }

        async fn write_collection(&self, items: &[Item]) -> anyhow::Result<()> {
            if self.fail_writes.load(Ordering::SeqCst) {
                anyhow::bail!("disk full");
            }
            *self.items.lock().expect("items lock") = items.to_vec();
            *self.writes.lock().expect("writes lock") += 1;
            Ok(())
        }
    }

    #[derive(Default)]
    pub struct RecordingAssetStore {
        pub deleted: StdMutex<Vec<AssetRef>>,
        pub fail: AtomicBool,
    }

    impl RecordingAssetStore {
        pub fn deleted(&self) -> Vec<AssetRef> {
            self.deleted.lock().expect("deleted lock").clone()
        }
    }

    #[async_trait]
    impl AssetStore for RecordingAssetStore {
        async fn delete_asset(&self, reference: &AssetRef) -> Result<(), AssetError> {
            self.deleted
                .lock()
                .expect("deleted lock")
                .push(reference.clone());
            if self.fail.load(Ordering::SeqCst) {
                return Err(AssetError::NotFound(reference.to_string()));
            }
            Ok(())
        }
    }

    pub fn named(names: &[&str]) -> Vec<Item> {
        names
            .iter()
            .map(|name| Item::new(*name, name.to_uppercase()))
            .collect()
    }
}
