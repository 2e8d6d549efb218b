use tracing::{info, warn};

use crate::store::Removal;
use crate::AppError;
use crate::AppState;
use catalog_domain::{AssetRef, Item, ItemKey, ItemsPayload, MutationQuery, MutationResponse};

pub async fn replace_items(
    state: &AppState,
    payload: ItemsPayload,
) -> Result<MutationResponse, AppError> {
    let (items, expected_version) = payload.into_parts();
    let items = items
        .into_iter()
        .map(Item::normalized)
        .collect::<Vec<_>>();
    let count = items.len();

    let snapshot = state.store.replace_all(items, expected_version).await?;
    state.metrics.record_save();
    info!(items = count, version = snapshot.version, "catalog replaced");
    Ok(MutationResponse {
        version: snapshot.version,
    })
}

pub async fn delete_item_at(
    state: &AppState,
    index: usize,
    query: MutationQuery,
) -> Result<MutationResponse, AppError> {
    let removal = state.store.delete_at(index, query.expected_version).await?;
    info!(index, name = %removal.entry.item.name, version = removal.version, "item deleted");
    finish_removal(state, removal).await
}

pub async fn delete_item_by_key(
    state: &AppState,
    key: &str,
    query: MutationQuery,
) -> Result<MutationResponse, AppError> {
    let key: ItemKey = key
        .parse()
        .map_err(|_| AppError::BadRequest(format!("invalid item key '{key}'")))?;
    let removal = state.store.delete_by_key(key, query.expected_version).await?;
    info!(%key, name = %removal.entry.item.name, version = removal.version, "item deleted");
    finish_removal(state, removal).await
}

async fn finish_removal(state: &AppState, removal: Removal) -> Result<MutationResponse, AppError> {
    state.metrics.record_delete();
    remove_image_asset(state, &removal.entry.item).await;
    Ok(MutationResponse {
        version: removal.version,
    })
}

/// Deletes the uploaded image of a removed item. Failures are logged and
/// counted but never undo the item deletion.
async fn remove_image_asset(state: &AppState, item: &Item) {
    let Some(reference) = item.image_reference().and_then(AssetRef::parse) else {
        return;
    };
    match state.asset_store.delete_asset(&reference).await {
        Ok(()) => info!(asset = %reference, "item image removed"),
        Err(err) => {
            state.metrics.record_asset_delete_failure();
            warn!(asset = %reference, item = %item.name, "failed to remove item image: {}", err);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::Ordering;
    use std::sync::Arc;

    use serde_json::json;

    use super::*;
    use crate::queries::item_queries::list_items;
    use crate::store::testing::{named, MemoryRepository, RecordingAssetStore};
    use crate::{ItemStore, Metrics};
    use catalog_domain::{CatalogError, RuntimeConfig};

    async fn state_with(
        items: Vec<Item>,
    ) -> (AppState, Arc<MemoryRepository>, Arc<RecordingAssetStore>) {
        let repo = Arc::new(MemoryRepository::with_items(items));
        let assets = Arc::new(RecordingAssetStore::default());
        let store = ItemStore::load(repo.clone()).await.expect("load");
        let state = AppState {
            config: RuntimeConfig::default(),
            store: Arc::new(store),
            asset_store: assets.clone(),
            metrics: Arc::new(Metrics::default()),
        };
        (state, repo, assets)
    }

    fn with_image(name: &str, url: &str) -> Item {
        serde_json::from_value(json!({
            "name": name,
            "label": name,
            "client": { "imageurl": url }
        }))
        .expect("item")
    }

    #[tokio::test]
    async fn deleting_item_with_image_removes_asset_once() {
        let url = "http://localhost:3000/uploads/1700-water.png";
        let (state, _, assets) = state_with(vec![with_image("water", url)]).await;

        delete_item_at(&state, 0, MutationQuery::default())
            .await
            .expect("delete");
        let deleted = assets.deleted();
        assert_eq!(deleted.len(), 1);
        assert_eq!(deleted[0].as_str(), url);
    }

    #[tokio::test]
    async fn deleting_item_without_image_touches_no_asset() {
        let (state, _, assets) = state_with(named(&["bread"])).await;
        delete_item_at(&state, 0, MutationQuery::default())
            .await
            .expect("delete");
        assert!(assets.deleted().is_empty());
    }

    #[tokio::test]
    async fn asset_failure_does_not_abort_deletion() {
        let (state, repo, assets) =
            state_with(vec![with_image("radio", "/uploads/radio.png")]).await;
        assets.fail.store(true, Ordering::SeqCst);

        let response = delete_item_at(&state, 0, MutationQuery::default())
            .await
            .expect("delete succeeds");
        assert_eq!(response.version, 1);
        assert!(repo.stored().is_empty());
        assert_eq!(state.metrics.asset_delete_failures(), 1);
    }

    #[tokio::test]
    async fn out_of_range_delete_surfaces_error() {
        let (state, _, assets) = state_with(named(&["a"])).await;
        let err = delete_item_at(&state, 5, MutationQuery::default())
            .await
            .expect_err("out of range");
        assert!(matches!(
            err,
            AppError::Catalog(CatalogError::IndexOutOfRange { index: 5, len: 1 })
        ));
        assert!(assets.deleted().is_empty());
    }

    #[tokio::test]
    async fn replace_items_normalizes_input() {
        let (state, repo, _) = state_with(Vec::new()).await;
        let payload: ItemsPayload = serde_json::from_value(json!([
            { "name": " burger ", "label": "Burger ", "client": { "anim": " " } }
        ]))
        .expect("payload");

        let response = replace_items(&state, payload).await.expect("replace");
        assert_eq!(response.version, 1);
        let stored = repo.stored();
        assert_eq!(stored[0].name, "burger");
        assert_eq!(stored[0].label, "Burger");
        assert!(stored[0].client.is_none());
    }

    #[tokio::test]
    async fn wrapped_payload_checks_version() {
        let (state, _, _) = state_with(named(&["a"])).await;
        let payload: ItemsPayload = serde_json::from_value(json!({
            "items": [{ "name": "b", "label": "B" }],
            "expected_version": 7
        }))
        .expect("payload");
        let err = replace_items(&state, payload).await.expect_err("conflict");
        assert!(matches!(
            err,
            AppError::Catalog(CatalogError::VersionConflict { expected: 7, current: 0 })
        ));
    }

    #[tokio::test]
    async fn delete_by_key_rejects_malformed_key() {
        let (state, _, _) = state_with(named(&["a"])).await;
        let err = delete_item_by_key(&state, "not-a-key", MutationQuery::default())
            .await
            .expect_err("bad key");
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[tokio::test]
    async fn delete_by_key_removes_matching_entry() {
        let (state, repo, _) = state_with(named(&["a", "b"])).await;
        let key = state.store.snapshot().await.entries[1].key.to_string();
        delete_item_by_key(&state, &key, MutationQuery::default())
            .await
            .expect("delete");
        let names: Vec<String> = repo.stored().into_iter().map(|item| item.name).collect();
        assert_eq!(names, vec!["a"]);
    }

    #[tokio::test]
    async fn listed_key_deletes_matching_entry() {
        let (state, repo, _) = state_with(named(&["a", "b"])).await;
        let listed = serde_json::to_value(list_items(&state).await).expect("serialize");
        let key = listed["entries"][1]["key"]
            .as_str()
            .expect("listed key")
            .to_string();
        assert_eq!(listed["entries"][1]["name"], "b");

        delete_item_by_key(&state, &key, MutationQuery::default())
            .await
            .expect("delete");
        let names: Vec<String> = repo.stored().into_iter().map(|item| item.name).collect();
        assert_eq!(names, vec!["a"]);
    }
}
