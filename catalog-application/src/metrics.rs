use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug, Default)]
pub struct Metrics {
    exports: AtomicU64,
    export_skipped_items: AtomicU64,
    saves: AtomicU64,
    deletes: AtomicU64,
    asset_delete_failures: AtomicU64,
}

impl Metrics {
    pub fn record_export(&self, skipped: usize) {
        self.exports.fetch_add(1, Ordering::Relaxed);
        self.export_skipped_items
            .fetch_add(skipped as u64, Ordering::Relaxed);
    }

    pub fn record_save(&self) {
        self.saves.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_delete(&self) {
        self.deletes.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_asset_delete_failure(&self) {
        self.asset_delete_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn asset_delete_failures(&self) -> u64 {
        self.asset_delete_failures.load(Ordering::Relaxed)
    }

    pub fn render_prometheus(&self) -> String {
        let exports = self.exports.load(Ordering::Relaxed);
        let skipped = self.export_skipped_items.load(Ordering::Relaxed);
        let saves = self.saves.load(Ordering::Relaxed);
        let deletes = self.deletes.load(Ordering::Relaxed);
        let asset_failures = self.asset_delete_failures.load(Ordering::Relaxed);

        format!(
            "# TYPE itemforge_exports_total counter\n\
itemforge_exports_total {}\n\
# TYPE itemforge_export_skipped_items_total counter\n\
itemforge_export_skipped_items_total {}\n\
# TYPE itemforge_saves_total counter\n\
itemforge_saves_total {}\n\
# TYPE itemforge_deletes_total counter\n\
itemforge_deletes_total {}\n\
# TYPE itemforge_asset_delete_failures_total counter\n\
itemforge_asset_delete_failures_total {}\n",
            exports, skipped, saves, deletes, asset_failures
        )
    }
}
