use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::models::error::AppError;
use crate::models::history::HistoryItem;
use crate::models::preset::ResolvedParams;
use crate::models::style::Mode;
use crate::services::store::KvStore;

const HISTORY_KEY: &str = "artmorph_history_v2";

/// Index row: a history item minus its images.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct IndexEntry {
    id: String,
    mode: Mode,
    #[serde(rename = "timeISO")]
    time_iso: String,
    params: ResolvedParams,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    trace_id: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    warnings: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ItemImages {
    input_image_base64: String,
    output_image_base64: String,
}

impl IndexEntry {
    fn split(item: HistoryItem) -> (Self, ItemImages) {
        let images = ItemImages {
            input_image_base64: item.input_image_base64,
            output_image_base64: item.output_image_base64,
        };
        let entry = Self {
            id: item.id,
            mode: item.mode,
            time_iso: item.time_iso,
            params: item.params,
            trace_id: item.trace_id,
            warnings: item.warnings,
        };
        (entry, images)
    }

    fn join(self, images: ItemImages) -> HistoryItem {
        HistoryItem {
            id: self.id,
            mode: self.mode,
            time_iso: self.time_iso,
            input_image_base64: images.input_image_base64,
            output_image_base64: images.output_image_base64,
            params: self.params,
            trace_id: self.trace_id,
            warnings: self.warnings,
        }
    }
}

/// Most-recent-first list of completed stylize results, bounded per session.
///
/// The index document stays small; every item's images sit under their own
/// key and are only read when that item is.
pub struct HistoryStore {
    store: Arc<dyn KvStore>,
    limit: usize,
    // Serializes index read-modify-write across concurrent jobs.
    write_lock: Mutex<()>,
}

impl HistoryStore {
    pub fn new(store: Arc<dyn KvStore>, limit: usize) -> Self {
        Self {
            store,
            limit: limit.max(1),
            write_lock: Mutex::new(()),
        }
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    fn index_key(session: &str) -> String {
        format!("{}:{}", HISTORY_KEY, session)
    }

    fn images_key(session: &str, id: &str) -> String {
        format!("{}:{}:images:{}", HISTORY_KEY, session, id)
    }

    async fn index(&self, session: &str) -> Result<Vec<IndexEntry>, AppError> {
        match self.store.get(&Self::index_key(session)).await? {
            Some(raw) => serde_json::from_str(&raw)
                .map_err(|e| AppError::Internal(format!("Corrupt history for session: {}", e))),
            None => Ok(Vec::new()),
        }
    }

    async fn images(&self, session: &str, id: &str) -> Result<Option<ItemImages>, AppError> {
        match self.store.get(&Self::images_key(session, id)).await? {
            Some(raw) => serde_json::from_str(&raw).map(Some).map_err(|e| {
                AppError::Internal(format!("Corrupt history images for {}: {}", id, e))
            }),
            None => Ok(None),
        }
    }

    /// Items whose image record has gone missing are skipped.
    pub async fn list(&self, session: &str) -> Result<Vec<HistoryItem>, AppError> {
        let mut items = Vec::new();
        for entry in self.index(session).await? {
            match self.images(session, &entry.id).await? {
                Some(images) => items.push(entry.join(images)),
                None => warn!(id = %entry.id, "History images missing; skipping item"),
            }
        }
        Ok(items)
    }

    pub async fn get(&self, session: &str, id: &str) -> Result<HistoryItem, AppError> {
        let not_found = || AppError::NotFound(format!("history item {}", id));
        let entry = self
            .index(session)
            .await?
            .into_iter()
            .find(|entry| entry.id == id)
            .ok_or_else(not_found)?;
        let images = self.images(session, id).await?.ok_or_else(not_found)?;
        Ok(entry.join(images))
    }

    /// Inserts at the front and evicts the oldest entries beyond the limit.
    pub async fn append(&self, session: &str, item: HistoryItem) -> Result<(), AppError> {
        let (entry, images) = IndexEntry::split(item);
        let raw_images = serde_json::to_string(&images)
            .map_err(|e| AppError::Internal(format!("Failed to serialize history: {}", e)))?;

        let _guard = self.write_lock.lock().await;
        self.store.set(&Self::images_key(session, &entry.id), raw_images).await?;

        let mut index = self.index(session).await?;
        index.insert(0, entry);
        let evicted = if index.len() > self.limit {
            index.split_off(self.limit)
        } else {
            Vec::new()
        };

        let raw = serde_json::to_string(&index)
            .map_err(|e| AppError::Internal(format!("Failed to serialize history: {}", e)))?;
        self.store.set(&Self::index_key(session), raw).await?;

        if !evicted.is_empty() {
            debug!(evicted = evicted.len(), "History trimmed");
        }
        for old in evicted {
            self.store.remove(&Self::images_key(session, &old.id)).await?;
        }
        Ok(())
    }

    pub async fn clear(&self, session: &str) -> Result<(), AppError> {
        let _guard = self.write_lock.lock().await;
        for entry in self.index(session).await? {
            self.store.remove(&Self::images_key(session, &entry.id)).await?;
        }
        self.store.remove(&Self::index_key(session)).await
    }
}
