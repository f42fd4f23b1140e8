use std::sync::Arc;
use tracing::{debug, info};

use crate::cache::ItemCache;
use crate::error::Result;
use crate::hn_client::HackerNewsApi;
use crate::models::{ItemId, ItemRecord};

/// Resolves item ids to records, going through the shared [`ItemCache`].
///
/// Concurrent lookups of the same id may both miss and both hit the remote;
/// the last write wins.
#[derive(Clone)]
pub struct ItemFetcher {
    api: Arc<dyn HackerNewsApi>,
    cache: Arc<ItemCache>,
}

impl ItemFetcher {
    pub fn new(api: Arc<dyn HackerNewsApi>, cache: Arc<ItemCache>) -> Self {
        Self { api, cache }
    }

    pub fn api(&self) -> &Arc<dyn HackerNewsApi> {
        &self.api
    }

    pub fn cache(&self) -> &Arc<ItemCache> {
        &self.cache
    }

    /// A live cache entry is returned without touching the remote. Absent
    /// items and failures are never cached.
    pub async fn get_item(&self, id: ItemId) -> Result<Option<ItemRecord>> {
        if let Some(record) = self.cache.get(id) {
            debug!(id, "Item cache hit");
            return Ok(Some(record));
        }

        let Some(record) = self.api.fetch_item(id).await? else {
            debug!(id, "Item not found on remote");
            return Ok(None);
        };

        info!(
            id = record.id,
            kind = %record.kind,
            title = %record.title,
            "Fetched story"
        );
        self.cache.insert(id, record.clone());

        Ok(Some(record))
    }
}
