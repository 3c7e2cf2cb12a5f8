use crate::storage::CacheClient;
use crate::SessionResult;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use time::{Duration, OffsetDateTime, PrimitiveDateTime};
use tokio::sync::RwLock;

/// In-process cache for development and tests.
///
/// Clones share the same map.
#[derive(Clone, Default)]
pub struct MemoryCache {
    items: Arc<RwLock<HashMap<String, (String, OffsetDateTime)>>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        MemoryCache::default()
    }
    /// Whether a live (non-expired) item is stored under `key`.
    pub async fn contains_key(&self, key: &str) -> bool {
        self.get(key).await.ok().flatten().is_some()
    }
    pub async fn len(&self) -> usize {
        let now = OffsetDateTime::now_utc();
        self.items
            .read()
            .await
            .values()
            .filter(|(_, expires_at)| *expires_at > now)
            .count()
    }
}

#[async_trait]
impl CacheClient for MemoryCache {
    async fn get(&self, key: &str) -> SessionResult<Option<String>> {
        let items = self.items.read().await;
        Ok(items
            .get(key)
            .filter(|(_, expires_at)| *expires_at > OffsetDateTime::now_utc())
            .map(|(value, _)| value.clone()))
    }

    async fn set(&self, key: &str, value: String, expire_time: Duration) -> SessionResult<()> {
        let now = OffsetDateTime::now_utc();
        let expires_at = now
            .checked_add(expire_time)
            .unwrap_or_else(|| PrimitiveDateTime::MAX.assume_utc());
        let mut items = self.items.write().await;
        items.retain(|_, (_, expires_at)| *expires_at > now);
        items.insert(key.to_string(), (value, expires_at));
        Ok(())
    }
}
