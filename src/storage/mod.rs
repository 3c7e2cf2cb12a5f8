use crate::SessionResult;
use async_trait::async_trait;
use time::Duration;

/// Key/value cache the session store persists payloads into.
///
/// Implementations must be safe to share between concurrent requests.
#[async_trait]
pub trait CacheClient: Send + Sync + 'static {
    /// Returns the value stored under `key`, or `None` on a cache miss.
    async fn get(&self, key: &str) -> SessionResult<Option<String>>;
    /// Stores `value` under `key`, expiring after `expire_time`.
    async fn set(&self, key: &str, value: String, expire_time: Duration) -> SessionResult<()>;
}

pub mod memcached;
pub mod memory;

pub use self::memcached::MemcacheClient;
pub use self::memory::MemoryCache;
