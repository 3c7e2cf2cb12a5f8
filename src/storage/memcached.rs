use crate::storage::CacheClient;
use crate::{SessionError, SessionResult};
use async_trait::async_trait;
use std::sync::Arc;
use time::{Duration, OffsetDateTime};
use tokio::sync::OnceCell;
use tracing::debug;

const MAX_KEY_LENGTH: usize = 250;
/// Memcached reads larger expirations as absolute unix timestamps.
const MAX_RELATIVE_EXPIRATION: i64 = 60 * 60 * 24 * 30;

/// Memcached cluster client.
///
/// Server selection, pooling and the wire protocol are handled by the
/// `memcache` crate. The connection is opened on first use, so a bad address
/// only shows up as an error from the first cache operation.
pub struct MemcacheClient {
    servers: Vec<String>,
    conn: OnceCell<Arc<memcache::Client>>,
}

impl MemcacheClient {
    pub fn new<I, S>(servers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        MemcacheClient {
            servers: servers.into_iter().map(Into::into).collect(),
            conn: OnceCell::new(),
        }
    }
    pub fn servers(&self) -> &[String] {
        &self.servers
    }
    fn urls(&self) -> Vec<String> {
        self.servers
            .iter()
            .map(|server| {
                if server.contains("://") {
                    server.clone()
                } else {
                    format!("memcache://{}", server)
                }
            })
            .collect()
    }
    async fn get_conn(&self) -> SessionResult<Arc<memcache::Client>> {
        let conn = self
            .conn
            .get_or_try_init(|| async {
                let urls = self.urls();
                debug!(servers = ?urls, "connecting to memcached");
                let client =
                    tokio::task::spawn_blocking(move || memcache::Client::connect(urls)).await??;
                Ok::<_, SessionError>(Arc::new(client))
            })
            .await?;
        Ok(Arc::clone(conn))
    }
}

#[async_trait]
impl CacheClient for MemcacheClient {
    async fn get(&self, key: &str) -> SessionResult<Option<String>> {
        check_key(key)?;
        let conn = self.get_conn().await?;
        let key = key.to_string();
        let value = tokio::task::spawn_blocking(move || conn.get::<String>(&key)).await??;
        Ok(value)
    }

    async fn set(&self, key: &str, value: String, expire_time: Duration) -> SessionResult<()> {
        check_key(key)?;
        let conn = self.get_conn().await?;
        let key = key.to_string();
        let expiration = expiration(expire_time);
        tokio::task::spawn_blocking(move || conn.set(&key, value.as_str(), expiration)).await??;
        Ok(())
    }
}

fn check_key(key: &str) -> SessionResult<()> {
    if key.is_empty()
        || key.len() > MAX_KEY_LENGTH
        || key.chars().any(|c| c.is_whitespace() || c.is_control())
    {
        return Err(SessionError::InvalidKey(key.to_string()));
    }
    Ok(())
}

/// Zero means "never expire" to memcached, so non-positive lifetimes map to
/// one second. Timestamps past `u32::MAX` saturate.
fn expiration(expire_time: Duration) -> u32 {
    let seconds = expire_time.whole_seconds().max(1);
    if seconds <= MAX_RELATIVE_EXPIRATION {
        seconds as u32
    } else {
        let at = OffsetDateTime::now_utc().unix_timestamp().saturating_add(seconds);
        u32::try_from(at).unwrap_or(u32::MAX)
    }
}
