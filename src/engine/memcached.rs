use crate::engine::{
    EngineRegistry, MemcachedOptions, SessionEngine, SessionEngineOptions, SessionHandler,
};
use crate::storage::{CacheClient, MemcacheClient};
use crate::{MemcacheStore, Session, SessionBuilder, SessionError, SessionResult};
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Name the memcached engine is registered under.
pub const MEMCACHED_ENGINE: &str = "memcached";
pub const DEFAULT_SESSION_NAME: &str = "session_key";

/// Registers the memcached engine under [`MEMCACHED_ENGINE`].
pub fn register(registry: &mut EngineRegistry) {
    registry.register(MEMCACHED_ENGINE, || {
        Box::new(MemcachedSessionEngine::new()) as Box<dyn SessionEngine>
    });
}

/// Session engine storing session payloads in a memcached cluster.
///
/// ```rust,no_run
/// use rsession_memcached::{HttpExchange, MemcachedSessionEngine, SessionEngine};
/// use serde_json::json;
///
/// # async fn run() -> Result<(), rsession_memcached::SessionError> {
/// let mut engine = MemcachedSessionEngine::new();
/// engine.set_options(json!({
///     "servers": "192.168.1.1:11211,192.168.1.2:11211",
///     "prefix": "app:",
/// }).as_object().unwrap());
/// engine.set_secret(b"a long random secret");
/// engine.set_name("sid");
/// engine.init()?;
///
/// let mut exchange = HttpExchange::default();
/// engine.set(&mut exchange, "user", json!("alice")).await?;
/// # Ok(())
/// # }
/// ```
pub struct MemcachedSessionEngine {
    client: Option<Arc<dyn CacheClient>>,
    servers: Vec<String>,
    store: Option<MemcacheStore>,
    secret: Vec<u8>,
    name: String,
    prefix: String,
    strict: bool,
    builder: SessionBuilder,
}

impl Default for MemcachedSessionEngine {
    fn default() -> Self {
        MemcachedSessionEngine {
            client: None,
            servers: Vec::new(),
            store: None,
            secret: Vec::new(),
            name: DEFAULT_SESSION_NAME.to_string(),
            prefix: String::new(),
            strict: false,
            builder: SessionBuilder::default(),
        }
    }
}

impl MemcachedSessionEngine {
    pub fn new() -> Self {
        MemcachedSessionEngine::default()
    }
    /// Uses `client` instead of building a memcached client from `servers`.
    pub fn with_client(mut self, client: Arc<dyn CacheClient>) -> Self {
        self.client = Some(client);
        self
    }
    pub fn with_builder(mut self, builder: SessionBuilder) -> Self {
        self.builder = builder;
        self
    }
    pub fn servers(&self) -> &[String] {
        &self.servers
    }
    pub fn prefix(&self) -> &str {
        &self.prefix
    }
    pub fn name(&self) -> &str {
        &self.name
    }
    pub fn is_strict(&self) -> bool {
        self.strict
    }
    pub fn is_ready(&self) -> bool {
        self.store.is_some()
    }
    fn store(&self) -> SessionResult<&MemcacheStore> {
        self.store.as_ref().ok_or(SessionError::NotInitialized)
    }
    fn set_servers(&mut self, servers: Vec<String>) {
        self.client = Some(Arc::new(MemcacheClient::new(servers.clone())));
        self.servers = servers;
    }
    async fn load_or_new(&self, store: &MemcacheStore, handler: &dyn SessionHandler) -> Session {
        match store.get(handler, &self.name).await {
            Ok(session) => session,
            Err(err) => {
                debug!(error = %err, "starting a fresh session");
                store.new_session()
            }
        }
    }
    fn saved(&self, result: SessionResult<()>) -> SessionResult<()> {
        match result {
            Ok(()) => Ok(()),
            Err(err) if self.strict => Err(err),
            Err(err) => {
                warn!(error = %err, session = %self.name, "session was not saved");
                Ok(())
            }
        }
    }
}

#[async_trait]
impl SessionEngine for MemcachedSessionEngine {
    fn init(&mut self) -> SessionResult<()> {
        let client = self.client.clone().ok_or(SessionError::MissingServers)?;
        if self.secret.is_empty() {
            warn!("session secret is empty, cookies are signed with a well-known key");
        }
        self.store = Some(
            MemcacheStore::new(client, &self.prefix, &self.secret).with_builder(self.builder.clone()),
        );
        info!(servers = ?self.servers, prefix = %self.prefix, "memcached session engine ready");
        Ok(())
    }

    fn set_name(&mut self, name: &str) {
        self.name = name.to_string();
    }

    fn set_options(&mut self, options: &SessionEngineOptions) {
        let options = MemcachedOptions::from_options(options);
        if let Some(servers) = options.servers {
            self.set_servers(servers);
        }
        if let Some(prefix) = options.prefix {
            self.prefix = prefix;
        }
        if let Some(strict) = options.strict {
            self.strict = strict;
        }
        let mut builder = self.builder.clone();
        if let Some(max_age) = options.max_age {
            builder = builder.expire_time(max_age);
        }
        if let Some(path) = options.path {
            builder = builder.path(&path);
        }
        if let Some(domain) = options.domain {
            builder = builder.domain(&domain);
        }
        if let Some(secure) = options.secure {
            builder = builder.secure(secure);
        }
        if let Some(http_only) = options.http_only {
            builder = builder.http_only(http_only);
        }
        self.builder = builder;
    }

    fn set_secret(&mut self, secret: &[u8]) {
        self.secret = secret.to_vec();
    }

    async fn get(&self, handler: &dyn SessionHandler, key: &str) -> SessionResult<Value> {
        let store = self.store()?;
        let session = store.get(handler, &self.name).await?;
        session.value(key).cloned().ok_or(SessionError::EmptySession)
    }

    async fn set(
        &self,
        handler: &mut dyn SessionHandler,
        key: &str,
        value: Value,
    ) -> SessionResult<()> {
        let store = self.store()?;
        let mut session = self.load_or_new(store, &*handler).await;
        session.insert(key, value);
        self.saved(store.save(handler, &self.name, &session).await)
    }

    async fn clean(&self, handler: &mut dyn SessionHandler) -> SessionResult<()> {
        let store = self.store()?;
        let mut session = self.load_or_new(store, &*handler).await;
        session.clear();
        self.saved(store.save(handler, &self.name, &session).await)
    }
}
