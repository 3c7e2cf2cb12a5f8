use crate::engine::{DEFAULT_SESSION_NAME, SessionEngine, SessionEngineOptions};
use crate::{SessionError, SessionResult};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use tracing::debug;

type EngineFactory = Box<dyn Fn() -> Box<dyn SessionEngine> + Send + Sync>;

/// Name-keyed set of session engine factories.
///
/// Engines are added with an explicit [`EngineRegistry::register`] call made
/// from application startup.
#[derive(Default)]
pub struct EngineRegistry {
    factories: HashMap<String, EngineFactory>,
}

impl fmt::Debug for EngineRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EngineRegistry")
            .field("engines", &self.names())
            .finish()
    }
}

impl EngineRegistry {
    pub fn new() -> Self {
        EngineRegistry::default()
    }
    /// Registry with every engine shipped by this crate.
    pub fn with_defaults() -> Self {
        let mut registry = EngineRegistry::new();
        crate::engine::memcached::register(&mut registry);
        registry
    }
    /// Adds `factory` under `name`. Returns true if an earlier factory was
    /// replaced.
    pub fn register<F>(&mut self, name: &str, factory: F) -> bool
    where
        F: Fn() -> Box<dyn SessionEngine> + Send + Sync + 'static,
    {
        debug!(engine = name, "registering session engine");
        self.factories
            .insert(name.to_string(), Box::new(factory))
            .is_some()
    }
    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.factories.keys().cloned().collect();
        names.sort();
        names
    }
    /// Creates an unconfigured engine.
    pub fn create(&self, name: &str) -> SessionResult<Box<dyn SessionEngine>> {
        self.factories
            .get(name)
            .map(|factory| factory())
            .ok_or_else(|| SessionError::UnknownEngine(name.to_string()))
    }
    /// Creates, configures and initializes the engine `config` selects.
    pub fn build(&self, config: &EngineConfig) -> SessionResult<Box<dyn SessionEngine>> {
        let mut engine = self.create(&config.engine)?;
        engine.set_name(&config.name);
        engine.set_options(&config.options);
        engine.set_secret(config.secret.as_bytes());
        engine.init()?;
        Ok(engine)
    }
}

/// Application-level session configuration.
///
/// ```json
/// {
///     "engine": "memcached",
///     "name": "sid",
///     "secret": "change me",
///     "options": { "servers": "192.168.1.5:11211", "prefix": "app:" }
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EngineConfig {
    pub engine: String,
    #[serde(default = "default_name")]
    pub name: String,
    #[serde(default)]
    pub secret: String,
    #[serde(default)]
    pub options: SessionEngineOptions,
}

fn default_name() -> String {
    DEFAULT_SESSION_NAME.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{HttpExchange, MEMCACHED_ENGINE, MemcachedSessionEngine};
    use crate::storage::MemoryCache;
    use serde_json::json;
    use std::sync::Arc;

    #[test]
    fn memcached_is_found_by_name() {
        let registry = EngineRegistry::with_defaults();
        assert!(registry.contains("memcached"));
        assert_eq!(registry.names(), vec![MEMCACHED_ENGINE.to_string()]);
        assert!(registry.create("memcached").is_ok());
    }

    #[test]
    fn unknown_engine_is_an_error() {
        let registry = EngineRegistry::new();
        match registry.create("memcached") {
            Err(SessionError::UnknownEngine(name)) => assert_eq!(name, "memcached"),
            _ => panic!("expected unknown engine"),
        }
    }

    #[test]
    fn register_reports_replacement() {
        let mut registry = EngineRegistry::new();
        assert!(!registry.register("memory", || {
            Box::new(MemcachedSessionEngine::new()) as Box<dyn SessionEngine>
        }));
        assert!(registry.register("memory", || {
            Box::new(MemcachedSessionEngine::new()) as Box<dyn SessionEngine>
        }));
    }

    #[test]
    fn config_deserializes_with_defaults() {
        let config: EngineConfig = serde_json::from_value(json!({
            "engine": "memcached",
            "options": {"servers": ["10.0.0.1:11211"]}
        }))
        .unwrap();
        assert_eq!(config.name, "session_key");
        assert_eq!(config.secret, "");
        assert_eq!(config.options["servers"], json!(["10.0.0.1:11211"]));
    }

    #[test]
    fn build_requires_servers() {
        let registry = EngineRegistry::with_defaults();
        let config = EngineConfig {
            engine: "memcached".to_string(),
            name: "sid".to_string(),
            secret: "secret".to_string(),
            options: SessionEngineOptions::new(),
        };
        assert!(matches!(registry.build(&config), Err(SessionError::MissingServers)));
    }

    #[tokio::test]
    async fn build_runs_the_full_lifecycle() {
        let cache = MemoryCache::new();
        let mut registry = EngineRegistry::new();
        let shared = cache.clone();
        registry.register("memory", move || {
            Box::new(MemcachedSessionEngine::new().with_client(Arc::new(shared.clone())))
                as Box<dyn SessionEngine>
        });
        let config: EngineConfig = serde_json::from_value(json!({
            "engine": "memory",
            "name": "sid",
            "secret": "secret",
            "options": {"prefix": "app:"}
        }))
        .unwrap();

        let engine = registry.build(&config).unwrap();
        let mut exchange = HttpExchange::default();
        engine.set(&mut exchange, "k", json!("v")).await.unwrap();
        assert_eq!(engine.get(&exchange.follow_up(), "k").await.unwrap(), json!("v"));
        assert_eq!(cache.len().await, 1);
    }
}
