use crate::SessionResult;
use async_trait::async_trait;
use serde_json::Value;

/// Loosely typed engine configuration as handed over by the host
/// application. Each engine picks out the keys it understands.
pub type SessionEngineOptions = serde_json::Map<String, Value>;

/// Capability contract of a pluggable session backend.
///
/// The host constructs an engine, calls the setters, calls [`init`] once and
/// then serves [`get`], [`set`] and [`clean`] for every request.
///
/// [`init`]: SessionEngine::init
/// [`get`]: SessionEngine::get
/// [`set`]: SessionEngine::set
/// [`clean`]: SessionEngine::clean
#[async_trait]
pub trait SessionEngine: Send + Sync {
    fn init(&mut self) -> SessionResult<()>;
    /// Sets the session name, which is also the cookie name.
    fn set_name(&mut self, name: &str);
    fn set_options(&mut self, options: &SessionEngineOptions);
    fn set_secret(&mut self, secret: &[u8]);
    async fn get(&self, handler: &dyn SessionHandler, key: &str) -> SessionResult<Value>;
    async fn set(
        &self,
        handler: &mut dyn SessionHandler,
        key: &str,
        value: Value,
    ) -> SessionResult<()>;
    /// Removes every value from the current session.
    async fn clean(&self, handler: &mut dyn SessionHandler) -> SessionResult<()>;
}

pub mod handler;
pub mod memcached;
pub mod options;
pub mod registry;

pub use handler::*;
pub use memcached::*;
pub use options::*;
pub use registry::*;
