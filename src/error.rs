use thiserror::Error;

/// Errors produced by the session engine, its store and the cache clients.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The session was loaded but holds no value under the requested key.
    #[error("empty session")]
    EmptySession,
    #[error("session engine is not initialized")]
    NotInitialized,
    #[error("no cache servers configured")]
    MissingServers,
    #[error("unknown session engine: {0}")]
    UnknownEngine(String),
    /// The session cookie is present but its signature does not verify.
    #[error("invalid session cookie")]
    InvalidCookie,
    #[error("invalid cache key: {0:?}")]
    InvalidKey(String),
    #[error("memcache error: {0}")]
    Memcache(#[from] memcache::MemcacheError),
    #[error("session codec error: {0}")]
    Codec(#[from] serde_json::Error),
    #[error("invalid header value: {0}")]
    Header(#[from] http::header::InvalidHeaderValue),
    #[error("cache task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

pub type SessionResult<T> = Result<T, SessionError>;
