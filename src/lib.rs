//! # rsession-memcached
//!
//! A memcached session engine for Rust web applications.
//!
//! [![crates.io](https://img.shields.io/crates/v/rsession-memcached.svg)](https://crates.io/crates/rsession-memcached)
//! [![Released API docs](https://docs.rs/rsession-memcached/badge.svg)](https://docs.rs/rsession-memcached)
//!
//! ## Features
//!
//! - **Session engine contract**: `init`, `set_name`, `set_options`, `set_secret`, `get`, `set`, `clean`
//! - **Memcached storage**: session payloads live in a memcached cluster, the cookie only carries a signed ID
//! - **Explicit registry**: engines are registered by name from application startup
//! - **Framework integration**: Axum through a tower layer (`tower` feature)
//! - **Session ID Generation**: UUID v4, UUID v7, Random, and Random SHA256 options
//!
//! ## Installation
//!
//! ```toml
//! [dependencies]
//! rsession-memcached = "0.1.0"
//! ```
//!
//! ### Feature Flags
//!
//! ```toml
//! [dependencies.rsession-memcached]
//! version = "0.1.0"
//! features = [
//!     "tower",  # Axum framework integration
//! ]
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use rsession_memcached::{EngineConfig, EngineRegistry, HttpExchange};
//! use serde_json::json;
//!
//! #[tokio::main]
//! async fn main() {
//!     let registry = EngineRegistry::with_defaults();
//!     let config: EngineConfig = serde_json::from_value(json!({
//!         "engine": "memcached",
//!         "name": "sid",
//!         "secret": "change me",
//!         "options": {
//!             "servers": ["192.168.1.5:11211", "192.168.1.6:11211"],
//!             "prefix": "app:",
//!         }
//!     }))
//!     .unwrap();
//!     let engine = registry.build(&config).unwrap();
//!
//!     let mut exchange = HttpExchange::default();
//!     engine.set(&mut exchange, "user", json!("alice")).await.unwrap();
//!     let value = engine.get(&exchange.follow_up(), "user").await.unwrap();
//!     assert_eq!(value, json!("alice"));
//! }
//! ```
//!
//! ## Configuration
//!
//! Options handed to `set_options`:
//!
//! | key         | type                        | default   |
//! |-------------|-----------------------------|-----------|
//! | `servers`   | `"h1:p1,h2:p2"` or `[...]`  | required  |
//! | `prefix`    | string                      | `""`      |
//! | `strict`    | bool                        | `false`   |
//! | `max_age`   | seconds                     | 7 days    |
//! | `path`      | string                      | `/`       |
//! | `domain`    | string                      | none      |
//! | `secure`    | bool                        | `true`    |
//! | `http_only` | bool                        | `true`    |
//!
//! Values of the wrong type are ignored, and so are unknown keys. With `strict`
//! off, a failed save in `set` or `clean` is logged and dropped.
//!
//! ## Axum
//!
//! ```rust,ignore
//! use rsession_memcached::framework::axum::{EngineSession, SessionEngineLayer};
//!
//! let app = axum::Router::new()
//!     .route("/", axum::routing::get(index))
//!     .layer(SessionEngineLayer::new(engine.into()));
//!
//! async fn index(session: EngineSession) -> String {
//!     let count = session.get_as::<i64>("count").await.unwrap_or(0) + 1;
//!     session.set("count", count).await.ok();
//!     format!("count: {count}")
//! }
//! ```

pub mod engine;
pub mod error;
pub mod framework;
pub mod inner;
pub mod storage;

pub use engine::*;
pub use error::*;
pub use inner::*;
pub use storage::{CacheClient, MemcacheClient, MemoryCache};
