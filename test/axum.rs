use axum::routing::get;
use rsession_memcached::framework::axum::{EngineSession, SessionEngineLayer};
use rsession_memcached::{EngineConfig, EngineRegistry, SessionError};
use serde_json::json;
use std::sync::Arc;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt().init();
    let registry = EngineRegistry::with_defaults();
    let config: EngineConfig = serde_json::from_value(json!({
        "engine": "memcached",
        "name": "axum_session",
        "secret": "demo secret, change me",
        "options": {
            "servers": "127.0.0.1:11211",
            "prefix": "axum_session:",
            "secure": false,
        }
    }))
    .unwrap();
    let engine = registry.build(&config).unwrap();

    let app = axum::Router::new()
        .route("/", get(index))
        .route("/logout", get(logout))
        .layer(SessionEngineLayer::new(Arc::from(engine)));
    axum::serve(TcpListener::bind("127.0.0.1:8080").await.unwrap(), app)
        .await
        .ok();
}

async fn index(session: EngineSession) -> Result<String, SessionError> {
    let count = session.get_as::<i64>("count").await.unwrap_or(0) + 1;
    session.set("count", count).await?;
    Ok(format!("count: {:?}", count))
}

async fn logout(session: EngineSession) -> Result<&'static str, SessionError> {
    session.clean().await?;
    Ok("session cleared")
}
