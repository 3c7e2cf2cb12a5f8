use crate::engine::{HttpExchange, SessionEngine, SessionHandler};
use crate::{SessionError, SessionResult};
use axum::extract::{FromRequestParts, Request};
use axum::http::StatusCode;
use axum::http::header::SET_COOKIE;
use axum::http::request::Parts;
use axum::response::{IntoResponse, Response};
use futures::future::BoxFuture;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;
use std::task::{Context, Poll};
use tokio::sync::Mutex;
use tower::{Layer, Service};

/// Per-request handle on the session engine, extracted in axum handlers.
///
/// ```rust,ignore
/// async fn index(session: EngineSession) -> String {
///     let count = session.get_as::<i64>("count").await.unwrap_or(0) + 1;
///     session.set("count", count).await.ok();
///     format!("count: {count}")
/// }
/// ```
#[derive(Clone)]
pub struct EngineSession {
    engine: Arc<dyn SessionEngine>,
    exchange: Arc<Mutex<HttpExchange>>,
}

impl EngineSession {
    pub async fn get(&self, key: &str) -> SessionResult<Value> {
        let exchange = self.exchange.lock().await;
        self.engine.get(&*exchange, key).await
    }
    pub async fn get_as<T: DeserializeOwned>(&self, key: &str) -> SessionResult<T> {
        let value = self.get(key).await?;
        Ok(serde_json::from_value(value)?)
    }
    pub async fn set<T: Serialize>(&self, key: &str, value: T) -> SessionResult<()> {
        let value = serde_json::to_value(value)?;
        let mut exchange = self.exchange.lock().await;
        self.engine.set(&mut *exchange, key, value).await
    }
    pub async fn clean(&self) -> SessionResult<()> {
        let mut exchange = self.exchange.lock().await;
        self.engine.clean(&mut *exchange).await
    }
}

impl<S> FromRequestParts<S> for EngineSession
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, &'static str);

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts.extensions.get::<EngineSession>().cloned().ok_or((
            StatusCode::INTERNAL_SERVER_ERROR,
            "session engine layer is not installed",
        ))
    }
}

/// Tower layer exposing an initialized [`SessionEngine`] to handlers as an
/// [`EngineSession`]. Cookies the engine writes end up on the response.
#[derive(Clone)]
pub struct SessionEngineLayer {
    engine: Arc<dyn SessionEngine>,
}

impl SessionEngineLayer {
    pub fn new(engine: Arc<dyn SessionEngine>) -> Self {
        Self { engine }
    }
    pub fn from_engine<E: SessionEngine + 'static>(engine: E) -> Self {
        Self::new(Arc::new(engine))
    }
}

impl<S> Layer<S> for SessionEngineLayer {
    type Service = SessionEngineMiddleware<S>;

    fn layer(&self, inner: S) -> Self::Service {
        SessionEngineMiddleware {
            inner,
            engine: self.engine.clone(),
        }
    }
}

#[derive(Clone)]
pub struct SessionEngineMiddleware<S> {
    inner: S,
    engine: Arc<dyn SessionEngine>,
}

impl<S> Service<Request> for SessionEngineMiddleware<S>
where
    S: Service<Request, Response = Response> + Clone + Send + 'static,
    S::Future: Send + 'static,
{
    type Response = Response;
    type Error = S::Error;
    type Future = BoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: Request) -> Self::Future {
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);
        let exchange = Arc::new(Mutex::new(HttpExchange::from_request(&req)));
        req.extensions_mut().insert(EngineSession {
            engine: self.engine.clone(),
            exchange: exchange.clone(),
        });
        Box::pin(async move {
            let mut res = inner.call(req).await?;
            let exchange = exchange.lock().await;
            for value in exchange.response_headers().get_all(SET_COOKIE) {
                res.headers_mut().append(SET_COOKIE, value.clone());
            }
            Ok(res)
        })
    }
}

impl IntoResponse for SessionError {
    fn into_response(self) -> Response {
        tracing::error!(error = %self, "session engine failure");
        (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()).into_response()
    }
}
