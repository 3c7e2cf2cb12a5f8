use crate::engine::SessionHandler;
use crate::storage::CacheClient;
use crate::{Session, SessionBuilder, SessionError, SessionResult};
use cookie::{Cookie, CookieJar, Key};
use http::HeaderValue;
use http::header::{COOKIE, SET_COOKIE};
use std::sync::Arc;
use tracing::debug;

/// Cookie-backed session store keeping payloads in a cache.
///
/// The cookie only carries the signed session ID. Values live in the cache
/// under `prefix + id`.
#[derive(Clone)]
pub struct MemcacheStore {
    client: Arc<dyn CacheClient>,
    prefix: String,
    key: Key,
    builder: SessionBuilder,
}

impl MemcacheStore {
    pub fn new(client: Arc<dyn CacheClient>, prefix: &str, secret: &[u8]) -> Self {
        MemcacheStore {
            client,
            prefix: prefix.to_string(),
            key: signing_key(secret),
            builder: SessionBuilder::default(),
        }
    }
    pub fn with_builder(mut self, builder: SessionBuilder) -> Self {
        self.builder = builder;
        self
    }
    pub fn prefix(&self) -> &str {
        &self.prefix
    }
    pub fn new_session(&self) -> Session {
        Session::new(self.builder.rand_key.generate())
    }
    /// Loads the session named `name` for the current exchange.
    ///
    /// A cookie already set on the response wins over the request cookie.
    /// Without a cookie, or when the cache no longer holds the payload, a
    /// fresh session is returned.
    pub async fn get(&self, handler: &dyn SessionHandler, name: &str) -> SessionResult<Session> {
        let Some(cookie) = find_cookie(handler, name) else {
            return Ok(self.new_session());
        };
        let id = self.verify(cookie).ok_or(SessionError::InvalidCookie)?;
        match self.client.get(&self.cache_key(&id)).await? {
            Some(payload) => {
                let mut session = serde_json::from_str::<Session>(&payload)?;
                session.id = id;
                session.is_new = false;
                Ok(session)
            }
            None => {
                debug!(session = %id, "session payload missing from cache");
                Ok(Session::new(id))
            }
        }
    }
    /// Writes the payload to the cache, then sets the signed cookie on the
    /// response, replacing any earlier cookie of the same name.
    pub async fn save(
        &self,
        handler: &mut dyn SessionHandler,
        name: &str,
        session: &Session,
    ) -> SessionResult<()> {
        let payload = serde_json::to_string(session)?;
        self.client
            .set(&self.cache_key(&session.id), payload, self.builder.expire_time)
            .await?;

        let cookie = self.sign(self.builder.build(name, session.id.clone()))?;
        let value = HeaderValue::from_str(&cookie.to_string())?;
        let headers = handler.response_headers_mut();
        let kept: Vec<HeaderValue> = headers
            .get_all(SET_COOKIE)
            .iter()
            .filter(|header| cookie_name(header).as_deref() != Some(name))
            .cloned()
            .collect();
        headers.remove(SET_COOKIE);
        for header in kept {
            headers.append(SET_COOKIE, header);
        }
        headers.append(SET_COOKIE, value);
        Ok(())
    }
    fn cache_key(&self, id: &str) -> String {
        format!("{}{}", self.prefix, id)
    }
    fn sign(&self, cookie: Cookie<'static>) -> SessionResult<Cookie<'static>> {
        let name = cookie.name().to_string();
        let mut jar = CookieJar::new();
        jar.signed_mut(&self.key).add(cookie);
        jar.get(&name).cloned().ok_or(SessionError::InvalidCookie)
    }
    fn verify(&self, cookie: Cookie<'static>) -> Option<String> {
        let name = cookie.name().to_string();
        let mut jar = CookieJar::new();
        jar.add_original(cookie);
        jar.signed(&self.key)
            .get(&name)
            .map(|cookie| cookie.value().to_string())
    }
}

fn signing_key(secret: &[u8]) -> Key {
    // The hex digest is exactly the 64 bytes `Key::from` needs.
    let digest = sha256::digest(secret.to_vec());
    Key::from(digest.as_bytes())
}

fn cookie_name(header: &HeaderValue) -> Option<String> {
    let header = header.to_str().ok()?;
    Cookie::parse(header).ok().map(|cookie| cookie.name().to_string())
}

fn find_cookie(handler: &dyn SessionHandler, name: &str) -> Option<Cookie<'static>> {
    let pending = handler
        .response_headers()
        .get_all(SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .filter_map(|value| Cookie::parse(value.to_string()).ok())
        .filter(|cookie| cookie.name() == name)
        .last();
    pending.or_else(|| {
        handler
            .request_headers()
            .get_all(COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .flat_map(Cookie::split_parse)
            .filter_map(Result::ok)
            .find(|cookie| cookie.name() == name)
            .map(Cookie::into_owned)
    })
}
