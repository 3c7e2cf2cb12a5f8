use cookie::{Cookie, SameSite};
use rand::Rng;
use rand::distr::Alphanumeric;
use sha256::Sha256Digest;
use time::Duration;

/// Session ID generation strategy.
#[derive(Debug, Clone)]
pub enum RandKey {
    Random(usize),
    UuidV4,
    UuidV7,
    RandomSha256(usize),
}

impl RandKey {
    pub fn generate(&self) -> String {
        match self {
            RandKey::Random(len) => random_string(*len),
            RandKey::UuidV4 => uuid::Uuid::new_v4().simple().to_string(),
            RandKey::UuidV7 => uuid::Uuid::now_v7().simple().to_string(),
            RandKey::RandomSha256(len) => random_string(*len).digest(),
        }
    }
}

fn random_string(len: usize) -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}

/// Session cookie and lifetime settings.
#[derive(Debug, Clone)]
pub struct SessionBuilder {
    pub(crate) expire_time: Duration,
    pub(crate) path: String,
    pub(crate) domain: String,
    pub(crate) secure: bool,
    pub(crate) http_only: bool,
    pub(crate) max_age: Option<Duration>,
    pub(crate) same_site: Option<SameSite>,
    pub(crate) rand_key: RandKey,
}

impl Default for SessionBuilder {
    fn default() -> Self {
        SessionBuilder {
            expire_time: Duration::days(7),
            path: "/".to_string(),
            domain: "".to_string(),
            secure: true,
            http_only: true,
            max_age: None,
            same_site: None,
            rand_key: RandKey::UuidV7,
        }
    }
}

impl SessionBuilder {
    pub fn new() -> Self {
        SessionBuilder::default()
    }
    /// Lifetime of the cached payload. Also the cookie `Max-Age` unless
    /// [`SessionBuilder::max_age`] overrides it.
    pub fn expire_time(mut self, expire_time: Duration) -> Self {
        self.expire_time = expire_time;
        self
    }
    pub fn path(mut self, path: &str) -> Self {
        self.path = path.to_string();
        self
    }
    pub fn domain(mut self, domain: &str) -> Self {
        self.domain = domain.to_string();
        self
    }
    pub fn secure(mut self, secure: bool) -> Self {
        self.secure = secure;
        self
    }
    pub fn http_only(mut self, http_only: bool) -> Self {
        self.http_only = http_only;
        self
    }
    pub fn max_age(mut self, max_age: Duration) -> Self {
        self.max_age = Some(max_age);
        self
    }
    pub fn same_site(mut self, same_site: SameSite) -> Self {
        self.same_site = Some(same_site);
        self
    }
    /// Memcached keys are limited to 250 bytes including the prefix, so
    /// `Random` lengths are capped at 128.
    pub fn rand_key(mut self, rand_key: RandKey) -> Self {
        match rand_key {
            RandKey::Random(len) => {
                assert!(len >= 16, "len must be at least 16");
                assert!(len <= 128, "len must be at most 128");
            }
            RandKey::UuidV4 | RandKey::UuidV7 | RandKey::RandomSha256(_) => {}
        }
        self.rand_key = rand_key;
        self
    }
    pub(crate) fn build(&self, name: &str, value: String) -> Cookie<'static> {
        let mut cookie = Cookie::build((name.to_string(), value))
            .path(self.path.clone())
            .secure(self.secure)
            .http_only(self.http_only)
            .max_age(self.max_age.unwrap_or(self.expire_time));
        if !self.domain.is_empty() {
            cookie = cookie.domain(self.domain.clone());
        }
        if let Some(same_site) = self.same_site {
            cookie = cookie.same_site(same_site);
        }
        cookie.build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_ids_are_cache_key_safe() {
        for key in [
            RandKey::Random(32),
            RandKey::UuidV4,
            RandKey::UuidV7,
            RandKey::RandomSha256(32),
        ] {
            let id = key.generate();
            assert!(!id.is_empty());
            assert!(id.chars().all(|c| c.is_ascii_alphanumeric()), "{id}");
            assert_ne!(id, key.generate());
        }
        assert_eq!(RandKey::Random(40).generate().len(), 40);
        assert_eq!(RandKey::RandomSha256(40).generate().len(), 64);
    }

    #[test]
    fn cookie_carries_configured_attributes() {
        let cookie = SessionBuilder::new()
            .path("/app")
            .domain("example.com")
            .secure(false)
            .same_site(SameSite::Lax)
            .expire_time(Duration::hours(2))
            .build("sid", "abc".to_string());

        assert_eq!(cookie.name(), "sid");
        assert_eq!(cookie.value(), "abc");
        assert_eq!(cookie.path(), Some("/app"));
        assert_eq!(cookie.domain(), Some("example.com"));
        assert_eq!(cookie.secure(), Some(false));
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::Lax));
        assert_eq!(cookie.max_age(), Some(Duration::hours(2)));
    }

    #[test]
    #[should_panic(expected = "len must be at most 128")]
    fn rejects_oversized_random_ids() {
        let _ = SessionBuilder::new().rand_key(RandKey::Random(512));
    }
}
