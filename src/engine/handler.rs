use cookie::Cookie;
use http::header::{COOKIE, SET_COOKIE};
use http::{HeaderMap, HeaderValue, Request};

/// The request/response pair a session engine reads cookies from and writes
/// cookies to.
pub trait SessionHandler: Send + Sync {
    fn request_headers(&self) -> &HeaderMap;
    fn response_headers(&self) -> &HeaderMap;
    fn response_headers_mut(&mut self) -> &mut HeaderMap;
}

/// Header-only [`SessionHandler`] usable with any `http` based framework.
#[derive(Debug, Clone, Default)]
pub struct HttpExchange {
    request: HeaderMap,
    response: HeaderMap,
}

impl HttpExchange {
    pub fn new(request: HeaderMap) -> Self {
        HttpExchange {
            request,
            response: HeaderMap::new(),
        }
    }
    pub fn from_request<B>(request: &Request<B>) -> Self {
        HttpExchange::new(request.headers().clone())
    }
    pub fn into_response_headers(self) -> HeaderMap {
        self.response
    }
    /// The exchange a browser would start next: request cookies updated with
    /// every `Set-Cookie` of this response.
    pub fn follow_up(&self) -> HttpExchange {
        let mut cookies: Vec<Cookie<'static>> = self
            .request
            .get_all(COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .flat_map(Cookie::split_parse)
            .filter_map(Result::ok)
            .map(Cookie::into_owned)
            .collect();
        for set_cookie in self
            .response
            .get_all(SET_COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .filter_map(|value| Cookie::parse(value.to_string()).ok())
        {
            cookies.retain(|cookie| cookie.name() != set_cookie.name());
            cookies.push(set_cookie);
        }

        let mut request = HeaderMap::new();
        let header = cookies
            .iter()
            .map(|cookie| cookie.stripped().to_string())
            .collect::<Vec<_>>()
            .join("; ");
        if !header.is_empty() {
            if let Ok(value) = HeaderValue::from_str(&header) {
                request.insert(COOKIE, value);
            }
        }
        HttpExchange::new(request)
    }
}

impl SessionHandler for HttpExchange {
    fn request_headers(&self) -> &HeaderMap {
        &self.request
    }
    fn response_headers(&self) -> &HeaderMap {
        &self.response
    }
    fn response_headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.response
    }
}
