//! Cookie boundary
//!
//! The navigation layer only ever sees cookies through [`CookieStore`], so
//! history can be exercised without an HTTP stack.

use axum::http::header::{COOKIE, SET_COOKIE};
use axum::http::{HeaderMap, HeaderValue};
use axum::response::{IntoResponseParts, ResponseParts};
use std::collections::HashMap;
use std::convert::Infallible;
use std::time::Duration;

/// Client-side key-value storage
pub trait CookieStore {
    /// Current value of a cookie
    fn get(&self, name: &str) -> Option<String>;

    /// Stores a cookie for `max_age`; a zero `max_age` deletes it
    fn set(&mut self, name: &str, value: &str, max_age: Duration);

    fn remove(&mut self, name: &str) {
        self.set(name, "", Duration::ZERO);
    }
}

/// A cookie queued for the response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetCookie {
    pub name: String,
    pub value: String,
    pub max_age: Duration,
    pub path: String,
}

impl SetCookie {
    /// Renders the `Set-Cookie` header value
    pub fn header_value(&self) -> String {
        format!(
            "{}={}; Path={}; Max-Age={}; SameSite=Lax",
            self.name,
            self.value,
            self.path,
            self.max_age.as_secs()
        )
    }
}

/// Cookies of one request/response pair
///
/// Reads come from the inbound `Cookie` header, overridden by anything set
/// during the request. Writes are queued as `Set-Cookie` headers.
#[derive(Debug, Clone)]
pub struct RequestCookies {
    incoming: HashMap<String, String>,
    outgoing: Vec<SetCookie>,
    path: String,
}

impl Default for RequestCookies {
    fn default() -> Self {
        Self::new(HashMap::new())
    }
}

impl RequestCookies {
    pub fn new(incoming: HashMap<String, String>) -> Self {
        Self {
            incoming,
            outgoing: Vec::new(),
            path: "/".to_string(),
        }
    }

    /// Parse cookies from the Cookie header
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let mut cookies = HashMap::new();

        for header in headers.get_all(COOKIE) {
            if let Ok(cookie_str) = header.to_str() {
                for cookie in cookie_str.split(';') {
                    let cookie = cookie.trim();
                    if let Some((key, value)) = cookie.split_once('=') {
                        cookies.insert(key.to_string(), value.to_string());
                    }
                }
            }
        }

        Self::new(cookies)
    }

    /// Sets the `Path` attribute for cookies written through this store
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    /// Cookies queued for the response, in write order
    pub fn pending(&self) -> &[SetCookie] {
        &self.outgoing
    }

    /// `Set-Cookie` header values for the response
    pub fn set_cookie_headers(&self) -> Vec<String> {
        self.outgoing.iter().map(SetCookie::header_value).collect()
    }

    /// Appends the queued cookies to a header map
    pub fn apply(&self, headers: &mut HeaderMap) {
        for value in self.set_cookie_headers() {
            match HeaderValue::from_str(&value) {
                Ok(header) => {
                    headers.append(SET_COOKIE, header);
                }
                Err(e) => tracing::warn!(error = %e, "dropping unrepresentable cookie"),
            }
        }
    }
}

impl CookieStore for RequestCookies {
    fn get(&self, name: &str) -> Option<String> {
        if let Some(pending) = self.outgoing.iter().rev().find(|c| c.name == name) {
            return (!pending.max_age.is_zero()).then(|| pending.value.clone());
        }
        self.incoming.get(name).cloned()
    }

    fn set(&mut self, name: &str, value: &str, max_age: Duration) {
        self.outgoing.retain(|c| c.name != name);
        self.outgoing.push(SetCookie {
            name: name.to_string(),
            value: value.to_string(),
            max_age,
            path: self.path.clone(),
        });
    }
}

impl IntoResponseParts for RequestCookies {
    type Error = Infallible;

    fn into_response_parts(self, mut res: ResponseParts) -> Result<ResponseParts, Self::Error> {
        self.apply(res.headers_mut());
        Ok(res)
    }
}

/// In-memory cookie store
#[derive(Debug, Clone, Default)]
pub struct MemoryCookies {
    cookies: HashMap<String, (String, Duration)>,
}

impl MemoryCookies {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lifetime the cookie was last stored with
    pub fn max_age(&self, name: &str) -> Option<Duration> {
        self.cookies.get(name).map(|(_, max_age)| *max_age)
    }

    pub fn len(&self) -> usize {
        self.cookies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cookies.is_empty()
    }
}

impl CookieStore for MemoryCookies {
    fn get(&self, name: &str) -> Option<String> {
        self.cookies.get(name).map(|(value, _)| value.clone())
    }

    fn set(&mut self, name: &str, value: &str, max_age: Duration) {
        if max_age.is_zero() {
            self.cookies.remove(name);
        } else {
            self.cookies
                .insert(name.to_string(), (value.to_string(), max_age));
        }
    }
}
