// Cookie-string access for the API client

use std::sync::RwLock;

/// Pull a single cookie value out of a raw `document.cookie` style string
/// (`"a=1; apiToken=xyz; b=2"`).
///
/// Returns `None` when the cookie is absent, empty, or present more than once.
pub fn extract_cookie(raw: &str, name: &str) -> Option<String> {
    let haystack = format!("; {}", raw);
    let needle = format!("; {}=", name);

    let mut parts = haystack.split(needle.as_str());
    parts.next()?;
    let tail = parts.next()?;
    if parts.next().is_some() {
        return None;
    }

    let value = tail.split(';').next().unwrap_or_default();
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// Something that can hand the API client the current cookie string.
///
/// Read again before every request, so a token set after the client was
/// built is still picked up.
pub trait CookieSource: Send + Sync {
    /// The raw cookie string, or `None` outside a browser-like context
    fn raw_cookies(&self) -> Option<String>;
}

/// No cookie context at all (server-side callers, background jobs)
#[derive(Debug, Default, Clone, Copy)]
pub struct NoCookies;

impl CookieSource for NoCookies {
    fn raw_cookies(&self) -> Option<String> {
        None
    }
}

/// A fixed cookie string, typically the `Cookie` header of an incoming request
#[derive(Debug, Clone)]
pub struct StaticCookies(String);

impl StaticCookies {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }
}

impl CookieSource for StaticCookies {
    fn raw_cookies(&self) -> Option<String> {
        Some(self.0.clone())
    }
}

/// A mutable cookie jar, standing in for a long-lived browser document
#[derive(Debug, Default)]
pub struct SharedCookies {
    raw: RwLock<Option<String>>,
}

impl SharedCookies {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole cookie string
    pub fn set(&self, raw: impl Into<String>) {
        if let Ok(mut guard) = self.raw.write() {
            *guard = Some(raw.into());
        }
    }

    pub fn clear(&self) {
        if let Ok(mut guard) = self.raw.write() {
            *guard = None;
        }
    }
}

impl CookieSource for SharedCookies {
    fn raw_cookies(&self) -> Option<String> {
        self.raw.read().ok().and_then(|guard| guard.clone())
    }
}
