#![deny(missing_docs)]

//! # Request Abstraction
//!
//! The validator only needs three things from a request: its method, its
//! path and its cookies. [`RequestView`] captures that, so the same pass runs
//! against an owned [`RawRequest`] (CLI, tests) or an `actix_web::HttpRequest`.

/// Read-only access to the parts of an HTTP request the validator inspects.
pub trait RequestView {
    /// HTTP method (e.g. `GET`).
    fn method(&self) -> &str;

    /// Request path, without query string.
    fn path(&self) -> &str;

    /// Cookies as `(name, value)` pairs, in header order.
    /// A name may appear more than once.
    fn cookies(&self) -> Vec<(String, String)>;
}

/// An owned request description.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RawRequest {
    method: String,
    path: String,
    cookies: Vec<(String, String)>,
}

impl RawRequest {
    /// Creates a request. Any query string or fragment in `uri` is dropped.
    pub fn new(method: impl Into<String>, uri: &str) -> Self {
        let path = uri
            .split(['?', '#'])
            .next()
            .filter(|p| !p.is_empty())
            .unwrap_or("/");
        Self {
            method: method.into().to_ascii_uppercase(),
            path: path.to_string(),
            cookies: Vec::new(),
        }
    }

    /// Adds a cookie.
    pub fn with_cookie(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.cookies.push((name.into(), value.into()));
        self
    }

    /// Adds every cookie found in a raw `Cookie` header value.
    pub fn with_cookie_header(mut self, header: &str) -> Self {
        self.cookies.extend(parse_cookie_header(header));
        self
    }
}

impl RequestView for RawRequest {
    fn method(&self) -> &str {
        &self.method
    }

    fn path(&self) -> &str {
        &self.path
    }

    fn cookies(&self) -> Vec<(String, String)> {
        self.cookies.clone()
    }
}

/// Splits a `Cookie` header (`a=1; b=2`) into pairs.
///
/// Pairs without `=` or with an empty name are skipped. A value wrapped in
/// double quotes is unwrapped.
pub fn parse_cookie_header(header: &str) -> Vec<(String, String)> {
    header
        .split(';')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .filter_map(|part| {
            let Some((name, value)) = part.split_once('=') else {
                log::warn!("Ignoring malformed cookie pair '{}'", part);
                return None;
            };
            let name = name.trim();
            if name.is_empty() {
                log::warn!("Ignoring cookie pair with empty name '{}'", part);
                return None;
            }
            let value = value.trim();
            let value = value
                .strip_prefix('"')
                .and_then(|v| v.strip_suffix('"'))
                .unwrap_or(value);
            Some((name.to_string(), value.to_string()))
        })
        .collect()
}

#[cfg(feature = "actix")]
impl RequestView for actix_web::HttpRequest {
    fn method(&self) -> &str {
        actix_web::HttpRequest::method(self).as_str()
    }

    fn path(&self) -> &str {
        actix_web::HttpRequest::path(self)
    }

    fn cookies(&self) -> Vec<(String, String)> {
        match actix_web::HttpRequest::cookies(self) {
            Ok(jar) => jar
                .iter()
                .map(|c| (c.name().to_string(), c.value().to_string()))
                .collect(),
            Err(e) => {
                log::warn!("Unable to parse request cookies: {}", e);
                Vec::new()
            }
        }
    }
}
