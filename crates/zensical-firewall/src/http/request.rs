// Copyright (c) 2025 Zensical and contributors

// SPDX-License-Identifier: MIT
// Third-party contributions licensed under DCO

// Permission is hereby granted, free of charge, to any person obtaining a copy
// of this software and associated documentation files (the "Software"), to
// deal in the Software without restriction, including without limitation the
// rights to use, copy, modify, merge, publish, distribute, sublicense, and/or
// sell copies of the Software, and to permit persons to whom the Software is
// furnished to do so, subject to the following conditions:

// The above copyright notice and this permission notice shall be included in
// all copies or substantial portions of the Software.

// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
// IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
// FITNESS FOR A PARTICULAR PURPOSE AND NON-INFRINGEMENT. IN NO EVENT SHALL THE
// AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
// LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING
// FROM, OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS
// IN THE SOFTWARE.

// ----------------------------------------------------------------------------

//! HTTP request.

use std::borrow::Cow;
use std::str;

use super::component::{Header, Method, Status};

mod error;
mod headers;
mod uri;

pub use error::{Error, Result};
pub use headers::Headers;
pub use uri::{Query, Uri};

// ----------------------------------------------------------------------------
// Structs
// ----------------------------------------------------------------------------

/// HTTP request.
///
/// Besides method, URI and headers, a request carries the context a hosting
/// framework knows about it, which matters to the [`Firewall`][], as every
/// layer of an application might look at a different representation of the
/// request target:
///
/// - __Original URL__: the request target before any mount point was
///   stripped. If unset, it's identical to the raw request target.
/// - __Base path__: the mount point of the handler, if any.
/// - __Route__: the template of the matched route, if any.
/// - __Hostname__: set explicitly by hosts that resolve it themselves, e.g.,
///   behind a trusted proxy. Otherwise, it's taken from the `Host` header.
///
/// [`Firewall`]: crate::firewall::Firewall
///
/// # Examples
///
/// ```
/// use zensical_firewall::http::{Header, Method, Request};
///
/// // Create request
/// let req = Request::new()
///     .method(Method::Get)
///     .uri("/coffee?kind=arabica")
///     .header(Header::Host, "example.com:8080");
///
/// // Obtain hostname and parameters
/// assert_eq!(req.hostname(), Some("example.com"));
/// assert_eq!(req.params().get("kind"), Some("arabica"));
/// ```
#[derive(Clone, Debug)]
pub struct Request<'a> {
    /// Request method.
    pub method: Method,
    /// Request URI.
    pub uri: Uri<'a>,
    /// Original URL, optional.
    pub original: Option<Cow<'a, str>>,
    /// Base path, optional.
    pub base: Option<Cow<'a, str>>,
    /// Matched route template, optional.
    pub route: Option<Cow<'a, str>>,
    /// Hostname, optional.
    pub host: Option<Cow<'a, str>>,
    /// Request headers.
    pub headers: Headers<'a>,
}

// ----------------------------------------------------------------------------
// Implementations
// ----------------------------------------------------------------------------

impl<'a> Request<'a> {
    /// Creates a request.
    ///
    /// # Examples
    ///
    /// ```
    /// use zensical_firewall::http::Request;
    ///
    /// // Create request
    /// let req = Request::new();
    /// ```
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a request from the given bytes.
    ///
    /// Request heads are parsed using the [`httparse`] crate. The returned
    /// [`Request`] is bound to the lifetime of the input, and keeps the raw
    /// request target and all headers with valid UTF-8 values, regardless
    /// of whether they're known or not. Apart from size limits, no security
    /// validation is performed here, which is the job of the [`Firewall`][].
    /// NUL characters in the request target are already rejected by the
    /// parser, though.
    ///
    /// [`Firewall`]: crate::firewall::Firewall
    ///
    /// # Errors
    ///
    /// This method returns [`Error::Incomplete`], if the given buffer contained
    /// insufficient data to provide a meaningful answer, [`Error::Parser`], if
    /// the buffer contained invalid data, [`Error::Component`], when the method
    /// isn't a valid token, and [`Error::Validation`], if limits are exceeded.
    ///
    /// # Examples
    ///
    /// ```
    /// # use std::error::Error;
    /// # fn main() -> Result<(), Box<dyn Error>> {
    /// use zensical_firewall::http::{Method, Request};
    ///
    /// // Create request from bytes
    /// let bytes = b"GET /;x HTTP/1.1\r\nHost: a.b\r\n\r\n";
    /// let req = Request::from_bytes(bytes)?;
    /// assert_eq!(req.method, Method::Get);
    /// assert_eq!(req.uri.raw, "/;x");
    /// assert_eq!(req.hostname(), Some("a.b"));
    /// # Ok(())
    /// # }
    /// ```
    pub fn from_bytes(bytes: &'a [u8]) -> Result<Self> {
        if bytes.len() > 8 * 1024 * 1024 {
            return Err(Error::Validation(Status::PayloadTooLarge));
        }

        // Initialize buffer for headers and request parser
        let mut headers = [httparse::EMPTY_HEADER; 64];
        let mut req = httparse::Request::new(&mut headers);
        let httparse::Status::Complete(_) = req.parse(bytes)? else {
            return Err(Error::Incomplete);
        };

        // If parsing completed, method and path must both be present, but we
        // refrain from asserting it, and treat a violation as incomplete
        let (Some(method), Some(path)) = (req.method, req.path) else {
            return Err(Error::Incomplete);
        };
        if path.len() > 2 * 1024 {
            return Err(Error::Validation(Status::UriTooLong));
        }

        // Unpack request headers - header values must not exceed 4kb, and we
        // skip values that are not valid UTF-8, as we can't inspect them
        let mut list = Headers::new();
        for header in req.headers.iter().take_while(|h| !h.name.is_empty()) {
            if header.value.len() > 4 * 1024 {
                let status = Status::RequestHeaderFieldsTooLarge;
                return Err(Error::Validation(status));
            }
            if let Ok(value) = str::from_utf8(header.value) {
                list.insert(header.name, value);
            }
        }

        // Return request
        Ok(Request {
            method: method.parse()?,
            uri: Uri::from(path),
            headers: list,
            ..Default::default()
        })
    }
}

impl<'a> Request<'a> {
    /// Sets the method of the request.
    #[inline]
    #[must_use]
    pub fn method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    /// Sets the URI of the request.
    ///
    /// # Examples
    ///
    /// ```
    /// use zensical_firewall::http::Request;
    ///
    /// // Create request and set URI
    /// let req = Request::new()
    ///     .uri("/coffee");
    /// ```
    #[inline]
    #[must_use]
    pub fn uri<U>(mut self, uri: U) -> Self
    where
        U: Into<Uri<'a>>,
    {
        self.uri = uri.into();
        self
    }

    /// Sets the original URL of the request.
    ///
    /// # Examples
    ///
    /// ```
    /// use zensical_firewall::http::Request;
    ///
    /// // Create request for handler mounted at `/api`
    /// let req = Request::new()
    ///     .uri("/users")
    ///     .original("/api/users")
    ///     .base("/api");
    ///
    /// // Obtain original URL
    /// assert_eq!(req.original_url(), "/api/users");
    /// ```
    #[inline]
    #[must_use]
    pub fn original<S>(mut self, url: S) -> Self
    where
        S: Into<Cow<'a, str>>,
    {
        self.original = Some(url.into());
        self
    }

    /// Sets the base path of the request.
    #[inline]
    #[must_use]
    pub fn base<S>(mut self, path: S) -> Self
    where
        S: Into<Cow<'a, str>>,
    {
        self.base = Some(path.into());
        self
    }

    /// Sets the matched route template of the request.
    #[inline]
    #[must_use]
    pub fn route<S>(mut self, route: S) -> Self
    where
        S: Into<Cow<'a, str>>,
    {
        self.route = Some(route.into());
        self
    }

    /// Sets the hostname of the request.
    #[inline]
    #[must_use]
    pub fn host<S>(mut self, host: S) -> Self
    where
        S: Into<Cow<'a, str>>,
    {
        self.host = Some(host.into());
        self
    }

    /// Adds a header to the request.
    ///
    /// # Examples
    ///
    /// ```
    /// use zensical_firewall::http::{Header, Request};
    ///
    /// // Create request and add headers
    /// let req = Request::new()
    ///     .header(Header::Accept, "text/plain")
    ///     .header("X-Custom", "value");
    /// ```
    #[inline]
    #[must_use]
    pub fn header<K, V>(mut self, name: K, value: V) -> Self
    where
        K: Into<Cow<'a, str>>,
        V: Into<Cow<'a, str>>,
    {
        self.headers.insert(name, value);
        self
    }
}

#[allow(clippy::must_use_candidate)]
impl Request<'_> {
    /// Returns the original URL of the request.
    ///
    /// If no original URL was set, the request wasn't rewritten, so the raw
    /// request target is returned.
    #[inline]
    pub fn original_url(&self) -> &str {
        self.original.as_deref().unwrap_or(&self.uri.raw)
    }

    /// Returns the hostname of the request.
    ///
    /// If no hostname was set explicitly, it's derived from the `Host` header,
    /// without the port. IPv6 literals keep their brackets, and are returned
    /// as received if the closing bracket is missing.
    ///
    /// # Examples
    ///
    /// ```
    /// use zensical_firewall::http::{Header, Request};
    ///
    /// // Create request with IPv6 host
    /// let req = Request::new()
    ///     .header(Header::Host, "[::1]:3000");
    ///
    /// // Obtain hostname
    /// assert_eq!(req.hostname(), Some("[::1]"));
    /// ```
    pub fn hostname(&self) -> Option<&str> {
        if let Some(host) = self.host.as_deref() {
            return Some(host);
        }

        // Strip port from host header, if any - an IPv6 literal without the
        // closing bracket is malformed, so it's returned as received
        let host = self.headers.get(Header::Host)?;
        let host = if host.starts_with('[') {
            host.find(']').map_or(host, |end| &host[..=end])
        } else {
            host.split_once(':').map_or(host, |(name, _)| name)
        };
        (!host.is_empty()).then_some(host)
    }

    /// Returns the parameters of the request.
    #[inline]
    pub fn params(&self) -> &Query<'_> {
        &self.uri.query
    }
}

// ----------------------------------------------------------------------------
// Trait implementations
// ----------------------------------------------------------------------------

impl Default for Request<'_> {
    /// Creates a default request.
    #[inline]
    fn default() -> Self {
        Self {
            method: Method::Get,
            uri: Uri::default(),
            original: None,
            base: None,
            route: None,
            host: None,
            headers: Headers::default(),
        }
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_bytes() {
        let bytes = b"TRACE /a/%2e%2e/b?x=1 HTTP/1.1\r\n\
            Host: example.com\r\n\
            X-Unknown-Header: smuggled\r\n\r\n";

        let req = Request::from_bytes(bytes).unwrap();
        assert_eq!(req.method, Method::Trace);
        assert_eq!(req.uri.raw, "/a/%2e%2e/b?x=1");
        assert_eq!(req.uri.path, "/a/%2e%2e/b");
        assert_eq!(req.params().get("x"), Some("1"));
        assert_eq!(req.headers.get("x-unknown-header"), Some("smuggled"));

        // Header names are kept as received, in order
        let names = req.headers.iter().map(|(name, _)| name);
        assert_eq!(names.collect::<Vec<_>>(), ["Host", "X-Unknown-Header"]);
        assert_eq!(req.original_url(), "/a/%2e%2e/b?x=1");
    }

    #[test]
    fn test_from_bytes_extension_method() {
        let req = Request::from_bytes(b"PROPFIND / HTTP/1.1\r\n\r\n").unwrap();
        assert_eq!(req.method.name(), "PROPFIND");
    }

    #[test]
    fn test_from_bytes_incomplete() {
        let res = Request::from_bytes(b"GET / HTTP/1.1\r\nHost: a");
        assert!(matches!(res, Err(Error::Incomplete)));
    }

    #[test]
    fn test_from_bytes_uri_too_long() {
        let bytes = format!("GET /{} HTTP/1.1\r\n\r\n", "a".repeat(4096));
        let res = Request::from_bytes(bytes.as_bytes());
        assert!(matches!(res, Err(Error::Validation(Status::UriTooLong))));
    }

    #[test]
    fn test_hostname() {
        let test_cases = vec![
            (None, None, None),
            (None, Some("example.com"), Some("example.com")),
            (None, Some("example.com:443"), Some("example.com")),
            (None, Some("[::1]:8080"), Some("[::1]")),
            (None, Some("[::1"), Some("[::1")),
            (None, Some("[::1:8080"), Some("[::1:8080")),
            (None, Some(":8080"), None),
            (Some("trusted.com"), Some("other.com"), Some("trusted.com")),
        ];

        for (host, header, expected) in test_cases {
            let mut req = Request::new();
            if let Some(host) = host {
                req = req.host(host);
            }
            if let Some(header) = header {
                req = req.header(Header::Host, header);
            }
            assert_eq!(req.hostname(), expected, "Failed for: {header:?}");
        }
    }
}
