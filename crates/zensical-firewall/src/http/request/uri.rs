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

//! HTTP request URI.

use std::borrow::Cow;
use std::fmt;

mod query;

pub use query::Query;

// ----------------------------------------------------------------------------
// Structs
// ----------------------------------------------------------------------------

/// HTTP request URI.
///
/// The request URI keeps two views of the request target. The raw target is
/// kept exactly as received, and is what the firewall inspects for encoded
/// bypass patterns. The path is what the routing layer sees, which is the
/// raw target without the query string. Percent-escapes are intentionally
/// left intact in the path, as decoding is the business of the router, which
/// decodes path parameters after matching. Hosts that decode paths before
/// routing can overwrite [`Uri::path`] with the decoded path.
///
/// # Examples
///
/// ```
/// use zensical_firewall::http::Uri;
///
/// // Create request URI from string
/// let uri = Uri::from("/coffee%20beans?kind=arabica");
/// assert_eq!(uri.raw, "/coffee%20beans?kind=arabica");
/// assert_eq!(uri.path, "/coffee%20beans");
/// assert_eq!(uri.query.get("kind"), Some("arabica"));
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Uri<'a> {
    /// Raw request target.
    pub raw: Cow<'a, str>,
    /// Request path.
    pub path: Cow<'a, str>,
    /// Query string.
    pub query: Query<'a>,
}

// ----------------------------------------------------------------------------
// Implementations
// ----------------------------------------------------------------------------

impl Uri<'_> {
    /// Creates a request URI.
    ///
    /// # Examples
    ///
    /// ```
    /// use zensical_firewall::http::Uri;
    ///
    /// // Create request URI
    /// let uri = Uri::new();
    /// ```
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

// ----------------------------------------------------------------------------
// Trait implementations
// ----------------------------------------------------------------------------

impl<'a> From<&'a str> for Uri<'a> {
    /// Creates a request URI from a string.
    ///
    /// Note that we can't implement [`FromStr`][] for [`Uri`] because of the
    /// required `&'a str` lifetime, which is not compatible with the trait.
    ///
    /// [`FromStr`]: std::str::FromStr
    fn from(value: &'a str) -> Self {
        match value.split_once('?') {
            Some((path, query)) => Uri {
                raw: Cow::Borrowed(value),
                path: Cow::Borrowed(path),
                query: Query::from(query),
            },
            None => Uri {
                raw: Cow::Borrowed(value),
                path: Cow::Borrowed(value),
                query: Query::default(),
            },
        }
    }
}

// ----------------------------------------------------------------------------

impl Default for Uri<'_> {
    /// Creates a default request URI.
    ///
    /// # Examples
    ///
    /// ```
    /// use zensical_firewall::http::Uri;
    ///
    /// // Create request URI
    /// let uri = Uri::default();
    /// assert_eq!(uri.path, "/");
    /// ```
    #[inline]
    fn default() -> Self {
        Uri {
            raw: Cow::Borrowed("/"),
            path: Cow::Borrowed("/"),
            query: Query::default(),
        }
    }
}

// ----------------------------------------------------------------------------

impl fmt::Display for Uri<'_> {
    /// Formats the request URI for display.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}
