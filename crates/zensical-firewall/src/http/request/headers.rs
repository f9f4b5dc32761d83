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

//! HTTP request headers.

use std::borrow::Cow;

// ----------------------------------------------------------------------------
// Structs
// ----------------------------------------------------------------------------

/// HTTP request headers.
///
/// Unlike response headers, request headers are keyed by their names as they
/// were received, and not by [`Header`][], since the firewall must be able to
/// see every header a client sent, known or not. Names are compared without
/// regard to ASCII case, and insertion order is preserved.
///
/// [`Header`]: crate::http::Header
///
/// # Examples
///
/// ```
/// use zensical_firewall::http::request::Headers;
/// use zensical_firewall::http::Header;
///
/// // Create header map and add header
/// let mut headers = Headers::new();
/// headers.insert(Header::Accept, "text/plain");
///
/// // Obtain header value, regardless of case
/// assert_eq!(headers.get("accept"), Some("text/plain"));
/// ```
#[derive(Clone, Debug, Default)]
pub struct Headers<'a> {
    /// List of headers.
    inner: Vec<(Cow<'a, str>, Cow<'a, str>)>,
}

// ----------------------------------------------------------------------------
// Implementations
// ----------------------------------------------------------------------------

impl<'a> Headers<'a> {
    /// Creates a header map.
    ///
    /// # Examples
    ///
    /// ```
    /// use zensical_firewall::http::request::Headers;
    ///
    /// // Create header map
    /// let headers = Headers::new();
    /// ```
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self { inner: Vec::new() }
    }

    /// Returns the value for the given header.
    #[must_use]
    pub fn get<K>(&self, name: K) -> Option<&str>
    where
        K: AsRef<str>,
    {
        let name = name.as_ref();
        self.inner.iter().find_map(|(key, value)| {
            key.eq_ignore_ascii_case(name).then_some(value.as_ref())
        })
    }

    /// Returns whether the header is contained.
    #[must_use]
    pub fn contains<K>(&self, name: K) -> bool
    where
        K: AsRef<str>,
    {
        self.get(name).is_some()
    }

    /// Updates the given header.
    ///
    /// If a header with the same name already exists, its value is replaced,
    /// otherwise the header is appended.
    ///
    /// # Examples
    ///
    /// ```
    /// use zensical_firewall::http::request::Headers;
    ///
    /// // Create header map and add header twice
    /// let mut headers = Headers::new();
    /// headers.insert("X-Request-Id", "a");
    /// headers.insert("x-request-id", "b");
    /// assert_eq!(headers.len(), 1);
    /// assert_eq!(headers.get("X-Request-Id"), Some("b"));
    /// ```
    pub fn insert<K, V>(&mut self, name: K, value: V)
    where
        K: Into<Cow<'a, str>>,
        V: Into<Cow<'a, str>>,
    {
        let name = name.into();
        let value = value.into();
        let mut iter = self.inner.iter_mut();
        match iter.find(|(key, _)| key.eq_ignore_ascii_case(&name)) {
            Some((_, current)) => *current = value,
            None => self.inner.push((name, value)),
        }
    }

    /// Returns an iterator over all headers.
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.inner.iter().map(|(key, value)| (key.as_ref(), value.as_ref()))
    }
}

#[allow(clippy::must_use_candidate)]
impl Headers<'_> {
    /// Returns the number of headers.
    #[inline]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Returns whether there are any headers.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

// ----------------------------------------------------------------------------
// Trait implementations
// ----------------------------------------------------------------------------

impl<'a, K, V> FromIterator<(K, V)> for Headers<'a>
where
    K: Into<Cow<'a, str>>,
    V: Into<Cow<'a, str>>,
{
    /// Creates a header map from an iterator.
    ///
    /// # Examples
    ///
    /// ```
    /// use zensical_firewall::http::request::Headers;
    ///
    /// // Create header map from iterator
    /// let headers = Headers::from_iter([
    ///     ("Accept", "text/plain"),
    ///     ("Accept-Language", "en"),
    /// ]);
    /// ```
    fn from_iter<T>(iter: T) -> Self
    where
        T: IntoIterator<Item = (K, V)>,
    {
        let mut headers = Headers::new();
        for (name, value) in iter {
            headers.insert(name, value);
        }
        headers
    }
}
