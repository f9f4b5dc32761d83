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

//! HTTP query string.

use percent_encoding::percent_decode_str;
use std::borrow::Cow;

// ----------------------------------------------------------------------------
// Structs
// ----------------------------------------------------------------------------

/// HTTP query string.
///
/// The query string holds the parameters of a [`Request`][], which are kept
/// as a list, since a key may appear multiple times and order matters. Keys
/// and values are percent-decoded when parsed with [`Query::from`], with `+`
/// denoting a space.
///
/// [`Request`]: crate::http::Request
///
/// # Examples
///
/// ```
/// use zensical_firewall::http::Query;
///
/// // Create query string from string
/// let query = Query::from("q=caf%C3%A9+latte&size=l&size=xl");
/// assert_eq!(query.get("q"), Some("café latte"));
/// assert_eq!(query.get_all("size").count(), 2);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Query<'a> {
    /// List of parameters.
    inner: Vec<(Cow<'a, str>, Cow<'a, str>)>,
}

// ----------------------------------------------------------------------------
// Implementations
// ----------------------------------------------------------------------------

impl<'a> Query<'a> {
    /// Creates a query string.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the first parameter value for the given key.
    pub fn get<K>(&self, key: K) -> Option<&str>
    where
        K: AsRef<str>,
    {
        self.get_all(key).next()
    }

    /// Returns an iterator over all parameter values for the given key.
    pub fn get_all<K>(&self, key: K) -> impl Iterator<Item = &str>
    where
        K: AsRef<str>,
    {
        self.inner.iter().filter_map(move |(name, value)| {
            (name == key.as_ref()).then_some(value.as_ref())
        })
    }

    /// Returns whether the parameter is contained.
    pub fn contains<K>(&self, key: K) -> bool
    where
        K: AsRef<str>,
    {
        self.get(key).is_some()
    }

    /// Adds the given key-value pair as a parameter.
    ///
    /// # Examples
    ///
    /// ```
    /// use zensical_firewall::http::Query;
    ///
    /// // Create query string and add parameter
    /// let mut query = Query::new();
    /// query.add("key", "value");
    /// assert_eq!(query.get("key"), Some("value"));
    /// ```
    pub fn add<K, V>(&mut self, key: K, value: V)
    where
        K: Into<Cow<'a, str>>,
        V: Into<Cow<'a, str>>,
    {
        self.inner.push((key.into(), value.into()));
    }

    /// Returns an iterator over all parameters.
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.inner.iter().map(|(key, value)| (key.as_ref(), value.as_ref()))
    }
}

#[allow(clippy::must_use_candidate)]
impl Query<'_> {
    /// Returns the number of parameters.
    #[inline]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Returns whether there are any parameters.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

// ----------------------------------------------------------------------------
// Trait implementations
// ----------------------------------------------------------------------------

impl<'a> From<&'a str> for Query<'a> {
    /// Creates a query string from a string.
    ///
    /// The string is expected without the leading `?`. Empty pairs, as they
    /// result from `a=1&&b=2`, are skipped, and a missing `=` yields a key
    /// with an empty value. Only the first `=` separates key and value.
    fn from(value: &'a str) -> Self {
        value
            .split('&')
            .filter(|pair| !pair.is_empty())
            .map(|pair| match pair.split_once('=') {
                Some((key, value)) => (decode(key), decode(value)),
                None => (decode(pair), Cow::Borrowed("")),
            })
            .collect()
    }
}

// ----------------------------------------------------------------------------

impl<'a, K, V> FromIterator<(K, V)> for Query<'a>
where
    K: Into<Cow<'a, str>>,
    V: Into<Cow<'a, str>>,
{
    /// Creates a query string from an iterator.
    ///
    /// # Examples
    ///
    /// ```
    /// use zensical_firewall::http::Query;
    ///
    /// // Create query string from iterator
    /// let query = Query::from_iter([
    ///     ("query", "search"),
    ///     ("limit", "25"),
    /// ]);
    /// ```
    fn from_iter<T>(iter: T) -> Self
    where
        T: IntoIterator<Item = (K, V)>,
    {
        let mut query = Query::new();
        for (key, value) in iter {
            query.add(key, value);
        }
        query
    }
}

// ----------------------------------------------------------------------------
// Functions
// ----------------------------------------------------------------------------

/// Decodes a query string component.
fn decode(value: &str) -> Cow<'_, str> {
    if value.contains('+') {
        let value = value.replace('+', " ");
        Cow::Owned(percent_decode_str(&value).decode_utf8_lossy().into_owned())
    } else {
        percent_decode_str(value).decode_utf8_lossy()
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_query() {
        let test_cases = vec![
            ("", vec![]),
            ("a=1", vec![("a", "1")]),
            ("a=1&b", vec![("a", "1"), ("b", "")]),
            ("a=1&&b=2", vec![("a", "1"), ("b", "2")]),
            ("a=x=y", vec![("a", "x=y")]),
            ("a%3Bb=%2e%2e", vec![("a;b", "..")]),
            ("q=two+words", vec![("q", "two words")]),
        ];

        for (value, expected) in test_cases {
            let query = Query::from(value);
            let params = query.iter().collect::<Vec<_>>();
            assert_eq!(params, expected, "Failed for query: {value}");
        }
    }

}
