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

//! Method set.

use std::collections::BTreeSet;
use std::fmt;

use crate::http::Method;

// ----------------------------------------------------------------------------
// Enums
// ----------------------------------------------------------------------------

/// Method set.
///
/// The set of methods a [`Firewall`][] admits, which is either any method, or
/// a finite set of methods compared by uppercased name, so that lowercase or
/// extension methods are matched case-insensitively. By default, all common
/// methods except `TRACE` and `CONNECT` are admitted.
///
/// [`Firewall`]: crate::firewall::Firewall
///
/// # Examples
///
/// ```
/// # use std::error::Error;
/// # fn main() -> Result<(), Box<dyn Error>> {
/// use zensical_firewall::firewall::MethodSet;
/// use zensical_firewall::http::Method;
///
/// // Create method set
/// let methods = MethodSet::default();
/// assert!(methods.allows(&Method::Get));
/// assert!(methods.allows(&"patch".parse()?));
/// assert!(!methods.allows(&Method::Trace));
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MethodSet {
    /// Any method.
    Any,
    /// Uppercased method names.
    Only(BTreeSet<String>),
}

// ----------------------------------------------------------------------------
// Implementations
// ----------------------------------------------------------------------------

impl MethodSet {
    /// Creates a method set from the given methods.
    ///
    /// An empty list of methods can't admit any request, which renders the
    /// firewall useless, so it is treated like [`MethodSet::Any`].
    ///
    /// # Examples
    ///
    /// ```
    /// use zensical_firewall::firewall::MethodSet;
    /// use zensical_firewall::http::Method;
    ///
    /// // Create method set
    /// let methods = MethodSet::only([Method::Get, Method::Head]);
    /// assert!(methods.allows(&Method::Head));
    /// assert!(!methods.allows(&Method::Post));
    ///
    /// // Create method set from empty list
    /// let methods = MethodSet::only(Vec::new());
    /// assert_eq!(methods, MethodSet::Any);
    /// ```
    pub fn only<I>(methods: I) -> Self
    where
        I: IntoIterator<Item = Method>,
    {
        let names = methods
            .into_iter()
            .map(|method| method.name().to_ascii_uppercase())
            .collect::<BTreeSet<_>>();
        if names.is_empty() {
            MethodSet::Any
        } else {
            MethodSet::Only(names)
        }
    }

    /// Returns whether the given method is admitted.
    #[must_use]
    pub fn allows(&self, method: &Method) -> bool {
        match self {
            MethodSet::Any => true,
            MethodSet::Only(names) => {
                let name = method.name();
                if name.bytes().any(|byte| byte.is_ascii_lowercase()) {
                    names.contains(&name.to_ascii_uppercase())
                } else {
                    names.contains(name)
                }
            }
        }
    }

    /// Returns whether any method is admitted.
    #[inline]
    #[must_use]
    pub fn is_any(&self) -> bool {
        matches!(self, MethodSet::Any)
    }
}

// ----------------------------------------------------------------------------
// Trait implementations
// ----------------------------------------------------------------------------

impl Default for MethodSet {
    /// Creates the default method set.
    fn default() -> Self {
        Self::only(default_methods())
    }
}

// ----------------------------------------------------------------------------

impl fmt::Display for MethodSet {
    /// Formats the method set for display.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            MethodSet::Any => f.write_str("*"),
            MethodSet::Only(names) => {
                let names = names.iter().map(String::as_str);
                f.write_str(&names.collect::<Vec<_>>().join(", "))
            }
        }
    }
}

// ----------------------------------------------------------------------------
// Functions
// ----------------------------------------------------------------------------

/// Returns the methods admitted by default.
#[must_use]
pub fn default_methods() -> Vec<Method> {
    vec![
        Method::Get,
        Method::Head,
        Method::Post,
        Method::Put,
        Method::Patch,
        Method::Delete,
        Method::Options,
    ]
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allows() {
        let methods = MethodSet::default();
        let test_cases = vec![
            ("GET", true),
            ("get", true),
            ("Delete", true),
            ("OPTIONS", true),
            ("TRACE", false),
            ("trace", false),
            ("CONNECT", false),
            ("PROPFIND", false),
        ];

        for (name, expected) in test_cases {
            let method: Method = name.parse().unwrap();
            assert_eq!(methods.allows(&method), expected, "Failed for: {name}");
        }
    }

    #[test]
    fn test_allows_extension() {
        let methods = MethodSet::only(["propfind".parse().unwrap()]);
        assert!(methods.allows(&"PROPFIND".parse().unwrap()));
        assert!(methods.allows(&"PropFind".parse().unwrap()));
        assert!(!methods.allows(&Method::Get));
    }

    #[test]
    fn test_any() {
        assert!(MethodSet::Any.allows(&Method::Trace));
        assert!(MethodSet::only(Vec::new()).is_any());
        assert!(!MethodSet::default().is_any());
    }

    #[test]
    fn test_display() {
        let methods = MethodSet::only([Method::Post, Method::Get]);
        assert_eq!(methods.to_string(), "GET, POST");
        assert_eq!(MethodSet::Any.to_string(), "*");
    }
}
