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

//! Rejection.

use std::fmt;
use thiserror::Error;

use super::predicate::Fault;

// ----------------------------------------------------------------------------
// Enums
// ----------------------------------------------------------------------------

/// Rejection.
///
/// The reason why the [`Firewall`][] refused a request, carrying the offending
/// value. Rejections are meant for logs, and are never part of the response,
/// which is the same for every refused request.
///
/// [`Firewall`]: crate::firewall::Firewall
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum Rejection {
    /// Method is not allowed.
    #[error("method {method} is not allowed")]
    MethodNotAllowed {
        /// Method name.
        method: String,
    },

    /// Field contains a blocklisted literal.
    #[error("{field} contains blocklisted literal {literal:?}")]
    Blocklisted {
        /// Offending field.
        field: Field,
        /// Blocklisted literal.
        literal: String,
    },

    /// Hostname is not trusted.
    #[error("hostname {hostname:?} is not trusted")]
    UntrustedHost {
        /// Hostname.
        hostname: String,
    },

    /// Field is not normalized.
    #[error("{field} is not normalized: {value:?}")]
    NonNormalizedPath {
        /// Offending field.
        field: Field,
        /// Offending value.
        value: String,
    },

    /// Field contains characters that are not printable ASCII.
    #[error("{field} contains non-printable characters: {value:?}")]
    NonPrintable {
        /// Offending field.
        field: Field,
        /// Offending value.
        value: String,
    },

    /// Predicate could not be evaluated.
    #[error("{field} could not be checked: {fault}")]
    PredicateFault {
        /// Field checked by the predicate.
        field: Field,
        /// Predicate fault.
        fault: Fault,
    },
}

/// Field of a request, as checked by the firewall.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Field {
    /// Raw request target.
    RawUrl,
    /// Path.
    Path,
    /// Original URL.
    OriginalUrl,
    /// Matched route template.
    Route,
    /// Base path.
    BasePath,
    /// Hostname.
    Hostname,
}

// ----------------------------------------------------------------------------
// Implementations
// ----------------------------------------------------------------------------

impl Rejection {
    /// Returns the reason of the rejection.
    ///
    /// # Examples
    ///
    /// ```
    /// use zensical_firewall::firewall::Rejection;
    ///
    /// // Create rejection
    /// let rejection = Rejection::MethodNotAllowed {
    ///     method: String::from("TRACE"),
    /// };
    /// assert_eq!(rejection.reason(), "method-not-allowed");
    /// assert_eq!(rejection.to_string(), "method TRACE is not allowed");
    /// ```
    #[must_use]
    pub fn reason(&self) -> &'static str {
        match self {
            Rejection::MethodNotAllowed { .. } => "method-not-allowed",
            Rejection::Blocklisted { .. } => "blocklisted-content",
            Rejection::UntrustedHost { .. } => "untrusted-host",
            Rejection::NonNormalizedPath { .. } => "non-normalized-path",
            Rejection::NonPrintable { .. } => "non-printable-characters",
            Rejection::PredicateFault { .. } => "predicate-fault",
        }
    }
}

impl Field {
    /// Returns the name of the field.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Field::RawUrl => "raw URL",
            Field::Path => "path",
            Field::OriginalUrl => "original URL",
            Field::Route => "route",
            Field::BasePath => "base path",
            Field::Hostname => "hostname",
        }
    }
}

// ----------------------------------------------------------------------------
// Trait implementations
// ----------------------------------------------------------------------------

impl fmt::Display for Field {
    /// Formats the field for display.
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let test_cases = vec![
            (
                Rejection::Blocklisted {
                    field: Field::OriginalUrl,
                    literal: String::from(";"),
                },
                "original URL contains blocklisted literal \";\"",
            ),
            (
                Rejection::UntrustedHost {
                    hostname: String::from("evil.org"),
                },
                "hostname \"evil.org\" is not trusted",
            ),
            (
                Rejection::NonNormalizedPath {
                    field: Field::Route,
                    value: String::from("/a/../b"),
                },
                "route is not normalized: \"/a/../b\"",
            ),
            (
                Rejection::PredicateFault {
                    field: Field::Hostname,
                    fault: Fault { message: String::from("boom") },
                },
                "hostname could not be checked: predicate panicked: boom",
            ),
        ];

        for (rejection, expected) in test_cases {
            assert_eq!(rejection.to_string(), expected);
        }
    }
}
