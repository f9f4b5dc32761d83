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

//! HTTP method.

use serde::de::{self, Deserialize, Deserializer};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use super::error::{Error, Result};

// ----------------------------------------------------------------------------
// Implementations
// ----------------------------------------------------------------------------

impl Method {
    /// Returns whether the method is an extension method.
    ///
    /// # Examples
    ///
    /// ```
    /// # use std::error::Error;
    /// # fn main() -> Result<(), Box<dyn Error>> {
    /// use zensical_firewall::http::Method;
    ///
    /// // Create method from string
    /// let method: Method = "PROPFIND".parse()?;
    /// assert!(method.is_extension());
    /// # Ok(())
    /// # }
    /// ```
    #[inline]
    #[must_use]
    pub fn is_extension(&self) -> bool {
        matches!(self, Method::Extension(_))
    }
}

// ----------------------------------------------------------------------------
// Trait implementations
// ----------------------------------------------------------------------------

impl AsRef<str> for Method {
    /// Returns the string representation.
    #[inline]
    fn as_ref(&self) -> &str {
        self.name()
    }
}

// ----------------------------------------------------------------------------

impl fmt::Display for Method {
    /// Formats the method for display.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ----------------------------------------------------------------------------

impl<'de> Deserialize<'de> for Method {
    /// Deserializes a method from its name.
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        value.parse().map_err(de::Error::custom)
    }
}

// ----------------------------------------------------------------------------
// Functions
// ----------------------------------------------------------------------------

/// Returns whether the given byte is a valid token character.
///
/// Methods are tokens as defined in RFC 9110, section 5.6.2, which is the
/// only constraint imposed on extension methods.
const fn is_token(byte: u8) -> bool {
    matches!(byte,
        b'!' | b'#' | b'$' | b'%' | b'&' | b'\'' | b'*' | b'+' | b'-' | b'.' |
        b'^' | b'_' | b'`' | b'|' | b'~' | b'0'..=b'9' | b'a'..=b'z' |
        b'A'..=b'Z'
    )
}

// ----------------------------------------------------------------------------
// Macros
// ----------------------------------------------------------------------------

/// Defines and implements HTTP methods.
macro_rules! define_and_impl_method {
    (
        $(
            // Method definition
            $(#[$comment:meta])*
            $name:ident = $method:expr
        ),+
        $(,)?
    ) => {
        /// HTTP method.
        ///
        /// Besides the registered methods, any other valid token is parsed
        /// into [`Method::Extension`], keeping the name verbatim. Rejecting
        /// unknown methods is not the job of the parser, but of the method
        /// gate of the [`Firewall`][], which must be able to see them.
        ///
        /// [`Firewall`]: crate::firewall::Firewall
        #[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub enum Method {
            $(
                $(#[$comment])*
                $name,
            )+
            /// Extension method
            Extension(Box<str>),
        }

        impl Method {
            /// Returns the method name.
            ///
            /// # Examples
            ///
            /// ```
            /// use zensical_firewall::http::Method;
            ///
            /// // Create method
            /// let method = Method::Get;
            ///
            /// // Obtain method name
            /// assert_eq!(method.name(), "GET");
            /// ```
            #[must_use]
            pub fn name(&self) -> &str {
                match self {
                    $(
                        Method::$name => $method,
                    )+
                    Method::Extension(name) => name,
                }
            }
        }

        /// Lookup table for HTTP methods (case-insensitive).
        static METHOD_LOOKUP_TABLE: LazyLock<HashMap<String, Method>> =
            LazyLock::new(|| {
                HashMap::from_iter([
                    $(
                        ($method.to_uppercase(), Method::$name),
                    )+
                ])
            });

        impl FromStr for Method {
            type Err = Error;

            /// Attempts to create a method from a string.
            ///
            /// # Errors
            ///
            /// This method returns [`Error::Method`], if the string is empty
            /// or contains characters that are not allowed in a token.
            ///
            /// # Examples
            ///
            /// ```
            /// # use std::error::Error;
            /// # fn main() -> Result<(), Box<dyn Error>> {
            /// use zensical_firewall::http::Method;
            ///
            /// // Create method from string
            /// let method: Method = "get".parse()?;
            /// assert_eq!(method, Method::Get);
            /// # Ok(())
            /// # }
            /// ```
            fn from_str(value: &str) -> Result<Self> {
                let name = value.to_ascii_uppercase();
                if let Some(method) = METHOD_LOOKUP_TABLE.get(&name) {
                    return Ok(method.clone());
                }

                // Keep unknown methods, as long as they are valid tokens
                if !value.is_empty() && value.bytes().all(is_token) {
                    Ok(Method::Extension(value.into()))
                } else {
                    Err(Error::Method(value.to_string()))
                }
            }
        }
    }
}

// ----------------------------------------------------------------------------

define_and_impl_method! {
    /// GET method
    Get = "GET",
    /// HEAD method
    Head = "HEAD",
    /// POST method
    Post = "POST",
    /// PUT method
    Put = "PUT",
    /// DELETE method
    Delete = "DELETE",
    /// CONNECT method
    Connect = "CONNECT",
    /// OPTIONS method
    Options = "OPTIONS",
    /// TRACE method
    Trace = "TRACE",
    /// PATCH method
    Patch = "PATCH",
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_method() {
        let test_cases = vec![
            ("GET", Method::Get),
            ("get", Method::Get),
            ("Trace", Method::Trace),
            ("PROPFIND", Method::Extension("PROPFIND".into())),
            ("foo", Method::Extension("foo".into())),
        ];

        for (value, expected) in test_cases {
            let method: Method = value.parse().unwrap();
            assert_eq!(method, expected, "Failed for method: {value}");
        }
    }

    #[test]
    fn test_parse_method_invalid() {
        for value in ["", "GE T", "GET\r\n", "G(E)T"] {
            assert!(value.parse::<Method>().is_err(), "Failed for: {value:?}");
        }
    }
}
