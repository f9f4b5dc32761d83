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

//! Firewall options.

use serde::{Deserialize, Deserializer};
use std::fs;
use std::path::Path;
use std::result;

use crate::http::Method;

use super::error::Result;
use super::methods::default_methods;
use super::predicate::Predicate;

// ----------------------------------------------------------------------------
// Macros
// ----------------------------------------------------------------------------

/// Implements builder-style setters for relaxations.
macro_rules! impl_relaxations {
    ($($(#[$meta:meta])* $name:ident,)+) => {
        impl Options {
            $(
                $(#[$meta])*
                #[inline]
                #[must_use]
                pub fn $name(mut self, value: bool) -> Self {
                    self.$name = value;
                    self
                }
            )+
        }
    };
}

// ----------------------------------------------------------------------------
// Structs
// ----------------------------------------------------------------------------

/// Firewall options.
///
/// The defaults are the most restrictive configuration, and every option
/// relaxes a constraint. Options can be deserialized from configuration, in
/// which case they're named in camel case, e.g., `allowSemicolon`. Predicates
/// can only be set in code, except for the allowed hostnames, which can be
/// given as a list.
///
/// # Examples
///
/// ```
/// # use std::error::Error;
/// # fn main() -> Result<(), Box<dyn Error>> {
/// use zensical_firewall::firewall::Options;
///
/// // Create options from JSON
/// let options = Options::from_json(r#"{
///     "allowSemicolon": true,
///     "allowedHttpMethods": ["GET", "HEAD"],
///     "allowedHostnames": ["example.com"]
/// }"#)?;
///
/// // Check options
/// assert!(options.allow_semicolon);
/// assert!(options.allowed_hostnames.test("EXAMPLE.com"));
/// assert!(!options.allowed_hostnames.test("evil.org"));
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
#[allow(clippy::struct_excessive_bools)]
pub struct Options {
    /// Whether to admit any method, ignoring the allowed methods.
    pub unsafe_allow_any_http_method: bool,
    /// Allowed methods, an empty list admits any method.
    pub allowed_http_methods: Vec<Method>,
    /// Whether to allow semicolons.
    pub allow_semicolon: bool,
    /// Whether to allow encoded slashes.
    pub allow_url_encoded_slash: bool,
    /// Whether to allow double slashes.
    pub allow_url_encoded_double_slash: bool,
    /// Whether to allow encoded periods.
    pub allow_url_encoded_period: bool,
    /// Whether to allow backslashes.
    pub allow_back_slash: bool,
    /// Whether to allow null characters.
    pub allow_null: bool,
    /// Whether to allow encoded percent signs.
    pub allow_url_encoded_percent: bool,
    /// Whether to allow carriage returns.
    pub allow_url_encoded_carriage_return: bool,
    /// Whether to allow line feeds.
    pub allow_url_encoded_line_feed: bool,
    /// Whether to allow paragraph separators.
    pub allow_url_encoded_paragraph_separator: bool,
    /// Whether to allow line separators.
    pub allow_url_encoded_line_separator: bool,
    /// Additional literals forbidden in the decoded path.
    pub decoded_url_block_list: Vec<String>,
    /// Additional literals forbidden in encoded representations.
    pub encoded_url_block_list: Vec<String>,
    /// Predicate for hostnames.
    #[serde(deserialize_with = "hostnames")]
    pub allowed_hostnames: Predicate<str>,
    /// Predicate for header names.
    #[serde(skip, default = "printable")]
    pub allowed_header_names: Predicate<str>,
    /// Predicate for header values.
    #[serde(skip, default = "printable")]
    pub allowed_header_values: Predicate<str>,
    /// Predicate for parameter names.
    #[serde(skip, default = "printable")]
    pub allowed_parameter_names: Predicate<str>,
    /// Predicate for parameter values.
    #[serde(skip)]
    pub allowed_parameter_values: Predicate<str>,
    /// Whether to log rejections as warnings.
    pub log_to_console: bool,
}

// ----------------------------------------------------------------------------
// Implementations
// ----------------------------------------------------------------------------

impl Options {
    /// Creates options.
    ///
    /// # Examples
    ///
    /// ```
    /// use zensical_firewall::firewall::Options;
    ///
    /// // Create options
    /// let options = Options::new();
    /// ```
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates options from the given JSON.
    ///
    /// Options that are not given keep their defaults, and unknown options
    /// are rejected, so a misspelled relaxation can't go unnoticed.
    ///
    /// # Errors
    ///
    /// This method returns [`Error::Json`][], if the JSON is invalid.
    ///
    /// [`Error::Json`]: crate::firewall::Error::Json
    ///
    /// # Examples
    ///
    /// ```
    /// use zensical_firewall::firewall::Options;
    ///
    /// // Create options from invalid JSON
    /// let result = Options::from_json(r#"{ "allowSemicolons": true }"#);
    /// assert!(result.is_err());
    /// ```
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(Into::into)
    }

    /// Creates options from the JSON file at the given path.
    ///
    /// # Errors
    ///
    /// This method returns [`Error::Io`][], if the file can't be read, and
    /// [`Error::Json`][], if its content is invalid.
    ///
    /// [`Error::Io`]: crate::firewall::Error::Io
    /// [`Error::Json`]: crate::firewall::Error::Json
    pub fn from_path<P>(path: P) -> Result<Self>
    where
        P: AsRef<Path>,
    {
        let content = fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Sets the allowed methods.
    #[inline]
    #[must_use]
    pub fn allowed_http_methods<I>(mut self, methods: I) -> Self
    where
        I: IntoIterator<Item = Method>,
    {
        self.allowed_http_methods = methods.into_iter().collect();
        self
    }

    /// Adds a literal forbidden in the decoded path.
    #[inline]
    #[must_use]
    pub fn decoded_url_block_list<S>(mut self, literal: S) -> Self
    where
        S: Into<String>,
    {
        self.decoded_url_block_list.push(literal.into());
        self
    }

    /// Adds a literal forbidden in encoded representations.
    #[inline]
    #[must_use]
    pub fn encoded_url_block_list<S>(mut self, literal: S) -> Self
    where
        S: Into<String>,
    {
        self.encoded_url_block_list.push(literal.into());
        self
    }

    /// Sets the predicate for hostnames.
    ///
    /// # Examples
    ///
    /// ```
    /// use zensical_firewall::firewall::{Options, Predicate};
    ///
    /// // Create options with trusted hostnames
    /// let options = Options::default()
    ///     .allowed_hostnames(Predicate::one_of(["example.com"]));
    /// ```
    #[inline]
    #[must_use]
    pub fn allowed_hostnames(mut self, predicate: Predicate<str>) -> Self {
        self.allowed_hostnames = predicate;
        self
    }

    /// Sets the predicate for header names.
    #[inline]
    #[must_use]
    pub fn allowed_header_names(mut self, predicate: Predicate<str>) -> Self {
        self.allowed_header_names = predicate;
        self
    }

    /// Sets the predicate for header values.
    #[inline]
    #[must_use]
    pub fn allowed_header_values(mut self, predicate: Predicate<str>) -> Self {
        self.allowed_header_values = predicate;
        self
    }

    /// Sets the predicate for parameter names.
    #[inline]
    #[must_use]
    pub fn allowed_parameter_names(
        mut self, predicate: Predicate<str>,
    ) -> Self {
        self.allowed_parameter_names = predicate;
        self
    }

    /// Sets the predicate for parameter values.
    #[inline]
    #[must_use]
    pub fn allowed_parameter_values(
        mut self, predicate: Predicate<str>,
    ) -> Self {
        self.allowed_parameter_values = predicate;
        self
    }
}

impl_relaxations! {
    /// Sets whether to admit any method.
    unsafe_allow_any_http_method,
    /// Sets whether to allow semicolons.
    allow_semicolon,
    /// Sets whether to allow encoded slashes.
    allow_url_encoded_slash,
    /// Sets whether to allow double slashes.
    allow_url_encoded_double_slash,
    /// Sets whether to allow encoded periods.
    allow_url_encoded_period,
    /// Sets whether to allow backslashes.
    allow_back_slash,
    /// Sets whether to allow null characters.
    allow_null,
    /// Sets whether to allow encoded percent signs.
    allow_url_encoded_percent,
    /// Sets whether to allow carriage returns.
    allow_url_encoded_carriage_return,
    /// Sets whether to allow line feeds.
    allow_url_encoded_line_feed,
    /// Sets whether to allow paragraph separators.
    allow_url_encoded_paragraph_separator,
    /// Sets whether to allow line separators.
    allow_url_encoded_line_separator,
    /// Sets whether to log rejections as warnings.
    log_to_console,
}

// ----------------------------------------------------------------------------
// Trait implementations
// ----------------------------------------------------------------------------

impl Default for Options {
    /// Creates the most restrictive options.
    fn default() -> Self {
        Self {
            unsafe_allow_any_http_method: false,
            allowed_http_methods: default_methods(),
            allow_semicolon: false,
            allow_url_encoded_slash: false,
            allow_url_encoded_double_slash: false,
            allow_url_encoded_period: false,
            allow_back_slash: false,
            allow_null: false,
            allow_url_encoded_percent: false,
            allow_url_encoded_carriage_return: false,
            allow_url_encoded_line_feed: false,
            allow_url_encoded_paragraph_separator: false,
            allow_url_encoded_line_separator: false,
            decoded_url_block_list: Vec::new(),
            encoded_url_block_list: Vec::new(),
            allowed_hostnames: Predicate::any(),
            allowed_header_names: printable(),
            allowed_header_values: printable(),
            allowed_parameter_names: printable(),
            allowed_parameter_values: Predicate::any(),
            log_to_console: false,
        }
    }
}

// ----------------------------------------------------------------------------
// Functions
// ----------------------------------------------------------------------------

/// Creates the default predicate for names and header values.
fn printable() -> Predicate<str> {
    Predicate::assigned_and_printable()
}

/// Deserializes allowed hostnames from a list, where `null` admits any.
fn hostnames<'de, D>(
    deserializer: D,
) -> result::Result<Predicate<str>, D::Error>
where
    D: Deserializer<'de>,
{
    let hostnames = Option::<Vec<String>>::deserialize(deserializer)?;
    Ok(hostnames.map_or_else(Predicate::any, Predicate::one_of))
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = Options::default();
        assert!(!options.unsafe_allow_any_http_method);
        assert!(!options.allow_semicolon);
        assert!(!options.log_to_console);
        assert!(!options.allowed_http_methods.contains(&Method::Trace));
        assert!(options.allowed_hostnames.test("anything.example"));
        assert!(options.allowed_header_names.test("Accept"));
        assert!(!options.allowed_header_names.test("Bad\nName"));
        assert!(options.allowed_parameter_values.test("\u{0}"));
    }

    #[test]
    fn test_from_json() {
        let options = Options::from_json(
            r#"{
                "unsafeAllowAnyHttpMethod": true,
                "allowedHttpMethods": ["get", "PROPFIND"],
                "allowUrlEncodedPeriod": true,
                "allowUrlEncodedPercent": true,
                "decodedUrlBlockList": [".exe"],
                "encodedUrlBlockList": ["%7e"],
                "logToConsole": true
            }"#,
        )
        .unwrap();

        assert!(options.unsafe_allow_any_http_method);
        assert_eq!(options.allowed_http_methods.len(), 2);
        assert_eq!(options.allowed_http_methods[0], Method::Get);
        assert!(options.allowed_http_methods[1].is_extension());
        assert!(options.allow_url_encoded_period);
        assert!(options.allow_url_encoded_percent);
        assert!(!options.allow_semicolon);
        assert_eq!(options.decoded_url_block_list, [".exe"]);
        assert_eq!(options.encoded_url_block_list, ["%7e"]);
        assert!(options.log_to_console);

        // Code-only predicates keep their defaults
        assert!(!options.allowed_header_values.test("a\rb"));
    }

    #[test]
    fn test_from_json_hostnames() {
        let test_cases = vec![
            (r#"{}"#, "evil.org", true),
            (r#"{ "allowedHostnames": null }"#, "evil.org", true),
            (r#"{ "allowedHostnames": [] }"#, "example.com", false),
            (r#"{ "allowedHostnames": ["Example.com"] }"#, "example.COM", true),
            (r#"{ "allowedHostnames": ["example.com"] }"#, "evil.org", false),
        ];

        for (json, host, expected) in test_cases {
            let options = Options::from_json(json).unwrap();
            let result = options.allowed_hostnames.test(host);
            assert_eq!(result, expected, "Failed for: {json} with {host}");
        }
    }

    #[test]
    fn test_from_json_invalid() {
        let test_cases = vec![
            r#"{ "allowSemicolons": true }"#,
            r#"{ "allowSemicolon": "yes" }"#,
            r#"{ "allowedHttpMethods": ["GET /"] }"#,
            r#"{ "allowedHeaderNames": ["Accept"] }"#,
            r#"["allowSemicolon"]"#,
        ];

        for json in test_cases {
            let result = Options::from_json(json);
            assert!(result.is_err(), "Failed for: {json}");
        }
    }

    #[test]
    fn test_from_path() {
        let path = std::env::temp_dir().join("zensical-firewall-options.json");
        fs::write(&path, r#"{ "allowBackSlash": true }"#).unwrap();
        let options = Options::from_path(&path).unwrap();
        fs::remove_file(&path).unwrap();
        assert!(options.allow_back_slash);

        let result = Options::from_path(path.with_extension("missing"));
        assert!(matches!(result, Err(crate::firewall::Error::Io(_))));
    }
}
