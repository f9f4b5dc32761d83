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

//! Blocklist.

use super::options::Options;

// ----------------------------------------------------------------------------
// Structs
// ----------------------------------------------------------------------------

/// Blocklist.
///
/// A blocklist is a pair of ordered sets of forbidden literals, which are
/// matched by substring containment. The encoded set is checked against every
/// representation of the request target as received, while the decoded set is
/// only checked against the path. Both sets start from a baseline, from which
/// each relaxation in [`Options`] removes its literals, and to which further
/// literals can be added. Once built, a blocklist is never changed.
///
/// # Examples
///
/// ```
/// use zensical_firewall::firewall::{Blocklist, Options};
///
/// // Create blocklist with semicolons allowed
/// let options = Options::default().allow_semicolon(true);
/// let blocklist = Blocklist::new(&options);
///
/// // Find literals
/// assert_eq!(blocklist.find_encoded("/coffee;jsessionid=1"), None);
/// assert_eq!(blocklist.find_encoded("/%2e%2e/etc"), Some("%2e"));
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Blocklist {
    /// Literals checked in encoded representations.
    encoded: Vec<String>,
    /// Literals checked in the decoded path.
    decoded: Vec<String>,
}

/// Blocklist rule.
///
/// A rule groups the literals that are removed by a single relaxation.
struct Rule {
    /// Literals of the encoded set.
    encoded: &'static [&'static str],
    /// Literals of the decoded set.
    decoded: &'static [&'static str],
}

// ----------------------------------------------------------------------------
// Constants
// ----------------------------------------------------------------------------

/// Semicolons.
const SEMICOLON: Rule = Rule::both(&[";", "%3b", "%3B"]);

/// Encoded slashes.
const ENCODED_SLASH: Rule = Rule::both(&["%2f", "%2F"]);

/// Double slashes, encoded or not.
const DOUBLE_SLASH: Rule =
    Rule::both(&["//", "%2f%2f", "%2f%2F", "%2F%2f", "%2F%2F"]);

/// Backslashes.
const BACKSLASH: Rule = Rule::both(&["\\", "%5c", "%5C"]);

/// Null characters.
const NULL: Rule = Rule::both(&["\0", "%00"]);

/// Line feeds.
const LINE_FEED: Rule = Rule::both(&["\n", "%0a", "%0A"]);

/// Carriage returns.
const CARRIAGE_RETURN: Rule = Rule::both(&["\r", "%0d", "%0D"]);

/// Line separators.
const LINE_SEPARATOR: Rule = Rule::encoded(&["\u{2028}"]);

/// Paragraph separators.
const PARAGRAPH_SEPARATOR: Rule = Rule::encoded(&["\u{2029}"]);

/// Encoded percent, which is a literal percent once decoded.
const ENCODED_PERCENT: Rule = Rule {
    encoded: &["%25"],
    decoded: &["%"],
};

/// Encoded periods.
const ENCODED_PERIOD: Rule = Rule::both(&["%2e", "%2E"]);

// ----------------------------------------------------------------------------
// Implementations
// ----------------------------------------------------------------------------

impl Blocklist {
    /// Creates a blocklist from the given options.
    ///
    /// Empty literals are skipped, as every value contains the empty string,
    /// which would make the blocklist reject every request.
    ///
    /// # Examples
    ///
    /// ```
    /// use zensical_firewall::firewall::{Blocklist, Options};
    ///
    /// // Create blocklist with additional literals
    /// let mut options = Options::default();
    /// options.decoded_url_block_list = vec![".exe".into()];
    /// let blocklist = Blocklist::new(&options);
    ///
    /// // Find literals
    /// assert_eq!(blocklist.find_decoded("/a/b.exe"), Some(".exe"));
    /// ```
    #[must_use]
    pub fn new(options: &Options) -> Self {
        let mut blocklist = Self::default();
        let rules = [
            (options.allow_semicolon, SEMICOLON),
            (options.allow_url_encoded_slash, ENCODED_SLASH),
            (options.allow_url_encoded_double_slash, DOUBLE_SLASH),
            (options.allow_back_slash, BACKSLASH),
            (options.allow_null, NULL),
            (options.allow_url_encoded_line_feed, LINE_FEED),
            (options.allow_url_encoded_carriage_return, CARRIAGE_RETURN),
            (options.allow_url_encoded_line_separator, LINE_SEPARATOR),
            (
                options.allow_url_encoded_paragraph_separator,
                PARAGRAPH_SEPARATOR,
            ),
            (options.allow_url_encoded_percent, ENCODED_PERCENT),
            (options.allow_url_encoded_period, ENCODED_PERIOD),
        ];

        // Add baseline literals, then remove relaxed literals
        for (_, rule) in &rules {
            extend(&mut blocklist.encoded, rule.encoded);
            extend(&mut blocklist.decoded, rule.decoded);
        }
        for (allow, rule) in &rules {
            if *allow {
                blocklist.remove(rule);
            }
        }

        // Additional literals are never subject to relaxations
        extend(&mut blocklist.encoded, &options.encoded_url_block_list);
        extend(&mut blocklist.decoded, &options.decoded_url_block_list);
        blocklist
    }

    /// Returns the first literal of the encoded set contained in the value.
    #[must_use]
    pub fn find_encoded(&self, value: &str) -> Option<&str> {
        find(&self.encoded, value)
    }

    /// Returns the first literal of the decoded set contained in the value.
    #[must_use]
    pub fn find_decoded(&self, value: &str) -> Option<&str> {
        find(&self.decoded, value)
    }

    /// Returns the literals of the encoded set.
    #[inline]
    #[must_use]
    pub fn encoded(&self) -> &[String] {
        &self.encoded
    }

    /// Returns the literals of the decoded set.
    #[inline]
    #[must_use]
    pub fn decoded(&self) -> &[String] {
        &self.decoded
    }

    /// Removes the literals of the given rule from both sets.
    fn remove(&mut self, rule: &Rule) {
        let literals = || rule.encoded.iter().chain(rule.decoded);
        self.encoded.retain(|entry| !literals().any(|lit| *lit == entry));
        self.decoded.retain(|entry| !literals().any(|lit| *lit == entry));
    }
}

impl Rule {
    /// Creates a rule with the same literals in both sets.
    const fn both(literals: &'static [&'static str]) -> Self {
        Self { encoded: literals, decoded: literals }
    }

    /// Creates a rule with literals in the encoded set only.
    const fn encoded(literals: &'static [&'static str]) -> Self {
        Self { encoded: literals, decoded: &[] }
    }
}

// ----------------------------------------------------------------------------
// Trait implementations
// ----------------------------------------------------------------------------

impl Default for Blocklist {
    /// Creates an empty blocklist.
    #[inline]
    fn default() -> Self {
        Self { encoded: Vec::new(), decoded: Vec::new() }
    }
}

// ----------------------------------------------------------------------------
// Functions
// ----------------------------------------------------------------------------

/// Adds the given literals to a set, skipping duplicates and empty literals.
fn extend<S>(set: &mut Vec<String>, literals: &[S])
where
    S: AsRef<str>,
{
    for literal in literals.iter().map(AsRef::as_ref) {
        if literal.is_empty() {
            tracing::warn!("ignoring empty blocklist literal");
        } else if !set.iter().any(|entry| entry == literal) {
            set.push(literal.to_string());
        }
    }
}

/// Returns the first literal of a set contained in the value.
fn find<'a>(set: &'a [String], value: &str) -> Option<&'a str> {
    set.iter()
        .map(String::as_str)
        .find(|literal| value.contains(literal))
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_baseline() {
        let blocklist = Blocklist::new(&Options::default());
        let test_cases = vec![
            ("/coffee;v=1", Some(";"), Some(";")),
            ("/a%2Fb", Some("%2F"), Some("%2F")),
            ("/a//b", Some("//"), Some("//")),
            ("/a\\b", Some("\\"), Some("\\")),
            ("/a%00", Some("%00"), Some("%00")),
            ("/a%0A", Some("%0A"), Some("%0A")),
            ("/a\u{2028}", Some("\u{2028}"), None),
            ("/a%25", Some("%25"), Some("%")),
            ("/a%2e", Some("%2e"), Some("%")),
            ("/a.b", None, None),
            ("/", None, None),
        ];

        for (value, encoded, decoded) in test_cases {
            let result = blocklist.find_encoded(value);
            assert_eq!(result, encoded, "Failed for encoded: {value:?}");
            let result = blocklist.find_decoded(value);
            assert_eq!(result, decoded, "Failed for decoded: {value:?}");
        }
    }

    #[test]
    fn test_relaxations() {
        let options = Options::default()
            .allow_semicolon(true)
            .allow_url_encoded_slash(true)
            .allow_url_encoded_percent(true);
        let blocklist = Blocklist::new(&options);

        assert_eq!(blocklist.find_encoded("/a;b"), None);
        assert_eq!(blocklist.find_encoded("/a%2fb"), None);
        assert_eq!(blocklist.find_decoded("/a%b"), None);

        // Double slashes are a separate relaxation
        assert_eq!(blocklist.find_encoded("/a%2f%2fb"), Some("%2f%2f"));
    }

    #[test]
    fn test_relaxations_all() {
        let options = Options::default()
            .allow_semicolon(true)
            .allow_url_encoded_slash(true)
            .allow_url_encoded_double_slash(true)
            .allow_url_encoded_period(true)
            .allow_back_slash(true)
            .allow_null(true)
            .allow_url_encoded_percent(true)
            .allow_url_encoded_carriage_return(true)
            .allow_url_encoded_line_feed(true)
            .allow_url_encoded_paragraph_separator(true)
            .allow_url_encoded_line_separator(true);

        let blocklist = Blocklist::new(&options);
        assert!(blocklist.encoded().is_empty());
        assert!(blocklist.decoded().is_empty());
    }

    #[test]
    fn test_additional_literals() {
        let mut options = Options::default().allow_semicolon(true);
        options.encoded_url_block_list = vec![";".into(), String::new()];
        options.decoded_url_block_list = vec![".exe".into(), ".exe".into()];

        let blocklist = Blocklist::new(&options);
        assert_eq!(blocklist.find_encoded("/a;b"), Some(";"));
        assert_eq!(blocklist.find_decoded("/a;b"), None);
        assert_eq!(blocklist.find_decoded("/a"), None);

        let count = blocklist.decoded().iter().filter(|e| *e == ".exe");
        assert_eq!(count.count(), 1);
    }

    #[test]
    fn test_order() {
        let blocklist = Blocklist::new(&Options::default());
        assert_eq!(blocklist.encoded()[..3], [";", "%3b", "%3B"]);
        assert_eq!(blocklist.find_encoded("/%2e;"), Some(";"));
    }
}
