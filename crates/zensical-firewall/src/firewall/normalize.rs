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

//! Path normalization.

// ----------------------------------------------------------------------------
// Functions
// ----------------------------------------------------------------------------

/// Returns whether the given path is normalized.
///
/// A path is normalized, if none of its segments is `.` or `..`, so it can't
/// be used to traverse the directory hierarchy. Escapes are not decoded, as
/// encoded traversals like `%2e%2e` are caught by the [`Blocklist`][]. Empty
/// paths and trailing slashes are considered normalized.
///
/// [`Blocklist`]: crate::firewall::Blocklist
///
/// # Examples
///
/// ```
/// use zensical_firewall::firewall::is_normalized;
///
/// // Check paths
/// assert!(is_normalized("/coffee/arabica"));
/// assert!(is_normalized("/coffee/.well-known/"));
/// assert!(!is_normalized("/coffee/../tea"));
/// assert!(!is_normalized("/coffee/."));
/// ```
#[must_use]
pub fn is_normalized(path: &str) -> bool {
    !path.split('/').any(|segment| segment == "." || segment == "..")
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_normalized() {
        let test_cases = vec![
            ("", true),
            ("/", true),
            ("/a/b/c", true),
            ("/a/b/", true),
            ("//a", true),
            ("/a.b/c..d", true),
            ("/...", true),
            ("/.hidden", true),
            ("/a/%2e%2e/b", true),
            (".", false),
            ("..", false),
            ("/.", false),
            ("/..", false),
            ("./a", false),
            ("../a", false),
            ("/./", false),
            ("/a/./b", false),
            ("/a/../b", false),
            ("/a/b/.", false),
            ("/a/b/..", false),
        ];

        for (path, expected) in test_cases {
            assert_eq!(is_normalized(path), expected, "Failed for: {path:?}");
        }
    }

    #[test]
    fn test_is_normalized_prefixes() {
        // Appending a plain segment never turns a bad path into a good one
        for path in ["/..", "/a/.", "."] {
            for suffix in ["", "/", "/b", "/b/c"] {
                let value = format!("{path}{suffix}");
                assert!(!is_normalized(&value), "Failed for: {value:?}");
            }
        }
    }
}
