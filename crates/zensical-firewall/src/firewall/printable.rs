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

//! Printable ASCII.

// ----------------------------------------------------------------------------
// Functions
// ----------------------------------------------------------------------------

/// Returns whether the given value only consists of printable ASCII.
///
/// Printable ASCII ranges from space (`U+0020`) to tilde (`U+007E`), which
/// excludes control characters as well as any non-ASCII character. Since
/// non-ASCII characters are encoded with bytes above `0x7F` in UTF-8, it's
/// sufficient to check bytes.
///
/// # Examples
///
/// ```
/// use zensical_firewall::firewall::is_printable_ascii;
///
/// // Check values
/// assert!(is_printable_ascii("/coffee?kind=arabica"));
/// assert!(!is_printable_ascii("/caf\u{e9}"));
/// assert!(!is_printable_ascii("/coffee\t"));
/// ```
#[must_use]
pub fn is_printable_ascii(value: &str) -> bool {
    value.bytes().all(|byte| (0x20..=0x7E).contains(&byte))
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_printable_ascii() {
        let test_cases = vec![
            ("", true),
            (" ", true),
            ("~", true),
            ("/a b/c~d?e=f&g=%20", true),
            ("\u{1f}", false),
            ("\u{7f}", false),
            ("\u{80}", false),
            ("/\u{2028}", false),
            ("/\r\n", false),
            ("/\0", false),
            ("/\u{1f600}", false),
        ];

        for (value, expected) in test_cases {
            let result = is_printable_ascii(value);
            assert_eq!(result, expected, "Failed for: {value:?}");
        }
    }
}
