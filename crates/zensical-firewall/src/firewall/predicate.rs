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

//! Predicate.

use std::any::Any;
use std::collections::BTreeSet;
use std::fmt;
use std::ops::Not;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use thiserror::Error;

// ----------------------------------------------------------------------------
// Structs
// ----------------------------------------------------------------------------

/// Predicate.
///
/// Predicates are boolean tests over values, which decide whether a value is
/// acceptable, e.g., whether a hostname is trusted. They are cheap to clone,
/// as clones share the underlying function, and can be composed with [`and`],
/// [`or`] and negation with `!`, which always creates a new predicate and
/// leaves the operands untouched. Predicates can be shared across threads,
/// which is why the function must be [`Send`] and [`Sync`].
///
/// [`and`]: Predicate::and
/// [`or`]: Predicate::or
///
/// # Examples
///
/// ```
/// use zensical_firewall::firewall::Predicate;
///
/// // Create predicates and compose them
/// let internal = Predicate::new(|host: &str| host.ends_with(".internal"));
/// let admin = Predicate::new(|host: &str| host.starts_with("admin."));
/// let trusted = internal.and(&!admin);
///
/// // Test values
/// assert!(trusted.test("api.internal"));
/// assert!(!trusted.test("admin.internal"));
/// ```
pub struct Predicate<T>
where
    T: ?Sized,
{
    /// Predicate function.
    function: Arc<dyn Fn(&T) -> bool + Send + Sync>,
}

/// Predicate fault.
///
/// A fault means that the predicate function panicked, which is a bug in the
/// function, and not a decision about the value.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("predicate panicked: {message}")]
pub struct Fault {
    /// Panic message.
    pub message: String,
}

// ----------------------------------------------------------------------------
// Implementations
// ----------------------------------------------------------------------------

impl<T> Predicate<T>
where
    T: ?Sized + 'static,
{
    /// Creates a predicate from a function.
    pub fn new<F>(function: F) -> Self
    where
        F: Fn(&T) -> bool + Send + Sync + 'static,
    {
        Self { function: Arc::new(function) }
    }

    /// Creates a predicate that accepts any value.
    #[must_use]
    pub fn any() -> Self {
        Self::new(|_| true)
    }

    /// Creates a predicate that accepts no value.
    #[must_use]
    pub fn none() -> Self {
        Self::new(|_| false)
    }

    /// Tests the given value.
    ///
    /// This method is total - if the predicate function panics, the value is
    /// considered unacceptable. Use [`Predicate::evaluate`] to tell a fault
    /// apart from a regular negative decision.
    ///
    /// # Examples
    ///
    /// ```
    /// use zensical_firewall::firewall::Predicate;
    ///
    /// // Create faulty predicate
    /// let predicate = Predicate::new(|value: &str| value[..4].is_empty());
    /// assert!(!predicate.test("a"));
    /// ```
    pub fn test(&self, value: &T) -> bool {
        self.evaluate(value).unwrap_or(false)
    }

    /// Evaluates the given value, catching panics of the predicate function.
    ///
    /// Catching relies on unwinding, so the panic hook still reports every
    /// fault, and a binary built with `panic = "abort"` aborts instead of
    /// returning [`Fault`].
    ///
    /// # Errors
    ///
    /// This method returns [`Fault`], if the predicate function panicked.
    ///
    /// # Examples
    ///
    /// ```
    /// use zensical_firewall::firewall::Predicate;
    ///
    /// // Create predicate
    /// let predicate = Predicate::new(|value: &str| value.is_ascii());
    /// assert_eq!(predicate.evaluate("a"), Ok(true));
    /// ```
    pub fn evaluate(&self, value: &T) -> Result<bool, Fault> {
        let function = AssertUnwindSafe(|| (self.function)(value));
        panic::catch_unwind(function).map_err(|payload| Fault {
            message: message(payload.as_ref()),
        })
    }

    /// Creates a predicate that accepts values accepted by both predicates.
    ///
    /// The second predicate is only invoked if the first accepts the value.
    #[must_use]
    pub fn and(&self, other: &Predicate<T>) -> Self {
        let (a, b) = (Arc::clone(&self.function), Arc::clone(&other.function));
        Self::new(move |value| a(value) && b(value))
    }

    /// Creates a predicate that accepts values accepted by either predicate.
    ///
    /// The second predicate is only invoked if the first rejects the value.
    #[must_use]
    pub fn or(&self, other: &Predicate<T>) -> Self {
        let (a, b) = (Arc::clone(&self.function), Arc::clone(&other.function));
        Self::new(move |value| a(value) || b(value))
    }
}

impl Predicate<str> {
    /// Creates a predicate that accepts one of the given values.
    ///
    /// Values are compared without regard to ASCII case, which is what is
    /// needed for hostnames.
    ///
    /// # Examples
    ///
    /// ```
    /// use zensical_firewall::firewall::Predicate;
    ///
    /// // Create predicate for trusted hostnames
    /// let predicate = Predicate::one_of(["example.com", "www.example.com"]);
    /// assert!(predicate.test("Example.COM"));
    /// assert!(!predicate.test("example.com.evil.org"));
    /// ```
    pub fn one_of<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let values = values
            .into_iter()
            .map(|value| value.as_ref().to_ascii_lowercase())
            .collect::<BTreeSet<_>>();

        // Only allocate when the value is not lowercase already
        Self::new(move |value: &str| {
            if value.bytes().any(|byte| byte.is_ascii_uppercase()) {
                values.contains(&value.to_ascii_lowercase())
            } else {
                values.contains(value)
            }
        })
    }

    /// Creates a predicate that accepts non-empty, printable values.
    ///
    /// A value is printable, if it consists of code points that are assigned
    /// and are not control characters. Without shipping the tables of the
    /// Unicode Character Database, this is approximated by rejecting control
    /// characters, noncharacters, and the planes 4 to 13, which are entirely
    /// unassigned.
    ///
    /// # Examples
    ///
    /// ```
    /// use zensical_firewall::firewall::Predicate;
    ///
    /// // Create predicate for header names
    /// let predicate = Predicate::assigned_and_printable();
    /// assert!(predicate.test("X-Requested-With"));
    /// assert!(!predicate.test("X-Injected\r\nSet-Cookie"));
    /// assert!(!predicate.test(""));
    /// ```
    #[must_use]
    pub fn assigned_and_printable() -> Self {
        Self::new(|value: &str| {
            !value.is_empty() && value.chars().all(is_assigned_and_printable)
        })
    }
}

// ----------------------------------------------------------------------------
// Trait implementations
// ----------------------------------------------------------------------------

impl<T> Not for Predicate<T>
where
    T: ?Sized + 'static,
{
    type Output = Predicate<T>;

    /// Creates a predicate that accepts values the predicate rejects.
    fn not(self) -> Self::Output {
        let function = self.function;
        Self::new(move |value| !function(value))
    }
}

impl<T> Not for &Predicate<T>
where
    T: ?Sized + 'static,
{
    type Output = Predicate<T>;

    /// Creates a predicate that accepts values the predicate rejects.
    fn not(self) -> Self::Output {
        !self.clone()
    }
}

// ----------------------------------------------------------------------------

impl<T> Clone for Predicate<T>
where
    T: ?Sized,
{
    /// Clones the predicate, sharing the predicate function.
    #[inline]
    fn clone(&self) -> Self {
        Self { function: Arc::clone(&self.function) }
    }
}

impl<T> Default for Predicate<T>
where
    T: ?Sized + 'static,
{
    /// Creates a predicate that accepts any value.
    #[inline]
    fn default() -> Self {
        Self::any()
    }
}

impl<T> fmt::Debug for Predicate<T>
where
    T: ?Sized,
{
    /// Formats the predicate for debugging.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Predicate")
    }
}

// ----------------------------------------------------------------------------
// Functions
// ----------------------------------------------------------------------------

/// Returns whether the given character is assigned and printable.
fn is_assigned_and_printable(char: char) -> bool {
    let code = u32::from(char);
    let noncharacter =
        (0xFDD0..=0xFDEF).contains(&code) || code & 0xFFFE == 0xFFFE;
    let unassigned = (0x4_0000..=0xD_FFFF).contains(&code);
    !char.is_control() && !noncharacter && !unassigned
}

/// Extracts the message from a panic payload.
fn message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        String::from("unknown panic")
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_combinators() {
        let short = Predicate::new(|value: &str| value.len() < 8);
        let dotted = Predicate::new(|value: &str| value.contains('.'));

        let test_cases = vec![
            ("a.b", true, true, false),
            ("abc", false, true, true),
            ("abcdefgh.ij", false, true, false),
            ("abcdefghij", false, false, true),
        ];

        for (value, and, or, not) in test_cases {
            assert_eq!(short.and(&dotted).test(value), and, "and: {value}");
            assert_eq!(short.or(&dotted).test(value), or, "or: {value}");
            assert_eq!((!&dotted).test(value), not, "not: {value}");
        }

        // Operands are left untouched
        assert!(short.test("abc"));
        assert!(dotted.test("a.b"));
    }

    #[test]
    fn test_evaluate_fault() {
        let predicate = Predicate::new(|value: &str| {
            assert!(value != "boom", "exploded on {value}");
            true
        });
        assert_eq!(predicate.evaluate("ok"), Ok(true));

        let fault = predicate.evaluate("boom").unwrap_err();
        assert_eq!(fault.message, "exploded on boom");
        assert!(!predicate.test("boom"));
    }

    #[test]
    fn test_assigned_and_printable() {
        let predicate = Predicate::assigned_and_printable();
        let test_cases = vec![
            ("Content-Type", true),
            ("x-über", true),
            ("name with space", true),
            ("", false),
            ("tab\there", false),
            ("nul\0", false),
            ("del\u{7f}", false),
            ("c1\u{85}", false),
            ("non\u{FFFF}", false),
            ("non\u{FDD0}", false),
            ("plane\u{50000}", false),
        ];

        for (value, expected) in test_cases {
            let result = predicate.test(value);
            assert_eq!(result, expected, "Failed for: {value:?}");
        }
    }

    #[test]
    fn test_defaults() {
        assert!(Predicate::<str>::default().test("anything"));
        assert!(Predicate::<str>::any().test(""));
        assert!(!Predicate::<str>::none().test("anything"));
    }
}
