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

//! Firewall.

use std::result;

use super::handler::Handler;
use super::http::response::ResponseExt;
use super::http::{Request, Response};
use super::middleware::Middleware;

mod blocklist;
mod error;
mod gate;
mod methods;
mod normalize;
mod options;
mod predicate;
mod printable;
mod rejection;

pub use blocklist::Blocklist;
pub use error::{Error, Result};
pub use methods::MethodSet;
pub use normalize::is_normalized;
pub use options::Options;
pub use predicate::{Fault, Predicate};
pub use printable::is_printable_ascii;
pub use rejection::{Field, Rejection};

// ----------------------------------------------------------------------------
// Structs
// ----------------------------------------------------------------------------

/// Firewall.
///
/// The firewall is a [`Middleware`] that admits or rejects requests before
/// they reach any handler. Every request passes through five gates in order,
/// and the first failing gate decides the [`Rejection`]:
///
/// 1. __Method__: the method must be in the allowed [`MethodSet`].
/// 2. __Blocklist__: no representation of the request target must contain a
///    literal of the [`Blocklist`].
/// 3. __Hostname__: the hostname, if any, must satisfy the predicate.
/// 4. __Normalization__: no path must contain `.` or `..` segments.
/// 5. __Printable__: the raw request target must be printable ASCII.
///
/// Rejected requests are answered with "403 Forbidden", and are never passed
/// on to the next handler. Admitted requests are passed on unchanged. The
/// configuration is frozen on construction, so a firewall can be shared
/// across threads and evaluate requests in parallel.
///
/// Predicates for header and parameter names and values are kept with the
/// [`Options`], but are not evaluated by any of the gates.
///
/// # Examples
///
/// ```
/// use zensical_firewall::firewall::{Firewall, Options, Rejection};
/// use zensical_firewall::http::{Method, Request};
///
/// // Create firewall
/// let firewall = Firewall::new(Options::default());
///
/// // Check requests
/// let req = Request::new().uri("/coffee");
/// assert_eq!(firewall.check(&req), Ok(()));
///
/// let req = Request::new().method(Method::Trace).uri("/coffee");
/// assert!(matches!(
///     firewall.check(&req),
///     Err(Rejection::MethodNotAllowed { .. })
/// ));
/// ```
#[derive(Debug)]
pub struct Firewall {
    /// Firewall options.
    options: Options,
    /// Allowed methods.
    methods: MethodSet,
    /// Blocklist.
    blocklist: Blocklist,
}

// ----------------------------------------------------------------------------
// Implementations
// ----------------------------------------------------------------------------

impl Firewall {
    /// Creates a firewall from the given options.
    ///
    /// An empty list of allowed methods admits any method, which is logged as
    /// a warning, as it most likely hints at a configuration mistake.
    ///
    /// # Examples
    ///
    /// ```
    /// use zensical_firewall::firewall::{Firewall, Options};
    ///
    /// // Create firewall
    /// let firewall = Firewall::new(Options::default());
    /// ```
    #[must_use]
    pub fn new(options: Options) -> Self {
        let methods = if options.unsafe_allow_any_http_method {
            MethodSet::Any
        } else {
            if options.allowed_http_methods.is_empty() {
                tracing::warn!("no methods allowed, admitting any method");
            }
            MethodSet::only(options.allowed_http_methods.iter().cloned())
        };

        // Build blocklist and log effective configuration
        let blocklist = Blocklist::new(&options);
        tracing::debug!(
            methods = %methods,
            encoded = ?blocklist.encoded(),
            decoded = ?blocklist.decoded(),
            "firewall configured"
        );
        Self { options, methods, blocklist }
    }

    /// Checks the given request.
    ///
    /// # Errors
    ///
    /// This method returns the [`Rejection`] of the first failing gate.
    ///
    /// # Examples
    ///
    /// ```
    /// use zensical_firewall::firewall::{Field, Firewall, Options, Rejection};
    /// use zensical_firewall::http::Request;
    ///
    /// // Create firewall
    /// let firewall = Firewall::new(Options::default());
    ///
    /// // Check request with traversal in original URL
    /// let req = Request::new()
    ///     .uri("/tea")
    ///     .original("/api/coffee/../tea")
    ///     .base("/api/coffee");
    ///
    /// assert_eq!(
    ///     firewall.check(&req),
    ///     Err(Rejection::NonNormalizedPath {
    ///         field: Field::OriginalUrl,
    ///         value: String::from("/api/coffee/../tea"),
    ///     })
    /// );
    /// ```
    pub fn check(&self, req: &Request) -> result::Result<(), Rejection> {
        gate::GATES.iter().try_for_each(|gate| gate(self, req))
    }

    /// Returns the options.
    #[inline]
    #[must_use]
    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Returns the allowed methods.
    #[inline]
    #[must_use]
    pub fn methods(&self) -> &MethodSet {
        &self.methods
    }

    /// Returns the blocklist.
    #[inline]
    #[must_use]
    pub fn blocklist(&self) -> &Blocklist {
        &self.blocklist
    }
}

// ----------------------------------------------------------------------------
// Trait implementations
// ----------------------------------------------------------------------------

impl Middleware for Firewall {
    /// Processes the given request.
    ///
    /// Admitted requests are passed on to the next handler, and rejected ones
    /// are answered with "403 Forbidden".
    fn process(&self, req: Request, next: &dyn Handler) -> Response {
        let Err(rejection) = self.check(&req) else {
            return next.handle(req);
        };

        // Log rejection, which is observational only
        let reason = rejection.reason();
        if self.options.log_to_console {
            tracing::warn!(
                reason,
                method = %req.method,
                url = %req.uri,
                "request rejected: {rejection}"
            );
        } else {
            tracing::debug!(
                reason,
                method = %req.method,
                url = %req.uri,
                "request rejected: {rejection}"
            );
        }
        Response::forbidden()
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::io;
    use std::rc::Rc;
    use std::sync::{Arc, Mutex};
    use std::thread;

    use crate::handler::Stack;
    use crate::http::{Header, Method, Status};

    use super::*;

    /// Handles the request with a firewall, returning the status and whether
    /// the request was passed on.
    fn handle(options: Options, req: Request) -> (Status, bool) {
        let calls = Rc::new(Cell::new(0));
        let stack = Stack::new().with(Firewall::new(options)).handler({
            let calls = Rc::clone(&calls);
            move |_req: Request| {
                calls.set(calls.get() + 1);
                Response::new().status(Status::Ok)
            }
        });
        let res = stack.handle(req);
        (res.status, calls.get() == 1)
    }

    #[test]
    fn test_scenarios() {
        let default = Options::default;
        let test_cases = vec![
            (default(), Method::Get, "/", Status::Ok),
            (default(), Method::Trace, "/", Status::Forbidden),
            (default(), Method::Get, "/context;", Status::Forbidden),
            (
                default().allow_semicolon(true),
                Method::Get,
                "/;",
                Status::Ok,
            ),
            (default(), Method::Get, "/%2e", Status::Forbidden),
            (
                default().allow_url_encoded_period(true),
                Method::Get,
                "/%2e",
                Status::Forbidden,
            ),
            (
                default()
                    .allow_url_encoded_period(true)
                    .allow_url_encoded_percent(true),
                Method::Get,
                "/%2e",
                Status::Ok,
            ),
            (default(), Method::Get, "/test/some-file.exe", Status::Ok),
            (
                default().decoded_url_block_list(".exe"),
                Method::Get,
                "/test/some-file.exe",
                Status::Forbidden,
            ),
            (default(), Method::Get, "/a/../b", Status::Forbidden),
            (default(), Method::Get, "/a/%00", Status::Forbidden),
            (default(), Method::Get, "/caf\u{e9}", Status::Forbidden),
        ];

        for (options, method, uri, expected) in test_cases {
            let req = Request::new().method(method.clone()).uri(uri);
            let (status, passed) = handle(options, req);
            assert_eq!(status, expected, "Failed for: {method} {uri}");
            assert_eq!(passed, status == Status::Ok, "Failed for: {uri}");
        }
    }

    #[test]
    fn test_forbidden_response() {
        let stack = Stack::new()
            .with(Firewall::new(Options::default()))
            .build();

        let res = stack.handle(Request::new().uri("/a\\b"));
        assert_eq!(res.status, Status::Forbidden);
        assert_eq!(res.headers.get(Header::ContentType), Some("text/plain"));
        assert_eq!(res.body, b"FORBIDDEN");
    }

    #[test]
    fn test_first_gate_wins() {
        let firewall = Firewall::new(Options::default());
        let test_cases = vec![
            (Method::Trace, "/a/../b;\t", "method-not-allowed"),
            (Method::Get, "/a/../b;\t", "blocklisted-content"),
            (Method::Get, "/a/../b\t", "non-normalized-path"),
            (Method::Get, "/a/b\t", "non-printable-characters"),
        ];

        for (method, uri, expected) in test_cases {
            let req = Request::new().method(method).uri(uri);
            let rejection = firewall.check(&req).unwrap_err();
            assert_eq!(rejection.reason(), expected, "Failed for: {uri:?}");
        }
    }

    #[test]
    fn test_methods() {
        let test_cases = vec![
            (Options::default(), "PROPFIND", false),
            (Options::default(), "patch", true),
            (
                Options::default().unsafe_allow_any_http_method(true),
                "TRACE",
                true,
            ),
            (
                Options::default().allowed_http_methods(Vec::new()),
                "TRACE",
                true,
            ),
            (
                Options::default().allowed_http_methods([Method::Get]),
                "get",
                true,
            ),
            (
                Options::default().allowed_http_methods([Method::Get]),
                "POST",
                false,
            ),
        ];

        for (options, name, expected) in test_cases {
            let firewall = Firewall::new(options);
            let req = Request::new().method(name.parse().unwrap());
            let result = firewall.check(&req);
            assert_eq!(result.is_ok(), expected, "Failed for: {name}");
        }

        // Configuration is frozen on construction
        let options = Options::default().allowed_http_methods(Vec::new());
        let firewall = Firewall::new(options.allow_semicolon(true));
        assert!(firewall.methods().is_any());
        assert_eq!(firewall.blocklist().find_encoded("/a;b"), None);
    }

    #[test]
    fn test_fields() {
        let firewall = Firewall::new(Options::default());
        let test_cases = vec![
            (Request::new().original("/api;x/a"), Field::OriginalUrl),
            (Request::new().route("/users/:id;"), Field::Route),
            (Request::new().base("/api%2f"), Field::BasePath),
        ];

        for (req, expected) in test_cases {
            let rejection = firewall.check(&req.uri("/a")).unwrap_err();
            let Rejection::Blocklisted { field, .. } = rejection else {
                panic!("Failed for: {expected}");
            };
            assert_eq!(field, expected);
        }

        // Normalization isn't checked against the base path
        let req = Request::new().uri("/a").base("/..");
        assert_eq!(firewall.check(&req), Ok(()));

        // Decoded path set by host is checked against the decoded set
        let mut req = Request::new().uri("/a%25b");
        req.uri.path = "/a%b".into();
        let options = Options::default().allow_url_encoded_percent(true);
        let firewall = Firewall::new(options.decoded_url_block_list("%"));
        assert_eq!(
            firewall.check(&req),
            Err(Rejection::Blocklisted {
                field: Field::Path,
                literal: String::from("%"),
            })
        );
    }

    #[test]
    fn test_hostnames() {
        let options = Options::default()
            .allowed_hostnames(Predicate::one_of(["example.com"]));
        let firewall = Firewall::new(options);
        let test_cases = vec![
            (Request::new(), true),
            (Request::new().header(Header::Host, "example.com:8080"), true),
            (Request::new().header(Header::Host, "EXAMPLE.COM"), true),
            (Request::new().header(Header::Host, "evil.org"), false),
            (Request::new().host("evil.org"), false),
            (
                Request::new()
                    .header(Header::Host, "evil.org")
                    .host("example.com"),
                true,
            ),
        ];

        for (req, expected) in test_cases {
            let result = firewall.check(&req);
            let hostname = req.hostname();
            assert_eq!(result.is_ok(), expected, "Failed for: {hostname:?}");
        }
    }

    #[test]
    fn test_hostname_fault() {
        let faulty = Predicate::new(|host: &str| host.as_bytes()[16] == b'.');
        let options = Options::default().allowed_hostnames(faulty);
        let firewall = Firewall::new(options.clone());

        let req = Request::new().host("example.com");
        let rejection = firewall.check(&req).unwrap_err();
        assert_eq!(rejection.reason(), "predicate-fault");

        let (status, passed) = handle(options, req);
        assert_eq!(status, Status::Forbidden);
        assert!(!passed);
    }

    #[test]
    fn test_relaxations_are_monotone() {
        let uris = vec![
            "/", "/a/b", "/a;b", "/a%2fb", "/a//b", "/a%2e", "/a\\b", "/a%25",
            "/a%0a", "/a%0D", "/a%00", "/a/../b", "/\u{2028}", "/a%3B",
        ];
        let relaxations: Vec<fn(Options) -> Options> = vec![
            |options| options.allow_semicolon(true),
            |options| options.allow_url_encoded_slash(true),
            |options| options.allow_url_encoded_double_slash(true),
            |options| options.allow_url_encoded_period(true),
            |options| options.allow_back_slash(true),
            |options| options.allow_null(true),
            |options| options.allow_url_encoded_percent(true),
            |options| options.allow_url_encoded_carriage_return(true),
            |options| options.allow_url_encoded_line_feed(true),
            |options| options.allow_url_encoded_paragraph_separator(true),
            |options| options.allow_url_encoded_line_separator(true),
        ];

        let strict = Firewall::new(Options::default());
        for relax in relaxations {
            let relaxed = Firewall::new(relax(Options::default()));
            for uri in &uris {
                let req = Request::new().uri(*uri);
                if strict.check(&req).is_ok() {
                    assert!(relaxed.check(&req).is_ok(), "Failed for: {uri}");
                }

                // Identical options yield identical decisions
                let again = Firewall::new(relaxed.options().clone());
                assert_eq!(again.check(&req), relaxed.check(&req));
            }
        }
    }

    #[test]
    fn test_unenforced_predicates() {
        let options = Options::default()
            .allowed_header_names(Predicate::none())
            .allowed_header_values(Predicate::none())
            .allowed_parameter_names(Predicate::none())
            .allowed_parameter_values(Predicate::none());
        let firewall = Firewall::new(options);

        // Header and parameter predicates are kept, but not evaluated
        let req = Request::new()
            .uri("/search?q=coffee")
            .header("X-Custom", "value");
        assert_eq!(req.params().get("q"), Some("coffee"));
        assert!(!firewall.options().allowed_header_names.test("X-Custom"));
        assert!(!firewall.options().allowed_parameter_values.test("coffee"));
        assert_eq!(firewall.check(&req), Ok(()));
    }

    #[test]
    fn test_concurrent() {
        let firewall = Firewall::new(Options::default());
        thread::scope(|scope| {
            for n in 0..8 {
                let firewall = &firewall;
                scope.spawn(move || {
                    for i in 0..100 {
                        let ok = format!("/thread/{n}/{i}");
                        let req = Request::new().uri(ok.as_str());
                        assert_eq!(firewall.check(&req), Ok(()));

                        let bad = format!("/thread/{n};{i}");
                        let req = Request::new().uri(bad.as_str());
                        assert!(firewall.check(&req).is_err());
                    }
                });
            }
        });
    }

    /// Shared buffer capturing log output.
    #[derive(Clone, Default)]
    struct Buffer(Arc<Mutex<Vec<u8>>>);

    impl io::Write for Buffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    /// Handles the request with a firewall, returning the log output at the
    /// info level and above.
    fn logs(options: Options, req: Request) -> String {
        let buffer = Buffer::default();
        let subscriber = tracing_subscriber::fmt()
            .with_writer({
                let buffer = buffer.clone();
                move || buffer.clone()
            })
            .with_max_level(tracing::Level::INFO)
            .with_ansi(false)
            .finish();

        tracing::subscriber::with_default(subscriber, || {
            let stack = Stack::new().with(Firewall::new(options)).build();
            let _res = stack.handle(req);
        });
        let bytes = buffer.0.lock().unwrap().clone();
        String::from_utf8(bytes).unwrap()
    }

    #[test]
    fn test_log_to_console() {
        let options = Options::default().log_to_console(true);
        let output = logs(options, Request::new().method(Method::Trace));
        assert!(output.contains("WARN"), "Failed for: {output}");
        assert!(output.contains("method TRACE is not allowed"));
        assert!(output.contains("reason=\"method-not-allowed\""));
        assert!(output.contains("url=/"));

        // Without logging to console, rejections are debug events
        let req = Request::new().method(Method::Trace);
        let output = logs(Options::default(), req);
        assert!(output.is_empty(), "Failed for: {output}");
    }

    #[test]
    fn test_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Firewall>();
    }
}
