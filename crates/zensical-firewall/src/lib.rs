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

//! Strict HTTP request firewall.
//!
//! The firewall is a [`Middleware`][] that sits in front of the handlers of an
//! application, and rejects requests that exhibit well-known bypass patterns,
//! e.g., path traversal, verb tampering, or control characters smuggled into
//! the request target, with "403 Forbidden", before any handler runs.
//!
//! [`Middleware`]: crate::middleware::Middleware
//!
//! # Examples
//!
//! ```
//! use zensical_firewall::firewall::{Firewall, Options};
//! use zensical_firewall::handler::{Handler, Stack};
//! use zensical_firewall::http::{Request, Response, Status};
//!
//! // Create stack with firewall in front of the application
//! let stack = Stack::new()
//!     .with(Firewall::new(Options::default()))
//!     .handler(|_req: Request| Response::new().status(Status::Ok));
//!
//! // Admitted request reaches the application
//! let res = stack.handle(Request::new().uri("/coffee"));
//! assert_eq!(res.status, Status::Ok);
//!
//! // Request exhibiting a bypass pattern is rejected
//! let res = stack.handle(Request::new().uri("/coffee;jsessionid=1"));
//! assert_eq!(res.status, Status::Forbidden);
//! ```

#![allow(clippy::doc_markdown)]
#![allow(clippy::missing_errors_doc)]

pub mod firewall;
pub mod handler;
pub mod http;
pub mod middleware;
