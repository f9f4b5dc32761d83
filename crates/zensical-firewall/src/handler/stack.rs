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

//! Stack.

use crate::handler::{Handler, NotFound};
use crate::http::{Request, Response};
use crate::middleware::Middleware;

// ----------------------------------------------------------------------------
// Structs
// ----------------------------------------------------------------------------

/// Stack.
///
/// Stacks compose multiple middlewares in front of a [`Handler`], passing the
/// request from one middleware to the next, until the handler is reached. Each
/// middleware can short-circuit processing by answering the request itself,
/// which is what the [`Firewall`][] does for every request it rejects, so it
/// should almost always be the first middleware of a stack.
///
/// [`Firewall`]: crate::firewall::Firewall
///
/// # Examples
///
/// ```
/// use zensical_firewall::handler::{Handler, Stack};
/// use zensical_firewall::http::{Method, Request, Response, Status};
///
/// // Create stack with middleware
/// let stack = Stack::new()
///     .with(|req: Request, next: &dyn Handler| {
///         if req.method == Method::Get && req.uri.path == "/coffee" {
///             Response::new().status(Status::ImATeapot)
///         } else {
///             next.handle(req)
///         }
///     })
///     .build();
///
/// // Handle request with stack
/// let res = stack.handle(Request::new().uri("/coffee"));
/// assert_eq!(res.status, Status::ImATeapot);
/// ```
#[derive(Debug)]
pub struct Stack {
    /// Middlewares.
    middlewares: Vec<Box<dyn Middleware>>,
    /// Final handler.
    handler: Box<dyn Handler>,
}

/// Stack builder.
#[derive(Debug, Default)]
pub struct Builder {
    /// Middlewares.
    middlewares: Vec<Box<dyn Middleware>>,
}

/// Stack handler.
///
/// The stack handler keeps track of all middlewares that haven't been invoked
/// yet, i.e., are next in line to be called, and a reference to the handler
/// which should be invoked, when no middleware is left.
struct StackHandler<'a> {
    /// Remaining middlewares.
    middlewares: &'a [Box<dyn Middleware>],
    /// Next handler.
    next: &'a dyn Handler,
}

// ----------------------------------------------------------------------------
// Implementations
// ----------------------------------------------------------------------------

impl Stack {
    /// Creates a stack builder.
    #[allow(clippy::new_ret_no_self)]
    #[must_use]
    pub fn new() -> Builder {
        Builder::default()
    }
}

impl Builder {
    /// Adds a middleware to the stack.
    #[must_use]
    pub fn with<M>(mut self, middleware: M) -> Self
    where
        M: Middleware,
    {
        self.middlewares.push(Box::new(middleware));
        self
    }

    /// Finishes the stack with the given handler.
    #[must_use]
    pub fn handler<H>(self, handler: H) -> Stack
    where
        H: Handler + 'static,
    {
        Stack {
            middlewares: self.middlewares,
            handler: Box::new(handler),
        }
    }

    /// Finishes the stack with the [`NotFound`] handler.
    #[must_use]
    pub fn build(self) -> Stack {
        self.handler(NotFound)
    }
}

// ----------------------------------------------------------------------------
// Trait implementations
// ----------------------------------------------------------------------------

impl Handler for Stack {
    /// Handles the given request, passing it through the entire stack.
    fn handle(&self, req: Request) -> Response {
        let handler = StackHandler {
            middlewares: &self.middlewares,
            next: self.handler.as_ref(),
        };
        handler.handle(req)
    }
}

impl Handler for StackHandler<'_> {
    /// Handles the given request.
    ///
    /// If there are any middlewares left, the first one is invoked with a new
    /// stack handler for the remaining ones. Otherwise, the next handler is
    /// invoked.
    fn handle(&self, req: Request) -> Response {
        match self.middlewares {
            [] => self.next.handle(req),
            [middleware, middlewares @ ..] => {
                let next = StackHandler { middlewares, next: self.next };
                middleware.process(req, &next)
            }
        }
    }
}
