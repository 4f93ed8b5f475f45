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

//! Middleware chain.

use std::sync::Arc;

use crate::handler::Handler;
use crate::http::response::ResponseWriter;
use crate::http::Request;
use crate::middleware::Middleware;

// ----------------------------------------------------------------------------
// Structs
// ----------------------------------------------------------------------------

/// Middleware chain.
///
/// A chain wraps a handler in an ordered list of middlewares, so that invoking
/// the chain is equivalent to invoking the first middleware with the rest of
/// the chain as its next handler. Thus, the first middleware is the outermost
/// one: it observes the request first and the response last.
///
/// Chains are created with [`compose`], and are immutable once created.
pub struct Chain {
    /// Middlewares, outermost first.
    middlewares: Vec<Arc<dyn Middleware>>,
    /// Terminal handler.
    handler: Arc<dyn Handler>,
}

/// Chain handler.
///
/// The chain handler keeps track of all middlewares that haven't been invoked
/// yet, i.e., are next in line to be called, and a reference to the handler
/// which should be invoked, when no middleware is left.
struct ChainHandler<'a> {
    /// Middlewares not invoked yet.
    middlewares: &'a [Arc<dyn Middleware>],
    /// Terminal handler.
    handler: &'a dyn Handler,
}

// ----------------------------------------------------------------------------
// Trait implementations
// ----------------------------------------------------------------------------

impl Handler for Chain {
    fn handle(&self, req: Request, res: &mut dyn ResponseWriter) {
        let handler = ChainHandler {
            middlewares: &self.middlewares,
            handler: self.handler.as_ref(),
        };
        handler.handle(req, res);
    }
}

impl Handler for ChainHandler<'_> {
    fn handle(&self, req: Request, res: &mut dyn ResponseWriter) {
        match self.middlewares {
            [] => self.handler.handle(req, res),
            [middleware, middlewares @ ..] => {
                let next = ChainHandler {
                    middlewares,
                    handler: self.handler,
                };
                middleware.process(req, res, &next);
            }
        }
    }
}

// ----------------------------------------------------------------------------
// Functions
// ----------------------------------------------------------------------------

/// Composes a handler with the given middlewares.
///
/// The first middleware is the outermost one, the last middleware is closest
/// to the handler. If no middlewares are given, the handler is returned as is.
/// Composing is pure, so composing the same parts twice yields two independent
/// chains with identical behavior.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use waypoint::handler::{compose, Handler};
/// use waypoint::http::response::{ResponseExt, ResponseWriter};
/// use waypoint::http::{Header, Request, Status};
/// use waypoint::middleware::Middleware;
///
/// // Create handler and middleware
/// let handler = |_: Request, res: &mut dyn ResponseWriter| {
///     res.text(Status::Ok, "Hello, world!");
/// };
/// let middleware: Arc<dyn Middleware> = Arc::new(
///     |req: Request, res: &mut dyn ResponseWriter, next: &dyn Handler| {
///         res.headers_mut().insert(Header::Server, "waypoint");
///         next.handle(req, res);
///     },
/// );
///
/// // Compose handler with middleware
/// let chain = compose(Arc::new(handler), &[middleware]);
///
/// // Handle request with chain
/// let res = chain.respond(Request::new());
/// assert_eq!(res.headers().get(Header::Server), Some("waypoint"));
/// ```
#[must_use]
pub fn compose(
    handler: Arc<dyn Handler>, middlewares: &[Arc<dyn Middleware>],
) -> Arc<dyn Handler> {
    if middlewares.is_empty() {
        return handler;
    }
    Arc::new(Chain {
        middlewares: middlewares.to_vec(),
        handler,
    })
}
