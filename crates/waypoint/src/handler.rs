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

//! Handler.

use std::fmt;

use super::http::response::{ResponseExt, ResponseWriter};
use super::http::{Request, Response, Status};

pub mod chain;
mod convert;
mod error;
mod files;
pub mod matcher;
mod strip;

pub use chain::compose;
pub use convert::TryIntoHandler;
pub use error::{Error, Result};
pub use files::FileServer;
pub use matcher::Matcher;
pub use strip::StripPrefix;

// ----------------------------------------------------------------------------
// Traits
// ----------------------------------------------------------------------------

/// Handler.
///
/// Handlers represent the executable form of a request processing chain. Unlike
/// middlewares, which define composable layers of request processing, handlers
/// package those layers into a single unit of execution, answering every given
/// [`Request`] by writing to a [`ResponseWriter`].
///
/// Handlers are shared between the threads of a server, which is why they must
/// be [`Send`] and [`Sync`]. Any function or closure taking a request and a
/// writer is a handler.
pub trait Handler: Send + Sync {
    /// Handles the given request.
    ///
    /// This method is invoked with a request and is required to answer it by
    /// writing to the given response writer. Not writing anything is a valid
    /// answer, which results in an empty "200 OK".
    ///
    /// # Examples
    ///
    /// ```
    /// use waypoint::handler::Handler;
    /// use waypoint::http::response::{ResponseExt, ResponseWriter};
    /// use waypoint::http::{Method, Request, Response, Status};
    ///
    /// // Create handler
    /// let handler = |req: Request, res: &mut dyn ResponseWriter| {
    ///     if req.method == Method::Get && req.uri.path == "/coffee" {
    ///         res.error(Status::ImATeapot);
    ///     } else {
    ///         res.error(Status::NotFound);
    ///     }
    /// };
    ///
    /// // Create request
    /// let req = Request::new()
    ///     .method(Method::Get)
    ///     .uri("/coffee");
    ///
    /// // Handle request with handler
    /// let mut res = Response::new();
    /// handler.handle(req, &mut res);
    /// assert_eq!(res.status(), Status::ImATeapot);
    /// ```
    fn handle(&self, req: Request, res: &mut dyn ResponseWriter);

    /// Handles the given request, buffering the answer into a [`Response`].
    ///
    /// # Examples
    ///
    /// ```
    /// use waypoint::handler::{Handler, NotFound};
    /// use waypoint::http::{Request, Status};
    ///
    /// // Handle request with handler
    /// let res = NotFound.respond(Request::new());
    /// assert_eq!(res.status(), Status::NotFound);
    /// ```
    fn respond(&self, req: Request) -> Response {
        let mut res = Response::new();
        self.handle(req, &mut res);
        res
    }
}

// ----------------------------------------------------------------------------
// Structs
// ----------------------------------------------------------------------------

/// Fallback handler.
///
/// This handler always answers with "404 Not Found", and is the default for
/// requests that don't match any route of a [`Router`][].
///
/// [`Router`]: crate::router::Router
pub struct NotFound;

// ----------------------------------------------------------------------------
// Trait implementations
// ----------------------------------------------------------------------------

impl Handler for NotFound {
    /// Handles the given request.
    ///
    /// # Examples
    ///
    /// ```
    /// use waypoint::handler::{Handler, NotFound};
    /// use waypoint::http::{Method, Request, Status};
    ///
    /// // Create request
    /// let req = Request::new()
    ///     .method(Method::Get)
    ///     .uri("/");
    ///
    /// // Handle request with handler
    /// let res = NotFound.respond(req);
    /// assert_eq!(res.status(), Status::NotFound);
    /// ```
    #[inline]
    fn handle(&self, _req: Request, res: &mut dyn ResponseWriter) {
        res.error(Status::NotFound);
    }
}

// ----------------------------------------------------------------------------

impl fmt::Debug for dyn Handler + '_ {
    /// Formats the handler for debugging.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("dyn Handler")
    }
}

// ----------------------------------------------------------------------------
// Blanket implementations
// ----------------------------------------------------------------------------

impl<F> Handler for F
where
    F: Fn(Request, &mut dyn ResponseWriter) + Send + Sync,
{
    #[inline]
    fn handle(&self, req: Request, res: &mut dyn ResponseWriter) {
        self(req, res);
    }
}
