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

//! Middleware.

use std::fmt;

use super::handler::Handler;
use super::http::response::ResponseWriter;
use super::http::Request;

pub mod log;
mod path;
mod recover;

pub use log::RequestLogger;
pub use path::StripTrailingSlashes;
pub use recover::RecoverPanic;
pub(crate) use recover::message;

// ----------------------------------------------------------------------------
// Traits
// ----------------------------------------------------------------------------

/// Middleware.
///
/// Middlewares are the building blocks of any composable request processing
/// pipeline. They can be used to modify, handle or answer a given [`Request`],
/// or forward it to the next [`Handler`], which can be another middleware or
/// the terminal handler. Not calling the next handler short-circuits the rest
/// of the chain, which is a perfectly legal outcome.
///
/// Middlewares may also wrap the [`ResponseWriter`] they hand down the chain,
/// which is how the [`RequestLogger`] learns the status of a response. Besides
/// closures which exactly match the signature of [`Middleware::process`], this
/// trait is implemented by the bundled middlewares:
///
/// - [`RequestLogger`]: Structured request logging.
/// - [`StripTrailingSlashes`]: Trailing slash redirects.
/// - [`RecoverPanic`]: Panic recovery.
pub trait Middleware: Send + Sync {
    /// Processes the given request.
    ///
    /// # Examples
    ///
    /// ```
    /// # use std::error::Error;
    /// # fn main() -> Result<(), Box<dyn Error>> {
    /// use waypoint::handler::{Handler, TryIntoHandler};
    /// use waypoint::http::response::{ResponseExt, ResponseWriter};
    /// use waypoint::http::{Method, Request, Status};
    /// use waypoint::router::Router;
    ///
    /// // Create router with middleware
    /// let router = Router::default()
    ///     .with(|req: Request, res: &mut dyn ResponseWriter, next: &dyn Handler| {
    ///         if req.method == Method::Get && req.uri.path == "/coffee" {
    ///             res.error(Status::ImATeapot);
    ///         } else {
    ///             next.handle(req, res);
    ///         }
    ///     })
    ///     .get("/coffee", |_: Request, res: &mut dyn ResponseWriter| {
    ///         res.text(Status::Ok, "Coffee");
    ///     })
    ///     .try_into_handler()?;
    ///
    /// // Handle request with router
    /// let res = router.respond(Request::new().uri("/coffee"));
    /// assert_eq!(res.status(), Status::ImATeapot);
    /// # Ok(())
    /// # }
    /// ```
    fn process(
        &self, req: Request, res: &mut dyn ResponseWriter, next: &dyn Handler,
    );

    /// Returns the name of the middleware, used for diagnostics.
    fn name(&self) -> &str {
        "anonymous"
    }
}

// ----------------------------------------------------------------------------
// Structs
// ----------------------------------------------------------------------------

/// Named middleware.
///
/// Closures can't tell their name, so this wrapper attaches one, which shows
/// up when a [`Router`][] lists its middlewares and routes.
///
/// [`Router`]: crate::router::Router
pub struct Named<M> {
    /// Middleware name.
    name: String,
    /// Wrapped middleware.
    middleware: M,
}

// ----------------------------------------------------------------------------
// Trait implementations
// ----------------------------------------------------------------------------

impl<M> Middleware for Named<M>
where
    M: Middleware,
{
    #[inline]
    fn process(
        &self, req: Request, res: &mut dyn ResponseWriter, next: &dyn Handler,
    ) {
        self.middleware.process(req, res, next);
    }

    #[inline]
    fn name(&self) -> &str {
        &self.name
    }
}

// ----------------------------------------------------------------------------

impl fmt::Debug for dyn Middleware + '_ {
    /// Formats the middleware for debugging.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Middleware").field(&self.name()).finish()
    }
}

// ----------------------------------------------------------------------------
// Blanket implementations
// ----------------------------------------------------------------------------

impl<F> Middleware for F
where
    F: Fn(Request, &mut dyn ResponseWriter, &dyn Handler) + Send + Sync,
{
    #[inline]
    fn process(
        &self, req: Request, res: &mut dyn ResponseWriter, next: &dyn Handler,
    ) {
        self(req, res, next);
    }
}

// ----------------------------------------------------------------------------
// Functions
// ----------------------------------------------------------------------------

/// Attaches a name to the given middleware.
///
/// # Examples
///
/// ```
/// use waypoint::handler::Handler;
/// use waypoint::http::response::ResponseWriter;
/// use waypoint::http::Request;
/// use waypoint::middleware::{named, Middleware};
///
/// // Create named middleware
/// let auth = named("auth", |req: Request, res: &mut dyn ResponseWriter, next: &dyn Handler| {
///     next.handle(req, res);
/// });
/// assert_eq!(auth.name(), "auth");
/// ```
pub fn named<N, M>(name: N, middleware: M) -> Named<M>
where
    N: Into<String>,
    M: Middleware,
{
    Named { name: name.into(), middleware }
}
