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

//! Endpoint.

use std::sync::Arc;

use crate::handler::Handler;
use crate::middleware::Middleware;

// ----------------------------------------------------------------------------
// Structs
// ----------------------------------------------------------------------------

/// Endpoint.
///
/// An endpoint bundles a terminal handler with the middlewares that apply to
/// its route only, and an optional name used when listing routes. Any handler
/// can be registered with a [`Router`][] as is, so endpoints are only needed
/// for route-specific middlewares or names.
///
/// Route middlewares run inside the global middlewares of the router, in the
/// order they were added, so the last one added is closest to the handler.
///
/// [`Router`]: crate::router::Router
///
/// # Examples
///
/// ```
/// use waypoint::handler::Handler;
/// use waypoint::http::response::{ResponseExt, ResponseWriter};
/// use waypoint::http::{Header, Request, Status};
/// use waypoint::router::{Endpoint, Router};
///
/// // Create endpoint with route middleware
/// let endpoint = Endpoint::new(|_: Request, res: &mut dyn ResponseWriter| {
///     res.text(Status::Ok, "{}");
/// })
/// .with(|req: Request, res: &mut dyn ResponseWriter, next: &dyn Handler| {
///     res.headers_mut().insert(Header::ContentType, "application/json");
///     next.handle(req, res);
/// })
/// .name("users");
///
/// // Create router with endpoint
/// let router = Router::default().get("/users", endpoint);
/// ```
#[derive(Debug)]
pub struct Endpoint {
    /// Terminal handler.
    pub(crate) handler: Arc<dyn Handler>,
    /// Route middlewares, outermost first.
    pub(crate) middlewares: Vec<Arc<dyn Middleware>>,
    /// Endpoint name.
    pub(crate) name: Option<String>,
}

// ----------------------------------------------------------------------------
// Implementations
// ----------------------------------------------------------------------------

impl Endpoint {
    /// Creates an endpoint for the given handler.
    pub fn new<H>(handler: H) -> Self
    where
        H: Handler + 'static,
    {
        Self {
            handler: Arc::new(handler),
            middlewares: Vec::new(),
            name: None,
        }
    }

    /// Adds a route middleware to the endpoint.
    #[must_use]
    pub fn with<M>(mut self, middleware: M) -> Self
    where
        M: Middleware + 'static,
    {
        self.middlewares.push(Arc::new(middleware));
        self
    }

    /// Sets the name of the endpoint.
    #[must_use]
    pub fn name<N>(mut self, name: N) -> Self
    where
        N: Into<String>,
    {
        self.name = Some(name.into());
        self
    }
}

// ----------------------------------------------------------------------------
// Traits
// ----------------------------------------------------------------------------

/// Conversion into [`Endpoint`].
///
/// This trait is implemented for all handlers, which become endpoints without
/// route middlewares, and for endpoints themselves.
pub trait IntoEndpoint {
    /// Converts into an endpoint.
    fn into_endpoint(self) -> Endpoint;
}

// ----------------------------------------------------------------------------
// Trait implementations
// ----------------------------------------------------------------------------

impl IntoEndpoint for Endpoint {
    #[inline]
    fn into_endpoint(self) -> Endpoint {
        self
    }
}

// ----------------------------------------------------------------------------
// Blanket implementations
// ----------------------------------------------------------------------------

impl<H> IntoEndpoint for H
where
    H: Handler + 'static,
{
    #[inline]
    fn into_endpoint(self) -> Endpoint {
        Endpoint::new(self)
    }
}
