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

//! Multiplexer.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::handler::matcher::{Match, Matcher, Params};
use crate::handler::{Handler, NotFound};
use crate::http::response::{ResponseExt, ResponseWriter};
use crate::http::{Header, Method, Request, Status};

mod builder;

pub use builder::Builder;

// ----------------------------------------------------------------------------
// Enums
// ----------------------------------------------------------------------------

/// Outcome of resolving a request.
#[derive(Debug)]
pub enum Outcome<'a> {
    /// A route matched, with the parameters extracted from the path.
    Matched(&'a dyn Handler, Params),
    /// No route matches the path.
    NotFound,
    /// Routes match the path, but only for other methods.
    MethodNotAllowed(Vec<Method>),
}

// ----------------------------------------------------------------------------
// Structs
// ----------------------------------------------------------------------------

/// Multiplexer.
///
/// Matchers are compiled from a set of patterns, which are stored in a tree-like
/// structure, implemented as part of the [`matchit`] crate. Each set of patterns
/// is scoped to a specific request method, which is used to determine what to
/// check for when a request is received. One multiplexer backs an entire tree
/// of routers, so there's exactly one dispatch table.
///
/// The trailing slash of a request path is ignored during lookup, since
/// patterns never end with a slash, and `HEAD` requests are answered by `GET`
/// routes, unless a dedicated `HEAD` route exists.
///
/// # Examples
///
/// ```
/// # use std::error::Error;
/// # fn main() -> Result<(), Box<dyn Error>> {
/// use std::sync::Arc;
/// use waypoint::handler::Handler;
/// use waypoint::http::response::{ResponseExt, ResponseWriter};
/// use waypoint::http::{Header, Method, Request, Status};
/// use waypoint::router::mux::Multiplexer;
///
/// // Create multiplexer and register pattern
/// let mut builder = Multiplexer::builder();
/// builder.register("GET /coffee", Arc::new(|_: Request, res: &mut dyn ResponseWriter| {
///     res.text(Status::Ok, "Coffee");
/// }))?;
/// let mux = builder.build()?;
///
/// // Handle request with unsupported method
/// let res = mux.respond(Request::new().method(Method::Post).uri("/coffee"));
/// assert_eq!(res.status(), Status::MethodNotAllowed);
/// assert_eq!(res.headers().get(Header::Allow), Some("GET, HEAD"));
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Multiplexer {
    /// Matchers, one per method.
    matchers: BTreeMap<Method, Matcher<Arc<dyn Handler>>>,
    /// Handler for unmatched paths.
    fallback: Option<Arc<dyn Handler>>,
}

// ----------------------------------------------------------------------------
// Implementations
// ----------------------------------------------------------------------------

impl Multiplexer {
    /// Creates a multiplexer builder.
    #[must_use]
    pub fn builder() -> Builder {
        Builder::new()
    }

    /// Resolves the handler for the given method and path.
    ///
    /// # Examples
    ///
    /// ```
    /// # use std::error::Error;
    /// # fn main() -> Result<(), Box<dyn Error>> {
    /// use waypoint::handler::NotFound;
    /// use waypoint::http::Method;
    /// use waypoint::router::mux::{Multiplexer, Outcome};
    ///
    /// // Create multiplexer and register pattern
    /// let mut builder = Multiplexer::builder();
    /// builder.register("GET /users/{id}", std::sync::Arc::new(NotFound))?;
    /// let mux = builder.build()?;
    ///
    /// // Resolve handler for path with trailing slash
    /// let outcome = mux.resolve(Method::Get, "/users/7/");
    /// assert!(matches!(outcome, Outcome::Matched(_, params) if params.get("id") == Some("7")));
    /// # Ok(())
    /// # }
    /// ```
    #[must_use]
    pub fn resolve(&self, method: Method, path: &str) -> Outcome<'_> {
        // Patterns never end with a slash, so we must ignore the trailing
        // slash of the path, unless it's the root path
        let path = if path == "/" {
            path
        } else {
            path.strip_suffix('/').unwrap_or(path)
        };

        // Resolve path against the matcher of the method, and fall back to
        // the matcher of GET for HEAD requests
        let found = self.lookup(method, path).or_else(|| {
            (method == Method::Head)
                .then(|| self.lookup(Method::Get, path))
                .flatten()
        });
        if let Some(Match { params, data }) = found {
            return Outcome::Matched(&**data, params);
        }

        // Collect all methods whose matchers match the path, as we need to
        // tell apart a missing route from a method mismatch
        let mut allowed: Vec<Method> = self
            .matchers
            .iter()
            .filter(|(_, matcher)| matcher.resolve(path).is_some())
            .map(|(method, _)| *method)
            .collect();
        if allowed.is_empty() {
            return Outcome::NotFound;
        }

        // GET routes answer HEAD requests as well
        if allowed.contains(&Method::Get) && !allowed.contains(&Method::Head) {
            allowed.push(Method::Head);
            allowed.sort();
        }
        Outcome::MethodNotAllowed(allowed)
    }

    /// Looks up the given path in the matcher of the given method.
    fn lookup(
        &self, method: Method, path: &str,
    ) -> Option<Match<&Arc<dyn Handler>>> {
        self.matchers
            .get(&method)
            .and_then(|matcher| matcher.resolve(path))
    }
}

// ----------------------------------------------------------------------------
// Trait implementations
// ----------------------------------------------------------------------------

impl Handler for Multiplexer {
    fn handle(&self, mut req: Request, res: &mut dyn ResponseWriter) {
        match self.resolve(req.method, &req.uri.path) {
            Outcome::Matched(handler, params) => {
                req.params = params;
                handler.handle(req, res);
            }
            Outcome::NotFound => match &self.fallback {
                Some(fallback) => fallback.handle(req, res),
                None => NotFound.handle(req, res),
            },
            Outcome::MethodNotAllowed(allowed) => {
                let allowed: Vec<_> =
                    allowed.iter().map(Method::name).collect();
                res.headers_mut().insert(Header::Allow, allowed.join(", "));
                res.error(Status::MethodNotAllowed);
            }
        }
    }
}
