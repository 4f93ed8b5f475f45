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

//! Router.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::handler::matcher::Pattern;
use super::handler::{
    compose, Error, FileServer, Handler, Result, StripPrefix, TryIntoHandler,
};
use super::http::Method;
use super::middleware::Middleware;

mod dispatcher;
mod endpoint;
pub mod mux;
mod route;

pub use dispatcher::Dispatcher;
pub use endpoint::{Endpoint, IntoEndpoint};
pub use route::Route;

// Re-export for convenient usage with routers
pub use super::handler::matcher::Params;

// ----------------------------------------------------------------------------
// Structs
// ----------------------------------------------------------------------------

/// Router.
///
/// Routers scope handlers to a combination of HTTP methods and path patterns,
/// and wrap them in middlewares. Global middlewares added with [`Router::with`]
/// apply to all routes registered afterwards, in the order they were added,
/// and are followed by the middlewares of the route's [`Endpoint`]. Chains are
/// composed once, at registration time, so adding a middleware never affects
/// routes that were already registered.
///
/// Groups are routers scoped to a path prefix, which start out with a copy of
/// the middlewares of their parent. When the closure passed to [`Router::group`]
/// returns, all registrations of the group are handed to the parent, so that
/// exactly one [`Multiplexer`][] is built for the entire tree of routers, when
/// the router is converted into a [`Dispatcher`] with [`TryIntoHandler`].
///
/// [`Multiplexer`]: crate::router::mux::Multiplexer
///
/// # Examples
///
/// ```
/// # use std::error::Error;
/// # fn main() -> Result<(), Box<dyn Error>> {
/// use waypoint::handler::{Handler, TryIntoHandler};
/// use waypoint::http::response::{ResponseExt, ResponseWriter};
/// use waypoint::http::{Request, Status};
/// use waypoint::router::Router;
///
/// // Create router with group
/// let router = Router::default()
///     .group("/api", |api| {
///         api.get("/users/{id}", |req: Request, res: &mut dyn ResponseWriter| {
///             let id = req.param("id").unwrap_or_default().to_string();
///             res.text(Status::Ok, id);
///         })
///     })
///     .try_into_handler()?;
///
/// // Handle request with router
/// let res = router.respond(Request::new().uri("/api/users/7"));
/// assert_eq!(res.body(), b"7");
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default)]
pub struct Router {
    /// Path prefix, concatenated from all ancestors.
    prefix: String,
    /// Global middlewares, outermost first.
    middlewares: Vec<Arc<dyn Middleware>>,
    /// Multiplexer builder.
    mux: mux::Builder,
    /// Route table.
    routes: Vec<Route>,
    /// Prefixes of groups that returned a router they didn't receive.
    detached: Vec<String>,
}

// ----------------------------------------------------------------------------
// Implementations
// ----------------------------------------------------------------------------

impl Router {
    /// Creates a router.
    ///
    /// The given prefix is prepended to all routes that are registered with
    /// the router. Using [`Router::default`] is equivalent to passing an empty
    /// prefix.
    ///
    /// # Examples
    ///
    /// ```
    /// use waypoint::router::Router;
    ///
    /// // Create router
    /// let router = Router::new("/api");
    /// ```
    pub fn new<P>(prefix: P) -> Self
    where
        P: Into<String>,
    {
        Self {
            prefix: prefix.into(),
            ..Default::default()
        }
    }

    /// Adds a global middleware to the router.
    ///
    /// The middleware applies to all routes registered afterwards, including
    /// routes of groups created afterwards. Routes registered before are left
    /// untouched.
    ///
    /// # Examples
    ///
    /// ```
    /// use waypoint::handler::Handler;
    /// use waypoint::http::response::ResponseWriter;
    /// use waypoint::http::{Header, Request};
    /// use waypoint::router::Router;
    ///
    /// // Create router with middleware
    /// let router = Router::default()
    ///     .with(|req: Request, res: &mut dyn ResponseWriter, next: &dyn Handler| {
    ///         res.headers_mut().insert(Header::Server, "waypoint");
    ///         next.handle(req, res);
    ///     });
    /// ```
    #[must_use]
    pub fn with<M>(mut self, middleware: M) -> Self
    where
        M: Middleware + 'static,
    {
        self.middlewares.push(Arc::new(middleware));
        self
    }

    /// Adds a `GET` route to the router.
    ///
    /// # Examples
    ///
    /// ```
    /// use waypoint::http::response::{ResponseExt, ResponseWriter};
    /// use waypoint::http::{Request, Status};
    /// use waypoint::router::Router;
    ///
    /// // Create router and add route
    /// let router = Router::default()
    ///     .get("/", |req: Request, res: &mut dyn ResponseWriter| {
    ///         res.text(Status::Ok, "Hello, world!");
    ///     });
    /// ```
    #[inline]
    #[must_use]
    pub fn get<P, E>(self, path: P, endpoint: E) -> Self
    where
        P: AsRef<str>,
        E: IntoEndpoint,
    {
        self.route(Method::Get, path, endpoint)
    }

    /// Adds a `POST` route to the router.
    #[inline]
    #[must_use]
    pub fn post<P, E>(self, path: P, endpoint: E) -> Self
    where
        P: AsRef<str>,
        E: IntoEndpoint,
    {
        self.route(Method::Post, path, endpoint)
    }

    /// Adds a `PUT` route to the router.
    #[inline]
    #[must_use]
    pub fn put<P, E>(self, path: P, endpoint: E) -> Self
    where
        P: AsRef<str>,
        E: IntoEndpoint,
    {
        self.route(Method::Put, path, endpoint)
    }

    /// Adds a `PATCH` route to the router.
    #[inline]
    #[must_use]
    pub fn patch<P, E>(self, path: P, endpoint: E) -> Self
    where
        P: AsRef<str>,
        E: IntoEndpoint,
    {
        self.route(Method::Patch, path, endpoint)
    }

    /// Adds a `DELETE` route to the router.
    #[inline]
    #[must_use]
    pub fn delete<P, E>(self, path: P, endpoint: E) -> Self
    where
        P: AsRef<str>,
        E: IntoEndpoint,
    {
        self.route(Method::Delete, path, endpoint)
    }

    /// Adds a `HEAD` route to the router.
    ///
    /// Explicit `HEAD` routes are only necessary when the answer should differ
    /// from that of the `GET` route of the same path, since `HEAD` requests are
    /// answered by `GET` routes otherwise.
    #[inline]
    #[must_use]
    pub fn head<P, E>(self, path: P, endpoint: E) -> Self
    where
        P: AsRef<str>,
        E: IntoEndpoint,
    {
        self.route(Method::Head, path, endpoint)
    }

    /// Adds an `OPTIONS` route to the router.
    #[inline]
    #[must_use]
    pub fn options<P, E>(self, path: P, endpoint: E) -> Self
    where
        P: AsRef<str>,
        E: IntoEndpoint,
    {
        self.route(Method::Options, path, endpoint)
    }

    /// Adds a `CONNECT` route to the router.
    #[inline]
    #[must_use]
    pub fn connect<P, E>(self, path: P, endpoint: E) -> Self
    where
        P: AsRef<str>,
        E: IntoEndpoint,
    {
        self.route(Method::Connect, path, endpoint)
    }

    /// Adds a `TRACE` route to the router.
    #[inline]
    #[must_use]
    pub fn trace<P, E>(self, path: P, endpoint: E) -> Self
    where
        P: AsRef<str>,
        E: IntoEndpoint,
    {
        self.route(Method::Trace, path, endpoint)
    }

    /// Adds a route for the given method to the router.
    ///
    /// The path is appended to the prefix of the router and normalized, and
    /// the handler of the endpoint is wrapped in the global middlewares of the
    /// router, followed by the middlewares of the endpoint.
    ///
    /// # Examples
    ///
    /// ```
    /// use waypoint::http::response::{ResponseExt, ResponseWriter};
    /// use waypoint::http::{Method, Request, Status};
    /// use waypoint::router::{Endpoint, Router};
    ///
    /// // Create router and add named route
    /// let router = Router::new("/api")
    ///     .route(Method::Get, "//users/", Endpoint::new(
    ///         |_: Request, res: &mut dyn ResponseWriter| {
    ///             res.text(Status::Ok, "[]");
    ///         },
    ///     ).name("users"));
    ///
    /// // Obtain route table
    /// let route = &router.routes()[0];
    /// assert_eq!(route.path(), "/api/users");
    /// assert_eq!(route.name(), Some("users"));
    /// ```
    #[must_use]
    pub fn route<P, E>(mut self, method: Method, path: P, endpoint: E) -> Self
    where
        P: AsRef<str>,
        E: IntoEndpoint,
    {
        let endpoint = endpoint.into_endpoint();
        let pattern = self.pattern(path.as_ref());

        // Compose global and route middlewares, outermost first
        let mut middlewares = self.middlewares.clone();
        middlewares.extend(endpoint.middlewares.iter().cloned());
        let chain = compose(Arc::clone(&endpoint.handler), &middlewares);

        // Register chain with multiplexer and record route
        self.mux.add(method, pattern.clone(), chain);
        self.routes.push(Route::new(
            method,
            pattern,
            endpoint.handler,
            endpoint.middlewares,
            endpoint.name,
        ));
        self
    }

    /// Adds a group of routes below the given prefix.
    ///
    /// The closure receives a new router, which inherits the prefix and a copy
    /// of the current global middlewares of this router. Middlewares specific
    /// to the group are added by calling [`Router::with`] on the group, before
    /// registering routes. Middlewares added to this router afterwards don't
    /// affect the group. Groups can be nested without limit.
    ///
    /// The closure must return the router it received, extended or not, as
    /// the registrations of any other router would escape the prefix and
    /// middlewares of the group. Otherwise, converting this router into a
    /// handler fails with [`Error::Group`][].
    ///
    /// [`Error::Group`]: crate::handler::Error::Group
    ///
    /// # Examples
    ///
    /// ```
    /// # use std::error::Error;
    /// # fn main() -> Result<(), Box<dyn Error>> {
    /// use waypoint::handler::{Handler, TryIntoHandler};
    /// use waypoint::http::response::{ResponseExt, ResponseWriter};
    /// use waypoint::http::{Request, Status};
    /// use waypoint::router::Router;
    ///
    /// // Create router with nested groups
    /// let router = Router::default()
    ///     .group("/admin", |admin| {
    ///         admin.group("/users", |users| {
    ///             users.get("/", |_: Request, res: &mut dyn ResponseWriter| {
    ///                 res.text(Status::Ok, "Users");
    ///             })
    ///         })
    ///     })
    ///     .try_into_handler()?;
    ///
    /// // Handle request with router
    /// let res = router.respond(Request::new().uri("/admin/users/"));
    /// assert_eq!(res.body(), b"Users");
    /// # Ok(())
    /// # }
    /// ```
    #[must_use]
    pub fn group<P, F>(mut self, prefix: P, f: F) -> Self
    where
        P: AsRef<str>,
        F: FnOnce(Router) -> Router,
    {
        let prefix = format!("{}{}", self.prefix, prefix.as_ref());
        let group = f(Router {
            prefix: prefix.clone(),
            middlewares: self.middlewares.clone(),
            ..Default::default()
        });

        // The group must extend the router it received, which shares our
        // prefix and starts with our middlewares
        let inherited = group.middlewares.len() >= self.middlewares.len()
            && self
                .middlewares
                .iter()
                .zip(&group.middlewares)
                .all(|(a, b)| Arc::ptr_eq(a, b));
        if group.prefix != prefix || !inherited {
            tracing::warn!(%prefix, "group returned a foreign router");
            self.detached.push(prefix);
            return self;
        }

        // Hand all registrations of the group to this router
        self.detached.extend(group.detached);
        self.mux.merge(group.mux);
        self.routes.extend(group.routes);
        self
    }

    /// Adds a static file server below the given prefix.
    ///
    /// `GET` requests for the prefix and all paths below it are answered with
    /// the files of the given directory, with the prefix removed from the
    /// path. The file server is wrapped in the current global middlewares.
    ///
    /// # Examples
    ///
    /// ```
    /// # use std::error::Error;
    /// # fn main() -> Result<(), Box<dyn Error>> {
    /// use waypoint::handler::{Handler, TryIntoHandler};
    /// use waypoint::http::{Request, Status};
    /// use waypoint::router::Router;
    ///
    /// // Create router with static file server
    /// let router = Router::default()
    ///     .static_files("/assets", "does/not/exist")
    ///     .try_into_handler()?;
    ///
    /// // Handle request with router
    /// let res = router.respond(Request::new().uri("/assets/main.css"));
    /// assert_eq!(res.status(), Status::NotFound);
    /// # Ok(())
    /// # }
    /// ```
    #[must_use]
    pub fn static_files<P, D>(mut self, prefix: P, dir: D) -> Self
    where
        P: AsRef<str>,
        D: Into<PathBuf>,
    {
        let pattern = self.pattern(prefix.as_ref());
        let files: Arc<dyn Handler> = Arc::new(StripPrefix::new(
            pattern.as_str(),
            FileServer::new(dir),
        ));

        // Register the prefix itself and everything below it
        let chain = compose(Arc::clone(&files), &self.middlewares);
        let wildcard = pattern.join("/{*path}");
        self.mux.add(Method::Get, pattern.clone(), Arc::clone(&chain));
        self.mux.add(Method::Get, wildcard, chain);
        self.routes.push(Route::new(
            Method::Get,
            pattern,
            files,
            Vec::new(),
            Some(String::from("static")),
        ));
        self
    }

    /// Adds a static file server, deriving the prefix from the directory.
    ///
    /// The directory is normalized into a path, so `./public` is served below
    /// `/public`, which is convenient when the layout on disk mirrors the URL.
    ///
    /// # Examples
    ///
    /// ```
    /// use waypoint::router::Router;
    ///
    /// // Create router with static file server
    /// let router = Router::default().serve_static("./public");
    /// assert_eq!(router.routes()[0].path(), "/public");
    /// ```
    #[must_use]
    pub fn serve_static<D>(self, dir: D) -> Self
    where
        D: AsRef<Path>,
    {
        let dir = dir.as_ref();
        let prefix = Pattern::new(&dir.to_string_lossy());
        self.static_files(prefix.as_str(), dir)
    }

    /// Sets the handler for requests that match no route.
    ///
    /// The handler is wrapped in the current global middlewares. Only one
    /// handler may be set for the entire tree of routers, which is checked
    /// when the router is converted into a [`Dispatcher`].
    ///
    /// # Examples
    ///
    /// ```
    /// # use std::error::Error;
    /// # fn main() -> Result<(), Box<dyn Error>> {
    /// use waypoint::handler::{Handler, TryIntoHandler};
    /// use waypoint::http::response::{ResponseExt, ResponseWriter};
    /// use waypoint::http::{Request, Status};
    /// use waypoint::router::Router;
    ///
    /// // Create router with custom fallback
    /// let router = Router::default()
    ///     .not_found(|_: Request, res: &mut dyn ResponseWriter| {
    ///         res.text(Status::NotFound, "Nothing here");
    ///     })
    ///     .try_into_handler()?;
    ///
    /// // Handle request with router
    /// let res = router.respond(Request::new().uri("/missing"));
    /// assert_eq!(res.body(), b"Nothing here");
    /// # Ok(())
    /// # }
    /// ```
    #[must_use]
    pub fn not_found<H>(mut self, handler: H) -> Self
    where
        H: Handler + 'static,
    {
        let chain = compose(Arc::new(handler), &self.middlewares);
        self.mux.fallback(chain);
        self
    }

    /// Returns the route table, including the routes of all groups.
    #[inline]
    #[must_use]
    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    /// Returns the global middlewares, outermost first.
    #[inline]
    #[must_use]
    pub fn middlewares(&self) -> &[Arc<dyn Middleware>] {
        &self.middlewares
    }

    /// Returns the normalized pattern for the given path below the prefix.
    fn pattern(&self, path: &str) -> Pattern {
        Pattern::new(&format!("{}{path}", self.prefix))
    }
}

// ----------------------------------------------------------------------------
// Trait implementations
// ----------------------------------------------------------------------------

impl TryIntoHandler for Router {
    type Output = Dispatcher;

    /// Attempts to convert the router into a dispatcher.
    ///
    /// # Errors
    ///
    /// This method returns [`Error::Matcher`][], if two routes of the same
    /// method conflict, [`Error::Fallback`][], if more than one fallback
    /// handler was set in the tree of routers, and [`Error::Group`][], if the
    /// closure of a group returned a router it didn't receive.
    ///
    /// [`Error::Fallback`]: crate::handler::Error::Fallback
    /// [`Error::Group`]: crate::handler::Error::Group
    /// [`Error::Matcher`]: crate::handler::Error::Matcher
    ///
    /// # Examples
    ///
    /// ```
    /// use waypoint::handler::{NotFound, TryIntoHandler};
    /// use waypoint::router::Router;
    ///
    /// // Create router with conflicting routes
    /// let router = Router::default()
    ///     .get("/users/{id}", NotFound)
    ///     .get("/users/{name}", NotFound);
    ///
    /// // Conversion fails
    /// assert!(router.try_into_handler().is_err());
    /// ```
    fn try_into_handler(mut self) -> Result<Self::Output> {
        if !self.detached.is_empty() {
            return Err(Error::Group(self.detached.swap_remove(0)));
        }
        let mux = self.mux.build()?;
        Ok(Dispatcher::new(mux, self.routes))
    }
}

// ----------------------------------------------------------------------------

impl fmt::Display for Router {
    /// Formats the router for display.
    ///
    /// # Examples
    ///
    /// ```
    /// use waypoint::handler::NotFound;
    /// use waypoint::middleware::StripTrailingSlashes;
    /// use waypoint::router::Router;
    ///
    /// // Create router
    /// let router = Router::default()
    ///     .with(StripTrailingSlashes)
    ///     .get("/", NotFound);
    ///
    /// // Format router for display
    /// let text = router.to_string();
    /// assert!(text.contains("strip-trailing-slashes"));
    /// assert!(text.contains("GET / -"));
    /// ```
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "Middlewares:")?;
        for middleware in &self.middlewares {
            writeln!(f, "  {}", middleware.name())?;
        }
        writeln!(f, "Routes:")?;
        for route in &self.routes {
            writeln!(f, "  {route}")?;
        }
        Ok(())
    }
}
