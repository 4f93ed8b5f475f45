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

//! HTTP router with composable middleware and route groups.
//!
//! Requests are dispatched by method and path to handlers, which are wrapped
//! in chains of middlewares at registration time. Routers can be nested into
//! groups below path prefixes, which inherit the middlewares of their parent
//! as they were when the group was created. Once all routes are registered,
//! a router is sealed into an immutable [`Dispatcher`][], which can be shared
//! by the worker threads of the bundled [`Server`][], or called directly.
//!
//! The server uses blocking sockets and a fixed pool of worker threads, and
//! needs no async runtime.
//!
//! [`Dispatcher`]: crate::router::Dispatcher
//! [`Server`]: crate::server::Server
//!
//! # Examples
//!
//! ```
//! # use std::error::Error;
//! # fn main() -> Result<(), Box<dyn Error>> {
//! use waypoint::handler::{Handler, TryIntoHandler};
//! use waypoint::http::response::{ResponseExt, ResponseWriter};
//! use waypoint::http::{Request, Status};
//! use waypoint::middleware::{RecoverPanic, RequestLogger};
//! use waypoint::router::Router;
//!
//! // Create router with middlewares and group
//! let router = Router::default()
//!     .with(RecoverPanic)
//!     .with(RequestLogger::new())
//!     .get("/hello", |_: Request, res: &mut dyn ResponseWriter| {
//!         res.text(Status::Ok, "Hello, world!");
//!     })
//!     .group("/api", |api| {
//!         api.get("/users", |_: Request, res: &mut dyn ResponseWriter| {
//!             res.text(Status::Ok, "[]");
//!         })
//!     })
//!     .try_into_handler()?;
//!
//! // Handle request with router
//! let res = router.respond(Request::new().uri("/hello"));
//! assert_eq!(res.status(), Status::Ok);
//! assert_eq!(res.body(), b"Hello, world!");
//! # Ok(())
//! # }
//! ```

#![allow(clippy::doc_markdown)]
#![allow(clippy::missing_errors_doc)]

pub mod handler;
pub mod http;
pub mod middleware;
pub mod router;
pub mod server;
