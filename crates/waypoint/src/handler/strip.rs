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

//! Prefix stripping.

use std::borrow::Cow;

use crate::handler::matcher::Pattern;
use crate::handler::Handler;
use crate::http::response::{ResponseExt, ResponseWriter};
use crate::http::{Request, Status};

// ----------------------------------------------------------------------------
// Structs
// ----------------------------------------------------------------------------

/// Prefix stripping handler.
///
/// This handler removes a path prefix from the request before forwarding it
/// to the wrapped handler, so that the wrapped handler sees paths relative to
/// the prefix, which is what a [`FileServer`][] mounted below a prefix needs.
/// Requests outside of the prefix are answered with "404 Not Found".
///
/// [`FileServer`]: crate::handler::FileServer
///
/// # Examples
///
/// ```
/// use waypoint::handler::{Handler, StripPrefix};
/// use waypoint::http::response::{ResponseExt, ResponseWriter};
/// use waypoint::http::{Request, Status};
///
/// // Create handler echoing the path
/// let handler = StripPrefix::new("/static", |req: Request, res: &mut dyn ResponseWriter| {
///     res.text(Status::Ok, req.uri.path);
/// });
///
/// // Handle request with handler
/// let res = handler.respond(Request::new().uri("/static/css/main.css"));
/// assert_eq!(res.body(), b"/css/main.css");
/// ```
pub struct StripPrefix<H> {
    /// Prefix to strip.
    prefix: Pattern,
    /// Wrapped handler.
    handler: H,
}

// ----------------------------------------------------------------------------
// Implementations
// ----------------------------------------------------------------------------

impl<H> StripPrefix<H>
where
    H: Handler,
{
    /// Creates a prefix stripping handler.
    pub fn new<P>(prefix: P, handler: H) -> Self
    where
        P: AsRef<str>,
    {
        let prefix = Pattern::new(prefix.as_ref());
        Self { prefix, handler }
    }
}

// ----------------------------------------------------------------------------
// Trait implementations
// ----------------------------------------------------------------------------

impl<H> Handler for StripPrefix<H>
where
    H: Handler,
{
    fn handle(&self, mut req: Request, res: &mut dyn ResponseWriter) {
        if self.prefix.is_root() {
            return self.handler.handle(req, res);
        }

        // Only strip the prefix at a segment boundary
        let path = match req.uri.path.strip_prefix(self.prefix.as_str()) {
            Some("") => String::from("/"),
            Some(rest) if rest.starts_with('/') => rest.to_string(),
            _ => return res.error(Status::NotFound),
        };

        // Forward with modified request
        req.uri.path = Cow::Owned(path);
        self.handler.handle(req, res);
    }
}
