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

//! Middleware for trailing slash removal.

use crate::handler::matcher::Pattern;
use crate::handler::Handler;
use crate::http::request::Uri;
use crate::http::response::{ResponseExt, ResponseWriter};
use crate::http::{Request, Status};
use crate::middleware::Middleware;

// ----------------------------------------------------------------------------
// Structs
// ----------------------------------------------------------------------------

/// Middleware for trailing slash removal.
///
/// This middleware redirects requests for paths ending in one or more slashes
/// to the same path without them, using "301 Moved Permanently", so clients
/// and crawlers settle on a single canonical URL. The query string is kept.
/// Repeated slashes anywhere in the path are collapsed as well, so the
/// location always stays on the same host.
/// The root path is passed through unchanged, as are all paths without a
/// trailing slash. Redirected requests never reach the next handler.
///
/// # Examples
///
/// ```
/// use waypoint::handler::NotFound;
/// use waypoint::http::{Header, Request, Response, Status};
/// use waypoint::middleware::{Middleware, StripTrailingSlashes};
///
/// // Handle request with middleware
/// let mut res = Response::new();
/// let req = Request::new().uri("/coffee//?size=large");
/// StripTrailingSlashes.process(req, &mut res, &NotFound);
/// assert_eq!(res.status(), Status::MovedPermanently);
/// assert_eq!(res.headers().get(Header::Location), Some("/coffee?size=large"));
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct StripTrailingSlashes;

// ----------------------------------------------------------------------------
// Trait implementations
// ----------------------------------------------------------------------------

impl Middleware for StripTrailingSlashes {
    fn process(
        &self, req: Request, res: &mut dyn ResponseWriter, next: &dyn Handler,
    ) {
        if req.uri.path == "/" || !req.uri.path.ends_with('/') {
            return next.handle(req, res);
        }

        // Normalize the entire path, as a leading `//` would otherwise turn
        // the location into a protocol-relative URL pointing to another host
        let path = Pattern::new(&req.uri.path);

        // Redirect to canonical path, keeping the query
        let location =
            Uri::from_parts(path.as_str(), req.uri.query.as_deref());
        tracing::debug!(from = %req.uri, to = %location, "redirect");
        res.redirect(Status::MovedPermanently, location);
    }

    #[inline]
    fn name(&self) -> &str {
        "strip-trailing-slashes"
    }
}
