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

//! Middleware for panic recovery.

use std::any::Any;
use std::backtrace::Backtrace;
use std::panic::{self, AssertUnwindSafe};

use crate::handler::Handler;
use crate::http::response::{ResponseExt, ResponseWriter};
use crate::http::{Request, Status};
use crate::middleware::Middleware;

// ----------------------------------------------------------------------------
// Structs
// ----------------------------------------------------------------------------

/// Middleware for panic recovery.
///
/// This middleware runs the rest of the chain inside [`catch_unwind`][], so a
/// panicking handler doesn't take the worker thread down with it. The panic
/// message is logged together with a backtrace, and the client receives "500
/// Internal Server Error", unless a status was committed before the panic, in
/// which case the response is left as the handler left it. Headers set before
/// the panic are discarded along with the partial response.
///
/// Recovery relies on unwinding, so it has no effect when the crate is built
/// with `panic = "abort"`. Add this middleware first, so it wraps all others.
///
/// [`catch_unwind`]: std::panic::catch_unwind
///
/// # Examples
///
/// ```
/// use waypoint::handler::Handler;
/// use waypoint::http::response::ResponseWriter;
/// use waypoint::http::{Request, Response, Status};
/// use waypoint::middleware::{Middleware, RecoverPanic};
///
/// // Create handler that panics
/// fn handler(_: Request, _: &mut dyn ResponseWriter) {
///     panic!("boom");
/// }
///
/// // Handle request with middleware
/// let mut res = Response::new();
/// RecoverPanic.process(Request::new(), &mut res, &handler);
/// assert_eq!(res.status(), Status::InternalServerError);
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct RecoverPanic;

// ----------------------------------------------------------------------------
// Trait implementations
// ----------------------------------------------------------------------------

impl Middleware for RecoverPanic {
    fn process(
        &self, req: Request, res: &mut dyn ResponseWriter, next: &dyn Handler,
    ) {
        let method = req.method;
        let path = req.uri.path.to_string();

        // The writer is only used again to inspect its commit state, and the
        // request was moved into the closure, so unwind safety is given
        let result =
            panic::catch_unwind(AssertUnwindSafe(|| next.handle(req, &mut *res)));
        let Err(payload) = result else {
            return;
        };

        // Log panic with backtrace
        let backtrace = Backtrace::force_capture();
        tracing::error!(
            %method,
            path = %path,
            panic = message(&*payload),
            %backtrace,
            "panic while handling request"
        );

        // Answer with an error, unless the handler committed a status, and
        // drop headers set before the panic, as they describe another body
        if res.committed().is_none() {
            res.headers_mut().clear();
            res.error(Status::InternalServerError);
        }
    }

    #[inline]
    fn name(&self) -> &str {
        "recover-panic"
    }
}

// ----------------------------------------------------------------------------
// Functions
// ----------------------------------------------------------------------------

/// Extracts the message from a panic payload.
pub(crate) fn message(payload: &(dyn Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.as_str()
    } else {
        "unknown panic payload"
    }
}
