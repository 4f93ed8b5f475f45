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

//! Middleware for request logging.

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use crate::handler::Handler;
use crate::http::response::{ResponseWriter, StatusRecorder};
use crate::http::{Header, Request};
use crate::middleware::Middleware;

mod entry;
mod mask;
mod sink;

pub use entry::Entry;
pub use mask::mask;
pub use sink::{Sink, Tracing};

// ----------------------------------------------------------------------------
// Structs
// ----------------------------------------------------------------------------

/// Middleware for request logging.
///
/// This middleware captures the request line, user agent and client address
/// before forwarding the request, optionally along with its headers and body,
/// and records the committed status and duration once the rest of the chain
/// returned. Each request results in exactly one [`Entry`], which is handed to
/// the configured [`Sink`]. The default sink emits [`tracing`] events.
///
/// Bodies are buffered before they reach the chain, so capturing them doesn't
/// affect handlers. When masking is configured, the listed top-level fields of
/// JSON bodies are replaced with `"*"` in the captured copy.
///
/// # Examples
///
/// ```
/// # use std::error::Error;
/// # fn main() -> Result<(), Box<dyn Error>> {
/// use std::sync::{Arc, Mutex};
/// use waypoint::handler::{Handler, TryIntoHandler};
/// use waypoint::http::response::{ResponseExt, ResponseWriter};
/// use waypoint::http::{Request, Status};
/// use waypoint::middleware::log::Entry;
/// use waypoint::middleware::RequestLogger;
/// use waypoint::router::Router;
///
/// // Create logger collecting entries
/// let entries = Arc::new(Mutex::new(Vec::new()));
/// let logger = RequestLogger::new().sink({
///     let entries = Arc::clone(&entries);
///     move |entry: &Entry| entries.lock().unwrap().push(entry.clone())
/// });
///
/// // Create router with logger
/// let router = Router::default()
///     .with(logger)
///     .get("/coffee", |_: Request, res: &mut dyn ResponseWriter| {
///         res.error(Status::ImATeapot);
///     })
///     .try_into_handler()?;
///
/// // Handle request with router
/// router.respond(Request::new().uri("/coffee"));
/// let entries = entries.lock().unwrap();
/// assert_eq!(entries[0].path, "/coffee");
/// assert_eq!(entries[0].status, Status::ImATeapot);
/// # Ok(())
/// # }
/// ```
pub struct RequestLogger {
    /// Whether to capture headers.
    headers: bool,
    /// Whether to capture the body.
    body: bool,
    /// Top-level JSON fields to mask.
    mask: Vec<String>,
    /// Entry sink.
    sink: Arc<dyn Sink>,
}

// ----------------------------------------------------------------------------
// Implementations
// ----------------------------------------------------------------------------

impl RequestLogger {
    /// Creates a middleware for request logging.
    ///
    /// Headers and bodies aren't captured by default, and entries are emitted
    /// as [`tracing`] events through the [`Tracing`] sink.
    #[must_use]
    pub fn new() -> Self {
        Self {
            headers: false,
            body: false,
            mask: Vec::new(),
            sink: Arc::new(Tracing),
        }
    }

    /// Sets whether request headers are captured.
    #[must_use]
    pub fn headers(mut self, enabled: bool) -> Self {
        self.headers = enabled;
        self
    }

    /// Sets whether request bodies are captured.
    #[must_use]
    pub fn body(mut self, enabled: bool) -> Self {
        self.body = enabled;
        self
    }

    /// Sets the top-level JSON fields to mask in captured bodies.
    ///
    /// # Examples
    ///
    /// ```
    /// use waypoint::middleware::RequestLogger;
    ///
    /// // Create logger masking credentials
    /// let logger = RequestLogger::new()
    ///     .body(true)
    ///     .mask(["password", "token"]);
    /// ```
    #[must_use]
    pub fn mask<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.mask = fields.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the sink receiving log entries.
    #[must_use]
    pub fn sink<S>(mut self, sink: S) -> Self
    where
        S: Sink + 'static,
    {
        self.sink = Arc::new(sink);
        self
    }
}

// ----------------------------------------------------------------------------
// Trait implementations
// ----------------------------------------------------------------------------

impl Middleware for RequestLogger {
    fn process(
        &self, req: Request, res: &mut dyn ResponseWriter, next: &dyn Handler,
    ) {
        let start = Instant::now();

        // Capture everything we need from the request before it's moved
        let mut entry = Entry::from_request(&req);
        if self.headers {
            entry.headers = req
                .headers
                .iter()
                .map(|(header, value)| (header, value.to_string()))
                .collect();
        }
        if self.body && !req.body.is_empty() {
            let body = if self.mask.is_empty() {
                Cow::Borrowed(&req.body[..])
            } else {
                mask(&req.body, &self.mask)
            };
            entry.body = Some(String::from_utf8_lossy(&body).into_owned());
        }

        // Forward request, observing the committed status
        let mut recorder = StatusRecorder::new(res);
        next.handle(req, &mut recorder);
        entry.status = recorder.status();
        entry.duration = start.elapsed();
        self.sink.record(&entry);
    }

    #[inline]
    fn name(&self) -> &str {
        "request-logger"
    }
}

// ----------------------------------------------------------------------------

impl Default for RequestLogger {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for RequestLogger {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("RequestLogger")
            .field("headers", &self.headers)
            .field("body", &self.body)
            .field("mask", &self.mask)
            .finish_non_exhaustive()
    }
}

// ----------------------------------------------------------------------------
// Functions
// ----------------------------------------------------------------------------

/// Returns the client address of the given request.
///
/// Proxies report the client address in `X-Real-IP` or `X-Forwarded-For`,
/// which take precedence over the peer address, in that order. Of the latter,
/// only the first address is used, which is the original client.
pub(crate) fn client_address(req: &Request) -> Option<String> {
    if let Some(ip) = req.headers.get(Header::XRealIp) {
        let ip = ip.trim();
        if !ip.is_empty() {
            return Some(ip.to_string());
        }
    }
    if let Some(forwarded) = req.headers.get(Header::XForwardedFor) {
        let first = forwarded.split(',').next().unwrap_or_default().trim();
        if !first.is_empty() {
            return Some(first.to_string());
        }
    }
    req.remote.map(|addr| addr.ip().to_string())
}
