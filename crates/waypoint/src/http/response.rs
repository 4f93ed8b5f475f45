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

//! HTTP response.

use httpdate::fmt_http_date;
use std::fmt;
use std::time::SystemTime;

use super::component::{Header, Method, Status};
use super::Headers;

mod ext;
mod recorder;
mod writer;

pub use ext::ResponseExt;
pub use recorder::StatusRecorder;
pub use writer::ResponseWriter;

// ----------------------------------------------------------------------------
// Structs
// ----------------------------------------------------------------------------

/// HTTP response.
///
/// Responses are buffered: handlers write to them through [`ResponseWriter`],
/// and the server serializes them with [`Response::into_bytes`] once the
/// handler returned. The status is committed with the first call to either
/// [`ResponseWriter::write_status`] or [`ResponseWriter::write`], and can't be
/// changed afterwards. Header changes made after the commit are discarded,
/// just like they would be once the head of a response is on the wire.
///
/// # Examples
///
/// ```
/// use waypoint::http::response::ResponseWriter;
/// use waypoint::http::{Header, Response, Status};
///
/// // Create response and write to it
/// let mut res = Response::new();
/// res.headers_mut().insert(Header::ContentType, "text/plain");
/// res.write_status(Status::Created);
/// res.write(b"Hello, world!");
///
/// // Later status changes are ignored
/// res.write_status(Status::NotFound);
/// assert_eq!(res.status(), Status::Created);
/// ```
#[derive(Clone, Debug, Default)]
pub struct Response {
    /// Committed status, if any.
    status: Option<Status>,
    /// Response headers.
    headers: Headers<'static>,
    /// Headers set after the commit.
    discarded: Headers<'static>,
    /// Response body.
    body: Vec<u8>,
}

// ----------------------------------------------------------------------------
// Implementations
// ----------------------------------------------------------------------------

impl Response {
    /// Creates a response.
    ///
    /// # Examples
    ///
    /// ```
    /// use waypoint::http::Response;
    ///
    /// // Create response
    /// let res = Response::new();
    /// ```
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the status of the response.
    ///
    /// If nothing was written, the response is sent as "200 OK".
    ///
    /// # Examples
    ///
    /// ```
    /// use waypoint::http::{Response, Status};
    ///
    /// // Create response and obtain status
    /// let res = Response::new();
    /// assert_eq!(res.status(), Status::Ok);
    /// ```
    #[inline]
    #[must_use]
    pub fn status(&self) -> Status {
        self.status.unwrap_or(Status::Ok)
    }

    /// Returns the headers of the response.
    #[inline]
    #[must_use]
    pub fn headers(&self) -> &Headers<'static> {
        &self.headers
    }

    /// Returns the body of the response.
    #[inline]
    #[must_use]
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Prepares the response for transmission.
    ///
    /// This adds the headers the server is responsible for, and drops the body
    /// of responses to `HEAD` requests, retaining its length, so the client
    /// learns what a `GET` would have returned. The content length is always
    /// derived from the body, as a stale value would break message framing,
    /// except for `HEAD` responses without a body, which may declare it.
    pub(crate) fn prepare(&mut self, method: Method, keep_alive: bool) {
        let status = self.status();
        if status.is_bodiless() {
            self.headers.remove(Header::ContentLength);
        } else if method != Method::Head
            || !self.body.is_empty()
            || !self.headers.contains(Header::ContentLength)
        {
            self.headers
                .insert(Header::ContentLength, self.body.len().to_string());
        }

        // Add date and connection handling
        self.headers
            .insert(Header::Date, fmt_http_date(SystemTime::now()));
        if !keep_alive {
            self.headers.insert(Header::Connection, "close");
        }

        // Responses to HEAD requests and bodiless statuses carry no body
        if method == Method::Head || status.is_bodiless() {
            self.body.clear();
        }
    }

    /// Returns the response as bytes.
    ///
    /// # Examples
    ///
    /// ```
    /// use waypoint::http::response::ResponseExt;
    /// use waypoint::http::{Response, Status};
    ///
    /// // Create response and obtain bytes
    /// let mut res = Response::new();
    /// res.text(Status::Ok, "Hello, world!");
    ///
    /// // Bytes include a content length
    /// let bytes = res.into_bytes();
    /// assert!(bytes.starts_with(b"HTTP/1.1 200 OK\r\n"));
    /// assert!(bytes.ends_with(b"\r\n\r\nHello, world!"));
    /// ```
    #[must_use]
    pub fn into_bytes(mut self) -> Vec<u8> {
        let status = self.status();
        if !status.is_bodiless()
            && (!self.body.is_empty()
                || !self.headers.contains(Header::ContentLength))
        {
            self.headers
                .insert(Header::ContentLength, self.body.len().to_string());
        }

        // Compute an estimate for the response size - 8 bytes for the version,
        // 36 bytes for the status line, and 64 bytes on average per header,
        // each line being terminated by CRLF
        let capacity = (8 + 2)
            + 4 + 32 + 2 // fmt
            + self.headers.len() * 64 + 2 // fmt
            + self.body.len();

        // Create pre-sized buffer and append prefix and status
        let mut buffer = Vec::with_capacity(capacity);
        buffer.extend_from_slice(b"HTTP/1.1 ");
        buffer.extend_from_slice(status.to_string().as_bytes());
        buffer.extend_from_slice(b"\r\n");

        // Append all headers to buffer
        for (header, value) in self.headers.iter() {
            buffer.extend_from_slice(header.name().as_bytes());
            buffer.extend_from_slice(b": ");
            buffer.extend_from_slice(value.as_bytes());
            buffer.extend_from_slice(b"\r\n");
        }

        // Append empty line and body to buffer
        buffer.extend_from_slice(b"\r\n");
        buffer.extend_from_slice(&self.body);
        buffer
    }
}

// ----------------------------------------------------------------------------
// Trait implementations
// ----------------------------------------------------------------------------

impl ResponseWriter for Response {
    fn headers_mut(&mut self) -> &mut Headers<'static> {
        if self.status.is_some() {
            self.discarded.clear();
            &mut self.discarded
        } else {
            &mut self.headers
        }
    }

    fn write_status(&mut self, status: Status) {
        if self.status.is_none() {
            self.status = Some(status);
        }
    }

    fn write(&mut self, bytes: &[u8]) {
        if self.status.is_none() {
            self.write_status(Status::Ok);
        }
        self.body.extend_from_slice(bytes);
    }

    #[inline]
    fn committed(&self) -> Option<Status> {
        self.status
    }
}

// ----------------------------------------------------------------------------

impl fmt::Display for Response {
    /// Formats the response for display.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "HTTP/1.1 {}\r\n", self.status())?;
        write!(f, "{}\r\n", self.headers)?;
        write!(f, "[Body: {} bytes]\r\n", self.body.len())
    }
}
