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

//! HTTP response writer extensions.

use crate::http::{Header, Status};

use super::ResponseWriter;

// ----------------------------------------------------------------------------
// Traits
// ----------------------------------------------------------------------------

/// Extension trait for [`ResponseWriter`] providing common responses.
///
/// All methods commit the given status, so they should be the only thing a
/// handler writes, apart from headers set beforehand.
pub trait ResponseExt: ResponseWriter {
    /// Writes a plain text response.
    ///
    /// The content type is set to `text/plain`, unless a content type was
    /// already set by the caller.
    ///
    /// # Examples
    ///
    /// ```
    /// use waypoint::http::response::ResponseExt;
    /// use waypoint::http::{Header, Response, Status};
    ///
    /// // Create response from text
    /// let mut res = Response::new();
    /// res.text(Status::Ok, "Hello, world!");
    /// assert_eq!(res.body(), b"Hello, world!");
    /// assert_eq!(
    ///     res.headers().get(Header::ContentType),
    ///     Some("text/plain; charset=utf-8"),
    /// );
    /// ```
    fn text<S>(&mut self, status: Status, content: S)
    where
        S: AsRef<str>,
    {
        let headers = self.headers_mut();
        if !headers.contains(Header::ContentType) {
            headers.insert(Header::ContentType, "text/plain; charset=utf-8");
        }
        self.write_status(status);
        self.write(content.as_ref().as_bytes());
    }

    /// Writes an error response carrying the status name as text.
    ///
    /// # Examples
    ///
    /// ```
    /// use waypoint::http::response::ResponseExt;
    /// use waypoint::http::{Response, Status};
    ///
    /// // Create response from status
    /// let mut res = Response::new();
    /// res.error(Status::NotFound);
    /// assert_eq!(res.status(), Status::NotFound);
    /// assert_eq!(res.body(), b"Not Found");
    /// ```
    fn error(&mut self, status: Status) {
        let headers = self.headers_mut();
        headers.insert(Header::ContentType, "text/plain; charset=utf-8");
        headers.insert(Header::XContentTypeOptions, "nosniff");
        self.text(status, status.name());
    }

    /// Writes a redirect to the given location.
    ///
    /// # Examples
    ///
    /// ```
    /// use waypoint::http::response::ResponseExt;
    /// use waypoint::http::{Header, Response, Status};
    ///
    /// // Create redirect
    /// let mut res = Response::new();
    /// res.redirect(Status::MovedPermanently, "/coffee");
    /// assert_eq!(res.headers().get(Header::Location), Some("/coffee"));
    /// ```
    fn redirect<L>(&mut self, status: Status, location: L)
    where
        L: ToString,
    {
        self.headers_mut()
            .insert(Header::Location, location.to_string());
        self.write_status(status);
    }
}

// ----------------------------------------------------------------------------
// Blanket implementations
// ----------------------------------------------------------------------------

impl<W> ResponseExt for W where W: ResponseWriter + ?Sized {}
