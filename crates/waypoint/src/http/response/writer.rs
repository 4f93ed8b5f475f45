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

//! HTTP response writer.

use crate::http::Status;

use crate::http::Headers;

// ----------------------------------------------------------------------------
// Traits
// ----------------------------------------------------------------------------

/// HTTP response writer.
///
/// Handlers and middlewares answer requests by writing to a response writer,
/// which allows middlewares to decorate the writer handed down the chain, e.g.,
/// to observe the status a handler commits, as done by [`StatusRecorder`][].
///
/// Writers follow first-write-wins semantics: the status is committed by the
/// first call to [`ResponseWriter::write_status`], or implicitly as "200 OK"
/// by the first call to [`ResponseWriter::write`]. Later attempts to set the
/// status are ignored, and so are header changes made after the commit.
///
/// [`StatusRecorder`]: crate::http::response::StatusRecorder
pub trait ResponseWriter {
    /// Returns the headers that are sent with the status.
    fn headers_mut(&mut self) -> &mut Headers<'static>;

    /// Commits the status, unless a status was already committed.
    ///
    /// # Examples
    ///
    /// ```
    /// use waypoint::http::response::ResponseWriter;
    /// use waypoint::http::{Response, Status};
    ///
    /// // Create response and commit status twice
    /// let mut res = Response::new();
    /// res.write_status(Status::Created);
    /// res.write_status(Status::NotFound);
    /// assert_eq!(res.committed(), Some(Status::Created));
    /// ```
    fn write_status(&mut self, status: Status);

    /// Appends the given bytes to the body, committing "200 OK" if no status
    /// was committed yet.
    fn write(&mut self, bytes: &[u8]);

    /// Returns the committed status, if any.
    fn committed(&self) -> Option<Status>;
}
