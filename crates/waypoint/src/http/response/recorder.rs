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

//! Status recorder.

use crate::http::{Headers, Status};

use super::ResponseWriter;

// ----------------------------------------------------------------------------
// Structs
// ----------------------------------------------------------------------------

/// Status recorder.
///
/// A recorder decorates a [`ResponseWriter`] to observe the status committed
/// by the handlers further down the chain, without altering the response. The
/// first status is recorded and forwarded, all later ones are swallowed, so the
/// underlying writer never sees more than one commit. Writing to the body
/// without committing a status first records "200 OK".
///
/// # Examples
///
/// ```
/// use waypoint::http::response::{ResponseWriter, StatusRecorder};
/// use waypoint::http::{Response, Status};
///
/// // Create response and recorder
/// let mut res = Response::new();
/// let mut recorder = StatusRecorder::new(&mut res);
///
/// // Commit status twice
/// recorder.write_status(Status::Created);
/// recorder.write_status(Status::NotFound);
/// assert_eq!(recorder.status(), Status::Created);
/// assert_eq!(res.status(), Status::Created);
/// ```
pub struct StatusRecorder<'a> {
    /// Underlying writer.
    inner: &'a mut dyn ResponseWriter,
    /// Recorded status.
    status: Option<Status>,
}

// ----------------------------------------------------------------------------
// Implementations
// ----------------------------------------------------------------------------

impl<'a> StatusRecorder<'a> {
    /// Creates a status recorder.
    ///
    /// If the underlying writer was already committed, the recorder starts
    /// out with its status.
    #[must_use]
    pub fn new(inner: &'a mut dyn ResponseWriter) -> Self {
        let status = inner.committed();
        Self { inner, status }
    }

    /// Returns the recorded status, or "200 OK" if nothing was written, which
    /// is what will be sent in that case.
    #[inline]
    #[must_use]
    pub fn status(&self) -> Status {
        self.status.unwrap_or(Status::Ok)
    }
}

// ----------------------------------------------------------------------------
// Trait implementations
// ----------------------------------------------------------------------------

impl ResponseWriter for StatusRecorder<'_> {
    #[inline]
    fn headers_mut(&mut self) -> &mut Headers<'static> {
        self.inner.headers_mut()
    }

    fn write_status(&mut self, status: Status) {
        if self.status.is_none() {
            self.status = Some(status);
            self.inner.write_status(status);
        }
    }

    fn write(&mut self, bytes: &[u8]) {
        if self.status.is_none() {
            self.write_status(Status::Ok);
        }
        self.inner.write(bytes);
    }

    #[inline]
    fn committed(&self) -> Option<Status> {
        self.status
    }
}
