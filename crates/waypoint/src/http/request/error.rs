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

//! HTTP request error.

use thiserror::Error;

use crate::http::component;
use crate::http::Status;

// ----------------------------------------------------------------------------
// Enums
// ----------------------------------------------------------------------------

/// HTTP request error.
#[derive(Debug, Error)]
pub enum Error {
    /// Request is incomplete.
    #[error("incomplete request")]
    Incomplete,

    /// Parser error.
    #[error(transparent)]
    Parser(#[from] httparse::Error),

    /// Component error.
    #[error(transparent)]
    Component(#[from] component::Error),

    /// Validation error, carrying the status to answer with.
    #[error("invalid request: {0}")]
    Validation(Status),
}

// ----------------------------------------------------------------------------
// Implementations
// ----------------------------------------------------------------------------

impl Error {
    /// Returns the status a server should answer with.
    ///
    /// # Examples
    ///
    /// ```
    /// use waypoint::http::request::Error;
    /// use waypoint::http::{Request, Status};
    ///
    /// // Parse request with unknown method
    /// let err = Request::from_bytes(b"BREW /pot HTTP/1.1\r\n\r\n").unwrap_err();
    /// assert_eq!(err.status(), Status::NotImplemented);
    /// ```
    #[must_use]
    pub fn status(&self) -> Status {
        match self {
            Error::Incomplete | Error::Parser(_) => Status::BadRequest,
            Error::Component(component::Error::Method(_)) => {
                Status::NotImplemented
            }
            Error::Component(component::Error::Version(_)) => {
                Status::HttpVersionNotSupported
            }
            Error::Component(component::Error::Header(_)) => {
                Status::BadRequest
            }
            Error::Validation(status) => *status,
        }
    }
}

// ----------------------------------------------------------------------------
// Type aliases
// ----------------------------------------------------------------------------

/// HTTP request result.
pub type Result<T = (), E = Error> = std::result::Result<T, E>;
