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

//! Log entry.

use std::time::Duration;

use crate::http::{Header, Method, Request, Status, Version};

use super::client_address;

// ----------------------------------------------------------------------------
// Structs
// ----------------------------------------------------------------------------

/// Log entry.
///
/// One entry is recorded per request by the [`RequestLogger`][], after the
/// rest of the chain returned, so it carries both request and response data.
///
/// [`RequestLogger`]: crate::middleware::RequestLogger
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Entry {
    /// Request method.
    pub method: Method,
    /// Request path, percent-decoded.
    pub path: String,
    /// Request protocol version.
    pub version: Version,
    /// Committed response status.
    pub status: Status,
    /// Time spent in the rest of the chain.
    pub duration: Duration,
    /// User agent, if sent.
    pub user_agent: Option<String>,
    /// Client address, if known.
    pub remote_address: Option<String>,
    /// Request headers, if captured.
    pub headers: Vec<(Header, String)>,
    /// Request body, if captured, with masked fields replaced.
    pub body: Option<String>,
}

// ----------------------------------------------------------------------------
// Implementations
// ----------------------------------------------------------------------------

impl Entry {
    /// Creates an entry from the given request, before it's handled.
    pub(crate) fn from_request(req: &Request) -> Self {
        Self {
            method: req.method,
            path: req.uri.path.to_string(),
            version: req.version,
            status: Status::Ok,
            duration: Duration::ZERO,
            user_agent: req.headers.get(Header::UserAgent).map(str::to_string),
            remote_address: client_address(req),
            headers: Vec::new(),
            body: None,
        }
    }
}
