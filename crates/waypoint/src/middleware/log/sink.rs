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

//! Log sinks.

use super::Entry;

// ----------------------------------------------------------------------------
// Traits
// ----------------------------------------------------------------------------

/// Log sink.
///
/// Sinks receive the entries recorded by the [`RequestLogger`][]. They are
/// shared between worker threads, so they must be [`Send`] and [`Sync`].
/// Besides the [`Tracing`] sink, any closure taking an [`Entry`] is a sink.
///
/// [`RequestLogger`]: crate::middleware::RequestLogger
pub trait Sink: Send + Sync {
    /// Records the given entry.
    fn record(&self, entry: &Entry);
}

// ----------------------------------------------------------------------------
// Structs
// ----------------------------------------------------------------------------

/// Sink emitting [`tracing`] events.
///
/// Successful requests are logged at `info` level, client errors at `warn`
/// level, and server errors at `error` level.
#[derive(Clone, Copy, Debug, Default)]
pub struct Tracing;

// ----------------------------------------------------------------------------
// Trait implementations
// ----------------------------------------------------------------------------

impl Sink for Tracing {
    fn record(&self, entry: &Entry) {
        macro_rules! emit {
            ($level:ident) => {
                tracing::$level!(
                    method = %entry.method,
                    path = %entry.path,
                    version = %entry.version,
                    status = entry.status.code(),
                    duration = ?entry.duration,
                    user_agent = entry.user_agent.as_deref(),
                    remote_address = entry.remote_address.as_deref(),
                    headers = ?entry.headers,
                    body = entry.body.as_deref(),
                    "{}",
                    entry.status
                )
            };
        }

        // Pick level according to status class
        if entry.status.is_server_error() {
            emit!(error);
        } else if entry.status.is_client_error() {
            emit!(warn);
        } else {
            emit!(info);
        }
    }
}

// ----------------------------------------------------------------------------
// Blanket implementations
// ----------------------------------------------------------------------------

impl<F> Sink for F
where
    F: Fn(&Entry) + Send + Sync,
{
    #[inline]
    fn record(&self, entry: &Entry) {
        self(entry);
    }
}
