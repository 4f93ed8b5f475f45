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

//! Dispatcher.

use std::fmt;

use crate::handler::Handler;
use crate::http::response::ResponseWriter;
use crate::http::Request;

use super::mux::Multiplexer;
use super::Route;

// ----------------------------------------------------------------------------
// Structs
// ----------------------------------------------------------------------------

/// Dispatcher.
///
/// A dispatcher is the sealed form of a [`Router`][], created by converting
/// it with [`TryIntoHandler`][]. It's immutable, so it can be shared between
/// the worker threads of a server without synchronization.
///
/// [`Router`]: crate::router::Router
/// [`TryIntoHandler`]: crate::handler::TryIntoHandler
#[derive(Debug)]
pub struct Dispatcher {
    /// Multiplexer.
    mux: Multiplexer,
    /// Route table.
    routes: Vec<Route>,
}

// ----------------------------------------------------------------------------
// Implementations
// ----------------------------------------------------------------------------

impl Dispatcher {
    /// Creates a dispatcher.
    pub(crate) fn new(mux: Multiplexer, routes: Vec<Route>) -> Self {
        Self { mux, routes }
    }

    /// Returns the route table.
    #[inline]
    #[must_use]
    pub fn routes(&self) -> &[Route] {
        &self.routes
    }
}

// ----------------------------------------------------------------------------
// Trait implementations
// ----------------------------------------------------------------------------

impl Handler for Dispatcher {
    #[inline]
    fn handle(&self, req: Request, res: &mut dyn ResponseWriter) {
        self.mux.handle(req, res);
    }
}

impl fmt::Display for Dispatcher {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for route in &self.routes {
            writeln!(f, "{route}")?;
        }
        Ok(())
    }
}
