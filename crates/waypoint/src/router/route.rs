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

//! Route.

use std::fmt;
use std::sync::Arc;

use crate::handler::matcher::Pattern;
use crate::handler::Handler;
use crate::http::Method;
use crate::middleware::Middleware;

// ----------------------------------------------------------------------------
// Structs
// ----------------------------------------------------------------------------

/// Route.
///
/// A route records a registration made with a [`Router`][], and is used for
/// introspection only, as requests are dispatched through the multiplexer.
/// Routes are immutable once created.
///
/// [`Router`]: crate::router::Router
#[derive(Clone, Debug)]
pub struct Route {
    /// Route method.
    method: Method,
    /// Route pattern, with all prefixes applied.
    pattern: Pattern,
    /// Terminal handler.
    handler: Arc<dyn Handler>,
    /// Route middlewares, outermost first.
    middlewares: Vec<Arc<dyn Middleware>>,
    /// Route name.
    name: Option<String>,
}

// ----------------------------------------------------------------------------
// Implementations
// ----------------------------------------------------------------------------

impl Route {
    /// Creates a route.
    pub(crate) fn new(
        method: Method, pattern: Pattern, handler: Arc<dyn Handler>,
        middlewares: Vec<Arc<dyn Middleware>>, name: Option<String>,
    ) -> Self {
        Self { method, pattern, handler, middlewares, name }
    }
}

#[allow(clippy::must_use_candidate)]
impl Route {
    /// Returns the method.
    #[inline]
    pub fn method(&self) -> Method {
        self.method
    }

    /// Returns the normalized path.
    #[inline]
    pub fn path(&self) -> &str {
        self.pattern.as_str()
    }

    /// Returns the terminal handler.
    #[inline]
    pub fn handler(&self) -> &Arc<dyn Handler> {
        &self.handler
    }

    /// Returns the route middlewares, outermost first.
    #[inline]
    pub fn middlewares(&self) -> &[Arc<dyn Middleware>] {
        &self.middlewares
    }

    /// Returns the name, if any.
    #[inline]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }
}

// ----------------------------------------------------------------------------
// Trait implementations
// ----------------------------------------------------------------------------

impl fmt::Display for Route {
    /// Formats the route for display.
    ///
    /// Routes are formatted as method, path and name, followed by the names of
    /// the route middlewares, if any, e.g. `GET /users users [auth, json]`.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} {}", self.method, self.pattern)?;
        write!(f, " {}", self.name.as_deref().unwrap_or("-"))?;
        if !self.middlewares.is_empty() {
            let names: Vec<_> =
                self.middlewares.iter().map(|m| m.name()).collect();
            write!(f, " [{}]", names.join(", "))?;
        }
        Ok(())
    }
}
