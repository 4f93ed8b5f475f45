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

//! Multiplexer builder.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::handler::matcher::Pattern;
use crate::handler::{Error, Handler, Matcher, Result};
use crate::http::Method;

use super::Multiplexer;

// ----------------------------------------------------------------------------
// Structs
// ----------------------------------------------------------------------------

/// Multiplexer builder.
///
/// Registrations are collected first and compiled into matchers when the
/// builder is built, which is when conflicting patterns are detected. Thus,
/// builders of several routers can be merged before anything is compiled.
#[derive(Debug, Default)]
pub struct Builder {
    /// Registered entries, in registration order.
    entries: Vec<(Method, Pattern, Arc<dyn Handler>)>,
    /// Registered fallback handlers.
    fallbacks: Vec<Arc<dyn Handler>>,
}

// ----------------------------------------------------------------------------
// Implementations
// ----------------------------------------------------------------------------

impl Builder {
    /// Creates a multiplexer builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a handler for the given pattern.
    ///
    /// Patterns are written as `<METHOD> <path>`, e.g. `GET /users/{id}`. The
    /// path is normalized before it's registered.
    ///
    /// # Errors
    ///
    /// This method returns [`Error::Pattern`], if the pattern isn't made of a
    /// known method and a path, separated by whitespace.
    ///
    /// # Examples
    ///
    /// ```
    /// # use std::error::Error;
    /// # fn main() -> Result<(), Box<dyn Error>> {
    /// use std::sync::Arc;
    /// use waypoint::handler::NotFound;
    /// use waypoint::router::mux::Multiplexer;
    ///
    /// // Create multiplexer builder and register patterns
    /// let mut builder = Multiplexer::builder();
    /// builder.register("GET /coffee", Arc::new(NotFound))?;
    /// assert!(builder.register("/coffee", Arc::new(NotFound)).is_err());
    /// # Ok(())
    /// # }
    /// ```
    pub fn register(
        &mut self, pattern: &str, handler: Arc<dyn Handler>,
    ) -> Result {
        let invalid = || Error::Pattern(pattern.to_string());
        let (method, path) =
            pattern.trim().split_once(' ').ok_or_else(invalid)?;
        let method = method.parse::<Method>().map_err(|_| invalid())?;
        let path = path.trim_start();
        if !path.starts_with('/') {
            return Err(invalid());
        }

        // Register normalized pattern
        self.add(method, Pattern::new(path), handler);
        Ok(())
    }

    /// Adds a handler for the given method and pattern.
    pub fn add(
        &mut self, method: Method, pattern: Pattern, handler: Arc<dyn Handler>,
    ) {
        self.entries.push((method, pattern, handler));
    }

    /// Sets the handler for requests that match no pattern.
    ///
    /// Only one fallback handler may be set, which is checked when building.
    pub fn fallback(&mut self, handler: Arc<dyn Handler>) {
        self.fallbacks.push(handler);
    }

    /// Moves all registrations of the given builder into this builder.
    pub fn merge(&mut self, other: Builder) {
        self.entries.extend(other.entries);
        self.fallbacks.extend(other.fallbacks);
    }

    /// Builds the multiplexer.
    ///
    /// # Errors
    ///
    /// This method returns [`Error::Matcher`], if two patterns of the same
    /// method conflict, and [`Error::Fallback`], if more than one fallback
    /// handler was set.
    pub fn build(self) -> Result<Multiplexer> {
        if self.fallbacks.len() > 1 {
            return Err(Error::Fallback);
        }

        // Transform all registered entries into a single matcher per method,
        // which also checks that no pattern overlaps with any other pattern,
        // a requirement of the matching algorithm of the third-party crate
        let mut matchers = BTreeMap::new();
        for (method, pattern, handler) in self.entries {
            let matcher = matchers.entry(method).or_insert_with(Matcher::new);
            matcher.add(&pattern, handler)?;
        }

        // Return multiplexer
        Ok(Multiplexer {
            matchers,
            fallback: self.fallbacks.into_iter().next(),
        })
    }
}
