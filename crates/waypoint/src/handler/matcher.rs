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

//! Matcher.

mod error;
mod params;
mod pattern;

pub use error::{Error, Result};
pub use params::{Params, ParamsIter};
pub use pattern::Pattern;

// ----------------------------------------------------------------------------
// Structs
// ----------------------------------------------------------------------------

/// Matcher.
///
/// This is a thin wrapper around the [`Router`][] data type of the [`matchit`]
/// crate to shield against unforeseen changes in the crate's implementation.
///
/// [`Router`]: matchit::Router
#[derive(Debug)]
pub struct Matcher<T = ()> {
    /// Matcher implementation.
    inner: matchit::Router<T>,
}

/// Match.
#[derive(Debug)]
pub struct Match<T> {
    /// Match parameters.
    pub params: Params,
    /// Associated data.
    pub data: T,
}

// ----------------------------------------------------------------------------
// Implementations
// ----------------------------------------------------------------------------

impl<T> Matcher<T> {
    /// Creates a matcher.
    ///
    /// ```
    /// use waypoint::handler::Matcher;
    ///
    /// // Create matcher
    /// let matcher = Matcher::<()>::new();
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Self { inner: matchit::Router::new() }
    }

    /// Adds a pattern to the matcher.
    ///
    /// # Errors
    ///
    /// This method returns [`Error::Insert`], if the pattern could not be added
    /// to the matcher, e.g., because it conflicts with another pattern.
    ///
    /// # Examples
    ///
    /// ```
    /// # use std::error::Error;
    /// # fn main() -> Result<(), Box<dyn Error>> {
    /// use waypoint::handler::matcher::Pattern;
    /// use waypoint::handler::Matcher;
    ///
    /// // Create matcher and add pattern
    /// let mut matcher = Matcher::new();
    /// matcher.add(&Pattern::new("/coffee/{kind}"), ())?;
    ///
    /// // Adding the same pattern again fails
    /// assert!(matcher.add(&Pattern::new("/coffee/{kind}"), ()).is_err());
    /// # Ok(())
    /// # }
    /// ```
    pub fn add(&mut self, pattern: &Pattern, value: T) -> Result {
        self.inner
            .insert(pattern.as_str(), value)
            .map_err(Into::into)
    }

    /// Attempts to resolve and match the given path.
    ///
    /// # Examples
    ///
    /// ```
    /// # use std::error::Error;
    /// # fn main() -> Result<(), Box<dyn Error>> {
    /// use waypoint::handler::matcher::Pattern;
    /// use waypoint::handler::Matcher;
    ///
    /// // Create matcher and add pattern
    /// let mut matcher = Matcher::new();
    /// matcher.add(&Pattern::new("/coffee/{kind}"), ())?;
    ///
    /// // Resolve pattern from path
    /// let found = matcher.resolve("/coffee/vietnamese");
    /// assert!(found.is_some());
    /// # Ok(())
    /// # }
    /// ```
    pub fn resolve(&self, path: &str) -> Option<Match<&T>> {
        self.inner.at(path).ok().map(|found| Match {
            params: Params::from_matchit(&found.params),
            data: found.value,
        })
    }
}

// ----------------------------------------------------------------------------
// Trait implementations
// ----------------------------------------------------------------------------

impl<T> Default for Matcher<T> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}
