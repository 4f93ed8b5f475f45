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

//! Handler conversions.

use super::{Handler, Result};

// ----------------------------------------------------------------------------
// Traits
// ----------------------------------------------------------------------------

/// Attempt conversion into [`Handler`].
///
/// This trait is implemented for all handlers, as well as for builders which
/// must be validated before they can handle requests, most notably [`Router`][],
/// which is sealed into a [`Dispatcher`][] on conversion.
///
/// [`Dispatcher`]: crate::router::Dispatcher
/// [`Router`]: crate::router::Router
pub trait TryIntoHandler {
    /// Output type of conversion.
    type Output: Handler + 'static;

    /// Attempts to convert into a handler.
    ///
    /// # Errors
    ///
    /// In case conversion fails, an error should be returned.
    ///
    /// # Examples
    ///
    /// ```
    /// # use std::error::Error;
    /// # fn main() -> Result<(), Box<dyn Error>> {
    /// use waypoint::handler::{Handler, TryIntoHandler};
    /// use waypoint::http::response::{ResponseExt, ResponseWriter};
    /// use waypoint::http::{Request, Status};
    /// use waypoint::router::Router;
    ///
    /// // Create router and convert into handler
    /// let router = Router::default()
    ///     .get("/", |_: Request, res: &mut dyn ResponseWriter| {
    ///         res.text(Status::Ok, "Hello, world!");
    ///     })
    ///     .try_into_handler()?;
    ///
    /// // Handle request with router
    /// let res = router.respond(Request::new());
    /// assert_eq!(res.body(), b"Hello, world!");
    /// # Ok(())
    /// # }
    /// ```
    fn try_into_handler(self) -> Result<Self::Output>;
}

// ----------------------------------------------------------------------------
// Blanket implementations
// ----------------------------------------------------------------------------

impl<H> TryIntoHandler for H
where
    H: Handler + 'static,
{
    type Output = Self;

    #[inline]
    fn try_into_handler(self) -> Result<Self::Output> {
        Ok(self)
    }
}
