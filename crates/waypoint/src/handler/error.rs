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

//! Handler error.

use thiserror::Error;

use super::matcher;

// ----------------------------------------------------------------------------
// Enums
// ----------------------------------------------------------------------------

/// Handler error.
#[derive(Debug, Error)]
pub enum Error {
    /// Matcher error.
    #[error(transparent)]
    Matcher(#[from] matcher::Error),

    /// Invalid pattern, which must read `<METHOD> <path>`.
    #[error("invalid pattern: {0}")]
    Pattern(String),

    /// Fallback handler registered more than once.
    #[error("fallback handler already registered")]
    Fallback,

    /// Group closure returned a router it didn't receive.
    #[error("group `{0}` returned a foreign router")]
    Group(String),
}

// ----------------------------------------------------------------------------
// Type aliases
// ----------------------------------------------------------------------------

/// Handler result.
pub type Result<T = (), E = Error> = std::result::Result<T, E>;
