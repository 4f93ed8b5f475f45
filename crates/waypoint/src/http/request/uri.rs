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

//! HTTP request URI.

use std::borrow::Cow;
use std::fmt;

use percent_encoding::{AsciiSet, CONTROLS, percent_decode_str, utf8_percent_encode};

// ----------------------------------------------------------------------------
// Constants
// ----------------------------------------------------------------------------

/// Characters that must be encoded in a path.
const PATH: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'\\')
    .add(b'{')
    .add(b'}');

// ----------------------------------------------------------------------------
// Structs
// ----------------------------------------------------------------------------

/// HTTP request URI.
///
/// This is a lightweight URI parser, which is not fully RFC 3986 compliant. The
/// path is percent-decoded, so routes can be matched against it directly,
/// while the query string is kept verbatim, as routing never looks at it.
///
/// We assume that paths always start with a `/`, which is sane to assume for
/// a server that is not intended for proxying.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Uri<'a> {
    /// URI path (percent-decoded).
    pub path: Cow<'a, str>,
    /// URI query string (raw, without `?`).
    pub query: Option<Cow<'a, str>>,
}

// ----------------------------------------------------------------------------
// Implementations
// ----------------------------------------------------------------------------

impl<'a> Uri<'a> {
    /// Creates a URI from a decoded path and an optional raw query.
    ///
    /// # Examples
    ///
    /// ```
    /// use waypoint::http::request::Uri;
    ///
    /// // Create URI from parts
    /// let uri = Uri::from_parts("/hello world", Some("q=1"));
    /// assert_eq!(uri.to_string(), "/hello%20world?q=1");
    /// ```
    #[must_use]
    pub fn from_parts<P, Q>(path: P, query: Option<Q>) -> Self
    where
        P: Into<Cow<'a, str>>,
        Q: Into<Cow<'a, str>>,
    {
        Uri {
            path: path.into(),
            query: query.map(Into::into),
        }
    }
}

impl Uri<'_> {
    /// Detaches the URI from the buffer it was parsed from.
    #[must_use]
    pub fn into_owned(self) -> Uri<'static> {
        Uri {
            path: Cow::Owned(self.path.into_owned()),
            query: self.query.map(|query| Cow::Owned(query.into_owned())),
        }
    }
}

// ----------------------------------------------------------------------------
// Trait implementations
// ----------------------------------------------------------------------------

impl<'a> From<&'a str> for Uri<'a> {
    /// Creates a URI from a request target.
    ///
    /// Invalid UTF-8 sequences in the decoded path are replaced, so that the
    /// conversion itself can't fail.
    ///
    /// # Examples
    ///
    /// ```
    /// use waypoint::http::request::Uri;
    ///
    /// // Create URI from string
    /// let uri = Uri::from("/caf%C3%A9?order=1");
    /// assert_eq!(uri.path, "/café");
    /// ```
    fn from(value: &'a str) -> Self {
        let (path, query) = match value.split_once('?') {
            Some((path, query)) => (path, Some(Cow::Borrowed(query))),
            None => (value, None),
        };
        Uri {
            path: percent_decode_str(path).decode_utf8_lossy(),
            query,
        }
    }
}

impl From<String> for Uri<'_> {
    #[inline]
    fn from(value: String) -> Self {
        Uri::from(value.as_str()).into_owned()
    }
}

// ----------------------------------------------------------------------------

impl Default for Uri<'_> {
    #[inline]
    fn default() -> Self {
        Uri {
            path: Cow::Borrowed("/"),
            query: None,
        }
    }
}

// ----------------------------------------------------------------------------

impl fmt::Display for Uri<'_> {
    /// Formats the URI for display, percent-encoding the path.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", utf8_percent_encode(&self.path, PATH))?;
        if let Some(query) = &self.query {
            write!(f, "?{query}")?;
        }
        Ok(())
    }
}
