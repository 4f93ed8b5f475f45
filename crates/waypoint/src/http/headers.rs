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

//! HTTP headers.

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;

use super::Header;

// ----------------------------------------------------------------------------
// Structs
// ----------------------------------------------------------------------------

/// HTTP headers.
///
/// Header maps are shared by requests and responses. Values are stored as a
/// [`Cow`], so parsed requests borrow from the buffer they were read from,
/// while responses own their values, which is why the response writer hands
/// out `Headers<'static>`. Each header appears at most once, and setting it
/// again replaces the previous value.
///
/// Headers are known integer keys, so they are kept in a [`BTreeMap`], which
/// also makes iteration and serialization ordered and deterministic.
///
/// # Examples
///
/// ```
/// use waypoint::http::{Header, Headers};
///
/// // Create header map and add headers
/// let mut headers = Headers::new();
/// headers.insert(Header::Accept, "text/plain");
/// headers.insert(Header::Accept, "application/json");
/// assert_eq!(headers.get(Header::Accept), Some("application/json"));
/// assert_eq!(headers.len(), 1);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Headers<'a> {
    /// Values, ordered by header.
    inner: BTreeMap<Header, Cow<'a, str>>,
}

// ----------------------------------------------------------------------------
// Implementations
// ----------------------------------------------------------------------------

impl<'a> Headers<'a> {
    /// Creates a header map.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self { inner: BTreeMap::new() }
    }

    /// Returns the value of the given header.
    #[inline]
    #[must_use]
    pub fn get(&self, header: Header) -> Option<&str> {
        self.inner.get(&header).map(AsRef::as_ref)
    }

    /// Returns whether the given header is set.
    #[inline]
    #[must_use]
    pub fn contains(&self, header: Header) -> bool {
        self.inner.contains_key(&header)
    }

    /// Sets the given header, replacing any previous value.
    ///
    /// # Examples
    ///
    /// ```
    /// use waypoint::http::{Header, Headers};
    ///
    /// // Create header map and add owned and borrowed values
    /// let mut headers = Headers::new();
    /// headers.insert(Header::ContentLength, 42.to_string());
    /// headers.insert(Header::ContentType, "text/plain");
    /// ```
    #[inline]
    pub fn insert<V>(&mut self, header: Header, value: V)
    where
        V: Into<Cow<'a, str>>,
    {
        self.inner.insert(header, value.into());
    }

    /// Removes the given header.
    #[inline]
    pub fn remove(&mut self, header: Header) {
        self.inner.remove(&header);
    }

    /// Removes all headers.
    #[inline]
    pub fn clear(&mut self) {
        self.inner.clear();
    }

    /// Returns an iterator over all headers, ordered by header.
    pub fn iter(&self) -> impl Iterator<Item = (Header, &str)> {
        self.inner
            .iter()
            .map(|(header, value)| (*header, value.as_ref()))
    }
}

#[allow(clippy::must_use_candidate)]
impl Headers<'_> {
    /// Returns the number of headers.
    #[inline]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Returns whether there are any headers.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

// ----------------------------------------------------------------------------
// Trait implementations
// ----------------------------------------------------------------------------

impl<'a, V> FromIterator<(Header, V)> for Headers<'a>
where
    V: Into<Cow<'a, str>>,
{
    /// Creates a header map from an iterator.
    ///
    /// # Examples
    ///
    /// ```
    /// use waypoint::http::{Header, Headers};
    ///
    /// // Create header map from iterator
    /// let headers = Headers::from_iter([
    ///     (Header::Accept, "text/plain"),
    ///     (Header::AcceptLanguage, "en"),
    /// ]);
    /// assert_eq!(headers.len(), 2);
    /// ```
    fn from_iter<T>(iter: T) -> Self
    where
        T: IntoIterator<Item = (Header, V)>,
    {
        let iter = iter.into_iter();
        let inner = iter.map(|(header, value)| (header, value.into()));
        Self { inner: inner.collect() }
    }
}

// ----------------------------------------------------------------------------

impl fmt::Display for Headers<'_> {
    /// Formats the header map as it's sent on the wire.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for (header, value) in self.iter() {
            write!(f, "{header}: {value}\r\n")?;
        }
        Ok(())
    }
}
