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

//! Matcher parameters.

use std::slice::Iter;

// ----------------------------------------------------------------------------
// Structs
// ----------------------------------------------------------------------------

/// Matcher parameters.
///
/// Parameters are extracted from a path when it matches a pattern containing
/// `{...}` segments. Unlike the parameters of the [`matchit`] crate, they own
/// their keys and values, so they can travel with the [`Request`][] down the
/// middleware chain without tying it to the lifetime of the matcher.
///
/// [`Request`]: crate::http::Request
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
/// // Resolve path and obtain parameters
/// let found = matcher.resolve("/coffee/arabica").unwrap();
/// assert_eq!(found.params.get("kind"), Some("arabica"));
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Params {
    /// Parameter list.
    inner: Vec<(String, String)>,
}

/// Iterator over matcher parameters.
pub struct ParamsIter<'a> {
    /// Inner iterator.
    inner: Iter<'a, (String, String)>,
}

// ----------------------------------------------------------------------------
// Implementations
// ----------------------------------------------------------------------------

impl Params {
    /// Creates matcher parameters from the parameters of [`matchit`].
    pub(crate) fn from_matchit(params: &matchit::Params<'_, '_>) -> Self {
        let iter = params.iter();
        Self {
            inner: iter
                .map(|(key, value)| (key.to_string(), value.to_string()))
                .collect(),
        }
    }

    /// Returns the value for the given key.
    #[must_use]
    pub fn get<K>(&self, key: K) -> Option<&str>
    where
        K: AsRef<str>,
    {
        let key = key.as_ref();
        self.inner
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, value)| value.as_str())
    }

    /// Returns whether the parameter is contained.
    #[inline]
    #[must_use]
    pub fn contains<K>(&self, key: K) -> bool
    where
        K: AsRef<str>,
    {
        self.get(key).is_some()
    }

    /// Returns an iterator over all parameters.
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.into_iter()
    }
}

#[allow(clippy::must_use_candidate)]
impl Params {
    /// Returns the number of parameters.
    #[inline]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Returns whether there are any parameters.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

// ----------------------------------------------------------------------------
// Trait implementations
// ----------------------------------------------------------------------------

impl<'a> IntoIterator for &'a Params {
    type Item = (&'a str, &'a str);
    type IntoIter = ParamsIter<'a>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        ParamsIter { inner: self.inner.iter() }
    }
}

// ----------------------------------------------------------------------------

impl<'a> Iterator for ParamsIter<'a> {
    type Item = (&'a str, &'a str);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let (key, value) = self.inner.next()?;
        Some((key.as_str(), value.as_str()))
    }
}
