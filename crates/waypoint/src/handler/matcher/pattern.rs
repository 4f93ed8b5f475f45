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

//! Matcher pattern.

use std::fmt;

// ----------------------------------------------------------------------------
// Structs
// ----------------------------------------------------------------------------

/// Matcher pattern.
///
/// Patterns are normalized absolute paths: they always start with `/`, never
/// end with `/` unless they are the root, contain no empty segments, and have
/// all `.` and `..` segments resolved. Patterns might contain parameters,
/// which are denoted by `{...}` brackets, e.g. `/users/{id}` or `/{*path}`.
///
/// Normalization is lexical, so any string is a valid input, and the empty
/// string denotes the root.
///
/// # Examples
///
/// ```
/// use waypoint::handler::matcher::Pattern;
///
/// // Create pattern from path
/// let pattern = Pattern::new("//api/./users/../teams/");
/// assert_eq!(pattern.as_str(), "/api/teams");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Pattern {
    /// Normalized path.
    path: String,
}

// ----------------------------------------------------------------------------
// Implementations
// ----------------------------------------------------------------------------

impl Pattern {
    /// Creates a pattern by normalizing the given path.
    ///
    /// Repeated slashes are collapsed, `.` segments are dropped, and `..`
    /// segments remove the preceding segment, never climbing above the root.
    ///
    /// # Examples
    ///
    /// ```
    /// use waypoint::handler::matcher::Pattern;
    ///
    /// // Create patterns from paths
    /// assert_eq!(Pattern::new("").as_str(), "/");
    /// assert_eq!(Pattern::new("users/").as_str(), "/users");
    /// assert_eq!(Pattern::new("/../users").as_str(), "/users");
    /// ```
    #[must_use]
    pub fn new(path: &str) -> Self {
        let mut segments = Vec::new();
        for segment in path.split('/') {
            match segment {
                "" | "." => {}
                ".." => {
                    segments.pop();
                }
                _ => segments.push(segment),
            }
        }

        // Join segments, each preceded by a slash
        let capacity = segments.iter().map(|segment| segment.len() + 1).sum();
        let mut path = String::with_capacity(capacity);
        for segment in segments {
            path.push('/');
            path.push_str(segment);
        }

        // Empty paths denote the root
        if path.is_empty() {
            path.push('/');
        }
        Self { path }
    }

    /// Concatenates the pattern with the given path and normalizes the result.
    ///
    /// Note that concatenation is literal, so no separator is inserted, which
    /// is why paths should start with `/`.
    ///
    /// # Examples
    ///
    /// ```
    /// use waypoint::handler::matcher::Pattern;
    ///
    /// // Create pattern and join path
    /// let pattern = Pattern::new("/admin");
    /// assert_eq!(pattern.join("/users/").as_str(), "/admin/users");
    /// assert_eq!(pattern.join("").as_str(), "/admin");
    /// ```
    #[must_use]
    pub fn join(&self, path: &str) -> Self {
        Self::new(&format!("{}{path}", self.path))
    }

    /// Returns whether the pattern is the root.
    #[inline]
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.path == "/"
    }
}

#[allow(clippy::must_use_candidate)]
impl Pattern {
    /// Returns the string representation.
    #[inline]
    pub fn as_str(&self) -> &str {
        self.path.as_str()
    }
}

// ----------------------------------------------------------------------------
// Trait implementations
// ----------------------------------------------------------------------------

impl From<&str> for Pattern {
    #[inline]
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

// ----------------------------------------------------------------------------

impl AsRef<str> for Pattern {
    #[inline]
    fn as_ref(&self) -> &str {
        self.path.as_str()
    }
}

// ----------------------------------------------------------------------------

impl Default for Pattern {
    #[inline]
    fn default() -> Self {
        Self { path: String::from("/") }
    }
}

// ----------------------------------------------------------------------------

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.path)
    }
}
