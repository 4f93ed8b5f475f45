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

//! HTTP version.

use std::fmt;
use std::str::FromStr;

use super::error::{Error, Result};

// ----------------------------------------------------------------------------
// Enums
// ----------------------------------------------------------------------------

/// HTTP version.
///
/// Only HTTP/1.x is spoken, which is what the bundled server parses. The
/// version is carried on every [`Request`][] so that middlewares can log the
/// protocol, and the server can decide whether to keep the connection open.
///
/// [`Request`]: crate::http::Request
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
pub enum Version {
    /// HTTP/1.0
    Http10,
    /// HTTP/1.1
    #[default]
    Http11,
}

// ----------------------------------------------------------------------------
// Implementations
// ----------------------------------------------------------------------------

impl Version {
    /// Returns the version name.
    ///
    /// # Examples
    ///
    /// ```
    /// use waypoint::http::Version;
    ///
    /// // Obtain version name
    /// assert_eq!(Version::Http11.name(), "HTTP/1.1");
    /// ```
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Version::Http10 => "HTTP/1.0",
            Version::Http11 => "HTTP/1.1",
        }
    }

    /// Returns whether connections are kept alive unless told otherwise.
    #[must_use]
    pub const fn is_persistent(&self) -> bool {
        matches!(self, Version::Http11)
    }
}

// ----------------------------------------------------------------------------
// Trait implementations
// ----------------------------------------------------------------------------

impl TryFrom<u8> for Version {
    type Error = Error;

    /// Attempts to create a version from the minor version number, as
    /// reported by [`httparse`].
    fn try_from(minor: u8) -> Result<Self> {
        match minor {
            0 => Ok(Version::Http10),
            1 => Ok(Version::Http11),
            _ => Err(Error::Version(format!("HTTP/1.{minor}"))),
        }
    }
}

impl FromStr for Version {
    type Err = Error;

    /// Attempts to create a version from a string.
    ///
    /// # Errors
    ///
    /// This method returns [`Error::Version`], if the string does not name
    /// HTTP/1.0 or HTTP/1.1.
    ///
    /// # Examples
    ///
    /// ```
    /// # use std::error::Error;
    /// # fn main() -> Result<(), Box<dyn Error>> {
    /// use waypoint::http::Version;
    ///
    /// // Create version from string
    /// let version: Version = "HTTP/1.0".parse()?;
    /// assert_eq!(version, Version::Http10);
    /// # Ok(())
    /// # }
    /// ```
    fn from_str(value: &str) -> Result<Self> {
        match value {
            "HTTP/1.0" => Ok(Version::Http10),
            "HTTP/1.1" => Ok(Version::Http11),
            _ => Err(Error::Version(value.to_string())),
        }
    }
}

// ----------------------------------------------------------------------------

impl fmt::Display for Version {
    /// Formats the version for display.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}
