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

//! HTTP header.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use super::error::{Error, Result};

// ----------------------------------------------------------------------------
// Statics
// ----------------------------------------------------------------------------

/// Headers by lowercase name, as header names are case-insensitive.
static HEADERS: LazyLock<HashMap<String, Header>> = LazyLock::new(|| {
    let iter = Header::ALL.iter();
    iter.map(|header| (header.name().to_ascii_lowercase(), *header))
        .collect()
});

// ----------------------------------------------------------------------------
// Trait implementations
// ----------------------------------------------------------------------------

impl FromStr for Header {
    type Err = Error;

    /// Attempts to create a header from a string, ignoring case.
    ///
    /// # Errors
    ///
    /// This method returns [`Error::Header`], if the string does not match
    /// one of the known headers.
    ///
    /// # Examples
    ///
    /// ```
    /// # use std::error::Error;
    /// # fn main() -> Result<(), Box<dyn Error>> {
    /// use waypoint::http::Header;
    ///
    /// // Create header from string
    /// let header: Header = "x-real-ip".parse()?;
    /// assert_eq!(header, Header::XRealIp);
    /// # Ok(())
    /// # }
    /// ```
    fn from_str(value: &str) -> Result<Self> {
        HEADERS
            .get(&value.to_ascii_lowercase())
            .copied()
            .ok_or_else(|| Error::Header(value.to_string()))
    }
}

impl AsRef<str> for Header {
    #[inline]
    fn as_ref(&self) -> &str {
        self.name()
    }
}

impl fmt::Display for Header {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ----------------------------------------------------------------------------
// Macros
// ----------------------------------------------------------------------------

/// Defines HTTP headers from a list of variants and names.
macro_rules! headers {
    ($($name:ident => $header:literal,)+) => {
        /// HTTP header.
        ///
        /// This enum contains the HTTP headers that requests and responses are
        /// likely to carry. It's by no means complete, but covers everything
        /// routing, the bundled middlewares and the server need, as well as the
        /// headers that handlers commonly read or write.
        ///
        /// Headers unknown to this enum are skipped when parsing a request. As
        /// a [`Headers`][] map holds one value per header, headers which may be
        /// repeated, like [`Header::SetCookie`], can only be set once.
        ///
        /// [`Headers`]: crate::http::Headers
        #[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub enum Header {
            $(
                #[doc = $header]
                $name,
            )+
        }

        impl Header {
            /// All headers, in declaration order.
            pub const ALL: &[Header] = &[$(Header::$name),+];

            /// Returns the header name in canonical case.
            ///
            /// # Examples
            ///
            /// ```
            /// use waypoint::http::Header;
            ///
            /// // Obtain header name
            /// assert_eq!(Header::ContentType.name(), "Content-Type");
            /// ```
            #[must_use]
            pub const fn name(&self) -> &'static str {
                match self {
                    $(Header::$name => $header,)+
                }
            }
        }
    };
}

// ----------------------------------------------------------------------------

headers! {
    // Content negotiation
    Accept => "Accept",
    AcceptCharset => "Accept-Charset",
    AcceptEncoding => "Accept-Encoding",
    AcceptLanguage => "Accept-Language",
    AcceptRanges => "Accept-Ranges",

    // Representation
    ContentDisposition => "Content-Disposition",
    ContentEncoding => "Content-Encoding",
    ContentLanguage => "Content-Language",
    ContentLength => "Content-Length",
    ContentLocation => "Content-Location",
    ContentRange => "Content-Range",
    ContentType => "Content-Type",
    TransferEncoding => "Transfer-Encoding",

    // Caching and conditionals
    Age => "Age",
    CacheControl => "Cache-Control",
    ETag => "ETag",
    Expires => "Expires",
    IfMatch => "If-Match",
    IfModifiedSince => "If-Modified-Since",
    IfNoneMatch => "If-None-Match",
    IfRange => "If-Range",
    IfUnmodifiedSince => "If-Unmodified-Since",
    LastModified => "Last-Modified",
    Pragma => "Pragma",
    Range => "Range",
    Vary => "Vary",

    // Connection and routing
    Allow => "Allow",
    Connection => "Connection",
    Date => "Date",
    Expect => "Expect",
    Host => "Host",
    KeepAlive => "Keep-Alive",
    Location => "Location",
    RetryAfter => "Retry-After",
    Server => "Server",
    Upgrade => "Upgrade",
    Via => "Via",

    // Authentication and state
    Authorization => "Authorization",
    Cookie => "Cookie",
    ProxyAuthenticate => "Proxy-Authenticate",
    ProxyAuthorization => "Proxy-Authorization",
    SetCookie => "Set-Cookie",
    WwwAuthenticate => "WWW-Authenticate",

    // Client context
    From => "From",
    Origin => "Origin",
    Referer => "Referer",
    UserAgent => "User-Agent",

    // Cross-origin resource sharing
    AccessControlAllowCredentials => "Access-Control-Allow-Credentials",
    AccessControlAllowHeaders => "Access-Control-Allow-Headers",
    AccessControlAllowMethods => "Access-Control-Allow-Methods",
    AccessControlAllowOrigin => "Access-Control-Allow-Origin",
    AccessControlExposeHeaders => "Access-Control-Expose-Headers",
    AccessControlMaxAge => "Access-Control-Max-Age",
    AccessControlRequestHeaders => "Access-Control-Request-Headers",
    AccessControlRequestMethod => "Access-Control-Request-Method",

    // Security
    ContentSecurityPolicy => "Content-Security-Policy",
    ReferrerPolicy => "Referrer-Policy",
    StrictTransportSecurity => "Strict-Transport-Security",
    XContentTypeOptions => "X-Content-Type-Options",
    XFrameOptions => "X-Frame-Options",

    // Proxies and tracing
    Forwarded => "Forwarded",
    XForwardedFor => "X-Forwarded-For",
    XForwardedHost => "X-Forwarded-Host",
    XForwardedProto => "X-Forwarded-Proto",
    XRealIp => "X-Real-IP",
    XRequestId => "X-Request-ID",
    XRequestedWith => "X-Requested-With",
}
