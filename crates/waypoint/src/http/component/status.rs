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

//! HTTP status.

use std::fmt;

// ----------------------------------------------------------------------------
// Implementations
// ----------------------------------------------------------------------------

impl Status {
    /// Returns the numeric status code.
    ///
    /// # Examples
    ///
    /// ```
    /// use waypoint::http::Status;
    ///
    /// // Obtain status code
    /// assert_eq!(Status::MovedPermanently.code(), 301);
    /// ```
    #[must_use]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Returns the status for the given numeric code, if known.
    ///
    /// # Examples
    ///
    /// ```
    /// use waypoint::http::Status;
    ///
    /// // Obtain status from code
    /// assert_eq!(Status::from_code(404), Some(Status::NotFound));
    /// assert_eq!(Status::from_code(299), None);
    /// ```
    #[must_use]
    pub fn from_code(code: u16) -> Option<Self> {
        Status::ALL.iter().copied().find(|status| status.code() == code)
    }

    /// Returns whether the status indicates a client error (4xx).
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        matches!(self.code(), 400..=499)
    }

    /// Returns whether the status indicates a server error (5xx).
    #[must_use]
    pub const fn is_server_error(&self) -> bool {
        matches!(self.code(), 500..=599)
    }

    /// Returns whether a response with this status must not carry a body.
    ///
    /// # Examples
    ///
    /// ```
    /// use waypoint::http::Status;
    ///
    /// // Check whether body is allowed
    /// assert!(Status::NotModified.is_bodiless());
    /// assert!(!Status::Ok.is_bodiless());
    /// ```
    #[must_use]
    pub const fn is_bodiless(&self) -> bool {
        matches!(self.code(), 100..=199 | 204 | 304)
    }
}

// ----------------------------------------------------------------------------
// Trait implementations
// ----------------------------------------------------------------------------

impl AsRef<str> for Status {
    #[inline]
    fn as_ref(&self) -> &str {
        self.name()
    }
}

impl fmt::Display for Status {
    /// Formats the status as it appears in the status line.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} {}", self.code(), self.name())
    }
}

// ----------------------------------------------------------------------------
// Macros
// ----------------------------------------------------------------------------

/// Defines HTTP statuses from a list of codes, variants and reason phrases.
macro_rules! statuses {
    ($($code:literal $name:ident $reason:literal,)+) => {
        /// HTTP status.
        ///
        /// Statuses are represented by their numeric code, and formatted with
        /// their reason phrase, e.g., `404 Not Found`.
        #[allow(clippy::enum_variant_names)]
        #[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
        #[repr(u16)]
        pub enum Status {
            $(
                #[doc = concat!(stringify!($code), " ", $reason)]
                $name = $code,
            )+
        }

        impl Status {
            /// All statuses, ordered by code.
            pub const ALL: &[Status] = &[$(Status::$name),+];

            /// Returns the reason phrase.
            ///
            /// # Examples
            ///
            /// ```
            /// use waypoint::http::Status;
            ///
            /// // Obtain reason phrase
            /// assert_eq!(Status::NotModified.name(), "Not Modified");
            /// ```
            #[must_use]
            pub const fn name(&self) -> &'static str {
                match self {
                    $(Status::$name => $reason,)+
                }
            }
        }
    };
}

// ----------------------------------------------------------------------------

statuses! {
    100 Continue "Continue",
    101 SwitchingProtocols "Switching Protocols",
    103 EarlyHints "Early Hints",

    200 Ok "OK",
    201 Created "Created",
    202 Accepted "Accepted",
    203 NonAuthoritativeInformation "Non-Authoritative Information",
    204 NoContent "No Content",
    205 ResetContent "Reset Content",
    206 PartialContent "Partial Content",

    300 MultipleChoices "Multiple Choices",
    301 MovedPermanently "Moved Permanently",
    302 Found "Found",
    303 SeeOther "See Other",
    304 NotModified "Not Modified",
    307 TemporaryRedirect "Temporary Redirect",
    308 PermanentRedirect "Permanent Redirect",

    400 BadRequest "Bad Request",
    401 Unauthorized "Unauthorized",
    402 PaymentRequired "Payment Required",
    403 Forbidden "Forbidden",
    404 NotFound "Not Found",
    405 MethodNotAllowed "Method Not Allowed",
    406 NotAcceptable "Not Acceptable",
    407 ProxyAuthenticationRequired "Proxy Authentication Required",
    408 RequestTimeout "Request Timeout",
    409 Conflict "Conflict",
    410 Gone "Gone",
    411 LengthRequired "Length Required",
    412 PreconditionFailed "Precondition Failed",
    413 PayloadTooLarge "Payload Too Large",
    414 UriTooLong "URI Too Long",
    415 UnsupportedMediaType "Unsupported Media Type",
    416 RangeNotSatisfiable "Range Not Satisfiable",
    417 ExpectationFailed "Expectation Failed",
    418 ImATeapot "I'm a Teapot",
    421 MisdirectedRequest "Misdirected Request",
    422 UnprocessableEntity "Unprocessable Entity",
    425 TooEarly "Too Early",
    426 UpgradeRequired "Upgrade Required",
    428 PreconditionRequired "Precondition Required",
    429 TooManyRequests "Too Many Requests",
    431 RequestHeaderFieldsTooLarge "Request Header Fields Too Large",
    451 UnavailableForLegalReasons "Unavailable For Legal Reasons",

    500 InternalServerError "Internal Server Error",
    501 NotImplemented "Not Implemented",
    502 BadGateway "Bad Gateway",
    503 ServiceUnavailable "Service Unavailable",
    504 GatewayTimeout "Gateway Timeout",
    505 HttpVersionNotSupported "HTTP Version Not Supported",
    511 NetworkAuthenticationRequired "Network Authentication Required",
}
