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

//! HTTP request.

use std::borrow::Cow;
use std::fmt;
use std::net::SocketAddr;
use std::path::{Component, Path};
use std::str;

use crate::handler::matcher::Params;

use super::component::{Header, Method, Status, Version};
use super::Headers;

mod error;
mod uri;

pub use error::{Error, Result};
pub use uri::Uri;

// ----------------------------------------------------------------------------
// Constants
// ----------------------------------------------------------------------------

/// Maximum size of a request, including its body.
const MAX_REQUEST_SIZE: usize = 8 * 1024 * 1024;

/// Maximum length of the request target.
const MAX_URI_LENGTH: usize = 2 * 1024;

/// Maximum length of a single header value.
const MAX_HEADER_VALUE_LENGTH: usize = 4 * 1024;

/// Maximum number of headers per request.
const MAX_HEADERS: usize = 64;

// ----------------------------------------------------------------------------
// Structs
// ----------------------------------------------------------------------------

/// HTTP request.
///
/// Requests handed to a [`Handler`][] by the server are parsed from the bytes
/// read off a connection, and borrow from that buffer wherever possible. In
/// tests, requests are usually assembled with the builder methods instead,
/// starting from [`Request::new`].
///
/// Path parameters are filled in by the router once a route matched, and can
/// be obtained with [`Request::param`].
///
/// [`Handler`]: crate::handler::Handler
///
/// # Examples
///
/// ```
/// use waypoint::http::{Header, Method, Request};
///
/// // Assemble request
/// let req = Request::new()
///     .method(Method::Put)
///     .uri("/orders/7")
///     .header(Header::ContentType, "application/json")
///     .body(r#"{"size":"large"}"#);
/// ```
#[derive(Clone, Debug)]
pub struct Request<'a> {
    /// Request method.
    pub method: Method,
    /// Request URI, with percent-decoded path.
    pub uri: Uri<'a>,
    /// Request protocol version.
    pub version: Version,
    /// Request headers, limited to known header names.
    pub headers: Headers<'a>,
    /// Request body.
    pub body: Cow<'a, [u8]>,
    /// Peer address, if known.
    pub remote: Option<SocketAddr>,
    /// Path parameters of the matched route.
    pub params: Params,
}

// ----------------------------------------------------------------------------
// Implementations
// ----------------------------------------------------------------------------

impl<'a> Request<'a> {
    /// Creates an empty `GET /` request.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a single request from the given bytes, ignoring anything that
    /// follows it.
    ///
    /// # Errors
    ///
    /// See [`Request::parse`].
    ///
    /// # Examples
    ///
    /// ```
    /// # use std::error::Error;
    /// # fn main() -> Result<(), Box<dyn Error>> {
    /// use waypoint::http::{Method, Request};
    ///
    /// // Parse request
    /// let req = Request::from_bytes(b"DELETE /orders/7 HTTP/1.1\r\n\r\n")?;
    /// assert_eq!(req.method, Method::Delete);
    /// assert_eq!(req.uri.path, "/orders/7");
    /// # Ok(())
    /// # }
    /// ```
    #[inline]
    pub fn from_bytes(bytes: &'a [u8]) -> Result<Self> {
        Self::parse(bytes).map(|(req, _)| req)
    }

    /// Parses a request from the start of the given bytes, and returns it
    /// together with the number of bytes it spans.
    ///
    /// The head is parsed with [`httparse`], and the body is delimited by the
    /// `Content-Length` header, so pipelined requests on one connection can
    /// be consumed one after another. Chunked bodies are refused. Requests
    /// are checked against size limits, and paths containing `..` segments
    /// are refused, so handlers never see traversal attempts.
    ///
    /// # Errors
    ///
    /// - [`Error::Incomplete`]: more bytes are needed.
    /// - [`Error::Parser`]: the head is malformed.
    /// - [`Error::Component`]: the method or version is unknown.
    /// - [`Error::Validation`]: the request was refused, carrying the status
    ///   the client should be answered with.
    ///
    /// # Examples
    ///
    /// ```
    /// # use std::error::Error;
    /// # fn main() -> Result<(), Box<dyn Error>> {
    /// use waypoint::http::Request;
    ///
    /// // Parse request followed by the start of another one
    /// let bytes = b"POST /users HTTP/1.1\r\nContent-Length: 2\r\n\r\n{}GET";
    /// let (req, n) = Request::parse(bytes)?;
    /// assert_eq!(&req.body[..], b"{}");
    /// assert_eq!(&bytes[n..], b"GET");
    /// # Ok(())
    /// # }
    /// ```
    pub fn parse(bytes: &'a [u8]) -> Result<(Self, usize)> {
        if bytes.len() > MAX_REQUEST_SIZE {
            return Err(Error::Validation(Status::PayloadTooLarge));
        }

        // Parse request line and headers
        let mut raw = [httparse::EMPTY_HEADER; MAX_HEADERS];
        let mut head = httparse::Request::new(&mut raw);
        let start = match head.parse(bytes)? {
            httparse::Status::Complete(n) => n,
            httparse::Status::Partial => return Err(Error::Incomplete),
        };
        let (Some(method), Some(target), Some(version)) =
            (head.method, head.path, head.version)
        else {
            return Err(Error::Validation(Status::BadRequest));
        };

        // Convert and check all parts of the head
        let method = method.parse::<Method>()?;
        let version = Version::try_from(version)?;
        let uri = target_of(target)?;
        let headers = headers_of(head.headers)?;

        // Delimit body, waiting for the rest of it if necessary
        let end = start.saturating_add(content_length(&headers)?);
        if end > MAX_REQUEST_SIZE {
            return Err(Error::Validation(Status::PayloadTooLarge));
        }
        let Some(body) = bytes.get(start..end) else {
            return Err(Error::Incomplete);
        };

        // Assemble request
        let req = Request {
            method,
            uri,
            version,
            headers,
            body: Cow::Borrowed(body),
            remote: None,
            params: Params::default(),
        };
        Ok((req, end))
    }

    /// Returns the value of the given path parameter.
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
    /// // Create router with parameterized route
    /// let router = Router::default()
    ///     .get("/coffee/{kind}", |req: Request, res: &mut dyn ResponseWriter| {
    ///         let kind = req.param("kind").unwrap_or("unknown");
    ///         res.text(Status::Ok, kind);
    ///     })
    ///     .try_into_handler()?;
    ///
    /// // Parameters are extracted from the path
    /// let res = router.respond(Request::new().uri("/coffee/arabica"));
    /// assert_eq!(res.body(), b"arabica");
    /// # Ok(())
    /// # }
    /// ```
    #[inline]
    #[must_use]
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.get(key)
    }

    /// Returns whether the connection should stay open after this request.
    ///
    /// An explicit `Connection` header decides, and otherwise the version:
    /// HTTP/1.1 connections persist, HTTP/1.0 connections don't.
    #[must_use]
    pub fn keep_alive(&self) -> bool {
        match self.headers.get(Header::Connection) {
            Some(value) if value.eq_ignore_ascii_case("close") => false,
            Some(value) if value.eq_ignore_ascii_case("keep-alive") => true,
            _ => self.version.is_persistent(),
        }
    }
}

#[allow(clippy::needless_pass_by_value)]
impl<'a> Request<'a> {
    /// Sets the method.
    #[inline]
    #[must_use]
    pub fn method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    /// Sets the URI, splitting off the query.
    ///
    /// # Examples
    ///
    /// ```
    /// use waypoint::http::Request;
    ///
    /// // Set URI with query
    /// let req = Request::new().uri("/search?q=coffee");
    /// assert_eq!(req.uri.path, "/search");
    /// assert_eq!(req.uri.query.as_deref(), Some("q=coffee"));
    /// ```
    #[inline]
    #[must_use]
    pub fn uri<U>(mut self, uri: U) -> Self
    where
        U: Into<Uri<'a>>,
    {
        self.uri = uri.into();
        self
    }

    /// Sets the protocol version.
    #[inline]
    #[must_use]
    pub fn version(mut self, version: Version) -> Self {
        self.version = version;
        self
    }

    /// Sets a header, replacing an earlier value of the same header.
    ///
    /// # Examples
    ///
    /// ```
    /// use waypoint::http::{Header, Request};
    ///
    /// // Set header twice
    /// let req = Request::new()
    ///     .header(Header::Accept, "text/plain")
    ///     .header(Header::Accept, "text/html");
    /// assert_eq!(req.headers.get(Header::Accept), Some("text/html"));
    /// ```
    #[inline]
    #[must_use]
    pub fn header<V>(mut self, header: Header, value: V) -> Self
    where
        V: ToString,
    {
        self.headers.insert(header, value.to_string());
        self
    }

    /// Sets the body.
    #[inline]
    #[must_use]
    pub fn body<B>(mut self, body: B) -> Self
    where
        B: Into<Vec<u8>>,
    {
        self.body = Cow::Owned(body.into());
        self
    }

    /// Sets the peer address.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::net::SocketAddr;
    /// use waypoint::http::Request;
    ///
    /// // Set peer address
    /// let addr: SocketAddr = "192.0.2.1:1234".parse().unwrap();
    /// let req = Request::new().remote(addr);
    /// assert_eq!(req.remote, Some(addr));
    /// ```
    #[inline]
    #[must_use]
    pub fn remote(mut self, addr: SocketAddr) -> Self {
        self.remote = Some(addr);
        self
    }
}

// ----------------------------------------------------------------------------
// Trait implementations
// ----------------------------------------------------------------------------

impl Default for Request<'_> {
    fn default() -> Self {
        Self {
            method: Method::Get,
            uri: Uri::default(),
            version: Version::default(),
            headers: Headers::default(),
            body: Cow::Borrowed(&[]),
            remote: None,
            params: Params::default(),
        }
    }
}

// ----------------------------------------------------------------------------

impl fmt::Display for Request<'_> {
    /// Formats the request head, followed by the size of the body.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "{} {} {}\r", self.method, self.uri, self.version)?;
        writeln!(f, "{}\r", self.headers)?;
        writeln!(f, "[{} bytes]\r", self.body.len())
    }
}

// ----------------------------------------------------------------------------
// Functions
// ----------------------------------------------------------------------------

/// Converts and checks the request target.
///
/// Only origin-form targets are accepted, as proxying isn't supported, and
/// decoded paths must not contain `..` segments.
fn target_of(target: &str) -> Result<Uri<'_>> {
    if target.len() > MAX_URI_LENGTH {
        return Err(Error::Validation(Status::UriTooLong));
    }
    let uri = Uri::from(target);
    if !uri.path.starts_with('/') {
        return Err(Error::Validation(Status::BadRequest));
    }

    // Only inspect components if a traversal is possible at all
    let path = Path::new(uri.path.as_ref());
    if uri.path.contains("..")
        && path.components().any(|part| part == Component::ParentDir)
    {
        return Err(Error::Validation(Status::BadRequest));
    }
    Ok(uri)
}

/// Converts the parsed headers, dropping unknown names and values that aren't
/// valid UTF-8.
fn headers_of<'a>(raw: &[httparse::Header<'a>]) -> Result<Headers<'a>> {
    let mut headers = Headers::new();
    for header in raw.iter().take_while(|header| !header.name.is_empty()) {
        if header.value.len() > MAX_HEADER_VALUE_LENGTH {
            let status = Status::RequestHeaderFieldsTooLarge;
            return Err(Error::Validation(status));
        }
        let (Ok(name), Ok(value)) =
            (header.name.parse::<Header>(), str::from_utf8(header.value))
        else {
            continue;
        };
        headers.insert(name, value);
    }
    Ok(headers)
}

/// Returns the length of the body announced in the given headers.
fn content_length(headers: &Headers) -> Result<usize> {
    if headers.contains(Header::TransferEncoding) {
        return Err(Error::Validation(Status::NotImplemented));
    }
    headers.get(Header::ContentLength).map_or(Ok(0), |value| {
        value
            .trim()
            .parse()
            .map_err(|_| Error::Validation(Status::BadRequest))
    })
}
