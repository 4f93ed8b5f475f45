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

//! HTTP connection.

use std::io::{self, ErrorKind, Read, Write};
use std::net::{SocketAddr, TcpStream};
use std::panic::{self, AssertUnwindSafe};
use std::time::Duration;

use crate::handler::Handler;
use crate::http::request::Error;
use crate::http::response::ResponseExt;
use crate::http::{Method, Request, Response};
use crate::middleware::message;

// ----------------------------------------------------------------------------
// Structs
// ----------------------------------------------------------------------------

/// HTTP connection.
///
/// Connections are served by a single worker, reading requests into a buffer
/// and answering them in order. Bytes following a request remain buffered, as
/// they belong to the next request.
#[derive(Debug)]
pub struct Connection {
    /// TCP socket.
    socket: TcpStream,
    /// Peer address.
    remote: Option<SocketAddr>,
    /// Read buffer.
    buffer: Vec<u8>,
}

// ----------------------------------------------------------------------------
// Implementations
// ----------------------------------------------------------------------------

impl Connection {
    /// Creates a connection, applying the given timeout to reads and writes.
    pub fn new(socket: TcpStream, timeout: Duration) -> io::Result<Self> {
        socket.set_read_timeout(Some(timeout))?;
        socket.set_write_timeout(Some(timeout))?;
        let remote = socket.peer_addr().ok();
        Ok(Self { socket, remote, buffer: Vec::new() })
    }

    /// Serves requests until the connection is closed.
    pub fn serve<H>(mut self, handler: &H)
    where
        H: Handler + ?Sized,
    {
        loop {
            match self.next(handler) {
                Ok(true) => {}
                Ok(false) => break,
                Err(err) => {
                    match err.kind() {
                        ErrorKind::ConnectionReset
                        | ErrorKind::ConnectionAborted
                        | ErrorKind::BrokenPipe
                        | ErrorKind::UnexpectedEof
                        | ErrorKind::WouldBlock
                        | ErrorKind::TimedOut => {
                            // All of those are expected errors, e.g., when an
                            // idle connection times out
                            tracing::debug!(%err, "connection closed");
                        }
                        _ => tracing::warn!(%err, "connection error"),
                    }
                    break;
                }
            }
        }
    }

    /// Reads and answers the next request.
    ///
    /// Returns whether the connection should be kept open afterwards.
    fn next<H>(&mut self, handler: &H) -> io::Result<bool>
    where
        H: Handler + ?Sized,
    {
        let mut temp = [0u8; 4096];
        loop {
            if !self.buffer.is_empty() {
                match Request::parse(&self.buffer) {
                    Ok((mut req, n)) => {
                        req.remote = self.remote;
                        let method = req.method;
                        let keep_alive = req.keep_alive();

                        // Handle request, closing the connection without an
                        // answer if the handler panics, as the state of the
                        // response is unknown at this point
                        let mut res = Response::new();
                        let result = panic::catch_unwind(AssertUnwindSafe(
                            || handler.handle(req, &mut res),
                        ));
                        if let Err(payload) = result {
                            tracing::error!(
                                panic = message(&*payload),
                                "panic escaped handler, closing connection"
                            );
                            return Ok(false);
                        }

                        // Write response and discard request from buffer
                        res.prepare(method, keep_alive);
                        self.socket.write_all(&res.into_bytes())?;
                        self.buffer.drain(..n);
                        return Ok(keep_alive);
                    }

                    // Request is incomplete, so we need to read more data
                    Err(Error::Incomplete) => {}

                    // Request is malformed, so we answer with an error and
                    // close the connection, as we can't tell where it ends
                    Err(err) => {
                        tracing::debug!(%err, "invalid request");
                        let mut res = Response::new();
                        res.error(err.status());
                        res.prepare(Method::Get, false);
                        self.socket.write_all(&res.into_bytes())?;
                        return Ok(false);
                    }
                }
            }

            // Read more data, which is the end of the connection if the peer
            // closed it, but an error if it did so mid-request
            let n = self.socket.read(&mut temp)?;
            if n == 0 {
                if self.buffer.is_empty() {
                    return Ok(false);
                }
                return Err(ErrorKind::UnexpectedEof.into());
            }
            self.buffer.extend_from_slice(&temp[..n]);
        }
    }
}
