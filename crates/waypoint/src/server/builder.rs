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

//! HTTP server builder.

use std::net::{SocketAddr, TcpListener, ToSocketAddrs};
use std::num::NonZeroUsize;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crate::handler::{Handler, TryIntoHandler};

use super::{Error, Result, Server};

// ----------------------------------------------------------------------------
// Constants
// ----------------------------------------------------------------------------

/// Default timeout for reads and writes.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Number of workers, if the available parallelism can't be determined.
const FALLBACK_WORKERS: usize = 4;

// ----------------------------------------------------------------------------
// Structs
// ----------------------------------------------------------------------------

/// HTTP server builder.
#[derive(Debug)]
pub struct Builder<H> {
    /// Handler for incoming requests.
    handler: H,
    /// Socket addresses to bind to.
    addrs: Vec<SocketAddr>,
    /// Number of worker threads.
    workers: usize,
    /// Timeout for reads and writes.
    timeout: Duration,
}

// ----------------------------------------------------------------------------
// Implementations
// ----------------------------------------------------------------------------

impl<H> Builder<H>
where
    H: Handler,
{
    /// Creates a server builder, converting the given handler right away.
    ///
    /// Routers are sealed at this point, so registration errors surface here
    /// and not once the server is running. [`Server::new`] is a shortcut for
    /// servers listening on a single address.
    ///
    /// # Errors
    ///
    /// This method returns [`Error::Handler`], if the handler couldn't be
    /// converted, e.g., because a router has conflicting routes.
    ///
    /// # Examples
    ///
    /// ```
    /// # use std::error::Error;
    /// # fn main() -> Result<(), Box<dyn Error>> {
    /// use waypoint::handler::NotFound;
    /// use waypoint::server::Builder;
    ///
    /// // Create server builder answering every request with 404
    /// let builder = Builder::new(NotFound)?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn new<T>(handler: T) -> Result<Self>
    where
        T: TryIntoHandler<Output = H>,
    {
        let workers = thread::available_parallelism()
            .map_or(FALLBACK_WORKERS, NonZeroUsize::get);
        handler
            .try_into_handler()
            .map_err(Into::into)
            .map(|handler| Self {
                handler,
                addrs: Vec::new(),
                workers,
                timeout: DEFAULT_TIMEOUT,
            })
    }

    /// Adds a socket address to bind to.
    ///
    /// # Examples
    ///
    /// ```
    /// # use std::error::Error;
    /// # fn main() -> Result<(), Box<dyn Error>> {
    /// use waypoint::handler::NotFound;
    /// use waypoint::server::Builder;
    ///
    /// // Create server builder and add address
    /// let builder = Builder::new(NotFound)?.bind("127.0.0.1:8080")?;
    /// # Ok(())
    /// # }
    /// ```
    #[inline]
    pub fn bind<A>(mut self, addr: A) -> Result<Self>
    where
        A: ToSocketAddrs,
    {
        // Skip duplicates, as binding twice to one address fails
        for addr in addr.to_socket_addrs()? {
            if !self.addrs.contains(&addr) {
                self.addrs.push(addr);
            }
        }
        Ok(self)
    }

    /// Sets the number of worker threads, which is at least one.
    ///
    /// Defaults to the available parallelism of the machine.
    #[must_use]
    pub fn workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    /// Sets the timeout for reads and writes, which defaults to 30 seconds.
    ///
    /// Idle keep-alive connections are closed once the timeout elapsed.
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Creates the server and binds to the configured addresses.
    ///
    /// # Errors
    ///
    /// This method returns [`Error::NoAddress`], if no address was added, and
    /// [`Error::Io`], if binding to any of the addresses failed.
    ///
    /// # Examples
    ///
    /// ```
    /// # use std::error::Error;
    /// # fn main() -> Result<(), Box<dyn Error>> {
    /// use waypoint::handler::NotFound;
    /// use waypoint::server::Builder;
    ///
    /// // Create server builder and bind to address
    /// let server = Builder::new(NotFound)?
    ///     .bind("127.0.0.1:0")?
    ///     .listen()?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn listen(self) -> Result<Server<H>> {
        if self.addrs.is_empty() {
            return Err(Error::NoAddress);
        }

        // Bind listeners to all configured addresses
        let iter = self.addrs.iter().map(TcpListener::bind);
        let listeners = iter.collect::<std::io::Result<Vec<_>>>()?;
        Ok(Server {
            handler: self.handler,
            listeners,
            workers: self.workers,
            timeout: self.timeout,
            shutdown: Arc::new(AtomicBool::new(false)),
        })
    }
}
