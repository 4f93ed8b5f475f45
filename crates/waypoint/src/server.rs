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

//! HTTP server.

use crossbeam::channel::{self, Receiver, Sender};
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr, TcpListener};
use std::net::{TcpStream, ToSocketAddrs};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, Scope};
use std::time::Duration;

use super::handler::{Handler, TryIntoHandler};

mod builder;
mod connection;
mod error;

pub use builder::Builder;
use connection::Connection;
pub use error::{Error, Result};

// ----------------------------------------------------------------------------
// Structs
// ----------------------------------------------------------------------------

/// HTTP server.
///
/// The server accepts connections on one thread per bound address, and hands
/// them to a fixed pool of worker threads through a [`crossbeam`] channel.
/// Each worker serves one connection at a time, handling requests until the
/// client closes the connection, asks to close it, or stays silent for longer
/// than the configured timeout. The handler is shared by all workers.
///
/// Panics escaping the handler are caught at the connection boundary, which
/// closes the connection without an answer, but keeps the worker alive. Use
/// [`RecoverPanic`][] to answer with "500 Internal Server Error" instead.
///
/// [`RecoverPanic`]: crate::middleware::RecoverPanic
///
/// # Examples
///
/// ```no_run
/// # use std::error::Error;
/// # fn main() -> Result<(), Box<dyn Error>> {
/// use waypoint::http::response::{ResponseExt, ResponseWriter};
/// use waypoint::http::{Request, Status};
/// use waypoint::router::Router;
/// use waypoint::server::Server;
///
/// // Create router
/// let router = Router::default()
///     .get("/", |_: Request, res: &mut dyn ResponseWriter| {
///         res.text(Status::Ok, "Hello, world!");
///     });
///
/// // Create and run server
/// let server = Server::new(router, "127.0.0.1:8080")?;
/// server.run()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Server<H> {
    /// Handler for incoming requests.
    handler: H,
    /// Listeners for incoming connections.
    listeners: Vec<TcpListener>,
    /// Number of worker threads.
    workers: usize,
    /// Timeout for reads and writes.
    timeout: Duration,
    /// Shutdown flag, shared with handles.
    shutdown: Arc<AtomicBool>,
}

/// Server handle.
///
/// Handles can be cloned and sent to other threads, in order to shut down a
/// running server from the outside.
#[derive(Clone, Debug)]
pub struct Handle {
    /// Shutdown flag, shared with the server.
    shutdown: Arc<AtomicBool>,
    /// Addresses the server is listening on.
    addrs: Vec<SocketAddr>,
}

// ----------------------------------------------------------------------------
// Implementations
// ----------------------------------------------------------------------------

impl<H> Server<H>
where
    H: Handler,
{
    /// Creates a server listening on the given address.
    ///
    /// # Examples
    ///
    /// ```
    /// # use std::error::Error;
    /// # fn main() -> Result<(), Box<dyn Error>> {
    /// use waypoint::handler::NotFound;
    /// use waypoint::server::Server;
    ///
    /// // Create server on ephemeral port
    /// let server = Server::new(NotFound, "127.0.0.1:0")?;
    /// assert_eq!(server.local_addrs()?.len(), 1);
    /// # Ok(())
    /// # }
    /// ```
    #[inline]
    pub fn new<T, A>(handler: T, addr: A) -> Result<Self>
    where
        T: TryIntoHandler<Output = H>,
        A: ToSocketAddrs,
    {
        Self::builder(handler)?.bind(addr)?.listen()
    }

    /// Creates a server builder.
    ///
    /// # Examples
    ///
    /// ```
    /// # use std::error::Error;
    /// # fn main() -> Result<(), Box<dyn Error>> {
    /// use std::time::Duration;
    /// use waypoint::handler::NotFound;
    /// use waypoint::server::Server;
    ///
    /// // Create server builder
    /// let server = Server::builder(NotFound)?
    ///     .bind("127.0.0.1:0")?
    ///     .workers(2)
    ///     .timeout(Duration::from_secs(5))
    ///     .listen()?;
    /// # Ok(())
    /// # }
    /// ```
    #[inline]
    pub fn builder<T>(handler: T) -> Result<Builder<H>>
    where
        T: TryIntoHandler<Output = H>,
    {
        Builder::new(handler)
    }

    /// Returns the addresses the server is listening on.
    ///
    /// When binding to port `0`, the operating system picks a free port, which
    /// can be obtained from the returned addresses.
    pub fn local_addrs(&self) -> Result<Vec<SocketAddr>> {
        let iter = self.listeners.iter().map(TcpListener::local_addr);
        iter.collect::<std::io::Result<_>>().map_err(Into::into)
    }

    /// Returns a handle to shut down the server.
    pub fn handle(&self) -> Result<Handle> {
        self.local_addrs().map(|addrs| Handle {
            shutdown: Arc::clone(&self.shutdown),
            addrs,
        })
    }

    /// Runs the server until it's shut down.
    ///
    /// This method blocks the calling thread. Once a [`Handle`] requested the
    /// shutdown, no more connections are accepted, and the method returns as
    /// soon as the workers served their remaining connections.
    ///
    /// # Errors
    ///
    /// This method returns [`Error::Io`], if threads couldn't be spawned.
    pub fn run(self) -> Result {
        let (sender, receiver) = channel::unbounded::<TcpStream>();
        let handle = self.handle()?;

        // Spawn workers and acceptors in a scope, so that they can borrow the
        // handler, and the scope returns only after all threads finished
        thread::scope(|scope| {
            let spawned = spawn(scope, &self, &sender, &receiver);

            // Release our ends of the channel, and stop all threads that were
            // already spawned, if spawning failed midway
            drop(sender);
            drop(receiver);
            match &spawned {
                Ok(()) => tracing::info!(
                    addrs = ?handle.addrs,
                    workers = self.workers,
                    "listening"
                ),
                Err(_) => handle.shutdown(),
            }
            spawned
        })
    }
}

// ----------------------------------------------------------------------------

impl Handle {
    /// Requests the server to shut down.
    ///
    /// Acceptors block while waiting for connections, so each of them is woken
    /// up with a connection of its own, after the shutdown flag was set.
    ///
    /// # Examples
    ///
    /// ```
    /// # use std::error::Error;
    /// # fn main() -> Result<(), Box<dyn Error>> {
    /// use std::thread;
    /// use waypoint::handler::NotFound;
    /// use waypoint::server::Server;
    ///
    /// // Create server and obtain handle
    /// let server = Server::new(NotFound, "127.0.0.1:0")?;
    /// let handle = server.handle()?;
    ///
    /// // Run server and shut it down
    /// let thread = thread::spawn(move || server.run());
    /// handle.shutdown();
    /// thread.join().unwrap()?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn shutdown(&self) {
        self.shutdown.store(true, Ordering::Release);
        for addr in &self.addrs {
            let addr = reachable(*addr);
            if let Err(err) = TcpStream::connect(addr) {
                tracing::debug!(%addr, %err, "waking acceptor");
            }
        }
    }
}

// ----------------------------------------------------------------------------
// Functions
// ----------------------------------------------------------------------------

/// Spawns the worker and acceptor threads of the given server.
fn spawn<'scope, 'env, H>(
    scope: &'scope Scope<'scope, 'env>, server: &'env Server<H>,
    sender: &Sender<TcpStream>, receiver: &Receiver<TcpStream>,
) -> Result
where
    H: Handler,
{
    let handler = &server.handler;
    let timeout = server.timeout;
    for n in 0..server.workers {
        let receiver = receiver.clone();
        thread::Builder::new()
            .name(format!("waypoint-worker-{n}"))
            .spawn_scoped(scope, move || {
                for stream in receiver {
                    serve(stream, timeout, handler);
                }
            })?;
    }

    // Spawn one acceptor per listener, each holding a sender, so the channel
    // disconnects once all acceptors returned
    let shutdown = server.shutdown.as_ref();
    for listener in &server.listeners {
        let sender = sender.clone();
        thread::Builder::new()
            .name(String::from("waypoint-acceptor"))
            .spawn_scoped(scope, move || {
                accept(listener, &sender, shutdown);
            })?;
    }
    Ok(())
}

/// Serves the given connection until it's closed.
fn serve<H>(stream: TcpStream, timeout: Duration, handler: &H)
where
    H: Handler,
{
    match Connection::new(stream, timeout) {
        Ok(conn) => conn.serve(handler),
        Err(err) => tracing::warn!(%err, "connection setup"),
    }
}

/// Accepts connections and sends them to the workers until shutdown.
fn accept(
    listener: &TcpListener, sender: &Sender<TcpStream>, shutdown: &AtomicBool,
) {
    for stream in listener.incoming() {
        if shutdown.load(Ordering::Acquire) {
            break;
        }

        // Accept errors concern a single connection, e.g., when the client
        // reset it before we got to it, so we just log and carry on
        match stream {
            Ok(stream) => {
                if sender.send(stream).is_err() {
                    break;
                }
            }
            Err(err) => tracing::warn!(%err, "accept"),
        }
    }
}

/// Returns an address that can be connected to for the given local address.
///
/// Listeners bound to the unspecified address accept connections on all
/// interfaces, so we connect through the loopback interface instead.
fn reachable(addr: SocketAddr) -> SocketAddr {
    match addr.ip() {
        IpAddr::V4(ip) if ip.is_unspecified() => {
            SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), addr.port())
        }
        IpAddr::V6(ip) if ip.is_unspecified() => {
            SocketAddr::new(IpAddr::V6(Ipv6Addr::LOCALHOST), addr.port())
        }
        _ => addr,
    }
}
