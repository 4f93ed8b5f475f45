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

//! Server integration tests.

use std::io::{Read, Write};
use std::net::{SocketAddr, TcpStream};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use waypoint::handler::TryIntoHandler;
use waypoint::http::response::{ResponseExt, ResponseWriter};
use waypoint::http::{Header, Request, Status};
use waypoint::middleware::RecoverPanic;
use waypoint::router::Router;
use waypoint::server::{self, Handle, Server};

// ----------------------------------------------------------------------------
// Helpers
// ----------------------------------------------------------------------------

/// Running server.
struct Running {
    addr: SocketAddr,
    handle: Handle,
    thread: JoinHandle<server::Result>,
}

impl Running {
    /// Sends raw bytes and reads until the server closes the connection.
    fn exchange(&self, request: &str) -> String {
        let mut stream = TcpStream::connect(self.addr).unwrap();
        stream.set_read_timeout(Some(Duration::from_secs(5))).unwrap();
        stream.write_all(request.as_bytes()).unwrap();
        let mut buffer = Vec::new();
        stream.read_to_end(&mut buffer).unwrap();
        String::from_utf8_lossy(&buffer).into_owned()
    }

    /// Shuts the server down and waits for it to return.
    fn stop(self) {
        self.handle.shutdown();
        self.thread.join().unwrap().unwrap();
    }
}

/// Starts a server for the given router on an ephemeral port.
fn start(router: Router) -> Running {
    let server = Server::builder(router)
        .unwrap()
        .bind("127.0.0.1:0")
        .unwrap()
        .workers(2)
        .timeout(Duration::from_secs(5))
        .listen()
        .unwrap();

    let addr = server.local_addrs().unwrap()[0];
    let handle = server.handle().unwrap();
    let thread = thread::spawn(move || server.run());
    Running { addr, handle, thread }
}

/// Handler that panics unconditionally.
fn explode(_: Request, _: &mut dyn ResponseWriter) {
    panic!("boom");
}

/// Handler that sets framing headers for a body it never writes.
fn explode_dirty(_: Request, res: &mut dyn ResponseWriter) {
    let headers = res.headers_mut();
    headers.insert(Header::ContentType, "application/json");
    headers.insert(Header::ContentLength, "1000");
    panic!("dirty boom");
}

/// Creates the router shared by most tests.
fn app() -> Router {
    Router::default()
        .get("/hello", |_: Request, res: &mut dyn ResponseWriter| {
            res.text(Status::Ok, "Hello, world!");
        })
        .post("/echo", |req: Request, res: &mut dyn ResponseWriter| {
            res.write(&req.body);
        })
        .get("/stale", |_: Request, res: &mut dyn ResponseWriter| {
            res.headers_mut().insert(Header::ContentLength, "1000");
            res.text(Status::Ok, "ok");
        })
        .get("/panic", explode)
        .group("/safe", |safe| {
            safe.with(RecoverPanic)
                .get("/panic", explode)
                .get("/dirty", explode_dirty)
        })
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[test]
fn serves_requests() {
    let server = start(app());

    let res = server.exchange(
        "GET /hello HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n",
    );
    assert!(res.starts_with("HTTP/1.1 200 OK\r\n"), "{res}");
    assert!(res.contains("Content-Length: 13\r\n"), "{res}");
    assert!(res.contains("Connection: close\r\n"), "{res}");
    assert!(res.ends_with("\r\n\r\nHello, world!"), "{res}");
    server.stop();
}

#[test]
fn reads_request_body() {
    let server = start(app());

    let res = server.exchange(
        "POST /echo HTTP/1.1\r\nContent-Length: 5\r\nConnection: close\r\n\r\n\
         hello",
    );
    assert!(res.starts_with("HTTP/1.1 200 OK\r\n"), "{res}");
    assert!(res.ends_with("\r\n\r\nhello"), "{res}");
    server.stop();
}

#[test]
fn keeps_connection_alive() {
    let server = start(app());

    // Both requests are pipelined on a single connection, and only the last
    // one asks the server to close it
    let res = server.exchange(concat!(
        "GET /hello HTTP/1.1\r\n\r\n",
        "GET /missing HTTP/1.1\r\nConnection: close\r\n\r\n",
    ));
    assert_eq!(res.matches("HTTP/1.1 ").count(), 2, "{res}");
    assert!(res.starts_with("HTTP/1.1 200 OK\r\n"), "{res}");
    assert!(res.contains("HTTP/1.1 404 Not Found\r\n"), "{res}");
    server.stop();
}

#[test]
fn omits_body_for_head() {
    let server = start(app());

    let res = server
        .exchange("HEAD /hello HTTP/1.1\r\nConnection: close\r\n\r\n");
    assert!(res.starts_with("HTTP/1.1 200 OK\r\n"), "{res}");
    assert!(res.contains("Content-Length: 13\r\n"), "{res}");
    assert!(res.ends_with("\r\n\r\n"), "{res}");
    server.stop();
}

#[test]
fn rejects_malformed_requests() {
    let server = start(app());

    let res = server.exchange("BREW /hello HTTP/1.1\r\n\r\n");
    assert!(res.starts_with("HTTP/1.1 501 Not Implemented\r\n"), "{res}");

    let res = server.exchange("GET /../etc/passwd HTTP/1.1\r\n\r\n");
    assert!(res.starts_with("HTTP/1.1 400 Bad Request\r\n"), "{res}");
    server.stop();
}

#[test]
fn survives_panics() {
    let server = start(app());

    // Without recovery, the connection is closed without an answer
    let res =
        server.exchange("GET /panic HTTP/1.1\r\nConnection: close\r\n\r\n");
    assert!(res.is_empty(), "{res}");

    // With recovery, the client receives an error
    let res = server
        .exchange("GET /safe/panic HTTP/1.1\r\nConnection: close\r\n\r\n");
    assert!(res.starts_with("HTTP/1.1 500 Internal Server Error\r\n"));

    // The server keeps serving either way
    let res =
        server.exchange("GET /hello HTTP/1.1\r\nConnection: close\r\n\r\n");
    assert!(res.starts_with("HTTP/1.1 200 OK\r\n"), "{res}");
    server.stop();
}

#[test]
fn frames_recovered_panics_by_error_body() {
    let server = start(app());

    // The handler set framing headers before panicking, which must not leak
    // into the error, or the pipelined request would be swallowed
    let res = server.exchange(concat!(
        "GET /safe/dirty HTTP/1.1\r\n\r\n",
        "GET /hello HTTP/1.1\r\nConnection: close\r\n\r\n",
    ));
    assert_eq!(res.matches("HTTP/1.1 ").count(), 2, "{res}");
    assert!(res.starts_with("HTTP/1.1 500 Internal Server Error\r\n"));
    assert!(res.contains("Content-Length: 21\r\n"), "{res}");
    assert!(res.contains("Content-Type: text/plain; charset=utf-8\r\n"));
    assert!(!res.contains("application/json"), "{res}");
    assert!(res.ends_with("\r\n\r\nHello, world!"), "{res}");
    server.stop();
}

#[test]
fn derives_content_length_from_body() {
    let server = start(app());

    let res =
        server.exchange("GET /stale HTTP/1.1\r\nConnection: close\r\n\r\n");
    assert!(res.contains("Content-Length: 2\r\n"), "{res}");
    assert!(res.ends_with("\r\n\r\nok"), "{res}");
    server.stop();
}

#[test]
fn refuses_conflicting_router() {
    let router = Router::default()
        .get("/{a}", |_: Request, _: &mut dyn ResponseWriter| {})
        .get("/{b}", |_: Request, _: &mut dyn ResponseWriter| {});

    let result = Server::new(router, "127.0.0.1:0");
    assert!(matches!(result, Err(server::Error::Handler(_))));
}

#[test]
fn refuses_missing_address() {
    let result = Server::builder(Router::default().try_into_handler().unwrap())
        .unwrap()
        .listen();
    assert!(matches!(result, Err(server::Error::NoAddress)));
}
