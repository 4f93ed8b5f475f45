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

//! Middleware integration tests.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use waypoint::handler::{Handler, NotFound, TryIntoHandler};
use waypoint::http::response::{ResponseExt, ResponseWriter};
use waypoint::http::{Header, Method, Request, Response, Status};
use waypoint::middleware::log::{mask, Entry, Tracing};
use waypoint::middleware::{
    Middleware, RecoverPanic, RequestLogger, StripTrailingSlashes,
};
use waypoint::router::Router;

// ----------------------------------------------------------------------------
// Helpers
// ----------------------------------------------------------------------------

/// Shared record of log entries.
type Entries = Arc<Mutex<Vec<Entry>>>;

/// Creates a logger collecting entries in memory.
fn collect(entries: &Entries) -> RequestLogger {
    let entries = Arc::clone(entries);
    RequestLogger::new().sink(move |entry: &Entry| {
        entries.lock().unwrap().push(entry.clone());
    })
}

/// Returns the single recorded entry.
fn single(entries: &Entries) -> Entry {
    let entries = entries.lock().unwrap();
    assert_eq!(entries.len(), 1);
    entries[0].clone()
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

/// Handler that commits a status and panics afterwards.
fn explode_late(_: Request, res: &mut dyn ResponseWriter) {
    res.text(Status::Accepted, "partial");
    panic!("late boom");
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[test]
fn logger_records_first_status() {
    let entries = Entries::default();
    let router = Router::default()
        .with(collect(&entries))
        .post("/items", |_: Request, res: &mut dyn ResponseWriter| {
            res.write_status(Status::Created);
            res.write_status(Status::NotFound);
            res.write(b"created");
        })
        .try_into_handler()
        .unwrap();

    let res = router.respond(Request::new().method(Method::Post).uri("/items"));
    assert_eq!(res.status(), Status::Created);
    assert_eq!(res.body(), b"created");

    let entry = single(&entries);
    assert_eq!(entry.method, Method::Post);
    assert_eq!(entry.path, "/items");
    assert_eq!(entry.status, Status::Created);
}

#[test]
fn logger_records_implicit_ok() {
    let entries = Entries::default();
    let router = Router::default()
        .with(collect(&entries))
        .get("/", |_: Request, res: &mut dyn ResponseWriter| {
            res.write(b"hello");
        })
        .try_into_handler()
        .unwrap();

    router.respond(Request::new().uri("/"));
    assert_eq!(single(&entries).status, Status::Ok);
}

#[test]
fn logger_discards_headers_after_commit() {
    let router = Router::default()
        .get("/", |_: Request, res: &mut dyn ResponseWriter| {
            res.write_status(Status::NoContent);
            res.headers_mut().insert(Header::XRequestId, "late");
        })
        .try_into_handler()
        .unwrap();

    let res = router.respond(Request::new().uri("/"));
    assert_eq!(res.status(), Status::NoContent);
    assert_eq!(res.headers().get(Header::XRequestId), None);
}

#[test]
fn logger_records_request_details() {
    let entries = Entries::default();
    let remote: SocketAddr = "10.0.0.9:4711".parse().unwrap();
    let router = Router::default()
        .with(collect(&entries).headers(true))
        .get("/", |_: Request, res: &mut dyn ResponseWriter| {
            res.error(Status::ImATeapot);
        })
        .try_into_handler()
        .unwrap();

    router.respond(
        Request::new()
            .uri("/?brew=1")
            .header(Header::UserAgent, "curl/8.0")
            .remote(remote),
    );

    let entry = single(&entries);
    assert_eq!(entry.status, Status::ImATeapot);
    assert_eq!(entry.user_agent.as_deref(), Some("curl/8.0"));
    assert_eq!(entry.remote_address.as_deref(), Some("10.0.0.9"));
    assert_eq!(entry.headers, [(Header::UserAgent, String::from("curl/8.0"))]);
    assert_eq!(entry.body, None);
}

#[test]
fn logger_prefers_proxy_addresses() {
    let entries = Entries::default();
    let remote: SocketAddr = "10.0.0.9:4711".parse().unwrap();
    let router = Router::default()
        .with(collect(&entries))
        .get("/", |_: Request, _: &mut dyn ResponseWriter| {})
        .try_into_handler()
        .unwrap();

    // X-Real-IP takes precedence over everything else
    router.respond(
        Request::new()
            .uri("/")
            .header(Header::XRealIp, "192.0.2.1")
            .header(Header::XForwardedFor, "198.51.100.7, 10.0.0.1")
            .remote(remote),
    );

    // X-Forwarded-For takes precedence over the peer address
    router.respond(
        Request::new()
            .uri("/")
            .header(Header::XForwardedFor, "198.51.100.7, 10.0.0.1")
            .remote(remote),
    );

    // Without proxy headers, the peer address is used
    router.respond(Request::new().uri("/").remote(remote));

    let entries = entries.lock().unwrap();
    let addresses: Vec<_> = entries
        .iter()
        .map(|entry| entry.remote_address.as_deref().unwrap_or_default())
        .collect();
    assert_eq!(addresses, ["192.0.2.1", "198.51.100.7", "10.0.0.9"]);
}

#[test]
fn logger_masks_body_fields() {
    let entries = Entries::default();
    let router = Router::default()
        .with(collect(&entries).body(true).mask(["password"]))
        .post("/login", |_: Request, _: &mut dyn ResponseWriter| {})
        .try_into_handler()
        .unwrap();

    router.respond(
        Request::new()
            .method(Method::Post)
            .uri("/login")
            .body(r#"{"user":"jane","password":"hunter2"}"#),
    );

    let entry = single(&entries);
    assert_eq!(
        entry.body.as_deref(),
        Some(r#"{"password":"*","user":"jane"}"#)
    );
}

#[test]
fn logger_keeps_unmasked_body_verbatim() {
    let entries = Entries::default();
    let router = Router::default()
        .with(collect(&entries).body(true))
        .post("/notes", |_: Request, _: &mut dyn ResponseWriter| {})
        .try_into_handler()
        .unwrap();

    router.respond(
        Request::new()
            .method(Method::Post)
            .uri("/notes")
            .body("plain text, not json"),
    );
    assert_eq!(single(&entries).body.as_deref(), Some("plain text, not json"));
}

#[test]
fn mask_leaves_invalid_json_untouched() {
    let data = b"{not json";
    assert_eq!(&*mask(data, &["password"]), data);

    // Fields that aren't present are left alone
    let data = br#"{"user":"jane"}"#;
    assert_eq!(&*mask(data, &["password"]), br#"{"user":"jane"}"#);
}

#[test]
fn logger_emits_through_tracing() {
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .with_test_writer()
        .finish();

    tracing::subscriber::with_default(subscriber, || {
        let router = Router::default()
            .with(RequestLogger::new().sink(Tracing))
            .get("/", |_: Request, res: &mut dyn ResponseWriter| {
                res.error(Status::InternalServerError);
            })
            .try_into_handler()
            .unwrap();

        let res = router.respond(Request::new().uri("/"));
        assert_eq!(res.status(), Status::InternalServerError);
    });
}

#[test]
fn recover_answers_panics_with_500() {
    let router = Router::default()
        .with(RecoverPanic)
        .get("/boom", explode)
        .get("/ok", |_: Request, res: &mut dyn ResponseWriter| {
            res.text(Status::Ok, "still here");
        })
        .try_into_handler()
        .unwrap();

    let res = router.respond(Request::new().uri("/boom"));
    assert_eq!(res.status(), Status::InternalServerError);

    // Subsequent requests are served normally
    let res = router.respond(Request::new().uri("/ok"));
    assert_eq!(res.status(), Status::Ok);
    assert_eq!(res.body(), b"still here");
}

#[test]
fn recover_keeps_committed_status() {
    let router = Router::default()
        .with(RecoverPanic)
        .get("/", explode_late)
        .try_into_handler()
        .unwrap();

    let res = router.respond(Request::new().uri("/"));
    assert_eq!(res.status(), Status::Accepted);
}

#[test]
fn recover_discards_headers_set_before_panic() {
    let router = Router::default()
        .with(RecoverPanic)
        .get("/", explode_dirty)
        .try_into_handler()
        .unwrap();

    let res = router.respond(Request::new().uri("/"));
    assert_eq!(res.status(), Status::InternalServerError);
    assert_eq!(res.body(), b"Internal Server Error");
    assert_eq!(
        res.headers().get(Header::ContentType),
        Some("text/plain; charset=utf-8")
    );
    assert_eq!(res.headers().get(Header::ContentLength), None);

    // Serialized response is framed by the error body
    let bytes = String::from_utf8(res.into_bytes()).unwrap();
    assert!(bytes.contains("Content-Length: 21\r\n"));
    assert!(!bytes.contains("1000"));
}

#[test]
fn recover_lets_outer_logger_observe_500() {
    let entries = Entries::default();
    let router = Router::default()
        .with(collect(&entries))
        .with(RecoverPanic)
        .get("/", explode)
        .try_into_handler()
        .unwrap();

    router.respond(Request::new().uri("/"));
    assert_eq!(single(&entries).status, Status::InternalServerError);
}

#[test]
fn trailing_slashes_redirect_with_query() {
    let router = Router::default()
        .with(StripTrailingSlashes)
        .get("/coffee", |_: Request, res: &mut dyn ResponseWriter| {
            res.text(Status::Ok, "coffee");
        })
        .try_into_handler()
        .unwrap();

    let res = router.respond(Request::new().uri("/coffee/?size=large"));
    assert_eq!(res.status(), Status::MovedPermanently);
    assert_eq!(res.headers().get(Header::Location), Some("/coffee?size=large"));

    let res = router.respond(Request::new().uri("/coffee?size=large"));
    assert_eq!(res.status(), Status::Ok);
}

#[test]
fn trailing_slashes_collapse_leading_slashes() {
    let router = Router::default()
        .with(StripTrailingSlashes)
        .not_found(|_: Request, res: &mut dyn ResponseWriter| {
            res.error(Status::NotFound);
        })
        .try_into_handler()
        .unwrap();

    // Locations never become protocol-relative
    for uri in ["//evil.com/", "/%2Fevil.com/", "///evil.com//?a=1"] {
        let res = router.respond(Request::new().uri(uri));
        assert_eq!(res.status(), Status::MovedPermanently);
        let location = res.headers().get(Header::Location).unwrap();
        assert!(location.starts_with("/evil.com"), "{uri} -> {location}");
    }
    let res = router.respond(Request::new().uri("///evil.com//?a=1"));
    assert_eq!(res.headers().get(Header::Location), Some("/evil.com?a=1"));
}

#[test]
fn trailing_slashes_encode_backslashes() {
    let mut res = Response::new();
    let req = Request::new().uri("/%5Cevil.com/");
    StripTrailingSlashes.process(req, &mut res, &NotFound);
    assert_eq!(res.status(), Status::MovedPermanently);
    assert_eq!(res.headers().get(Header::Location), Some("/%5Cevil.com"));
}

#[test]
fn trailing_slashes_normalize_catch_all_routes() {
    let router = Router::default()
        .with(StripTrailingSlashes)
        .get("/{*path}", |req: Request, res: &mut dyn ResponseWriter| {
            res.text(Status::Ok, req.uri.path.to_string());
        })
        .try_into_handler()
        .unwrap();

    let res = router.respond(Request::new().uri("/docs/./guide/"));
    assert_eq!(res.status(), Status::MovedPermanently);
    assert_eq!(res.headers().get(Header::Location), Some("/docs/guide"));
}

#[test]
fn trailing_slashes_leave_root_alone() {
    let handler = |_: Request, res: &mut dyn ResponseWriter| {
        res.text(Status::Ok, "root");
    };
    let next: &dyn Handler = &handler;

    let mut res = Response::new();
    StripTrailingSlashes.process(Request::new().uri("/"), &mut res, next);
    assert_eq!(res.status(), Status::Ok);
    assert_eq!(res.body(), b"root");
}
