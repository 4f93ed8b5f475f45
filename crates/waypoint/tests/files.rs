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

//! Static file integration tests.

use std::fs;
use std::time::{Duration, SystemTime};

use httpdate::fmt_http_date;
use tempfile::TempDir;
use waypoint::handler::{FileServer, Handler, TryIntoHandler};
use waypoint::http::{Header, Method, Request, Status};
use waypoint::router::Router;

// ----------------------------------------------------------------------------
// Helpers
// ----------------------------------------------------------------------------

/// Creates a directory with a small site.
fn site() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("index.html"), "<h1>Home</h1>").unwrap();
    fs::write(dir.path().join("app.css"), "body { margin: 0 }").unwrap();
    fs::write(dir.path().join("data.bin"), [0u8, 1, 2]).unwrap();
    fs::create_dir(dir.path().join("docs")).unwrap();
    fs::write(dir.path().join("docs/index.html"), "<h1>Docs</h1>").unwrap();
    dir
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[test]
fn serves_files_below_prefix() {
    let dir = site();
    let router = Router::default()
        .static_files("/assets", dir.path())
        .try_into_handler()
        .unwrap();

    let res = router.respond(Request::new().uri("/assets/app.css"));
    assert_eq!(res.status(), Status::Ok);
    assert_eq!(res.body(), b"body { margin: 0 }");
    assert_eq!(
        res.headers().get(Header::ContentType),
        Some("text/css; charset=utf-8")
    );
    assert!(res.headers().contains(Header::LastModified));

    let res = router.respond(Request::new().uri("/assets/data.bin"));
    assert_eq!(
        res.headers().get(Header::ContentType),
        Some("application/octet-stream")
    );
}

#[test]
fn serves_index_files() {
    let dir = site();
    let router = Router::default()
        .static_files("/assets", dir.path())
        .try_into_handler()
        .unwrap();

    for uri in ["/assets", "/assets/", "/assets/docs/"] {
        let res = router.respond(Request::new().uri(uri));
        assert_eq!(res.status(), Status::Ok, "{uri}");
    }

    let res = router.respond(Request::new().uri("/assets/docs"));
    assert_eq!(res.body(), b"<h1>Docs</h1>");
}

#[test]
fn serves_custom_index_file() {
    let dir = site();
    fs::write(dir.path().join("home.html"), "<h1>Custom</h1>").unwrap();
    let files = FileServer::new(dir.path()).index("home.html");

    let res = files.respond(Request::new().uri("/"));
    assert_eq!(res.status(), Status::Ok);
    assert_eq!(res.body(), b"<h1>Custom</h1>");
}

#[test]
fn answers_missing_files_with_404() {
    let dir = site();
    let router = Router::default()
        .static_files("/assets", dir.path())
        .try_into_handler()
        .unwrap();

    let res = router.respond(Request::new().uri("/assets/missing.js"));
    assert_eq!(res.status(), Status::NotFound);
}

#[test]
fn refuses_traversal() {
    let dir = site();
    let files = FileServer::new(dir.path().join("docs"));

    let res = files.respond(Request::new().uri("/../app.css"));
    assert_eq!(res.status(), Status::NotFound);
}

#[test]
fn answers_unmodified_files_with_304() {
    let dir = site();
    let files = FileServer::new(dir.path());

    let since = fmt_http_date(SystemTime::now() + Duration::from_secs(3600));
    let res = files.respond(
        Request::new()
            .uri("/app.css")
            .header(Header::IfModifiedSince, since),
    );
    assert_eq!(res.status(), Status::NotModified);
    assert!(res.body().is_empty());

    // Dates before the modification yield the file
    let since = fmt_http_date(SystemTime::UNIX_EPOCH);
    let res = files.respond(
        Request::new()
            .uri("/app.css")
            .header(Header::IfModifiedSince, since),
    );
    assert_eq!(res.status(), Status::Ok);
}

#[test]
fn refuses_unsafe_methods() {
    let dir = site();
    let files = FileServer::new(dir.path());

    let res =
        files.respond(Request::new().method(Method::Post).uri("/app.css"));
    assert_eq!(res.status(), Status::MethodNotAllowed);
    assert_eq!(res.headers().get(Header::Allow), Some("GET, HEAD"));

    // Routed file servers only answer GET and HEAD
    let router = Router::default()
        .static_files("/assets", dir.path())
        .try_into_handler()
        .unwrap();
    let res = router
        .respond(Request::new().method(Method::Delete).uri("/assets/app.css"));
    assert_eq!(res.status(), Status::MethodNotAllowed);
}

#[test]
fn serves_directory_at_its_own_path() {
    let dir = site();
    let router = Router::default()
        .serve_static(dir.path())
        .try_into_handler()
        .unwrap();

    let uri = format!("{}/app.css", dir.path().display());
    let res = router.respond(Request::new().uri(uri));
    assert_eq!(res.status(), Status::Ok);
    assert_eq!(res.body(), b"body { margin: 0 }");
}

#[test]
fn records_static_route() {
    let dir = site();
    let router = Router::default().static_files("/assets/", dir.path());

    let route = &router.routes()[0];
    assert_eq!(route.method(), Method::Get);
    assert_eq!(route.path(), "/assets");
    assert_eq!(route.name(), Some("static"));
}
