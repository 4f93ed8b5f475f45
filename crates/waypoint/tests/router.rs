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

//! Router integration tests.

use std::sync::{Arc, Mutex};

use waypoint::handler::{Error, Handler, TryIntoHandler};
use waypoint::http::response::{ResponseExt, ResponseWriter};
use waypoint::http::{Header, Method, Request, Status};
use waypoint::middleware::{named, Middleware, StripTrailingSlashes};
use waypoint::router::{Endpoint, Router};

// ----------------------------------------------------------------------------
// Helpers
// ----------------------------------------------------------------------------

/// Shared record of middleware and handler invocations.
type Trace = Arc<Mutex<Vec<String>>>;

/// Creates a handler answering with the given text.
fn reply(text: &'static str) -> impl Handler + 'static {
    move |_: Request, res: &mut dyn ResponseWriter| {
        res.text(Status::Ok, text);
    }
}

/// Creates a handler recording its invocation before answering.
fn terminal(trace: &Trace) -> impl Handler + 'static {
    let trace = Arc::clone(trace);
    move |_: Request, res: &mut dyn ResponseWriter| {
        trace.lock().unwrap().push(String::from("handler"));
        res.text(Status::Ok, "done");
    }
}

/// Creates a middleware recording when the request passes in and out.
fn layer(trace: &Trace, name: &'static str) -> impl Middleware + 'static {
    let trace = Arc::clone(trace);
    let middleware =
        move |req: Request, res: &mut dyn ResponseWriter, next: &dyn Handler| {
            trace.lock().unwrap().push(format!("{name} in"));
            next.handle(req, res);
            trace.lock().unwrap().push(format!("{name} out"));
        };
    named(name, middleware)
}

/// Sends a request with the given method and URI to the handler.
fn send<H>(handler: &H, method: Method, uri: &str) -> (Status, String)
where
    H: Handler,
{
    let res = handler.respond(Request::new().method(method).uri(uri));
    (res.status(), String::from_utf8_lossy(res.body()).into_owned())
}

/// Drains the trace.
fn drain(trace: &Trace) -> Vec<String> {
    trace.lock().unwrap().drain(..).collect()
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[test]
fn answers_registered_route() {
    let router = Router::default()
        .get("/hello", |_: Request, res: &mut dyn ResponseWriter| {
            res.write(b"Hello, world!");
        })
        .try_into_handler()
        .unwrap();

    let (status, body) = send(&router, Method::Get, "/hello");
    assert_eq!(status, Status::Ok);
    assert_eq!(body, "Hello, world!");
}

#[test]
fn answers_every_method() {
    let router = Router::default()
        .get("/x", reply("get"))
        .post("/x", reply("post"))
        .put("/x", reply("put"))
        .patch("/x", reply("patch"))
        .delete("/x", reply("delete"))
        .options("/x", reply("options"))
        .connect("/x", reply("connect"))
        .trace("/x", reply("trace"))
        .route(Method::Head, "/y", reply("head"))
        .try_into_handler()
        .unwrap();

    for (method, expected) in [
        (Method::Get, "get"),
        (Method::Post, "post"),
        (Method::Put, "put"),
        (Method::Patch, "patch"),
        (Method::Delete, "delete"),
        (Method::Options, "options"),
        (Method::Connect, "connect"),
        (Method::Trace, "trace"),
    ] {
        let expected = (Status::Ok, String::from(expected));
        assert_eq!(send(&router, method, "/x"), expected);
    }
    assert_eq!(send(&router, Method::Head, "/y").0, Status::Ok);
}

#[test]
fn extracts_path_parameters() {
    let router = Router::default()
        .get("/users/{id}/posts/{post}", |req: Request, res: &mut dyn ResponseWriter| {
            let id = req.param("id").unwrap_or_default();
            let post = req.param("post").unwrap_or_default();
            res.text(Status::Ok, format!("{id}:{post}"));
        })
        .try_into_handler()
        .unwrap();

    let (status, body) = send(&router, Method::Get, "/users/7/posts/42");
    assert_eq!(status, Status::Ok);
    assert_eq!(body, "7:42");
}

#[test]
fn routes_into_group() {
    let router = Router::default()
        .group("/api", |api| api.get("/users", reply("users")))
        .try_into_handler()
        .unwrap();

    assert_eq!(send(&router, Method::Get, "/api/users").1, "users");
    assert_eq!(send(&router, Method::Get, "/users").0, Status::NotFound);
}

#[test]
fn routes_into_nested_groups() {
    let router = Router::default()
        .group("/admin", |admin| {
            admin.group("/users", |users| users.get("/", reply("admin users")))
        })
        .try_into_handler()
        .unwrap();

    assert_eq!(send(&router, Method::Get, "/admin/users/").1, "admin users");
    assert_eq!(send(&router, Method::Get, "/admin/users").1, "admin users");
}

#[test]
fn routes_into_group_without_prefix() {
    let router = Router::default()
        .group("", |group| group.get("/ping", reply("pong")))
        .try_into_handler()
        .unwrap();

    assert_eq!(send(&router, Method::Get, "/ping").1, "pong");
}

#[test]
fn normalizes_patterns() {
    let router = Router::new("/v1/")
        .get("coffee//beans/", reply("beans"))
        .try_into_handler()
        .unwrap();

    assert_eq!(send(&router, Method::Get, "/v1/coffee/beans").1, "beans");
    assert_eq!(router.routes()[0].path(), "/v1/coffee/beans");
}

#[test]
fn answers_custom_not_found() {
    let router = Router::default()
        .get("/", reply("home"))
        .not_found(|_: Request, res: &mut dyn ResponseWriter| {
            res.text(Status::ImATeapot, "gone fishing");
        })
        .try_into_handler()
        .unwrap();

    let (status, body) = send(&router, Method::Get, "/missing");
    assert_eq!(status, Status::ImATeapot);
    assert_eq!(body, "gone fishing");
}

#[test]
fn answers_default_not_found() {
    let router = Router::default().try_into_handler().unwrap();
    assert_eq!(send(&router, Method::Get, "/").0, Status::NotFound);
}

#[test]
fn answers_method_not_allowed() {
    let router = Router::default()
        .get("/x", reply("x"))
        .delete("/x", reply("x"))
        .try_into_handler()
        .unwrap();

    let res = router.respond(Request::new().method(Method::Post).uri("/x"));
    assert_eq!(res.status(), Status::MethodNotAllowed);
    assert_eq!(res.headers().get(Header::Allow), Some("GET, HEAD, DELETE"));
}

#[test]
fn answers_head_with_get_route() {
    let router = Router::default()
        .get("/x", reply("x"))
        .try_into_handler()
        .unwrap();

    assert_eq!(send(&router, Method::Head, "/x").0, Status::Ok);
}

#[test]
fn rejects_conflicting_routes() {
    let result = Router::default()
        .get("/users/{id}", reply("id"))
        .get("/users/{name}", reply("name"))
        .try_into_handler();
    assert!(result.is_err());

    // The same pattern may be used with different methods
    let result = Router::default()
        .get("/users/{id}", reply("get"))
        .post("/users/{id}", reply("post"))
        .try_into_handler();
    assert!(result.is_ok());
}

#[test]
fn rejects_conflicting_routes_across_groups() {
    let result = Router::default()
        .get("/api/users", reply("outer"))
        .group("/api", |api| api.get("/users", reply("inner")))
        .try_into_handler();
    assert!(result.is_err());
}

#[test]
fn rejects_duplicate_not_found() {
    let result = Router::default()
        .not_found(reply("first"))
        .not_found(reply("second"))
        .try_into_handler();
    assert!(result.is_err());
}

#[test]
fn rejects_group_returning_foreign_router() {
    let result = Router::default()
        .group("/admin", |_| Router::default().get("/secret", reply("secret")))
        .try_into_handler();
    assert!(matches!(result, Err(Error::Group(prefix)) if prefix == "/admin"));
}

#[test]
fn rejects_group_dropping_inherited_middlewares() {
    let trace = Trace::default();
    let result = Router::default()
        .with(layer(&trace, "auth"))
        .group("/admin", |_| Router::new("/admin").get("/", reply("admin")))
        .try_into_handler();
    assert!(matches!(result, Err(Error::Group(_))));
}

#[test]
fn rejects_foreign_router_in_nested_group() {
    let result = Router::default()
        .group("/api", |api| {
            api.group("/v1", |_| Router::new("/elsewhere"))
                .get("/health", reply("ok"))
        })
        .try_into_handler();
    assert!(matches!(result, Err(Error::Group(prefix)) if prefix == "/api/v1"));
}

#[test]
fn runs_middlewares_in_order() {
    let trace = Trace::default();
    let endpoint = Endpoint::new(terminal(&trace))
        .with(layer(&trace, "r1"))
        .with(layer(&trace, "r2"));
    let router = Router::default()
        .with(layer(&trace, "g1"))
        .with(layer(&trace, "g2"))
        .get("/x", endpoint)
        .try_into_handler()
        .unwrap();

    assert_eq!(send(&router, Method::Get, "/x").0, Status::Ok);
    assert_eq!(drain(&trace), [
        "g1 in", "g2 in", "r1 in", "r2 in", "handler", "r2 out", "r1 out",
        "g2 out", "g1 out",
    ]);
}

#[test]
fn snapshots_middlewares_for_groups() {
    let trace = Trace::default();
    let router = Router::default()
        .with(layer(&trace, "m1"))
        .group("/g", |group| {
            group.with(layer(&trace, "m2")).get("/x", terminal(&trace))
        })
        .with(layer(&trace, "m3"))
        .get("/y", terminal(&trace))
        .try_into_handler()
        .unwrap();

    send(&router, Method::Get, "/g/x");
    assert_eq!(drain(&trace), [
        "m1 in", "m2 in", "handler", "m2 out", "m1 out"
    ]);

    // Routes registered after a middleware was added see it
    send(&router, Method::Get, "/y");
    assert_eq!(drain(&trace), [
        "m1 in", "m3 in", "handler", "m3 out", "m1 out"
    ]);
}

#[test]
fn skips_middlewares_added_after_route() {
    let trace = Trace::default();
    let router = Router::default()
        .get("/x", terminal(&trace))
        .with(layer(&trace, "late"))
        .try_into_handler()
        .unwrap();

    send(&router, Method::Get, "/x");
    assert_eq!(drain(&trace), ["handler"]);
}

#[test]
fn wraps_custom_not_found_in_global_middlewares() {
    let trace = Trace::default();
    let router = Router::default()
        .with(layer(&trace, "g"))
        .not_found(terminal(&trace))
        .try_into_handler()
        .unwrap();

    send(&router, Method::Get, "/missing");
    assert_eq!(drain(&trace), ["g in", "handler", "g out"]);
}

#[test]
fn short_circuits_chain() {
    let trace = Trace::default();
    let deny = |_: Request, res: &mut dyn ResponseWriter, _: &dyn Handler| {
        res.error(Status::Forbidden);
    };
    let router = Router::default()
        .with(deny)
        .get("/x", terminal(&trace))
        .try_into_handler()
        .unwrap();

    assert_eq!(send(&router, Method::Get, "/x").0, Status::Forbidden);
    assert!(drain(&trace).is_empty());
}

#[test]
fn redirects_trailing_slashes_before_routing() {
    let router = Router::default()
        .with(StripTrailingSlashes)
        .get("/foo", reply("foo"))
        .get("/", reply("root"))
        .try_into_handler()
        .unwrap();

    let res = router.respond(Request::new().uri("/foo/"));
    assert_eq!(res.status(), Status::MovedPermanently);
    assert_eq!(res.headers().get(Header::Location), Some("/foo"));
    assert_eq!(send(&router, Method::Get, "/foo").1, "foo");
    assert_eq!(send(&router, Method::Get, "/").1, "root");
}

#[test]
fn lists_routes_and_middlewares() {
    let trace = Trace::default();
    let router = Router::default()
        .with(StripTrailingSlashes)
        .get("/", reply("home"))
        .post(
            "/users",
            Endpoint::new(reply("created"))
                .name("create-user")
                .with(layer(&trace, "auth")),
        );

    let routes = router.routes();
    assert_eq!(routes.len(), 2);
    assert_eq!(routes[1].method(), Method::Post);
    assert_eq!(routes[1].name(), Some("create-user"));
    assert_eq!(routes[1].middlewares().len(), 1);
    assert_eq!(routes[1].to_string(), "POST /users create-user [auth]");

    assert_eq!(
        router.to_string(),
        "Middlewares:\n  strip-trailing-slashes\nRoutes:\n  GET / -\n  \
         POST /users create-user [auth]\n"
    );

    // Routes survive conversion into a dispatcher
    let dispatcher = router.try_into_handler().unwrap();
    assert_eq!(dispatcher.routes().len(), 2);
}

#[test]
fn lists_group_routes_with_full_path() {
    let router = Router::new("/api")
        .group("/v1", |v1| v1.get("/status", reply("ok")));

    assert_eq!(router.routes()[0].path(), "/api/v1/status");
    assert_eq!(router.routes()[0].to_string(), "GET /api/v1/status -");
}
