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

//! Static file server.

use httpdate::{fmt_http_date, parse_http_date};
use std::fs;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};
use std::time::Duration;

use crate::handler::Handler;
use crate::http::response::{ResponseExt, ResponseWriter};
use crate::http::{Header, Method, Request, Status};

// ----------------------------------------------------------------------------
// Structs
// ----------------------------------------------------------------------------

/// Static file server.
///
/// The file server maps the path of a request onto a directory and answers
/// with the contents of the file found there, with a content type derived
/// from the file extension. Paths ending in `/` or pointing to a directory
/// are answered with the index file of that directory. Directory listings
/// are never generated.
///
/// The directory isn't checked on construction, so a missing directory just
/// means that every request is answered with "404 Not Found".
///
/// Mount a file server below a prefix with [`StripPrefix`][], or use
/// [`Router::static_files`][], which does exactly that.
///
/// [`Router::static_files`]: crate::router::Router::static_files
/// [`StripPrefix`]: crate::handler::StripPrefix
///
/// # Examples
///
/// ```
/// use waypoint::handler::{FileServer, Handler};
/// use waypoint::http::{Request, Status};
///
/// // Create file server for missing directory
/// let files = FileServer::new("does/not/exist");
///
/// // Handle request with file server
/// let res = files.respond(Request::new().uri("/index.html"));
/// assert_eq!(res.status(), Status::NotFound);
/// ```
#[derive(Clone, Debug)]
pub struct FileServer {
    /// Base directory.
    base: PathBuf,
    /// Index file name.
    index: String,
}

// ----------------------------------------------------------------------------
// Implementations
// ----------------------------------------------------------------------------

impl FileServer {
    /// Creates a file server for the given directory.
    pub fn new<P>(base: P) -> Self
    where
        P: Into<PathBuf>,
    {
        Self {
            base: base.into(),
            index: String::from("index.html"),
        }
    }

    /// Sets the name of the index file, which defaults to `index.html`.
    #[must_use]
    pub fn index<S>(mut self, name: S) -> Self
    where
        S: Into<String>,
    {
        self.index = name.into();
        self
    }

    /// Resolves the given request path to a file below the base directory.
    ///
    /// Paths containing `..` segments are refused, even though the request
    /// parser rejects them already, as requests might be created in code.
    fn resolve(&self, path: &str) -> Option<PathBuf> {
        let relative = Path::new(path.trim_start_matches('/'));
        let mut full = self.base.clone();
        for component in relative.components() {
            match component {
                Component::Normal(segment) => full.push(segment),
                Component::CurDir => {}
                _ => return None,
            }
        }

        // Serve index file for directories
        if path.ends_with('/') || full.is_dir() {
            full.push(&self.index);
        }
        Some(full)
    }
}

// ----------------------------------------------------------------------------
// Trait implementations
// ----------------------------------------------------------------------------

impl Handler for FileServer {
    fn handle(&self, req: Request, res: &mut dyn ResponseWriter) {
        if !matches!(req.method, Method::Get | Method::Head) {
            res.headers_mut().insert(Header::Allow, "GET, HEAD");
            return res.error(Status::MethodNotAllowed);
        }

        // Resolve and read file, mapping errors to statuses
        let Some(full) = self.resolve(&req.uri.path) else {
            return res.error(Status::NotFound);
        };
        let content = match fs::read(&full) {
            Ok(content) => content,
            Err(err) => {
                return res.error(match err.kind() {
                    ErrorKind::NotFound | ErrorKind::IsADirectory => {
                        Status::NotFound
                    }
                    ErrorKind::PermissionDenied => Status::Forbidden,
                    _ => Status::InternalServerError,
                });
            }
        };

        // Obtain modification time, if the file system supports it
        let modified = fs::metadata(&full)
            .and_then(|meta| meta.modified())
            .ok();

        // In case the client sent a date and the file wasn't modified since,
        // answer with 304 - subtract one second to account for rounding
        let since = req.headers.get(Header::IfModifiedSince);
        let since = since.and_then(|value| parse_http_date(value).ok());
        let last = modified
            .and_then(|modified| modified.checked_sub(Duration::from_secs(1)));
        if let (Some(since), Some(last)) = (since, last) {
            if since >= last {
                return res.write_status(Status::NotModified);
            }
        }

        // Write headers and content
        let headers = res.headers_mut();
        headers.insert(Header::ContentType, mime(&full));
        if let Some(modified) = modified {
            headers.insert(Header::LastModified, fmt_http_date(modified));
        }
        res.write_status(Status::Ok);
        res.write(&content);
    }
}

// ----------------------------------------------------------------------------
// Functions
// ----------------------------------------------------------------------------

/// Returns the content type for the given path, based on its extension.
fn mime(path: &Path) -> &'static str {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("html" | "htm") => "text/html; charset=utf-8",
        Some("css") => "text/css; charset=utf-8",
        Some("js" | "mjs") => "text/javascript; charset=utf-8",
        Some("json") => "application/json",
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("svg") => "image/svg+xml",
        Some("ico") => "image/x-icon",
        Some("webp") => "image/webp",
        Some("woff2") => "font/woff2",
        Some("pdf") => "application/pdf",
        Some("mp4") => "video/mp4",
        Some("txt") => "text/plain; charset=utf-8",
        Some("xml") => "application/xml",
        Some("wasm") => "application/wasm",
        _ => "application/octet-stream",
    }
}
