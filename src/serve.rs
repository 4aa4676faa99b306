// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Serves renders over HTTP.  There are three routes, one per way of
//! producing the image, and all of them read the same query:
//!
//! * `/mandel0` encodes straight from the lazy view,
//! * `/mandel1` materializes on one thread first,
//! * `/mandel2` renders a thread per row.

use concurrent::render_concurrent;
use encode::{write_png, write_view_png};
use error::RenderError;
use params::parse_query;
use sequential::materialize;
use std::thread;
use tiny_http::{Header, Request, Response, Server};
use view::MandelView;

/// Where the server listens unless told otherwise.
pub const DEFAULT_ADDR: &str = "0.0.0.0:7777";

/// How a route produces its image.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Route {
    /// `/mandel0`
    Lazy,
    /// `/mandel1`
    Sequential,
    /// `/mandel2`
    Concurrent,
}

impl Route {
    /// The route served at `path`, if any.
    pub fn from_path(path: &str) -> Option<Route> {
        match path {
            "/mandel0" => Some(Route::Lazy),
            "/mandel1" => Some(Route::Sequential),
            "/mandel2" => Some(Route::Concurrent),
            _ => None,
        }
    }

    /// Renders the image a request query describes and encodes it as
    /// PNG.
    pub fn render_png(self, query: &str) -> Result<Vec<u8>, RenderError> {
        let config = parse_query(query)?;
        let mut png = vec![];
        match self {
            Route::Lazy => write_view_png(&MandelView::new(&config), &mut png)?,
            Route::Sequential => write_png(&materialize(&MandelView::new(&config)), &mut png)?,
            Route::Concurrent => write_png(&render_concurrent(&config)?, &mut png)?,
        }
        Ok(png)
    }
}

/// What goes back to the client.
#[derive(Clone, Debug, PartialEq)]
pub struct Reply {
    /// HTTP status code.
    pub status: u16,
    /// Value of the `Content-Type` header.
    pub content_type: &'static str,
    /// Response body.
    pub body: Vec<u8>,
}

impl Reply {
    fn text(status: u16, message: String) -> Reply {
        Reply {
            status,
            content_type: "text/plain; charset=utf-8",
            body: message.into_bytes(),
        }
    }
}

/// Answers a request for `url`, which is a path with an optional
/// query string.
pub fn handle(url: &str) -> Reply {
    let (path, query) = match url.find('?') {
        Some(index) => (&url[..index], &url[index + 1..]),
        None => (url, ""),
    };
    let route = match Route::from_path(path) {
        Some(route) => route,
        None => return Reply::text(404, format!("no route for {}", path)),
    };
    match route.render_png(query) {
        Ok(body) => Reply {
            status: 200,
            content_type: "image/png",
            body,
        },
        Err(err) => {
            let status = match err {
                RenderError::InvalidConfig(_) | RenderError::EmptyImage => 400,
                _ => 500,
            };
            warn!("{} failed: {}", url, err);
            Reply::text(status, err.to_string())
        }
    }
}

/// A listening HTTP server.
pub struct MandelServer {
    server: Server,
}

impl MandelServer {
    /// Starts listening on `addr`, e.g. `"0.0.0.0:7777"`.
    pub fn bind(addr: &str) -> Result<MandelServer, RenderError> {
        let server = Server::http(addr).map_err(|e| RenderError::Bind {
            addr: addr.to_string(),
            reason: e.to_string(),
        })?;
        info!("listening on {}", addr);
        Ok(MandelServer { server })
    }

    /// Answers requests forever, each on its own thread.
    pub fn serve(&self) {
        for request in self.server.incoming_requests() {
            let spawned = thread::Builder::new()
                .name("request".to_string())
                .spawn(move || respond(request));
            if let Err(e) = spawned {
                error!("could not start a request thread: {}", e);
            }
        }
    }
}

fn respond(request: Request) {
    let reply = handle(request.url());
    info!("{} {} -> {}", request.method(), request.url(), reply.status);
    let mut response = Response::from_data(reply.body).with_status_code(reply.status);
    if let Ok(header) = Header::from_bytes(&b"Content-Type"[..], reply.content_type.as_bytes()) {
        response = response.with_header(header);
    }
    if let Err(e) = request.respond(response) {
        warn!("could not send response: {}", e);
    }
}
