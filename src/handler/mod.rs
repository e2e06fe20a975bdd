//! Request handling strategies
//!
//! The server loop dispatches every request to an injected [`RequestHandler`].
//! [`StaticFiles`] is the strategy installed by default; an alternate handler
//! can be substituted without touching the server loop.

pub mod static_files;

pub use static_files::StaticFiles;

use async_trait::async_trait;
use http_body_util::Full;
use hyper::body::{Bytes, Incoming};
use hyper::{Request, Response};
use std::net::SocketAddr;

/// A request handling strategy
#[async_trait]
pub trait RequestHandler: Send + Sync + 'static {
    /// Produce a response for one request.
    ///
    /// Per-request failures never propagate out of the handler; they are
    /// mapped to error statuses so the server keeps accepting connections.
    async fn handle(&self, req: Request<Incoming>, peer_addr: SocketAddr)
        -> Response<Full<Bytes>>;
}
