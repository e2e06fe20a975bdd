// Connection serving
// One spawned task per accepted connection.

use crate::handler::RequestHandler;
use crate::logger;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpStream;

/// Serve one connection on its own task so a slow client cannot stall the
/// accept loop or other clients.
pub fn spawn_serve(stream: TcpStream, peer_addr: SocketAddr, handler: Arc<dyn RequestHandler>) {
    tokio::spawn(async move {
        let io = TokioIo::new(stream);

        let service = service_fn(move |req| {
            let handler = Arc::clone(&handler);
            async move { Ok::<_, Infallible>(handler.handle(req, peer_addr).await) }
        });

        if let Err(err) = http1::Builder::new().serve_connection(io, service).await {
            logger::log_connection_error(&err);
        }
    });
}
