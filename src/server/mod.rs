// Server module entry point
// Listener construction and the accept loop.

mod connection;
mod listener;

pub use listener::bind_listener;

use crate::handler::RequestHandler;
use crate::logger;
use std::sync::Arc;
use tokio::net::TcpListener;

/// Accept connections forever, serving each one on its own task.
///
/// Accept errors are logged and the loop continues; the loop only ends with
/// process termination.
pub async fn run(listener: TcpListener, handler: Arc<dyn RequestHandler>) {
    loop {
        match listener.accept().await {
            Ok((stream, peer_addr)) => {
                connection::spawn_serve(stream, peer_addr, Arc::clone(&handler));
            }
            Err(e) => {
                logger::log_error(&format!("Failed to accept connection: {e}"));
            }
        }
    }
}
