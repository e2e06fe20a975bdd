// Listener construction
// Binds the listening socket through socket2 so backlog size and address
// reuse are under our control.

use socket2::{Domain, Protocol, Socket, Type};
use std::net::SocketAddr;
use tokio::net::TcpListener;

/// Bind a TCP listener on `addr`.
///
/// `SO_REUSEADDR` is set so a restart does not trip over sockets left in
/// TIME_WAIT. `SO_REUSEPORT` is left off: a second instance started on the
/// same port must fail here instead of silently sharing the socket.
pub fn bind_listener(addr: SocketAddr) -> std::io::Result<TcpListener> {
    let domain = if addr.is_ipv4() {
        Domain::IPV4
    } else {
        Domain::IPV6
    };

    let socket = Socket::new(domain, Type::STREAM, Some(Protocol::TCP))?;

    socket.set_reuse_address(true)?;

    // Tokio requires a non-blocking fd
    socket.set_nonblocking(true)?;

    socket.bind(&addr.into())?;
    socket.listen(1024)?;

    let std_listener: std::net::TcpListener = socket.into();
    TcpListener::from_std(std_listener)
}
