// Listener construction module
// Binds the configured address through socket2 and hands tokio the socket.

use socket2::{Domain, Protocol, Socket, Type};
use std::net::SocketAddr;
use tokio::net::TcpListener;

/// Bind `addr` and start listening.
///
/// `SO_REUSEADDR` is set: an address left in TIME_WAIT by a previous test
/// run can be rebound immediately, while an address actively held by
/// another process still fails with `AddrInUse`.
pub fn bind(addr: SocketAddr) -> std::io::Result<TcpListener> {
    let domain = if addr.is_ipv4() {
        Domain::IPV4
    } else {
        Domain::IPV6
    };

    let socket = Socket::new(domain, Type::STREAM, Some(Protocol::TCP))?;
    socket.set_reuse_address(true)?;

    // Tokio drives the listener, so the fd must be non-blocking
    socket.set_nonblocking(true)?;

    socket.bind(&addr.into())?;
    socket.listen(128)?;

    let std_listener: std::net::TcpListener = socket.into();
    TcpListener::from_std(std_listener)
}
