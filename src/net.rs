//! Listener setup

use std::net::SocketAddr;

use socket2::{Domain, Protocol, Socket, Type};
use tokio::net::TcpListener;
use tracing::debug;

use crate::error::Result;

/// Pending-connection queue length
const LISTEN_BACKLOG: i32 = 1024;

/// Bind a TCP listener on `addr`
///
/// The socket is created with address reuse enabled so a restarted server can
/// rebind immediately. Must be called from within a tokio runtime.
pub fn bind_listener(addr: SocketAddr) -> Result<TcpListener> {
    let domain = if addr.is_ipv4() {
        Domain::IPV4
    } else {
        Domain::IPV6
    };

    let socket = Socket::new(domain, Type::STREAM, Some(Protocol::TCP))?;
    socket.set_reuse_address(true)?;
    socket.set_nonblocking(true)?;
    socket.bind(&addr.into())?;
    socket.listen(LISTEN_BACKLOG)?;

    let listener = TcpListener::from_std(socket.into())?;
    debug!("Bound listener on {}", listener.local_addr()?);
    Ok(listener)
}
