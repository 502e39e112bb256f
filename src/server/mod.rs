//! NNTP server: accept loop, sessions and connection I/O
//!
//! This module is organized into:
//! - `io`: CRLF framing, dot-stuffing and block reading
//! - `state`: per-connection session state
//! - `dispatch`: verb lookup and the command loop

mod dispatch;
mod io;
mod state;

pub use self::dispatch::{GREETING, Next, Verb, parse_command, run_session};
pub use self::io::Connection;
pub use self::state::Session;

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio::net::{TcpListener, TcpStream};
use tracing::{info, warn};

use crate::config::ServerConfig;
use crate::error::Result;
use crate::net::bind_listener;
use crate::storage::SharedBackend;

/// Pause after a failed accept (e.g. out of file descriptors)
const ACCEPT_BACKOFF: Duration = Duration::from_millis(100);

/// Accepts connections and runs one session task per client
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use nntp_mock::{DiskBackend, DiskConfig, NntpServer, ServerConfig};
///
/// # async fn example() -> nntp_mock::Result<()> {
/// let backend = Arc::new(DiskBackend::open(DiskConfig::new("news.db"))?);
/// let server = NntpServer::new(backend, ServerConfig::default());
/// let listener = server.bind()?;
/// server.serve(listener).await
/// # }
/// ```
pub struct NntpServer {
    backend: SharedBackend,
    config: ServerConfig,
}

impl NntpServer {
    /// Create a server sharing `backend` across all sessions
    pub fn new(backend: SharedBackend, config: ServerConfig) -> Self {
        Self { backend, config }
    }

    /// Bind the configured address
    pub fn bind(&self) -> Result<TcpListener> {
        bind_listener(self.config.bind)
    }

    /// Accept connections forever
    pub async fn serve(self, listener: TcpListener) -> Result<()> {
        self.serve_with_shutdown(listener, std::future::pending())
            .await
    }

    /// Accept connections until `shutdown` resolves
    ///
    /// Sessions already running are left to finish on their own.
    pub async fn serve_with_shutdown<F>(self, listener: TcpListener, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()> + Send,
    {
        info!("NNTP server listening on {}", listener.local_addr()?);
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    info!("Listener shutting down");
                    return Ok(());
                }
                accepted = listener.accept() => match accepted {
                    Ok((stream, peer)) => self.spawn_session(stream, peer),
                    Err(e) => {
                        warn!("Failed to accept connection: {}", e);
                        tokio::time::sleep(ACCEPT_BACKOFF).await;
                    }
                },
            }
        }
    }

    fn spawn_session(&self, stream: TcpStream, peer: SocketAddr) {
        let backend = Arc::clone(&self.backend);
        let max_line_length = self.config.max_line_length;

        tokio::spawn(async move {
            info!("Accepted connection from {}", peer);
            if let Err(e) = stream.set_nodelay(true) {
                warn!("Failed to set TCP_NODELAY for {}: {}", peer, e);
            }
            let mut conn = Connection::from_tcp(stream, max_line_length);
            match handle_connection(&mut conn, backend).await {
                Ok(()) => info!("Connection from {} closed", peer),
                Err(e) => warn!("Dropping connection from {}: {}", peer, e),
            }
        });
    }
}

/// Run a complete session on an established connection
pub async fn handle_connection(conn: &mut Connection, backend: SharedBackend) -> Result<()> {
    let mut session = Session::new(backend);
    run_session(conn, &mut session).await
}
