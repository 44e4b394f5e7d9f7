//! Server lifecycle management.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tiny_http::Server;
use tokio::runtime::Runtime;
use tokio::task::JoinHandle;

use crate::core::{is_shutdown, register_server};
use crate::error::Error;
use crate::log;

/// Bind the HTTP server. A taken port is fatal; there is no retry.
pub fn bind(addr: SocketAddr) -> Result<Arc<Server>> {
    let server = Server::http(addr).map_err(|e| Error::Transport(addr, e))?;
    Ok(Arc::new(server))
}

/// Register server for graceful shutdown.
///
/// A signal that arrived before registration never saw the server, so
/// unblock it here or the request loop would never return.
pub fn register_for_shutdown(server: &Arc<Server>) {
    register_server(Arc::clone(server));
    if is_shutdown() {
        server.unblock();
    }
}

/// Bound address as reported by the listener (resolves port 0).
pub fn local_addr(server: &Server, requested: SocketAddr) -> SocketAddr {
    server
        .server_addr()
        .to_ip()
        .unwrap_or(requested)
}

/// Wait for the actor system to wind down, then drop the runtime.
pub fn wait_for_shutdown(rt: Runtime, actors: JoinHandle<Result<()>>) {
    match rt.block_on(actors) {
        Ok(Ok(())) => {}
        Ok(Err(e)) => log!("actor"; "error: {}", e),
        Err(e) => crate::debug!("actor"; "join failed: {}", e),
    }
    rt.shutdown_timeout(Duration::from_secs(1));
}
