//! Process lifecycle state.
//!
//! - `SHUTDOWN`: Has shutdown been requested? (Ctrl+C / SIGTERM received)
//! - `SERVER`: HTTP server to unblock on shutdown (serve mode only)
//! - `SHUTDOWN_TX`: Signal for the actor system (serve and watch mode)

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};

use tiny_http::Server;

/// Exit status used when a signal arrives before anything can shut down gracefully.
const INTERRUPTED_EXIT: i32 = 130;

/// Shutdown has been requested (Ctrl+C or SIGTERM received)
static SHUTDOWN: AtomicBool = AtomicBool::new(false);

/// HTTP server reference for graceful shutdown
static SERVER: OnceLock<Arc<Server>> = OnceLock::new();

/// Shutdown signal sender for actor system
static SHUTDOWN_TX: OnceLock<crossbeam::channel::Sender<()>> = OnceLock::new();

/// Setup the global signal handler. Call once at program start.
///
/// The handler behavior depends on what has been registered:
/// - Nothing registered (batch mode): exit immediately with status 130
/// - Actor system registered: notify it and let it wind down
/// - Server registered: additionally unblock the request loop
pub fn setup_shutdown_handler() -> anyhow::Result<()> {
    ctrlc::set_handler(|| {
        // Second signal while already shutting down: give up waiting.
        if SHUTDOWN.swap(true, Ordering::SeqCst) {
            std::process::exit(INTERRUPTED_EXIT);
        }

        let Some(tx) = SHUTDOWN_TX.get() else {
            std::process::exit(INTERRUPTED_EXIT);
        };
        let _ = tx.send(());

        if let Some(server) = SERVER.get() {
            crate::log!("serve"; "shutting down...");
            server.unblock();
        }
    })
    .map_err(|e| anyhow::anyhow!("failed to set signal handler: {}", e))
}

/// Register the actor system's shutdown channel.
///
/// Returns the receiving end; it fires once when a signal arrives.
pub fn register_shutdown() -> crossbeam::channel::Receiver<()> {
    let (tx, rx) = crossbeam::channel::bounded(1);
    let _ = SHUTDOWN_TX.set(tx);
    rx
}

/// Register the HTTP server for graceful shutdown
///
/// Call this after binding the server, before entering the request loop
pub fn register_server(server: Arc<Server>) {
    let _ = SERVER.set(server);
}

/// Check if shutdown has been requested
pub fn is_shutdown() -> bool {
    SHUTDOWN.load(Ordering::Relaxed)
}
