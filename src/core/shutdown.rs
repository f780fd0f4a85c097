//! Ctrl+C handling.
//!
//! A capture has nothing worth preserving mid-flight, so an interrupt before
//! any server is registered ends the process at once. Once browser mode has
//! registered its server, an interrupt unblocks it and the session unwinds
//! normally.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};

use tiny_http::Server;

/// Shutdown has been requested (Ctrl+C received)
static SHUTDOWN: AtomicBool = AtomicBool::new(false);

/// HTTP server reference for graceful shutdown
static SERVER: OnceLock<Arc<Server>> = OnceLock::new();

/// Exit status for a process ended by SIGINT.
const INTERRUPTED: i32 = 130;

/// Setup the global Ctrl+C handler. Call once at program start
pub fn setup_shutdown_handler() -> anyhow::Result<()> {
    ctrlc::set_handler(|| {
        SHUTDOWN.store(true, Ordering::SeqCst);

        if let Some(server) = SERVER.get() {
            crate::log!("browse"; "shutting down...");
            server.unblock();
        } else {
            std::process::exit(INTERRUPTED);
        }
    })
    .map_err(|e| anyhow::anyhow!("failed to set Ctrl+C handler: {}", e))
}

/// Register the browser-mode server so an interrupt stops it.
///
/// Only the first registration takes effect.
pub fn register_server(server: Arc<Server>) {
    let _ = SERVER.set(server);
}

/// Check if shutdown has been requested
pub fn is_shutdown() -> bool {
    SHUTDOWN.load(Ordering::Relaxed)
}
