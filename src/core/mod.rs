//! Process-wide state shared between the signal handler and the session.

mod shutdown;

pub use shutdown::{is_shutdown, register_server, setup_shutdown_handler};
