//! Mode routing
//!
//! - Server mode (HTTP server, default)
//! - Sweep mode (one retention pass, then exit)

pub mod server;
pub mod sweep;

pub use server::run_server;
pub use sweep::run_sweep;
