//! Core server infrastructure
//!
//! - [`Config`] - environment-derived configuration
//! - [`ServerState`] - shared state handed to every handler
//! - [`Server`] - HTTP server bootstrap

pub mod config;
pub mod server;
pub mod state;

pub use config::Config;
pub use server::Server;
pub use state::{Metrics, ServerState};
