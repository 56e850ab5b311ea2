//! Core module: configuration, state, server lifecycle

pub mod config;
pub mod error;
pub mod server;
pub mod state;
pub mod tasks;

pub use config::{Config, setup_environment};
pub use error::{Result, ServerError};
pub use server::Server;
pub use state::{ServerState, SlotGuard};
