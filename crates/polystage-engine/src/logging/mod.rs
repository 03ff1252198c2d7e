//! Logger setup for hosts.
//!
//! Adapters log through the `log` facade only. Hosts call [`init_logging`]
//! once at startup; library crates never install a logger.

mod init;

pub use init::{LOG_ENV, LoggingConfig, init_logging};
