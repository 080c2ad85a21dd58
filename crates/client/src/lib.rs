//! Headless combat client.
//!
//! Loads content (from `COMBAT_DATA_DIR` or the embedded set), builds a
//! battle for one encounter, drives it through `combat-runtime` with an
//! auto-confirming operator and streams every event to stdout as JSON lines.
pub mod config;
pub mod logging;
pub mod session;

pub use config::ClientConfig;
