//! Server module for Whiteboard
//!
//! Contains the main server initialization and runtime logic.
//!
//! # Module Structure
//!
//! - `config`: Configuration structures for the server and database
//! - `loader`: Configuration loading from files and environment
//! - `validation`: Production configuration validation
//! - `init`: Router assembly and the main run loop

pub mod config;
mod init;
mod loader;
mod validation;

// Re-export public API
pub use init::{migrate, run};
pub use loader::load_config;
