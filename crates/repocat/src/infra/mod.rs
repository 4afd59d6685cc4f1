//! Infrastructure adapters for external tools, config, and logging.

pub mod clipboard;
pub mod config;
pub mod git;
pub mod logging;
pub mod mime;
pub mod tools;
