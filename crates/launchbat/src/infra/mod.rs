//! Infrastructure adapters for the shell, registry, clipboard, config, and logging.

pub mod clipboard;
pub mod config;
pub mod desktop;
pub mod logging;
pub mod registry;
pub mod shortcut;
