//! Configuration system and shared tab record types for tabtree.
//!
//! This crate provides:
//!
//! - The persisted tab record model (`TabId`, `TabRecord`, `Snapshot`)
//! - Configuration loading, saving, and default values
//! - Keybinding and log level configuration types
//! - A debounced file watcher used to notice external store changes

pub mod config;
pub mod defaults;
pub mod error;
pub mod snapshot_types;
mod types;
#[cfg(feature = "watcher")]
pub mod watcher;

pub use config::Config;
pub use error::ConfigError;
pub use snapshot_types::{Snapshot, TabId, TabRecord};
pub use types::{KeyBinding, LogLevel};
