//! ntfy channel plugin for Icinga Notifications
//!
//! Receives notification requests from the daemon over a line-delimited
//! JSON protocol and publishes them to an ntfy server.

use shadow_rs::shadow;
shadow!(build);

pub mod cli;
pub mod config;
pub mod error;
pub mod external;
pub mod logger;
pub mod models;
pub mod plugin;
pub mod services;

pub use plugin::{NtfyPlugin, Plugin, PluginServer};

pub fn pkg_version() -> &'static str {
    build::PKG_VERSION
}

pub fn clap_long_version() -> &'static str {
    build::CLAP_LONG_VERSION
}
