//! Plugin configuration
//!
//! The notification daemon sends the channel configuration as a flat JSON
//! object. It is layered over the declared defaults, validated once and then
//! kept as an immutable `NtfyConfig`.
//!
//! # Configuration Priority (lowest to highest)
//! 1. Declared defaults (`https://ntfy.sh/`, accepted status `200`, priority `3`)
//! 2. Fields present in the `SetConfig` payload

pub mod error;
pub mod loader;
pub mod settings;
pub mod validation;

// Re-export public types
pub use error::ConfigError;
pub use loader::ConfigLoader;
pub use settings::{CHANNEL_ADDRESS_TYPE, Credentials, NtfyConfig, RawConfig};
