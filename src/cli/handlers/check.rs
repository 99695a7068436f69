//! Check command handler
//!
//! Validates a plugin configuration file without contacting the ntfy server.

use std::io::Write;
use std::path::PathBuf;

use crate::config::ConfigLoader;
use crate::error::AppResult;

/// Handler for the check command
pub struct CheckCommandHandler {
    config: PathBuf,
}

impl CheckCommandHandler {
    pub fn new(config: PathBuf) -> Self {
        Self { config }
    }

    /// Validate the configuration and print the effective settings
    ///
    /// # Errors
    /// Returns the first validation error found in the file
    pub fn execute<W: Write>(&self, out: &mut W) -> AppResult<()> {
        let config = ConfigLoader::new().load_file(&self.config)?;
        tracing::debug!("Configuration in {} is valid", self.config.display());

        serde_json::to_writer_pretty(&mut *out, &config.summary())?;
        writeln!(out)?;
        Ok(())
    }
}
