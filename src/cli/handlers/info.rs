//! Info command handler

use std::io::Write;

use crate::error::AppResult;
use crate::plugin::plugin_info;

/// Prints the plugin description the daemon receives from `GetInfo`
#[derive(Debug, Default)]
pub struct InfoCommandHandler;

impl InfoCommandHandler {
    pub fn new() -> Self {
        Self
    }

    pub fn execute<W: Write>(&self, out: &mut W) -> AppResult<()> {
        serde_json::to_writer_pretty(&mut *out, &plugin_info())?;
        writeln!(out)?;
        Ok(())
    }
}
