//! Command executor for dispatching CLI commands
//!
//! This module provides the main entry point for executing CLI commands
//! after parsing and logger initialization.

use super::handlers::{
    CheckCommandHandler, InfoCommandHandler, SendCommandHandler, ServeCommandHandler,
};
use super::parser::{Cli, Commands};
use crate::error::AppResult;

/// Execute the command selected on the command line
///
/// Command output goes to stdout; `serve` reserves stdout for the plugin
/// protocol.
pub async fn execute_command(cli: &Cli) -> AppResult<()> {
    let timeout = cli.request_timeout();
    let mut stdout = std::io::stdout();

    match cli.command() {
        Commands::Serve => ServeCommandHandler::new(timeout).execute().await,
        Commands::Info => InfoCommandHandler::new().execute(&mut stdout),
        Commands::Check { config } => CheckCommandHandler::new(config).execute(&mut stdout),
        Commands::Send { config, request } => {
            SendCommandHandler::new(config, request, timeout)
                .execute(&mut stdout)
                .await
        }
    }
}
