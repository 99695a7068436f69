//! CLI module for the ntfy channel plugin
//!
//! This module provides command-line interface functionality including:
//! - Argument parsing with clap
//! - Argument validation
//! - Command handlers for serve, info, check and send

pub mod executor;
pub mod handlers;
pub mod parser;
pub mod validation;

pub use executor::execute_command;
pub use parser::{Cli, Commands, LogLevel, LogOutputFormat};
