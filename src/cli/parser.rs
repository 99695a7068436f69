//! CLI argument parsing with clap
//!
//! This module defines the command-line interface structure using clap,
//! including all commands, arguments, and their documentation.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::time::Duration;

use crate::logger::{ConsoleConfig, FileConfig, LogFormat, LoggerConfig};

/// Icinga Notifications channel plugin for ntfy
#[derive(Parser, Debug)]
#[command(name = "ntfy")]
#[command(about = "Icinga Notifications channel plugin that forwards alerts to ntfy")]
#[command(long_about = "
ntfy is a channel plugin for Icinga Notifications. The notification daemon
starts it and talks to it over stdin/stdout; every notification it receives
is published to a topic on an ntfy server.

EXAMPLES:
    # Run as a channel plugin (what the daemon does)
    ntfy

    # Show the plugin description and configuration schema
    ntfy info

    # Validate a plugin configuration without sending anything
    ntfy check --config channel.json

    # Deliver one notification request by hand
    ntfy send --config channel.json --request event.json

Logs go to stderr and, with --log-file, to a file. stdout is reserved for
the plugin protocol.
")]
#[command(version = crate::clap_long_version())]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Log level
    ///
    /// Available levels: error, warn, info, debug, trace
    #[arg(long, value_enum, global = true, env = "NTFY_CHANNEL_LOG_LEVEL", default_value = "info")]
    pub log_level: LogLevel,

    /// Log line format
    #[arg(long, value_enum, global = true, env = "NTFY_CHANNEL_LOG_FORMAT", default_value = "full")]
    pub log_format: LogOutputFormat,

    /// Also write logs to this file (appended, JSON lines)
    #[arg(long, value_name = "FILE", global = true, env = "NTFY_CHANNEL_LOG_FILE")]
    pub log_file: Option<PathBuf>,

    /// Disable ANSI colors on stderr
    #[arg(long, global = true, env = "NTFY_CHANNEL_NO_COLOR")]
    pub no_color: bool,

    /// Timeout for requests to the ntfy server, in seconds
    #[arg(
        long,
        value_name = "SECS",
        global = true,
        env = "NTFY_CHANNEL_TIMEOUT",
        default_value = "30",
        value_parser = super::validation::validate_timeout
    )]
    pub timeout: u64,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Run the plugin protocol on stdin/stdout (default)
    Serve,
    /// Print the plugin description as JSON
    Info,
    /// Validate a plugin configuration and print the effective settings
    ///
    /// Secrets are redacted in the output. Nothing is sent.
    Check {
        /// Plugin configuration as a JSON object
        #[arg(short, long, value_name = "FILE", value_parser = super::validation::validate_input_file)]
        config: PathBuf,
    },
    /// Deliver one notification request
    ///
    /// Examples:
    ///   ntfy send -c channel.json -r event.json
    Send {
        /// Plugin configuration as a JSON object
        #[arg(short, long, value_name = "FILE", value_parser = super::validation::validate_input_file)]
        config: PathBuf,

        /// Notification request as sent by the daemon
        #[arg(short, long, value_name = "FILE", value_parser = super::validation::validate_input_file)]
        request: PathBuf,
    },
}

/// Log level options
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogLevel {
    #[value(name = "error")]
    Error,
    #[value(name = "warn", alias = "warning")]
    Warn,
    #[value(name = "info")]
    Info,
    #[value(name = "debug")]
    Debug,
    #[value(name = "trace")]
    Trace,
}

/// Log format options
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogOutputFormat {
    Full,
    Compact,
    Json,
}

impl Cli {
    /// The subcommand to run, `serve` when none was given
    pub fn command(&self) -> Commands {
        self.command.clone().unwrap_or(Commands::Serve)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }

    /// Logger settings derived from the global flags
    pub fn logger_config(&self) -> LoggerConfig {
        let file = match &self.log_file {
            Some(path) => FileConfig::at(path, LogFormat::Json),
            None => FileConfig::default(),
        };

        LoggerConfig {
            console: ConsoleConfig {
                enabled: true,
                colored: !self.no_color,
                format: self.log_format.into(),
            },
            file,
            level: String::from(self.log_level),
        }
    }
}

impl From<LogLevel> for String {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => "error".to_string(),
            LogLevel::Warn => "warn".to_string(),
            LogLevel::Info => "info".to_string(),
            LogLevel::Debug => "debug".to_string(),
            LogLevel::Trace => "trace".to_string(),
        }
    }
}

impl From<LogOutputFormat> for LogFormat {
    fn from(format: LogOutputFormat) -> Self {
        match format {
            LogOutputFormat::Full => LogFormat::Full,
            LogOutputFormat::Compact => LogFormat::Compact,
            LogOutputFormat::Json => LogFormat::Json,
        }
    }
}
