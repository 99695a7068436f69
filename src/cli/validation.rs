//! CLI argument validation functions
//!
//! This module provides custom validation functions for CLI arguments
//! that go beyond what clap can validate automatically.

use std::fs;
use std::path::PathBuf;

/// Longest request timeout accepted on the command line
pub const MAX_TIMEOUT_SECS: u64 = 300;

/// Validate that an input file exists and is readable
pub fn validate_input_file(path_str: &str) -> Result<PathBuf, String> {
    let path = PathBuf::from(path_str);

    if !path.exists() {
        return Err(format!("File does not exist: '{}'", path_str));
    }

    if !path.is_file() {
        return Err(format!("Path is not a file: '{}'", path_str));
    }

    match fs::File::open(&path) {
        Ok(_) => Ok(path),
        Err(e) => Err(format!("Cannot read file '{}': {}", path_str, e)),
    }
}

/// Validate the request timeout in seconds (1-300)
pub fn validate_timeout(secs_str: &str) -> Result<u64, String> {
    let secs: u64 = secs_str.trim().parse().map_err(|_| {
        format!(
            "Timeout must be a number of seconds between 1 and {}, got: '{}'",
            MAX_TIMEOUT_SECS, secs_str
        )
    })?;

    if secs == 0 || secs > MAX_TIMEOUT_SECS {
        return Err(format!(
            "Timeout must be between 1 and {} seconds, got: {}",
            MAX_TIMEOUT_SECS, secs
        ));
    }

    Ok(secs)
}
