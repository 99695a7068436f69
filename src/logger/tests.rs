//! Tests for the logger module

use crate::logger::config::*;
use crate::logger::open_log_file;
use std::io::Write;
use std::path::PathBuf;

#[cfg(test)]
mod config_tests {
    use super::*;

    /// Helper function to create a test configuration
    fn create_test_config() -> LoggerConfig {
        LoggerConfig {
            console: ConsoleConfig {
                enabled: true,
                colored: false,
                format: LogFormat::Full,
            },
            file: FileConfig {
                enabled: false,
                path: PathBuf::from("test.log"),
                append: true,
                format: LogFormat::Full,
            },
            level: "info".to_string(),
        }
    }

    #[test]
    fn test_default_config_creation() {
        let config = LoggerConfig::default();
        assert!(config.console.enabled);
        assert!(config.console.colored);
        assert!(!config.file.enabled);
        assert_eq!(config.level, "info");
    }

    #[test]
    fn test_config_validation() {
        let mut config = create_test_config();

        // Valid config should pass
        assert!(config.validate().is_ok());

        // Config with both outputs disabled should fail
        config.console.enabled = false;
        config.file.enabled = false;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_level_rejected() {
        let mut config = create_test_config();
        config.level = "verbose".to_string();
        assert!(config.validate().is_err());

        config.level = "WARN".to_string();
        assert_eq!(config.parse_level().unwrap(), tracing::Level::WARN);
    }

    #[test]
    fn test_enabled_file_needs_path() {
        let mut config = create_test_config();
        config.file = FileConfig::at("", LogFormat::Json);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_log_format_parsing() {
        assert_eq!(LogFormat::default(), LogFormat::Full);
        assert_eq!("JSON".parse::<LogFormat>().unwrap(), LogFormat::Json);
        assert_eq!("compact".parse::<LogFormat>().unwrap().as_str(), "compact");
        assert!("pretty".parse::<LogFormat>().is_err());
    }
}

#[cfg(test)]
mod file_tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_open_creates_parent_directories() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested/dir/ntfy.log");

        let mut file = open_log_file(&FileConfig::at(&path, LogFormat::Full)).unwrap();
        writeln!(file, "hello").unwrap();

        assert!(path.exists());
    }

    #[test]
    fn test_append_mode_keeps_content() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("ntfy.log");
        std::fs::write(&path, "first\n").unwrap();

        let mut file = open_log_file(&FileConfig::at(&path, LogFormat::Full)).unwrap();
        writeln!(file, "second").unwrap();
        drop(file);

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "first\nsecond\n");
    }

    #[test]
    fn test_truncate_mode_replaces_content() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("ntfy.log");
        std::fs::write(&path, "stale\n").unwrap();

        let mut config = FileConfig::at(&path, LogFormat::Json);
        config.append = false;
        let mut file = open_log_file(&config).unwrap();
        writeln!(file, "fresh").unwrap();
        drop(file);

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "fresh\n");
    }

    #[test]
    fn test_disabled_file_is_not_opened() {
        assert!(open_log_file(&FileConfig::default()).is_err());
    }
}
