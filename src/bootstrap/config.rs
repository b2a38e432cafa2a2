//! Configuration loader.
//!
//! Reads the TOML file into [`AppConfig`]. Value checks belong to the layers that use
//! the values; this module only reports I/O and parse errors with context.

use std::path::{Path, PathBuf};

use anyhow::Context;
use hm_core::config::RegistrationConfig;
use serde::{Deserialize, Serialize};

const APP_DIR_NAME: &str = "helpmate";
const CONFIG_FILE_NAME: &str = "config.toml";

/// Root of the configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub registration: RegistrationConfig,
    pub logging: LoggingConfig,
}

/// `[logging]` table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directives, used when `RUST_LOG` is not set.
    pub directives: Option<String>,
    /// Directory for the log file. No file logging when unset.
    pub log_dir: Option<PathBuf>,
}

/// `<config dir>/helpmate/config.toml`, when the platform has a config dir.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR_NAME).join(CONFIG_FILE_NAME))
}

/// Loads configuration from a TOML file.
///
/// A file that does not exist yields the defaults; missing keys take their defaults.
///
/// # Errors
///
/// Returns error if the file exists but cannot be read, or is not valid TOML for
/// [`AppConfig`].
pub fn load_config(config_path: &Path) -> anyhow::Result<AppConfig> {
    if !config_path.exists() {
        return Ok(AppConfig::default());
    }
    let content = std::fs::read_to_string(config_path)
        .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;
    toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", config_path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_config_reads_valid_toml() {
        let toml_content = r#"
            [registration]
            splash_dwell_ms = 500
            otp_resend_cooldown_secs = 10
            country_code = "+44"

            [logging]
            directives = "helpmate=trace"
            log_dir = "/var/log/helpmate"
        "#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(toml_content.as_bytes()).unwrap();

        let config = load_config(temp_file.path()).unwrap();

        assert_eq!(config.registration.splash_dwell_ms, 500);
        assert_eq!(config.registration.otp_resend_cooldown_secs, 10);
        assert_eq!(config.registration.country_code, "+44");
        assert_eq!(config.logging.directives.as_deref(), Some("helpmate=trace"));
        assert_eq!(
            config.logging.log_dir,
            Some(PathBuf::from("/var/log/helpmate"))
        );
    }

    #[test]
    fn test_load_config_fills_missing_sections_with_defaults() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[registration]\ncountry_code = \"+1\"\n")
            .unwrap();

        let config = load_config(temp_file.path()).unwrap();

        assert_eq!(config.registration.country_code, "+1");
        assert_eq!(config.registration.splash_dwell_ms, 2000);
        assert_eq!(config.registration.otp_resend_cooldown_secs, 30);
        assert_eq!(config.logging, LoggingConfig::default());
    }

    #[test]
    fn test_load_config_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();

        let config = load_config(&dir.path().join("absent.toml")).unwrap();

        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_load_config_reports_invalid_toml() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[registration\nsplash_dwell_ms = ")
            .unwrap();

        let err = load_config(temp_file.path()).unwrap_err();

        assert!(err.to_string().contains("Failed to parse config file"));
    }

    #[test]
    fn test_load_config_rejects_wrong_types() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[registration]\notp_resend_cooldown_secs = \"soon\"\n")
            .unwrap();

        assert!(load_config(temp_file.path()).is_err());
    }
}
