//! Configuration management.
//!
//! Settings come from built-in defaults, then an optional TOML file, then
//! environment variables prefixed with `OPENALEX_WORKS` (nested keys use a
//! double underscore, e.g. `OPENALEX_WORKS_API__TIMEOUT_SECS=30`).
//!
//! ```toml
//! [api]
//! base_url = "https://api.openalex.org"
//! timeout_secs = 10
//! mailto = "you@example.org"
//!
//! [throttle]
//! related_delay_ms = 101
//! citing_delay_ms = 200
//! references_delay_ms = 200
//! ```

mod file_config;

pub use file_config::ConfigFileError;

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::sources::OPENALEX_API_BASE;

const CONFIG_FILE_NAME: &str = "openalex-works.toml";
const ENV_PREFIX: &str = "OPENALEX_WORKS";

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Remote API settings
    #[serde(default)]
    pub api: ApiConfig,

    /// Pauses between traversal requests
    #[serde(default)]
    pub throttle: ThrottleConfig,
}

/// OpenAlex API settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Contact address for the OpenAlex polite pool
    #[serde(default = "default_mailto")]
    pub mailto: Option<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            mailto: default_mailto(),
        }
    }
}

fn default_base_url() -> String {
    OPENALEX_API_BASE.to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_mailto() -> Option<String> {
    std::env::var("OPENALEX_EMAIL").ok().filter(|e| !e.is_empty())
}

/// Fixed pause after each fetch during a traversal, in milliseconds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThrottleConfig {
    #[serde(default = "default_related_delay")]
    pub related_delay_ms: u64,

    #[serde(default = "default_linked_delay")]
    pub citing_delay_ms: u64,

    #[serde(default = "default_linked_delay")]
    pub references_delay_ms: u64,
}

impl Default for ThrottleConfig {
    fn default() -> Self {
        Self {
            related_delay_ms: default_related_delay(),
            citing_delay_ms: default_linked_delay(),
            references_delay_ms: default_linked_delay(),
        }
    }
}

fn default_related_delay() -> u64 {
    101
}

fn default_linked_delay() -> u64 {
    200
}

/// Load configuration from a file, with environment overrides
pub fn load_config(path: &Path) -> Result<Config, config::ConfigError> {
    let settings = config::Config::builder()
        .add_source(config::File::from(path))
        .add_source(env_source())
        .build()?;

    settings.try_deserialize()
}

fn env_source() -> config::Environment {
    config::Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
}

/// Get the default configuration with environment overrides applied
pub fn get_config() -> Result<Config, config::ConfigError> {
    let settings = config::Config::builder()
        .add_source(env_source())
        .build()?;

    settings.try_deserialize()
}

/// Look for a config file in the working directory, then the user config dir
pub fn find_config_file() -> Option<PathBuf> {
    let local = PathBuf::from(CONFIG_FILE_NAME);
    if local.is_file() {
        return Some(local);
    }

    dirs::config_dir()
        .map(|dir| dir.join("openalex-works").join("config.toml"))
        .filter(|path| path.is_file())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.api.base_url, "https://api.openalex.org");
        assert_eq!(config.api.timeout_secs, 10);
        assert_eq!(config.throttle.related_delay_ms, 101);
        assert_eq!(config.throttle.citing_delay_ms, 200);
        assert_eq!(config.throttle.references_delay_ms, 200);
    }

    #[test]
    fn test_load_config_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let toml_content = r#"
[api]
base_url = "http://localhost:8080"
timeout_secs = 3
mailto = "lab@example.org"

[throttle]
related_delay_ms = 0
"#;
        let mut file = File::create(&path).unwrap();
        file.write_all(toml_content.as_bytes()).unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.api.base_url, "http://localhost:8080");
        assert_eq!(config.api.timeout_secs, 3);
        assert_eq!(config.api.mailto.as_deref(), Some("lab@example.org"));
        assert_eq!(config.throttle.related_delay_ms, 0);
        assert_eq!(config.throttle.citing_delay_ms, 200);
    }

    #[test]
    fn test_load_config_missing_sections() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("empty.toml");
        std::fs::write(&path, "").unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.api.timeout_secs, 10);
        assert_eq!(config.throttle, ThrottleConfig::default());
    }

    #[test]
    fn test_load_config_nonexistent() {
        assert!(load_config(Path::new("/nonexistent/openalex-works.toml")).is_err());
    }

    #[test]
    fn test_load_config_invalid_toml() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("invalid.toml");
        std::fs::write(&path, "invalid = toml = content").unwrap();

        assert!(load_config(&path).is_err());
    }
}
