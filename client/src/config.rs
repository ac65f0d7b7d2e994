//! Client configuration.
//!
//! Defines the YAML-serializable settings that control how the utilities
//! reach the A10 API. Every field has a default, so a configuration file
//! only needs the settings it changes.
//!
//! # Example YAML
//!
//! ```yaml
//! default_port: 8080
//! api_path: /services/rest/V2.1/
//! connect_timeout_ms: 2000
//! read_timeout_ms: 10000
//! ```

use std::io::{BufReader, BufWriter};
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Result;

/// Environment variable naming a configuration file.
pub const CONFIG_ENV_VAR: &str = "A10_MONITORING_CONFIG";

/// Settings for reaching the A10 API.
///
/// # Examples
///
/// ```
/// # use a10_monitoring_client::ClientConfig;
/// let config: ClientConfig = serde_yaml::from_str("default_port: 8080").unwrap();
/// assert_eq!(config.default_port, 8080);
/// assert_eq!(config.api_path, "/services/rest/V2.1/");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Port used when the endpoint does not name one.
    pub default_port: u16,
    /// Path of the REST entry point.
    pub api_path: String,
    /// Connect timeout in milliseconds.
    pub connect_timeout_ms: u64,
    /// Read timeout in milliseconds.
    pub read_timeout_ms: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            default_port: 80,
            api_path: "/services/rest/V2.1/".to_string(),
            connect_timeout_ms: 5_000,
            read_timeout_ms: 30_000,
        }
    }
}

impl ClientConfig {
    /// Loads configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`Io`](crate::ClientError::Io) if the file cannot be read, or
    /// [`Yaml`](crate::ClientError::Yaml) if parsing fails.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        let reader = BufReader::new(file);
        let config = serde_yaml::from_reader(reader)?;
        Ok(config)
    }

    /// Saves the configuration as YAML.
    ///
    /// # Errors
    ///
    /// Returns [`Io`](crate::ClientError::Io) if the file cannot be written,
    /// or [`Yaml`](crate::ClientError::Yaml) if serialization fails.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = BufWriter::new(file);
        serde_yaml::to_writer(writer, self)?;
        Ok(())
    }

    /// Loads the file named by [`CONFIG_ENV_VAR`], or returns defaults.
    ///
    /// # Errors
    ///
    /// Same as [`ClientConfig::load`] when the variable is set.
    pub fn from_env() -> Result<Self> {
        Self::load_optional(std::env::var_os(CONFIG_ENV_VAR))
    }

    /// Loads `path` when given, or returns defaults.
    ///
    /// # Errors
    ///
    /// Same as [`ClientConfig::load`].
    pub fn load_optional(path: Option<impl AsRef<Path>>) -> Result<Self> {
        match path {
            Some(path) => {
                debug!(path = %path.as_ref().display(), "Loading client configuration");
                Self::load(path)
            }
            None => Ok(Self::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_complete() {
        let yaml = r#"
default_port: 8080
api_path: /axapi/
connect_timeout_ms: 100
read_timeout_ms: 200
"#;
        let config: ClientConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.default_port, 8080);
        assert_eq!(config.api_path, "/axapi/");
        assert_eq!(config.connect_timeout_ms, 100);
        assert_eq!(config.read_timeout_ms, 200);
    }

    #[test]
    fn test_deserialize_partial_uses_defaults() {
        let config: ClientConfig = serde_yaml::from_str("read_timeout_ms: 1").unwrap();
        assert_eq!(config.read_timeout_ms, 1);
        assert_eq!(config.default_port, 80);
        assert_eq!(config.connect_timeout_ms, 5_000);
    }

    #[test]
    fn test_load_save_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a10.yml");

        let original = ClientConfig {
            default_port: 8443,
            ..ClientConfig::default()
        };
        original.save(&path).unwrap();

        assert_eq!(ClientConfig::load(&path).unwrap(), original);
    }

    #[test]
    fn test_load_optional_without_path() {
        let config = ClientConfig::load_optional(None::<&Path>).unwrap();
        assert_eq!(config, ClientConfig::default());
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = ClientConfig::load(dir.path().join("missing.yml")).unwrap_err();
        assert!(matches!(err, crate::ClientError::Io(_)));
    }
}
