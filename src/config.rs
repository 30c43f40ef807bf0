use thiserror::Error;

use crate::pipeline::validator::DEFAULT_MAX_FILE_SIZE;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    /// Maximum size of a single uploaded file in bytes
    pub max_upload_size: u64,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_address: String,
}

#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Content directory holding one blob per file identifier
    pub upload_dir: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:9000".to_string(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            upload_dir: "./uploads".to_string(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            storage: StorageConfig::default(),
            max_upload_size: DEFAULT_MAX_FILE_SIZE,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // BIND_ADDRESS wins; PORT alone binds every interface
        let bind_address = lookup("BIND_ADDRESS")
            .or_else(|| lookup("PORT").map(|port| format!("0.0.0.0:{}", port.trim())))
            .unwrap_or_else(|| ServerConfig::default().bind_address);

        let upload_dir = lookup("UPLOAD_DIR").unwrap_or_else(|| StorageConfig::default().upload_dir);

        let max_upload_size = match lookup("MAX_UPLOAD_SIZE") {
            Some(raw) => raw.trim().parse().map_err(|_| {
                ConfigError::ValidationError(format!(
                    "MAX_UPLOAD_SIZE must be a byte count, got '{raw}'"
                ))
            })?,
            None => DEFAULT_MAX_FILE_SIZE,
        };

        let config = Config {
            server: ServerConfig { bind_address },
            storage: StorageConfig { upload_dir },
            max_upload_size,
        };

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.server.bind_address.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "BIND_ADDRESS cannot be empty".to_string(),
            ));
        }

        if self.storage.upload_dir.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "UPLOAD_DIR cannot be empty".to_string(),
            ));
        }

        if self.max_upload_size == 0 {
            return Err(ConfigError::ValidationError(
                "MAX_UPLOAD_SIZE must be greater than 0".to_string(),
            ));
        }

        if self.max_upload_size > usize::MAX as u64 / 2 {
            return Err(ConfigError::ValidationError(format!(
                "MAX_UPLOAD_SIZE of {} bytes is too large",
                self.max_upload_size
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[]).unwrap();
        assert_eq!(config.server.bind_address, "0.0.0.0:9000");
        assert_eq!(config.storage.upload_dir, "./uploads");
        assert_eq!(config.max_upload_size, 50 * 1024 * 1024);
    }

    #[test]
    fn test_port_sets_bind_address() {
        let config = load(&[("PORT", "8081")]).unwrap();
        assert_eq!(config.server.bind_address, "0.0.0.0:8081");
    }

    #[test]
    fn test_bind_address_overrides_port() {
        let config = load(&[("PORT", "8081"), ("BIND_ADDRESS", "127.0.0.1:7000")]).unwrap();
        assert_eq!(config.server.bind_address, "127.0.0.1:7000");
    }

    #[test]
    fn test_custom_values() {
        let config = load(&[("UPLOAD_DIR", "/srv/files"), ("MAX_UPLOAD_SIZE", "1024")]).unwrap();
        assert_eq!(config.storage.upload_dir, "/srv/files");
        assert_eq!(config.max_upload_size, 1024);
    }

    #[test]
    fn test_rejects_invalid_values() {
        assert!(load(&[("MAX_UPLOAD_SIZE", "lots")]).is_err());
        assert!(load(&[("MAX_UPLOAD_SIZE", "0")]).is_err());
        assert!(load(&[("UPLOAD_DIR", "  ")]).is_err());
    }
}
