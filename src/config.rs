use serde::{Deserialize, Serialize};
use std::{env, fs, io};
use thiserror::Error;

/// Connection string selecting the in-process document store.
pub const MEMORY_STORE_URL: &str = "memory://";

pub const DATABASE_URL_VAR: &str = "DATABASE_URL";
pub const DATABASE_NAME_VAR: &str = "DATABASE_NAME";
pub const PORT_VAR: &str = "PORT";
pub const LOG_LEVEL_VAR: &str = "LOG_LEVEL";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read { path: String, source: io::Error },

    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: String,
        source: serde_yaml::Error,
    },

    #[error("Invalid {key} value: {value}")]
    InvalidValue { key: &'static str, value: String },
}

/// Where the loaded configuration came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    File(String),
    /// The named file was missing
    Defaults(String),
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AppConfig {
    pub log_level: String,
    pub log_dir: String,
    pub log_file: String,
    pub use_json: bool,
    pub rotation: String,
    pub gateway: GatewayConfig,
    /// Document store connection string (`postgres://...` or `memory://`)
    #[serde(default)]
    pub database_url: Option<String>,
    /// PostgreSQL schema that holds the document table
    #[serde(default)]
    pub database_name: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct GatewayConfig {
    pub host: String,
    pub port: u16,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_dir: "./logs".to_string(),
            log_file: "snacksprint.log".to_string(),
            use_json: false,
            rotation: "daily".to_string(),
            gateway: GatewayConfig::default(),
            database_url: None,
            database_name: None,
        }
    }
}

impl AppConfig {
    /// Load `config/{env}.yaml`, then apply environment overrides.
    ///
    /// A missing file is not an error: built-in defaults are used instead,
    /// reported as [`ConfigSource::Defaults`] so the caller can log it once
    /// logging is up.
    pub fn load(env_name: &str) -> Result<(Self, ConfigSource), ConfigError> {
        let config_path = Self::path_for(env_name);
        let (config, source) = match fs::read_to_string(&config_path) {
            Ok(content) => (
                Self::from_yaml(&config_path, &content)?,
                ConfigSource::File(config_path),
            ),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                (Self::default(), ConfigSource::Defaults(config_path))
            }
            Err(source) => {
                return Err(ConfigError::Read {
                    path: config_path,
                    source,
                });
            }
        };

        let config = config.with_overrides(|key| env::var(key).ok())?;
        config.validate()?;
        Ok((config, source))
    }

    fn path_for(env_name: &str) -> String {
        format!("config/{}.yaml", env_name)
    }

    fn from_yaml(path: &str, content: &str) -> Result<Self, ConfigError> {
        serde_yaml::from_str(content).map_err(|source| ConfigError::Parse {
            path: path.to_string(),
            source,
        })
    }

    /// Apply overrides from a variable lookup (the process environment in production).
    pub fn with_overrides<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(DATABASE_URL_VAR).filter(|v| !v.is_empty()) {
            self.database_url = Some(url);
        }
        if let Some(name) = lookup(DATABASE_NAME_VAR).filter(|v| !v.is_empty()) {
            self.database_name = Some(name);
        }
        if let Some(port) = lookup(PORT_VAR) {
            self.gateway.port = port.parse().map_err(|_| ConfigError::InvalidValue {
                key: PORT_VAR,
                value: port,
            })?;
        }
        if let Some(level) = lookup(LOG_LEVEL_VAR) {
            self.log_level = level;
        }
        Ok(self)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if let Some(name) = &self.database_name {
            if !is_valid_schema_name(name) {
                return Err(ConfigError::InvalidValue {
                    key: DATABASE_NAME_VAR,
                    value: name.clone(),
                });
            }
        }
        Ok(())
    }

    /// Store-backed mode needs both a connection string and a database name.
    pub fn store_settings(&self) -> Option<(&str, &str)> {
        match (&self.database_url, &self.database_name) {
            (Some(url), Some(name)) => Some((url.as_str(), name.as_str())),
            _ => None,
        }
    }
}

pub(crate) fn is_valid_schema_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_are_demo_mode() {
        let config = AppConfig::default();
        assert_eq!(config.gateway.port, 8000);
        assert!(config.store_settings().is_none());
    }

    #[test]
    fn test_env_overrides() {
        let config = AppConfig::default()
            .with_overrides(lookup(&[
                ("DATABASE_URL", "postgres://localhost/app"),
                ("DATABASE_NAME", "snacks"),
                ("PORT", "9090"),
            ]))
            .unwrap();

        assert_eq!(config.gateway.port, 9090);
        assert_eq!(
            config.store_settings(),
            Some(("postgres://localhost/app", "snacks"))
        );
    }

    #[test]
    fn test_store_requires_both_settings() {
        let config = AppConfig::default()
            .with_overrides(lookup(&[("DATABASE_URL", "memory://")]))
            .unwrap();
        assert!(config.store_settings().is_none());
    }

    #[test]
    fn test_empty_env_values_ignored() {
        let config = AppConfig::default()
            .with_overrides(lookup(&[("DATABASE_URL", ""), ("DATABASE_NAME", "")]))
            .unwrap();
        assert!(config.database_url.is_none());
        assert!(config.database_name.is_none());
    }

    #[test]
    fn test_invalid_port_rejected() {
        let err = AppConfig::default()
            .with_overrides(lookup(&[("PORT", "eighty")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { key: "PORT", .. }));
    }

    #[test]
    fn test_schema_name_validation() {
        assert!(is_valid_schema_name("snacksprint"));
        assert!(is_valid_schema_name("_app_01"));
        assert!(!is_valid_schema_name("1app"));
        assert!(!is_valid_schema_name("app; DROP TABLE x"));
        assert!(!is_valid_schema_name(""));

        let config = AppConfig {
            database_name: Some("bad-name".to_string()),
            ..AppConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_reports_source() {
        let (_, source) = AppConfig::load("no-such-env").unwrap();
        assert_eq!(
            source,
            ConfigSource::Defaults("config/no-such-env.yaml".to_string())
        );

        let (config, source) = AppConfig::load("dev").unwrap();
        assert_eq!(source, ConfigSource::File("config/dev.yaml".to_string()));
        assert_eq!(config.log_file, "snacksprint.log");
    }

    #[test]
    fn test_parse_yaml() {
        let yaml = r#"
log_level: debug
log_dir: ./logs
log_file: app.log
use_json: true
rotation: hourly
gateway:
  host: 127.0.0.1
  port: 8081
database_url: memory://
database_name: demo
"#;
        let config = AppConfig::from_yaml("inline", yaml).unwrap();
        assert_eq!(config.gateway.host, "127.0.0.1");
        assert_eq!(config.store_settings(), Some(("memory://", "demo")));
        assert!(config.use_json);
    }
}
