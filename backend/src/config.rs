//! Runtime configuration.
//!
//! Read from a TOML file (`FARMSYNC_CONFIG`, default `farmsync.toml`). Every
//! key is optional and a missing file means "all defaults", so a bare binary
//! starts with a local `farmsync.sqlite`. `FARMSYNC_DATABASE` and
//! `FARMSYNC_PORT` override the file for container deployments.
//!
//! ```toml
//! host = "0.0.0.0"
//! port = 8080
//! database_path = "/var/lib/farmsync/farmsync.sqlite"
//! static_dir = "/srv/farmsync/dashboard"
//! json_limit_bytes = 10485760
//! log_level = "info"
//! ```

use anyhow::Context;
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const CONFIG_ENV: &str = "FARMSYNC_CONFIG";
pub const DATABASE_ENV: &str = "FARMSYNC_DATABASE";
pub const PORT_ENV: &str = "FARMSYNC_PORT";
const DEFAULT_CONFIG_PATH: &str = "farmsync.toml";

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub database_path: PathBuf,
    /// Pre-built dashboard assets served at `/` when set.
    pub static_dir: Option<PathBuf>,
    /// Upper bound for JSON bodies; a device backlog upload can be large.
    pub json_limit_bytes: usize,
    /// Default `env_logger` filter; `RUST_LOG` still takes precedence.
    pub log_level: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            database_path: PathBuf::from("farmsync.sqlite"),
            static_dir: None,
            json_limit_bytes: 10 * 1024 * 1024, // 10 MB
            log_level: "info".to_string(),
        }
    }
}

impl ServerConfig {
    /// Loads configuration from file, falling back to defaults if it does not exist.
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::parse(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    pub fn parse(content: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Resolves the config file from the environment and applies overrides.
    pub fn from_env() -> anyhow::Result<Self> {
        let path = std::env::var(CONFIG_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        Self::load(path)?.with_overrides(|key| std::env::var(key).ok())
    }

    fn with_overrides<F>(mut self, lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(db) = lookup(DATABASE_ENV).filter(|v| !v.trim().is_empty()) {
            self.database_path = PathBuf::from(db);
        }
        if let Some(port) = lookup(PORT_ENV) {
            self.port = port
                .trim()
                .parse()
                .with_context(|| format!("{PORT_ENV} is not a valid port: {port}"))?;
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn empty_file_gives_defaults() {
        assert_eq!(ServerConfig::parse("").unwrap(), ServerConfig::default());
    }

    #[test]
    fn partial_file_overrides_only_given_keys() {
        let config = ServerConfig::parse(
            r#"
            port = 9090
            static_dir = "dashboard"
            "#,
        )
        .unwrap();
        assert_eq!(config.port, 9090);
        assert_eq!(config.static_dir, Some(PathBuf::from("dashboard")));
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.database_path, PathBuf::from("farmsync.sqlite"));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(ServerConfig::parse("prot = 1").is_err());
    }

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = ServerConfig::load(dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, ServerConfig::default());
    }

    #[test]
    fn file_is_read_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("farmsync.toml");
        std::fs::write(&path, "log_level = \"debug\"\njson_limit_bytes = 2048\n").unwrap();
        let config = ServerConfig::load(&path).unwrap();
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.json_limit_bytes, 2048);
    }

    #[test]
    fn environment_overrides_apply() {
        let env: HashMap<&str, &str> =
            HashMap::from([(DATABASE_ENV, "/data/farm.sqlite"), (PORT_ENV, "7000")]);
        let config = ServerConfig::default()
            .with_overrides(|key| env.get(key).map(|v| v.to_string()))
            .unwrap();
        assert_eq!(config.database_path, PathBuf::from("/data/farm.sqlite"));
        assert_eq!(config.port, 7000);
    }

    #[test]
    fn invalid_port_override_is_an_error() {
        let result = ServerConfig::default().with_overrides(|key| {
            (key == PORT_ENV).then(|| "eighty".to_string())
        });
        assert!(result.is_err());
    }
}
