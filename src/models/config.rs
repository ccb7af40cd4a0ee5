//! Configuration model loaded from external sources.

use std::path::Path;
use std::time::Duration;

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

fn default_api_timeout_secs() -> u64 {
    10
}

fn default_cache_ttl_secs() -> u64 {
    30
}

fn default_cache_capacity() -> usize {
    256
}

#[derive(Clone, Debug, Deserialize)]
/// Basic configuration shared across handlers.
pub struct ServerConfig {
    pub domain: String,
    pub address: String,
    pub port: u16,
    pub templates_dir: String,
    pub secret: String,
    pub auth_service_url: String,
    /// Root of the Prophy REST API, e.g. `http://localhost:8000/api/`.
    pub api_base_url: String,
    #[serde(default = "default_api_timeout_secs")]
    pub api_timeout_secs: u64,
    /// Lifetime of cached list responses; `0` disables caching.
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,
    #[serde(default = "default_cache_capacity")]
    pub cache_capacity: usize,
}

impl ServerConfig {
    /// Loads `{dir}/default.yaml`, then the optional `{dir}/{app_env}.yaml`,
    /// then `APP_`-prefixed environment variables.
    pub fn load(dir: impl AsRef<Path>, app_env: &str) -> Result<Self, ConfigError> {
        let dir = dir.as_ref();
        let default = dir.join("default");
        let profile = dir.join(app_env);
        Config::builder()
            .add_source(File::with_name(&default.to_string_lossy()))
            .add_source(File::with_name(&profile.to_string_lossy()).required(false))
            .add_source(Environment::with_prefix("APP"))
            .build()?
            .try_deserialize()
    }

    pub fn api_timeout(&self) -> Duration {
        Duration::from_secs(self.api_timeout_secs)
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    const DEFAULT_YAML: &str = r#"
domain: prophy.test
address: 127.0.0.1
port: 8080
templates_dir: templates/**/*
secret: 0123456789012345678901234567890123456789012345678901234567890123
auth_service_url: http://auth.prophy.test
api_base_url: http://localhost:8000/api/
"#;

    #[test]
    fn loads_defaults_and_fills_optional_values() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("default.yaml"), DEFAULT_YAML).unwrap();

        let config = ServerConfig::load(dir.path(), "missing").unwrap();

        assert_eq!(config.port, 8080);
        assert_eq!(config.api_base_url, "http://localhost:8000/api/");
        assert_eq!(config.api_timeout(), Duration::from_secs(10));
        assert_eq!(config.cache_ttl_secs, 30);
        assert_eq!(config.cache_capacity, 256);
    }

    #[test]
    fn profile_file_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("default.yaml"), DEFAULT_YAML).unwrap();
        fs::write(
            dir.path().join("prod.yaml"),
            "port: 9000\ncache_ttl_secs: 0\n",
        )
        .unwrap();

        let config = ServerConfig::load(dir.path(), "prod").unwrap();

        assert_eq!(config.port, 9000);
        assert!(config.cache_ttl().is_zero());
        assert_eq!(config.domain, "prophy.test");
    }

    #[test]
    fn missing_default_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(ServerConfig::load(dir.path(), "local").is_err());
    }
}
