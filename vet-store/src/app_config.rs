use serde::Deserialize;
use std::env;
use std::time::Duration;
use vet_shared::Masked;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub api: ApiConfig,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ApiConfig {
    pub base_url: String,
    pub token: Masked<String>,
    /// No timeout when unset
    #[serde(default)]
    pub timeout_seconds: Option<u64>,
}

impl ApiConfig {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_seconds.map(Duration::from_secs)
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct SessionConfig {
    /// JSON file backing the session store; in-memory when unset
    #[serde(default)]
    pub path: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    #[serde(default = "default_filter")]
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_filter(),
        }
    }
}

fn default_filter() -> String {
    "vet_core=info,vet_api=debug".into()
}

pub const ENV_PREFIX: &str = "VET";

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from("config")
    }

    /// Layered load: `{dir}/default`, `{dir}/{RUN_MODE}`, `{dir}/local`,
    /// then `VET_*` environment variables (`VET_API__BASE_URL`).
    pub fn load_from(dir: &str) -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = config::Config::builder()
            .add_source(config::File::with_name(&format!("{}/default", dir)).required(false))
            .add_source(config::File::with_name(&format!("{}/{}", dir, run_mode)).required(false))
            // Not checked in
            .add_source(config::File::with_name(&format!("{}/local", dir)).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?;

        s.try_deserialize()
    }

    pub fn from_toml(contents: &str) -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(config::File::from_str(contents, config::FileFormat::Toml))
            .build()?
            .try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_toml_with_defaults() {
        let config = Config::from_toml(
            r#"
            [api]
            base_url = "https://api.example.com/api"
            token = "secret-token"
            "#,
        )
        .unwrap();

        assert_eq!(config.api.base_url, "https://api.example.com/api");
        assert_eq!(config.api.token.expose(), "secret-token");
        assert_eq!(config.api.timeout(), None);
        assert_eq!(config.session.path, None);
        assert_eq!(config.logging.filter, "vet_core=info,vet_api=debug");
    }

    #[test]
    fn test_token_is_masked_in_debug() {
        let config = Config::from_toml(
            r#"
            [api]
            base_url = "https://api.example.com"
            token = "secret-token"
            timeout_seconds = 15
            "#,
        )
        .unwrap();

        let debug = format!("{:?}", config);
        assert!(!debug.contains("secret-token"));
        assert_eq!(config.api.timeout(), Some(Duration::from_secs(15)));
    }

    #[test]
    fn test_missing_api_section_fails() {
        assert!(Config::from_toml("[logging]\nfilter = \"debug\"").is_err());
    }

    #[test]
    fn test_load_layers_local_over_default() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("default.toml"),
            "[api]\nbase_url = \"https://default.example\"\ntoken = \"a\"\n",
        )
        .unwrap();
        std::fs::write(
            dir.path().join("local.toml"),
            "[api]\nbase_url = \"http://localhost:8080\"\n",
        )
        .unwrap();

        let config = Config::load_from(dir.path().to_str().unwrap()).unwrap();
        assert_eq!(config.api.base_url, "http://localhost:8080");
        assert_eq!(config.api.token.expose(), "a");
    }
}
