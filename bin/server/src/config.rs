//! Centralized server configuration.
//!
//! Strongly-typed configuration loaded via the `config` crate from
//! environment variables, e.g. `DATABASE_URL`, `LISTEN_ADDR`, and
//! `GATEWAY__API_KEY` / `GATEWAY__MODEL` for the nested gateway
//! settings.

use serde::Deserialize;
use taskmate_ai::CohereConfig;

/// Server configuration composed from library configs.
#[derive(Debug, Deserialize)]
pub struct ServerConfig {
    /// PostgreSQL database connection URL.
    pub database_url: String,

    /// Address to listen on.
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,

    /// Language-model gateway configuration.
    pub gateway: CohereConfig,
}

fn default_listen_addr() -> String {
    "127.0.0.1:3000".to_string()
}

impl ServerConfig {
    /// Loads configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if required configuration is missing or invalid.
    pub fn from_env() -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(
                config::Environment::default()
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn listen_addr_has_a_default() {
        assert_eq!(default_listen_addr(), "127.0.0.1:3000");
    }

    #[test]
    fn gateway_config_defaults() {
        let gateway: CohereConfig =
            serde_json::from_str(r#"{"api_key": "secret"}"#).expect("deserialize");
        assert_eq!(gateway.model, "command-r-08-2024");
        assert_eq!(gateway.timeout_secs, 30);
    }
}
