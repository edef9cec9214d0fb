use std::env;

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("PORT must be a valid number, got '{0}'")]
    InvalidPort(String),
    #[error("{key} must be true or false, got '{value}'")]
    InvalidFlag { key: &'static str, value: String },
}

/// Runtime settings, read from the environment (and `.env` via dotenvy).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Orders are kept in memory when unset.
    pub database_url: Option<String>,
    pub host: String,
    pub port: u16,
    pub seed_sample_data: bool,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL").filter(|url| !url.trim().is_empty());
        let host = lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let port = match lookup("PORT") {
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidPort(raw))?,
            None => 8080,
        };
        let seed_sample_data = match lookup("SEED_SAMPLE_DATA") {
            Some(raw) => parse_flag("SEED_SAMPLE_DATA", raw)?,
            None => false,
        };

        Ok(Self {
            database_url,
            host,
            port,
            seed_sample_data,
        })
    }
}

fn parse_flag(key: &'static str, raw: String) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" => Ok(true),
        "0" | "false" | "no" | "" => Ok(false),
        _ => Err(ConfigError::InvalidFlag { key, value: raw }),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let config = config(&[]).expect("defaults are valid");
        assert_eq!(
            config,
            Config {
                database_url: None,
                host: "0.0.0.0".to_string(),
                port: 8080,
                seed_sample_data: false,
            }
        );
    }

    #[test]
    fn reads_all_variables() {
        let config = config(&[
            ("DATABASE_URL", "postgres://u:p@localhost/shop"),
            ("HOST", "127.0.0.1"),
            ("PORT", "9090"),
            ("SEED_SAMPLE_DATA", "TRUE"),
        ])
        .expect("valid config");
        assert_eq!(
            config.database_url.as_deref(),
            Some("postgres://u:p@localhost/shop")
        );
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 9090);
        assert!(config.seed_sample_data);
    }

    #[test]
    fn blank_database_url_means_in_memory() {
        assert_eq!(config(&[("DATABASE_URL", "  ")]).unwrap().database_url, None);
    }

    #[test]
    fn bad_port_is_reported() {
        assert_eq!(
            config(&[("PORT", "eighty")]).unwrap_err(),
            ConfigError::InvalidPort("eighty".to_string())
        );
        assert!(config(&[("PORT", "70000")]).is_err());
    }

    #[test]
    fn bad_flag_is_reported() {
        let err = config(&[("SEED_SAMPLE_DATA", "maybe")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidFlag { key: "SEED_SAMPLE_DATA", .. }));
    }
}
