use thiserror::Error;

const DEFAULT_DATABASE_URL: &str = "sqlite:trusty_poll.db";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Expected {0} in the environment")]
    Missing(&'static str),
    #[error("{name} must be a numeric id, got '{value}'")]
    InvalidId { name: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub discord_token: String,
    pub database_url: String,
    /// Register commands for this guild only, which shows them instantly.
    pub guild_id: Option<u64>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let discord_token = lookup("DISCORD_TOKEN")
            .filter(|token| !token.trim().is_empty())
            .ok_or(ConfigError::Missing("DISCORD_TOKEN"))?;

        let database_url = lookup("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string());

        let guild_id = match lookup("GUILD_ID") {
            Some(value) if !value.trim().is_empty() => Some(value.trim().parse::<u64>().map_err(|_| {
                ConfigError::InvalidId {
                    name: "GUILD_ID",
                    value: value.clone(),
                }
            })?),
            _ => None,
        };

        Ok(Self {
            discord_token,
            database_url,
            guild_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_token_is_required() {
        assert_eq!(config(&[]).unwrap_err(), ConfigError::Missing("DISCORD_TOKEN"));
        assert_eq!(
            config(&[("DISCORD_TOKEN", "  ")]).unwrap_err(),
            ConfigError::Missing("DISCORD_TOKEN")
        );
    }

    #[test]
    fn test_defaults() {
        let config = config(&[("DISCORD_TOKEN", "abc")]).unwrap();
        assert_eq!(config.database_url, DEFAULT_DATABASE_URL);
        assert_eq!(config.guild_id, None);
    }

    #[test]
    fn test_guild_id_must_be_numeric() {
        let ok = config(&[("DISCORD_TOKEN", "abc"), ("GUILD_ID", "1234")]).unwrap();
        assert_eq!(ok.guild_id, Some(1234));

        assert!(matches!(
            config(&[("DISCORD_TOKEN", "abc"), ("GUILD_ID", "guild")]),
            Err(ConfigError::InvalidId { name: "GUILD_ID", .. })
        ));
    }
}
