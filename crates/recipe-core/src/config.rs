//! # Configuration
//!
//! Runtime knobs with defaults that match the home screen, each overridable
//! through a `RECIPE_*` environment variable. A `.env` file is honoured when
//! present.
//!
//! | Variable | Default | Accepted |
//! |---|---|---|
//! | `RECIPE_CHANNEL_BUFFER` | 32 | 1 and up |
//! | `RECIPE_RECENT_LIMIT` | 6 | 0 and up (0 shows nothing) |
//! | `RECIPE_POPULAR_LIMIT` | 4 | 0 and up (0 shows nothing) |
//! | `RECIPE_MINE_LIMIT` | 4 | 0 and up (0 shows nothing) |
//! | `RECIPE_POPULAR_MIN_RATING` | 4.0 | any number |

use std::env;
use std::num::NonZeroUsize;
use std::str::FromStr;
use thiserror::Error;
use tracing::{info, warn};

#[derive(Debug, Clone, Error, PartialEq)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {value:?}")]
    Invalid { key: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// Request buffer of each collection. Never zero.
    pub channel_buffer: usize,
    pub recent_limit: usize,
    pub popular_limit: usize,
    /// How many of the user's own recipes the home screen shows.
    pub mine_limit: usize,
    pub popular_min_rating: f32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            channel_buffer: 32,
            recent_limit: 6,
            popular_limit: 4,
            mine_limit: 4,
            popular_min_rating: 4.0,
        }
    }
}

impl AppConfig {
    /// Loads `.env` if present, then reads the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        if let Err(e) = dotenvy::dotenv() {
            warn!("No .env file found or failed to load: {}", e);
        }
        let config = Self::from_lookup(|key| env::var(key).ok())?;
        info!(?config, "Configuration loaded");
        Ok(config)
    }

    /// Builds a config from an arbitrary key lookup; unset keys keep defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        Ok(Self {
            channel_buffer: parse::<NonZeroUsize>(
                &lookup,
                "RECIPE_CHANNEL_BUFFER",
                NonZeroUsize::new(defaults.channel_buffer).unwrap_or(NonZeroUsize::MIN),
            )?
            .get(),
            recent_limit: parse(&lookup, "RECIPE_RECENT_LIMIT", defaults.recent_limit)?,
            popular_limit: parse(&lookup, "RECIPE_POPULAR_LIMIT", defaults.popular_limit)?,
            mine_limit: parse(&lookup, "RECIPE_MINE_LIMIT", defaults.mine_limit)?,
            popular_min_rating: parse(
                &lookup,
                "RECIPE_POPULAR_MIN_RATING",
                defaults.popular_min_rating,
            )?,
        })
    }
}

fn parse<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match lookup(key) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value: raw }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_unset_keys_keep_defaults() {
        let config = AppConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_overrides_are_parsed() {
        let vars = HashMap::from([
            ("RECIPE_RECENT_LIMIT", "10"),
            ("RECIPE_POPULAR_MIN_RATING", " 3.5 "),
        ]);
        let config =
            AppConfig::from_lookup(|key| vars.get(key).map(|v| v.to_string())).unwrap();
        assert_eq!(config.recent_limit, 10);
        assert_eq!(config.popular_min_rating, 3.5);
        assert_eq!(config.popular_limit, 4);
    }

    #[test]
    fn test_zero_channel_buffer_is_rejected() {
        let err = AppConfig::from_lookup(|key| {
            (key == "RECIPE_CHANNEL_BUFFER").then(|| "0".to_string())
        })
        .unwrap_err();
        assert_eq!(
            err,
            ConfigError::Invalid {
                key: "RECIPE_CHANNEL_BUFFER",
                value: "0".into()
            }
        );

        let config = AppConfig::from_lookup(|key| {
            (key == "RECIPE_MINE_LIMIT").then(|| "0".to_string())
        })
        .unwrap();
        assert_eq!(config.mine_limit, 0);
    }

    #[test]
    fn test_bad_value_is_reported() {
        let err = AppConfig::from_lookup(|key| {
            (key == "RECIPE_CHANNEL_BUFFER").then(|| "lots".to_string())
        })
        .unwrap_err();
        assert_eq!(
            err,
            ConfigError::Invalid {
                key: "RECIPE_CHANNEL_BUFFER",
                value: "lots".into()
            }
        );
    }
}
