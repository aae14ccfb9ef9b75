//! Application configuration structs
//!
//! Loads configuration from environment variables (and a `.env` file when
//! present). Parsing goes through a lookup function so it can be exercised
//! without touching the process environment.

use std::env;
use std::str::FromStr;

use brag_core::{ScoringWeights, SnowflakeGenerator};
use serde::Deserialize;

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub app: AppSettings,
    pub database: DatabaseConfig,
    pub snowflake: SnowflakeConfig,
    pub engagement: EngagementConfig,
    pub scoring: ScoringWeights,
}

/// General application settings
#[derive(Debug, Clone, Deserialize)]
pub struct AppSettings {
    #[serde(default = "default_app_name")]
    pub name: String,
    #[serde(default = "default_env")]
    pub env: Environment,
}

/// Environment type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    #[must_use]
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }

    #[must_use]
    pub fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }
}

/// Database configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

/// Snowflake ID generator configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SnowflakeConfig {
    #[serde(default)]
    pub worker_id: u16,
}

/// Feature switches and policy knobs of the engagement engine
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct EngagementConfig {
    #[serde(default = "default_true")]
    pub reactions_enabled: bool,
    #[serde(default = "default_true")]
    pub comments_enabled: bool,
    /// Notify the target owner when a reaction switches kind
    #[serde(default)]
    pub notify_on_reaction_change: bool,
    /// Notify the parent author on replies
    #[serde(default = "default_true")]
    pub notify_reply_author: bool,
    /// Recompute affected scores right after each mutation
    #[serde(default)]
    pub eager_recompute: bool,
    #[serde(default = "default_max_shoutout_edits")]
    pub max_shoutout_edits: i32,
}

impl Default for EngagementConfig {
    fn default() -> Self {
        Self {
            reactions_enabled: true,
            comments_enabled: true,
            notify_on_reaction_change: false,
            notify_reply_author: true,
            eager_recompute: false,
            max_shoutout_edits: default_max_shoutout_edits(),
        }
    }
}

// Default value functions
fn default_app_name() -> String {
    "bragboard".to_string()
}

fn default_env() -> Environment {
    Environment::Development
}

fn default_max_connections() -> u32 {
    20
}

fn default_min_connections() -> u32 {
    5
}

fn default_true() -> bool {
    true
}

fn default_max_shoutout_edits() -> i32 {
    2
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    /// Returns an error if required environment variables are missing or malformed
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let vars = Vars(&lookup);
        let weights = ScoringWeights::default();

        Ok(Self {
            app: AppSettings {
                name: vars.get("APP_NAME").unwrap_or_else(default_app_name),
                env: vars
                    .get("APP_ENV")
                    .and_then(|s| match s.to_lowercase().as_str() {
                        "production" => Some(Environment::Production),
                        "staging" => Some(Environment::Staging),
                        "development" => Some(Environment::Development),
                        _ => None,
                    })
                    .unwrap_or_default(),
            },
            database: DatabaseConfig {
                url: vars
                    .get("DATABASE_URL")
                    .ok_or(ConfigError::MissingVar("DATABASE_URL"))?,
                max_connections: vars
                    .parse("DATABASE_MAX_CONNECTIONS")?
                    .unwrap_or_else(default_max_connections),
                min_connections: vars
                    .parse("DATABASE_MIN_CONNECTIONS")?
                    .unwrap_or_else(default_min_connections),
            },
            snowflake: SnowflakeConfig {
                worker_id: match vars.parse::<u16>("WORKER_ID")? {
                    Some(id) if id > SnowflakeGenerator::MAX_WORKER_ID => {
                        return Err(ConfigError::InvalidValue("WORKER_ID", id.to_string()));
                    }
                    id => id.unwrap_or(0),
                },
            },
            engagement: EngagementConfig {
                reactions_enabled: vars.flag("REACTIONS_ENABLED")?.unwrap_or(true),
                comments_enabled: vars.flag("COMMENTS_ENABLED")?.unwrap_or(true),
                notify_on_reaction_change: vars
                    .flag("NOTIFY_ON_REACTION_CHANGE")?
                    .unwrap_or(false),
                notify_reply_author: vars.flag("NOTIFY_REPLY_AUTHOR")?.unwrap_or(true),
                eager_recompute: vars.flag("EAGER_RECOMPUTE")?.unwrap_or(false),
                max_shoutout_edits: vars
                    .parse("MAX_SHOUTOUT_EDITS")?
                    .unwrap_or_else(default_max_shoutout_edits),
            },
            scoring: ScoringWeights {
                shoutout_sent: vars
                    .parse("SCORE_WEIGHT_SHOUTOUT_SENT")?
                    .unwrap_or(weights.shoutout_sent),
                tag_received: vars
                    .parse("SCORE_WEIGHT_TAG_RECEIVED")?
                    .unwrap_or(weights.tag_received),
                reaction_received: vars
                    .parse("SCORE_WEIGHT_REACTION_RECEIVED")?
                    .unwrap_or(weights.reaction_received),
                comment_received: vars
                    .parse("SCORE_WEIGHT_COMMENT_RECEIVED")?
                    .unwrap_or(weights.comment_received),
                reaction_given: vars
                    .parse("SCORE_WEIGHT_REACTION_GIVEN")?
                    .unwrap_or(weights.reaction_given),
            },
        })
    }
}

/// Typed access over a raw key lookup
struct Vars<'a, F>(&'a F);

impl<F> Vars<'_, F>
where
    F: Fn(&str) -> Option<String>,
{
    fn get(&self, key: &str) -> Option<String> {
        (self.0)(key).filter(|v| !v.trim().is_empty())
    }

    fn parse<T: FromStr>(&self, key: &'static str) -> Result<Option<T>, ConfigError> {
        self.get(key)
            .map(|raw| {
                raw.trim()
                    .parse()
                    .map_err(|_| ConfigError::InvalidValue(key, raw.clone()))
            })
            .transpose()
    }

    fn flag(&self, key: &'static str) -> Result<Option<bool>, ConfigError> {
        self.get(key)
            .map(|raw| match raw.trim().to_ascii_lowercase().as_str() {
                "true" | "1" | "yes" => Ok(true),
                "false" | "0" | "no" => Ok(false),
                _ => Err(ConfigError::InvalidValue(key, raw.clone())),
            })
            .transpose()
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(&'static str),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(pairs: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        AppConfig::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn test_environment_is_production() {
        assert!(!Environment::Development.is_production());
        assert!(!Environment::Staging.is_production());
        assert!(Environment::Production.is_production());
    }

    #[test]
    fn test_defaults() {
        let config = load(&[("DATABASE_URL", "postgres://localhost/brag")]).unwrap();
        assert_eq!(config.app.name, "bragboard");
        assert!(config.app.env.is_development());
        assert_eq!(config.database.max_connections, 20);
        assert_eq!(config.engagement, EngagementConfig::default());
        assert_eq!(config.scoring, ScoringWeights::default());
    }

    #[test]
    fn test_database_url_is_required() {
        let err = load(&[]).unwrap_err();
        assert!(matches!(err, ConfigError::MissingVar("DATABASE_URL")));
    }

    #[test]
    fn test_flags_and_weights() {
        let config = load(&[
            ("DATABASE_URL", "postgres://localhost/brag"),
            ("APP_ENV", "Production"),
            ("REACTIONS_ENABLED", "no"),
            ("NOTIFY_ON_REACTION_CHANGE", "1"),
            ("EAGER_RECOMPUTE", "yes"),
            ("SCORE_WEIGHT_TAG_RECEIVED", "3"),
            ("WORKER_ID", "12"),
        ])
        .unwrap();
        assert!(config.app.env.is_production());
        assert!(!config.engagement.reactions_enabled);
        assert!(config.engagement.notify_on_reaction_change);
        assert!(config.engagement.eager_recompute);
        assert_eq!(config.scoring.tag_received, 3);
        assert_eq!(config.scoring.shoutout_sent, 5);
        assert_eq!(config.snowflake.worker_id, 12);
    }

    #[test]
    fn test_malformed_values_are_rejected() {
        let err = load(&[
            ("DATABASE_URL", "postgres://localhost/brag"),
            ("COMMENTS_ENABLED", "maybe"),
        ])
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue("COMMENTS_ENABLED", _)));

        let err = load(&[
            ("DATABASE_URL", "postgres://localhost/brag"),
            ("MAX_SHOUTOUT_EDITS", "two"),
        ])
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue("MAX_SHOUTOUT_EDITS", _)));
    }

    #[test]
    fn test_worker_id_must_fit_the_id_layout() {
        let config = load(&[
            ("DATABASE_URL", "postgres://localhost/brag"),
            ("WORKER_ID", "1023"),
        ])
        .unwrap();
        assert_eq!(config.snowflake.worker_id, 1023);

        let err = load(&[
            ("DATABASE_URL", "postgres://localhost/brag"),
            ("WORKER_ID", "1024"),
        ])
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue("WORKER_ID", ref raw) if raw == "1024"));
    }
}
