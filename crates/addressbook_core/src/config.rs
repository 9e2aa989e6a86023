//! Runtime configuration resolved from the environment.
//!
//! | Variable | Default |
//! |---|---|
//! | `ADDRESSBOOK_DB_PATH` | `<temp dir>/addressbook.sqlite3` |
//! | `ADDRESSBOOK_LOG_LEVEL` | `default_log_level()` |
//! | `ADDRESSBOOK_LOG_DIR` | unset (logging disabled) |
//! | `ADDRESSBOOK_USER` | `local` |
//! | `ADDRESSBOOK_OWNERSHIP_POLICY` | `silent_noop` |
//!
//! Blank values are treated as unset.

use crate::logging::{default_log_level, normalize_level};
use crate::model::user::UserId;
use crate::service::people_service::OwnershipPolicy;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub const ENV_DB_PATH: &str = "ADDRESSBOOK_DB_PATH";
pub const ENV_LOG_LEVEL: &str = "ADDRESSBOOK_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "ADDRESSBOOK_LOG_DIR";
pub const ENV_USER: &str = "ADDRESSBOOK_USER";
pub const ENV_OWNERSHIP_POLICY: &str = "ADDRESSBOOK_OWNERSHIP_POLICY";

pub const DEFAULT_DB_FILE_NAME: &str = "addressbook.sqlite3";
pub const DEFAULT_USER_ID: &str = "local";

/// Invalid configuration value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError {
    pub key: &'static str,
    pub message: String,
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid {}: {}", self.key, self.message)
    }
}

impl Error for ConfigError {}

/// Effective settings for front ends (CLI, FFI).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub db_path: PathBuf,
    pub log_level: &'static str,
    /// Logging stays off when `None`.
    pub log_dir: Option<PathBuf>,
    pub user_id: UserId,
    pub ownership_policy: OwnershipPolicy,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            db_path: std::env::temp_dir().join(DEFAULT_DB_FILE_NAME),
            log_level: default_log_level(),
            log_dir: None,
            user_id: DEFAULT_USER_ID.to_string(),
            ownership_policy: OwnershipPolicy::default(),
        }
    }
}

impl AppConfig {
    /// Resolves configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolves configuration through an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let value = |key: &str| {
            lookup(key)
                .map(|raw| raw.trim().to_string())
                .filter(|trimmed| !trimmed.is_empty())
        };

        let mut config = Self::default();
        if let Some(path) = value(ENV_DB_PATH) {
            config.db_path = PathBuf::from(path);
        }
        if let Some(level) = value(ENV_LOG_LEVEL) {
            config.log_level = normalize_level(&level).map_err(|message| ConfigError {
                key: ENV_LOG_LEVEL,
                message,
            })?;
        }
        config.log_dir = value(ENV_LOG_DIR).map(PathBuf::from);
        if let Some(user) = value(ENV_USER) {
            config.user_id = user;
        }
        if let Some(policy) = value(ENV_OWNERSHIP_POLICY) {
            config.ownership_policy = policy.parse().map_err(|message| ConfigError {
                key: ENV_OWNERSHIP_POLICY,
                message,
            })?;
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::{AppConfig, ENV_DB_PATH, ENV_LOG_LEVEL, ENV_OWNERSHIP_POLICY, ENV_USER};
    use crate::service::people_service::OwnershipPolicy;
    use std::collections::HashMap;
    use std::path::PathBuf;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn empty_environment_uses_defaults() {
        let config = AppConfig::from_lookup(|_| None).expect("defaults resolve");
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.user_id, "local");
        assert!(config.db_path.ends_with("addressbook.sqlite3"));
    }

    #[test]
    fn environment_values_override_defaults() {
        let config = AppConfig::from_lookup(lookup(&[
            (ENV_DB_PATH, " /data/book.db "),
            (ENV_LOG_LEVEL, "WARNING"),
            (ENV_USER, "user-42"),
            (ENV_OWNERSHIP_POLICY, "reject"),
        ]))
        .expect("overrides resolve");

        assert_eq!(config.db_path, PathBuf::from("/data/book.db"));
        assert_eq!(config.log_level, "warn");
        assert_eq!(config.user_id, "user-42");
        assert_eq!(config.ownership_policy, OwnershipPolicy::Reject);
    }

    #[test]
    fn blank_values_are_ignored_and_bad_values_rejected() {
        let config = AppConfig::from_lookup(lookup(&[(ENV_USER, "   ")])).expect("blank ignored");
        assert_eq!(config.user_id, "local");

        let err = AppConfig::from_lookup(lookup(&[(ENV_LOG_LEVEL, "loud")]))
            .expect_err("unknown level rejected");
        assert_eq!(err.key, ENV_LOG_LEVEL);
    }
}
