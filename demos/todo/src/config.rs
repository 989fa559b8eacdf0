//! Runtime configuration read from the environment.
//!
//! | Variable                   | Default | Meaning                                  |
//! |----------------------------|---------|------------------------------------------|
//! | `TODO_BROADCAST_CAPACITY`  | `16`    | Buffered actions per action subscriber (1 to 65536) |
//! | `TODO_SHUTDOWN_TIMEOUT_MS` | `5000`  | How long `close` waits for effects       |
//! | `TODO_FIRST_ID`            | `1`     | Id given to the first added item         |

use composable_todo_runtime::StoreConfig;
use std::time::Duration;
use thiserror::Error;

/// Configuration errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// Variable is set but not a number
    #[error("{name} must be a non-negative integer, got `{value}`")]
    InvalidNumber {
        /// Variable name
        name: &'static str,
        /// Raw value
        value: String,
    },

    /// Variable must be at least 1
    #[error("{0} must be at least 1")]
    Zero(&'static str),

    /// Variable is above its allowed maximum
    #[error("{name} must be at most {max}")]
    TooLarge {
        /// Variable name
        name: &'static str,
        /// Largest accepted value
        max: usize,
    },
}

/// Settings for the todo app
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TodoConfig {
    /// Capacity of the applied-action broadcast channel
    pub broadcast_capacity: usize,
    /// Time allowed for in-flight effects on shutdown
    pub shutdown_timeout: Duration,
    /// First id handed out by the id generator
    pub first_id: u64,
}

impl Default for TodoConfig {
    fn default() -> Self {
        let store = StoreConfig::default();
        Self {
            broadcast_capacity: store.broadcast_capacity,
            shutdown_timeout: store.shutdown_timeout,
            first_id: 1,
        }
    }
}

impl TodoConfig {
    /// Read the configuration from process environment variables
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a variable is set to an invalid value.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read the configuration through `lookup`, falling back to defaults
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a variable is set to an invalid value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let broadcast_capacity = match parse_var(&lookup, "TODO_BROADCAST_CAPACITY")? {
            None => defaults.broadcast_capacity,
            Some(0) => return Err(ConfigError::Zero("TODO_BROADCAST_CAPACITY")),
            Some(n) => usize::try_from(n)
                .ok()
                .filter(|n| *n <= StoreConfig::MAX_BROADCAST_CAPACITY)
                .ok_or(ConfigError::TooLarge {
                    name: "TODO_BROADCAST_CAPACITY",
                    max: StoreConfig::MAX_BROADCAST_CAPACITY,
                })?,
        };

        let shutdown_timeout = parse_var(&lookup, "TODO_SHUTDOWN_TIMEOUT_MS")?
            .map_or(defaults.shutdown_timeout, Duration::from_millis);

        let first_id = parse_var(&lookup, "TODO_FIRST_ID")?.unwrap_or(defaults.first_id);
        if first_id == 0 {
            return Err(ConfigError::Zero("TODO_FIRST_ID"));
        }

        Ok(Self {
            broadcast_capacity,
            shutdown_timeout,
            first_id,
        })
    }

    /// Store settings derived from this configuration
    #[must_use]
    pub const fn store_config(&self) -> StoreConfig {
        StoreConfig::new(self.broadcast_capacity, self.shutdown_timeout)
    }
}

fn parse_var<F>(lookup: &F, name: &'static str) -> Result<Option<u64>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = lookup(name) else {
        return Ok(None);
    };
    raw.trim()
        .parse::<u64>()
        .map(Some)
        .map_err(|_| ConfigError::InvalidNumber { name, value: raw })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        let config = TodoConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, TodoConfig::default());
        assert_eq!(config.broadcast_capacity, 16);
        assert_eq!(config.shutdown_timeout, Duration::from_secs(5));
        assert_eq!(config.first_id, 1);
    }

    #[test]
    fn reads_all_variables() {
        let config = TodoConfig::from_lookup(lookup(&[
            ("TODO_BROADCAST_CAPACITY", "64"),
            ("TODO_SHUTDOWN_TIMEOUT_MS", " 250 "),
            ("TODO_FIRST_ID", "100"),
        ]))
        .unwrap();

        assert_eq!(config.broadcast_capacity, 64);
        assert_eq!(config.shutdown_timeout, Duration::from_millis(250));
        assert_eq!(config.first_id, 100);

        let store = config.store_config();
        assert_eq!(store.broadcast_capacity, 64);
        assert_eq!(store.shutdown_timeout, Duration::from_millis(250));
    }

    #[test]
    fn rejects_garbage() {
        let err = TodoConfig::from_lookup(lookup(&[("TODO_FIRST_ID", "one")])).unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidNumber {
                name: "TODO_FIRST_ID",
                value: "one".to_string(),
            }
        );
    }

    #[test]
    fn rejects_oversized_capacity() {
        let err = TodoConfig::from_lookup(lookup(&[(
            "TODO_BROADCAST_CAPACITY",
            "18446744073709551615",
        )]))
        .unwrap_err();
        assert_eq!(
            err,
            ConfigError::TooLarge {
                name: "TODO_BROADCAST_CAPACITY",
                max: 65_536,
            }
        );

        let config =
            TodoConfig::from_lookup(lookup(&[("TODO_BROADCAST_CAPACITY", "65536")])).unwrap();
        assert_eq!(config.broadcast_capacity, StoreConfig::MAX_BROADCAST_CAPACITY);
    }

    #[test]
    fn rejects_zero() {
        assert_eq!(
            TodoConfig::from_lookup(lookup(&[("TODO_BROADCAST_CAPACITY", "0")])),
            Err(ConfigError::Zero("TODO_BROADCAST_CAPACITY"))
        );
        assert_eq!(
            TodoConfig::from_lookup(lookup(&[("TODO_FIRST_ID", "0")])),
            Err(ConfigError::Zero("TODO_FIRST_ID"))
        );
    }
}
