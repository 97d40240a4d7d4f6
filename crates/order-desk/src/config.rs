//! Runtime configuration for the order desk.
//!
//! Every knob has a default and can be overridden from the environment:
//!
//! | Variable | Default |
//! |----------|---------|
//! | `ORDER_DESK_STORE_BUFFER` | 32 |
//! | `ORDER_DESK_FEED_CAPACITY` | 256 |
//! | `ORDER_DESK_REQUEST_TIMEOUT_MS` | 2000 |
//! | `ORDER_DESK_RETRY_ATTEMPTS` | 3 |
//! | `ORDER_DESK_RETRY_BASE_DELAY_MS` | 50 |

use crate::retry::RetryPolicy;
use std::time::Duration;
use thiserror::Error;

pub const ENV_STORE_BUFFER: &str = "ORDER_DESK_STORE_BUFFER";
pub const ENV_FEED_CAPACITY: &str = "ORDER_DESK_FEED_CAPACITY";
pub const ENV_REQUEST_TIMEOUT_MS: &str = "ORDER_DESK_REQUEST_TIMEOUT_MS";
pub const ENV_RETRY_ATTEMPTS: &str = "ORDER_DESK_RETRY_ATTEMPTS";
pub const ENV_RETRY_BASE_DELAY_MS: &str = "ORDER_DESK_RETRY_BASE_DELAY_MS";

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{key} must be a positive integer, got '{raw}'")]
    NotPositive { key: &'static str, raw: String },
}

/// Sizing and timing for the actors, clients and retries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeskConfig {
    /// Request channel capacity of each store actor.
    pub store_buffer: usize,
    /// How many change events a subscriber may lag before its subscription drops.
    pub feed_capacity: usize,
    /// Deadline for every request/response call against a store.
    pub request_timeout: Duration,
    /// Total attempts for a status transition, including the first.
    pub retry_attempts: u32,
    pub retry_base_delay: Duration,
}

impl Default for DeskConfig {
    fn default() -> Self {
        Self {
            store_buffer: 32,
            feed_capacity: 256,
            request_timeout: Duration::from_secs(2),
            retry_attempts: 3,
            retry_base_delay: Duration::from_millis(50),
        }
    }
}

impl DeskConfig {
    /// Loads configuration from process environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a variable is set but is not a positive integer.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_with(|key| std::env::var(key).ok())
    }

    /// Loads configuration with a custom environment source.
    pub fn from_env_with<F>(get_env: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let store_buffer = parse_positive(&get_env, ENV_STORE_BUFFER)?
            .map_or(Ok(defaults.store_buffer), |v| to_usize(ENV_STORE_BUFFER, v))?;
        let feed_capacity = parse_positive(&get_env, ENV_FEED_CAPACITY)?
            .map_or(Ok(defaults.feed_capacity), |v| to_usize(ENV_FEED_CAPACITY, v))?;
        let request_timeout = parse_positive(&get_env, ENV_REQUEST_TIMEOUT_MS)?
            .map_or(defaults.request_timeout, Duration::from_millis);
        let retry_attempts = parse_positive(&get_env, ENV_RETRY_ATTEMPTS)?
            .map_or(Ok(defaults.retry_attempts), |v| {
                u32::try_from(v).map_err(|_| ConfigError::NotPositive {
                    key: ENV_RETRY_ATTEMPTS,
                    raw: v.to_string(),
                })
            })?;
        let retry_base_delay = parse_positive(&get_env, ENV_RETRY_BASE_DELAY_MS)?
            .map_or(defaults.retry_base_delay, Duration::from_millis);

        Ok(Self {
            store_buffer,
            feed_capacity,
            request_timeout,
            retry_attempts,
            retry_base_delay,
        })
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.retry_attempts, self.retry_base_delay)
    }
}

fn parse_positive<F>(get_env: &F, key: &'static str) -> Result<Option<u64>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = get_env(key) else {
        return Ok(None);
    };
    match raw.trim().parse::<u64>() {
        Ok(value) if value > 0 => Ok(Some(value)),
        _ => Err(ConfigError::NotPositive { key, raw }),
    }
}

fn to_usize(key: &'static str, value: u64) -> Result<usize, ConfigError> {
    usize::try_from(value).map_err(|_| ConfigError::NotPositive {
        key,
        raw: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = DeskConfig::from_env_with(lookup(&[])).unwrap();
        assert_eq!(config, DeskConfig::default());
    }

    #[test]
    fn test_overrides_from_env() {
        let config = DeskConfig::from_env_with(lookup(&[
            (ENV_FEED_CAPACITY, "8"),
            (ENV_REQUEST_TIMEOUT_MS, "150"),
            (ENV_RETRY_ATTEMPTS, "5"),
        ]))
        .unwrap();
        assert_eq!(config.feed_capacity, 8);
        assert_eq!(config.request_timeout, Duration::from_millis(150));
        assert_eq!(config.retry_attempts, 5);
        assert_eq!(config.store_buffer, 32);
    }

    #[test]
    fn test_rejects_zero_and_garbage() {
        let err = DeskConfig::from_env_with(lookup(&[(ENV_STORE_BUFFER, "0")])).unwrap_err();
        assert_eq!(
            err,
            ConfigError::NotPositive {
                key: ENV_STORE_BUFFER,
                raw: "0".into()
            }
        );
        assert!(DeskConfig::from_env_with(lookup(&[(ENV_RETRY_BASE_DELAY_MS, "soon")])).is_err());
    }
}
