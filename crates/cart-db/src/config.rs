//! Service configuration module.
//!
//! Configuration is loaded from environment variables with fallback to defaults.
//!
//! | Variable                   | Default     | Meaning                          |
//! |----------------------------|-------------|----------------------------------|
//! | `CART_DATABASE_PATH`       | `./cart.db` | SQLite file (`:memory:` allowed) |
//! | `CART_DB_MAX_CONNECTIONS`  | `5`         | Pool size                        |
//! | `CART_POINT_RATE_BPS`      | `1000`      | Accrual rate, 1000 = 10%         |
//! | `CART_POINT_VALIDITY_DAYS` | `30`        | Days until earned points expire  |
//! | `CART_ORDER_TIMEOUT_SECS`  | unset       | Placement deadline               |

use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use cart_core::validation::validate_point_rate_bps;
use cart_core::{PointPolicy, DEFAULT_POINT_RATE_BPS, DEFAULT_POINT_VALIDITY_DAYS};

use crate::pool::DbConfig;

/// Service configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    /// SQLite database file
    pub database_path: PathBuf,

    /// Maximum pooled connections
    pub db_max_connections: u32,

    /// Point accrual rate in basis points
    pub point_rate_bps: u32,

    /// Lifetime of earned points in days
    pub point_validity_days: i64,

    /// Deadline for one order placement; none means wait indefinitely
    pub order_timeout: Option<Duration>,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            database_path: PathBuf::from("./cart.db"),
            db_max_connections: 5,
            point_rate_bps: DEFAULT_POINT_RATE_BPS,
            point_validity_days: DEFAULT_POINT_VALIDITY_DAYS,
            order_timeout: None,
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from any key lookup.
    ///
    /// ## Example
    /// ```rust,ignore
    /// let config = AppConfig::from_lookup(|key| match key {
    ///     "CART_POINT_RATE_BPS" => Some("500".to_string()),
    ///     _ => None,
    /// })?;
    /// ```
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = AppConfig::default();

        let config = AppConfig {
            database_path: lookup("CART_DATABASE_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.database_path),

            db_max_connections: parse_or(&lookup, "CART_DB_MAX_CONNECTIONS", defaults.db_max_connections)?,

            point_rate_bps: parse_or(&lookup, "CART_POINT_RATE_BPS", defaults.point_rate_bps)?,

            point_validity_days: parse_or(
                &lookup,
                "CART_POINT_VALIDITY_DAYS",
                defaults.point_validity_days,
            )?,

            order_timeout: match lookup("CART_ORDER_TIMEOUT_SECS") {
                Some(raw) => {
                    let secs: u64 = raw
                        .trim()
                        .parse()
                        .map_err(|_| ConfigError::InvalidValue("CART_ORDER_TIMEOUT_SECS".to_string()))?;
                    if secs == 0 {
                        return Err(ConfigError::InvalidValue("CART_ORDER_TIMEOUT_SECS".to_string()));
                    }
                    Some(Duration::from_secs(secs))
                }
                None => None,
            },
        };

        if config.db_max_connections == 0 {
            return Err(ConfigError::InvalidValue("CART_DB_MAX_CONNECTIONS".to_string()));
        }
        config.point_policy()?;

        Ok(config)
    }

    /// Pool settings for this configuration.
    pub fn db_config(&self) -> DbConfig {
        if self.database_path.as_os_str() == ":memory:" {
            return DbConfig::in_memory();
        }
        DbConfig::new(self.database_path.clone()).max_connections(self.db_max_connections)
    }

    /// Accrual rate and validity for earned points.
    ///
    /// Range checks run again here; fields may be edited after [`AppConfig::load`].
    pub fn point_policy(&self) -> Result<PointPolicy, ConfigError> {
        validate_point_rate_bps(self.point_rate_bps)
            .map_err(|e| ConfigError::OutOfRange("CART_POINT_RATE_BPS".to_string(), e.to_string()))?;
        PointPolicy::new(self.point_rate_bps, self.point_validity_days).map_err(|e| {
            ConfigError::OutOfRange("CART_POINT_VALIDITY_DAYS".to_string(), e.to_string())
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue(key.to_string())),
        None => Ok(default),
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),

    #[error("{0} out of range: {1}")]
    OutOfRange(String, String),
}
