use std::num::ParseIntError;
use std::time::Duration;

use thiserror::Error;

pub const HOST_VAR: &str = "PIHOLE_HOST";
pub const TOKEN_VAR: &str = "PIHOLE_TOKEN";
pub const TIMEOUT_VAR: &str = "PIHOLE_TIMEOUT_SECONDS";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} environment variable is NOT set")]
    MissingVar(&'static str),
    #[error("couldn't parse {key}: {source}")]
    InvalidVar {
        key: &'static str,
        #[source]
        source: ParseIntError,
    },
}

/// Connection settings, built once at start-up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Example: `192.168.1.2` or `pi.hole`
    pub host: String,
    /// API token (see `/etc/pihole/setupVars.conf`), `None` if empty
    pub token: Option<String>,
    /// Applied to every request
    pub timeout: Duration,
}

impl Config {
    /// Read the configuration from the process environment.
    ///
    /// Call `dotenv::dotenv()` first to pick up a `.env` file.
    pub fn from_env() -> Result<Config, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read the configuration through `lookup`, which maps a variable name to its value.
    pub fn from_lookup<F>(lookup: F) -> Result<Config, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = lookup(HOST_VAR).ok_or(ConfigError::MissingVar(HOST_VAR))?;
        let token = lookup(TOKEN_VAR).ok_or(ConfigError::MissingVar(TOKEN_VAR))?;

        let timeout = match lookup(TIMEOUT_VAR) {
            None => DEFAULT_TIMEOUT,
            Some(s) => s
                .trim()
                .parse::<u64>()
                .map(Duration::from_secs)
                .map_err(|source| ConfigError::InvalidVar {
                    key: TIMEOUT_VAR,
                    source,
                })?,
        };

        Ok(Config {
            host,
            token: Some(token).filter(|t| !t.is_empty()),
            timeout,
        })
    }
}
