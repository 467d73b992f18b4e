//! Environment-driven configuration for the demo binary.

use std::env;

/// Error for configuration values that fail to parse.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Replication factor text that is not a positive integer.
    #[error("LOGISTICS_REPLICATION_FACTOR must be an integer >= 1, got {0:?}")]
    BadReplicationFactor(String),
}

/// Store connection settings, read from the environment with local-dev
/// defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Comma-separated contact points, split on load.
    pub contact_points: Vec<String>,
    /// Keyspace holding the projection tables.
    pub keyspace: String,
    /// Keyspace replication factor.
    pub replication_factor: u32,
}

impl Config {
    /// Read configuration from `LOGISTICS_CONTACT_POINTS`,
    /// `LOGISTICS_KEYSPACE`, and `LOGISTICS_REPLICATION_FACTOR`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::BadReplicationFactor`] if the replication
    /// factor is set but does not parse as a positive integer.
    pub fn from_env() -> Result<Self, ConfigError> {
        let contact_points = env::var("LOGISTICS_CONTACT_POINTS")
            .unwrap_or_else(|_| "127.0.0.1".to_string())
            .split(',')
            .map(|point| point.trim().to_string())
            .collect();
        let keyspace = env::var("LOGISTICS_KEYSPACE").unwrap_or_else(|_| "logistics".to_string());
        let replication_factor = parse_replication_factor(
            &env::var("LOGISTICS_REPLICATION_FACTOR").unwrap_or_else(|_| "1".to_string()),
        )?;
        Ok(Self {
            contact_points,
            keyspace,
            replication_factor,
        })
    }
}

fn parse_replication_factor(raw: &str) -> Result<u32, ConfigError> {
    raw.trim()
        .parse::<u32>()
        .ok()
        .filter(|factor| *factor >= 1)
        .ok_or_else(|| ConfigError::BadReplicationFactor(raw.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replication_factor_must_be_a_positive_integer() {
        assert!(matches!(parse_replication_factor("3"), Ok(3)));
        assert!(matches!(parse_replication_factor(" 1 "), Ok(1)));
        assert!(parse_replication_factor("0").is_err());
        assert!(parse_replication_factor("two").is_err());
        assert!(parse_replication_factor("").is_err());
    }
}
