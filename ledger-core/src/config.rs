//! Configuration for the ledger

use serde::{Deserialize, Serialize};

/// Ledger configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Input validation rules
    #[serde(default)]
    pub validation: ValidationConfig,
}

/// Rules applied to input records before aggregation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// Smallest participant count a ledger may have
    pub min_participants: usize,

    /// Reject expenses, transactions and base-state cells below zero
    pub reject_negative_amounts: bool,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            min_participants: 2,
            reject_negative_amounts: false,
        }
    }
}

impl Config {
    /// Load from file
    pub fn from_file(path: impl AsRef<std::path::Path>) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse from TOML text
    pub fn from_toml(content: &str) -> crate::Result<Self> {
        toml::from_str(content)
            .map_err(|e| crate::Error::Config(format!("Failed to parse config: {}", e)))
    }

    /// Load from environment variables
    pub fn from_env() -> crate::Result<Self> {
        let mut config = Config::default();
        config.apply_env()?;
        Ok(config)
    }

    /// Override fields from environment variables
    pub fn apply_env(&mut self) -> crate::Result<()> {
        if let Ok(min) = std::env::var("LEDGER_MIN_PARTICIPANTS") {
            self.validation.min_participants = min.parse().map_err(|_| {
                crate::Error::Config(format!("LEDGER_MIN_PARTICIPANTS: {:?} is not a count", min))
            })?;
        }

        if let Ok(flag) = std::env::var("LEDGER_REJECT_NEGATIVE_AMOUNTS") {
            self.validation.reject_negative_amounts = flag.parse().map_err(|_| {
                crate::Error::Config(format!(
                    "LEDGER_REJECT_NEGATIVE_AMOUNTS: {:?} is not true/false",
                    flag
                ))
            })?;
        }

        Ok(())
    }
}
