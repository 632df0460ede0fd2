//! Configuration for settlement engine

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Settlement engine configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Service name
    pub service_name: String,

    /// Service version
    pub service_version: String,

    /// Tracing filter directive (`RUST_LOG` syntax)
    pub log_filter: String,

    /// Ledger validation rules
    pub ledger: ledger_core::Config,

    /// Report output configuration
    pub report: ReportConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            service_name: "settle".to_string(),
            service_version: env!("CARGO_PKG_VERSION").to_string(),
            log_filter: "info".to_string(),
            ledger: ledger_core::Config::default(),
            report: ReportConfig::default(),
        }
    }
}

/// Report output configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Output format
    pub format: ReportFormat,

    /// Decimal places shown for amounts.
    /// `None` prints whole minor units, truncated toward zero.
    pub decimal_places: Option<u32>,

    /// Column width of the text tables
    pub column_width: usize,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            format: ReportFormat::Text,
            decimal_places: None,
            column_width: 12,
        }
    }
}

/// Report output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    /// Aligned text tables
    Text,
    /// JSON document
    Json,
}

impl FromStr for ReportFormat {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(ReportFormat::Text),
            "json" => Ok(ReportFormat::Json),
            other => Err(crate::Error::Config(format!(
                "Unknown report format {:?}",
                other
            ))),
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
        self.ledger.apply_env()?;

        if let Ok(format) = std::env::var("SETTLEMENT_REPORT_FORMAT") {
            self.report.format = format.parse()?;
        }

        if let Ok(places) = std::env::var("SETTLEMENT_DECIMAL_PLACES") {
            let places = places.parse().map_err(|_| {
                crate::Error::Config(format!(
                    "SETTLEMENT_DECIMAL_PLACES: {:?} is not a number",
                    places
                ))
            })?;
            self.report.decimal_places = Some(places);
        }

        if let Ok(filter) = std::env::var("SETTLEMENT_LOG_FILTER") {
            self.log_filter = filter;
        }

        Ok(())
    }
}
