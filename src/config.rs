//! Engine configuration.
//!
//! All fields have defaults, so an empty JSON object is a valid config.

use crate::settlement::exact::MAX_EXACT_PARTICIPANTS;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;

/// Largest supported minor-unit scale (fractional digits).
pub const MAX_MINOR_UNIT_SCALE: u32 = 10;

/// Errors arising from loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Which minimization algorithm the settlement engine runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// Largest debtor against largest creditor. At most `n - 1` transfers.
    #[default]
    Greedy,
    /// Maximum zero-sum partition. Provably minimal, exponential in `n`.
    Exact,
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strategy::Greedy => f.write_str("greedy"),
            Strategy::Exact => f.write_str("exact"),
        }
    }
}

impl FromStr for Strategy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "greedy" => Ok(Strategy::Greedy),
            "exact" => Ok(Strategy::Exact),
            other => Err(ConfigError::Invalid(format!(
                "unknown strategy '{other}', expected 'greedy' or 'exact'"
            ))),
        }
    }
}

/// Tunables for the splitter and the settlement engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Fractional digits of the currency's minor unit (2 = cents).
    pub minor_unit_scale: u32,
    /// Allowed deviation of percentage totals from 100, in percentage points.
    pub percentage_tolerance: Decimal,
    /// Allowed deviation of custom amounts from the expense total.
    pub amount_tolerance: Decimal,
    /// Balances at or below this magnitude count as settled.
    pub balance_tolerance: Decimal,
    pub strategy: Strategy,
    /// Above this many non-zero balances the exact strategy falls back to greedy.
    pub exact_max_participants: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            minor_unit_scale: 2,
            percentage_tolerance: dec!(0.01),
            amount_tolerance: dec!(0.01),
            balance_tolerance: dec!(0.005),
            strategy: Strategy::Greedy,
            exact_max_participants: 16,
        }
    }
}

impl EngineConfig {
    /// Load and validate a config from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&content)
    }

    pub fn from_json_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn with_strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// The smallest representable amount, e.g. 0.01 for a scale of 2.
    pub fn minor_unit(&self) -> Decimal {
        Decimal::new(1, self.minor_unit_scale)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.minor_unit_scale > MAX_MINOR_UNIT_SCALE {
            return Err(ConfigError::Invalid(format!(
                "minor_unit_scale must be at most {MAX_MINOR_UNIT_SCALE}, got {}",
                self.minor_unit_scale
            )));
        }
        for (name, value) in [
            ("percentage_tolerance", self.percentage_tolerance),
            ("amount_tolerance", self.amount_tolerance),
            ("balance_tolerance", self.balance_tolerance),
        ] {
            if value < Decimal::ZERO {
                return Err(ConfigError::Invalid(format!(
                    "{name} must not be negative, got {value}"
                )));
            }
        }
        if self.exact_max_participants > MAX_EXACT_PARTICIPANTS {
            return Err(ConfigError::Invalid(format!(
                "exact_max_participants must be at most {MAX_EXACT_PARTICIPANTS}, got {}",
                self.exact_max_participants
            )));
        }
        if self.balance_tolerance >= self.minor_unit() {
            return Err(ConfigError::Invalid(format!(
                "balance_tolerance {} must be below one minor unit ({})",
                self.balance_tolerance,
                self.minor_unit()
            )));
        }
        Ok(())
    }
}
