use fundme_types::{FundMeError, Result, Usd, ETHER_DECIMALS, USD_DECIMALS};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::conversion::ConversionParams;

/// Largest power of ten that fits in u128
const MAX_DECIMALS: u8 = 38;

/// Policy fixed at ledger creation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FundMeConfig {
    /// Minimum deposit value in reference units (18 decimals)
    pub minimum_usd: Usd,

    /// Decimals of the native unit being deposited
    pub native_decimals: u8,

    /// Decimals of `minimum_usd` and of converted amounts
    pub reference_decimals: u8,

    /// Reject feed answers older than this; `None` disables the heartbeat check
    pub max_price_age_secs: Option<u64>,
}

impl Default for FundMeConfig {
    fn default() -> Self {
        Self {
            minimum_usd: Usd::from_dollars(50),
            native_decimals: ETHER_DECIMALS,
            reference_decimals: USD_DECIMALS,
            max_price_age_secs: None,
        }
    }
}

impl FundMeConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        let config: FundMeConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn validate(&self) -> Result<()> {
        if self.native_decimals > MAX_DECIMALS || self.reference_decimals > MAX_DECIMALS {
            return Err(FundMeError::ConfigError(format!(
                "decimals must be at most {} (native={}, reference={})",
                MAX_DECIMALS, self.native_decimals, self.reference_decimals
            )));
        }
        if self.max_price_age_secs == Some(0) {
            return Err(FundMeError::ConfigError(
                "max_price_age_secs must be positive when set".to_string(),
            ));
        }
        Ok(())
    }

    pub fn conversion(&self) -> ConversionParams {
        ConversionParams {
            native_decimals: self.native_decimals,
            reference_decimals: self.reference_decimals,
        }
    }
}
