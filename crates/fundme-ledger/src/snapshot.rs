use fundme_types::{Address, FundMeError, Result, Wei};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::config::FundMeConfig;
use crate::registry::FunderRecord;

/// Persisted ledger state: everything except the feed and the bank
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    pub address: Address,
    pub owner: Address,
    pub config: FundMeConfig,
    /// Funders in first-deposit order
    pub funders: Vec<FunderRecord>,
    pub pooled_balance: Wei,
}

impl LedgerSnapshot {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_json(&std::fs::read_to_string(path)?)
    }

    /// Balances must add up to the pooled balance, and the escrow cannot be the owner
    pub fn check_consistency(&self) -> Result<()> {
        if self.owner == self.address {
            return Err(FundMeError::EscrowAccount(self.address));
        }

        let total = self
            .funders
            .iter()
            .try_fold(Wei::ZERO, |acc, r| acc.checked_add(r.amount))?;
        if total != self.pooled_balance {
            return Err(FundMeError::InvalidSnapshot(format!(
                "funder balances sum to {} but pooled balance is {}",
                total, self.pooled_balance
            )));
        }
        Ok(())
    }
}
