use fundme_types::{Address, FundMeError, Result, Wei};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Native-value balances outside the ledger.
/// Abstracts over an in-memory chain, a node client, or any custodian that can move value.
pub trait Bank {
    /// Native balance held by `account`
    fn balance(&self, account: &Address) -> Wei;

    /// Move `amount` from `from` to `to`. Fails with `TransferFailed` and changes nothing
    /// if the sender is short or the recipient refuses the value.
    fn transfer(&mut self, from: &Address, to: &Address, amount: Wei) -> Result<()>;
}

/// In-memory bank for local deployments and tests
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryBank {
    balances: BTreeMap<Address, Wei>,
    /// Accounts that refuse incoming value
    #[serde(default)]
    rejecting: BTreeSet<Address>,
}

impl MemoryBank {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create value out of thin air (local chains only)
    pub fn mint(&mut self, account: &Address, amount: Wei) -> Result<()> {
        let balance = self.balance(account).checked_add(amount)?;
        self.balances.insert(*account, balance);
        Ok(())
    }

    /// Make `account` refuse (or accept again) incoming transfers
    pub fn set_rejects_transfers(&mut self, account: &Address, rejects: bool) {
        if rejects {
            self.rejecting.insert(*account);
        } else {
            self.rejecting.remove(account);
        }
    }

}

impl Bank for MemoryBank {
    fn balance(&self, account: &Address) -> Wei {
        self.balances.get(account).copied().unwrap_or(Wei::ZERO)
    }

    fn transfer(&mut self, from: &Address, to: &Address, amount: Wei) -> Result<()> {
        if amount.is_zero() {
            return Ok(()); // No-op for zero transfers
        }

        let failed = |reason: &str| FundMeError::TransferFailed {
            from: *from,
            to: *to,
            amount,
            reason: reason.to_string(),
        };

        if self.rejecting.contains(to) {
            return Err(failed("recipient rejected transfer"));
        }

        let from_balance = self.balance(from);
        if from_balance < amount {
            return Err(failed("insufficient balance"));
        }
        if from == to {
            return Ok(());
        }

        let from_after = from_balance.checked_sub(amount)?;
        let to_after = self.balance(to).checked_add(amount)?;
        self.balances.insert(*from, from_after);
        self.balances.insert(*to, to_after);
        Ok(())
    }
}
