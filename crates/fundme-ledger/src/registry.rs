use fundme_types::{Address, FundMeError, Result, Wei};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One funder and their cumulative deposit since the last withdrawal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunderRecord {
    pub address: Address,
    pub amount: Wei,
}

/// Funders in first-deposit order, with an address -> slot index for O(log n) membership.
/// Slots never move until `reset`, so indices stay valid for the lifetime of a funding round.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FunderRegistry {
    records: Vec<FunderRecord>,
    slots: BTreeMap<Address, usize>,
}

impl FunderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild from records, rejecting duplicate addresses
    pub fn from_records(records: Vec<FunderRecord>) -> Result<Self> {
        let mut registry = FunderRegistry::new();
        for record in records {
            if registry.contains(&record.address) {
                return Err(FundMeError::InvalidSnapshot(format!(
                    "duplicate funder {}",
                    record.address
                )));
            }
            registry.set_balance(&record.address, record.amount);
        }
        Ok(registry)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn contains(&self, address: &Address) -> bool {
        self.slots.contains_key(address)
    }

    /// Cumulative deposit of `address`, zero if it has none
    pub fn amount_of(&self, address: &Address) -> Wei {
        self.slots
            .get(address)
            .map(|&slot| self.records[slot].amount)
            .unwrap_or(Wei::ZERO)
    }

    pub fn funder_at(&self, index: usize) -> Option<&Address> {
        self.records.get(index).map(|r| &r.address)
    }

    pub fn records(&self) -> &[FunderRecord] {
        &self.records
    }

    pub fn addresses(&self) -> Vec<Address> {
        self.records.iter().map(|r| r.address).collect()
    }

    /// Balance `address` would hold after crediting `amount`
    pub fn credited_balance(&self, address: &Address, amount: Wei) -> Result<Wei> {
        self.amount_of(address).checked_add(amount)
    }

    /// Store `balance` for `address`, appending it if new. Returns true for a new funder.
    pub fn set_balance(&mut self, address: &Address, balance: Wei) -> bool {
        match self.slots.get(address) {
            Some(&slot) => {
                self.records[slot].amount = balance;
                false
            }
            None => {
                self.slots.insert(*address, self.records.len());
                self.records.push(FunderRecord {
                    address: *address,
                    amount: balance,
                });
                true
            }
        }
    }

    pub(crate) fn clear_balance_at(&mut self, index: usize) {
        if let Some(record) = self.records.get_mut(index) {
            record.amount = Wei::ZERO;
        }
    }

    pub(crate) fn clear_balance_of(&mut self, address: &Address) {
        if let Some(&slot) = self.slots.get(address) {
            self.records[slot].amount = Wei::ZERO;
        }
    }

    /// Drop every funder
    pub fn reset(&mut self) {
        self.records.clear();
        self.slots.clear();
    }
}
